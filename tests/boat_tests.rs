use boat_grid::bodies::body_flags::EntityFlags;
use boat_grid::core::{EntityHandle, NodeEventType, SimulationConfig};
use boat_grid::error::SimulationError;
use boat_grid::math::{CompassDirection, Vector3};
use boat_grid::{Boat, BoatConfig, Entity, Environment, Grid, GridNode};
use approx::assert_relative_eq;
use rand::Rng;

fn boat_config() -> BoatConfig {
    BoatConfig {
        bob_phase: Some(0.0),
        ..BoatConfig::default()
    }
}

fn boat_at(position: Vector3, velocity: Vector3) -> Boat {
    let mut boat = Boat::new(BoatConfig { position, ..boat_config() }).unwrap();
    boat.entity_mut().set_linear_velocity(velocity);
    boat
}

fn calm_grid() -> Grid {
    Grid::with_config(SimulationConfig::with_environment(Environment::calm()))
}

fn windy_grid(wind_direction: CompassDirection) -> Grid {
    Grid::with_config(SimulationConfig::with_environment(Environment {
        wind_direction,
        ..Environment::default()
    }))
}

fn boat_ref(grid: &Grid, handle: EntityHandle) -> &Boat {
    grid.get_as::<Boat>(handle).unwrap()
}

#[test]
fn test_invalid_configurations_are_rejected() {
    let invalid = [
        BoatConfig { mass: 0.0, ..boat_config() },
        BoatConfig { mass: -1.0, ..boat_config() },
        BoatConfig { wet_area: -1.0, ..boat_config() },
        BoatConfig { submerged_volume: -0.5, ..boat_config() },
        BoatConfig { max_throttle: -1.0, ..boat_config() },
        BoatConfig { throttle_cooldown: -0.1, ..boat_config() },
        BoatConfig { position: Vector3::new(f64::NAN, 0.0, 0.0), ..boat_config() },
        BoatConfig { mass: f64::INFINITY, ..boat_config() },
        BoatConfig { bob_phase: Some(f64::NAN), ..boat_config() },
    ];

    for config in invalid {
        assert!(
            matches!(Boat::new(config.clone()), Err(SimulationError::InvalidParameter(_))),
            "accepted {:?}",
            config
        );
    }

    assert!(Boat::new(BoatConfig::default()).is_ok());
}

#[test]
fn test_random_bob_phase_range() {
    for _ in 0..50 {
        let boat = Boat::new(BoatConfig::default()).unwrap();
        assert!((0.0..999.0).contains(&boat.get_bob_phase()));
    }
}

#[test]
fn test_throttle_is_gated_by_cooldown() {
    let mut grid = calm_grid();
    let handle = grid.add(Boat::new(BoatConfig { max_throttle: 3.0, ..boat_config() }).unwrap());

    {
        let boat = grid.get_as_mut::<Boat>(handle).unwrap();
        assert!(boat.throttle_up());
        assert_eq!(boat.get_throttle(), 1.0);

        // Hot: no change
        assert!(!boat.throttle_up());
        assert!(!boat.throttle_down());
        assert_eq!(boat.get_throttle(), 1.0);
    }

    grid.update(0.2, 0.2);
    assert!(!grid.get_as_mut::<Boat>(handle).unwrap().throttle_up());

    grid.update(0.1, 0.3);
    let boat = grid.get_as_mut::<Boat>(handle).unwrap();
    assert!(boat.throttle_up());
    assert_eq!(boat.get_throttle(), 2.0);
}

#[test]
fn test_throttle_stays_within_bounds() {
    let mut rng = rand::thread_rng();
    let mut grid = calm_grid();
    let config = BoatConfig { max_throttle: 2.5, wet_area: 0.0, ..boat_config() };
    let handle = grid.add(Boat::new(config).unwrap());

    for i in 0..200 {
        {
            let boat = grid.get_as_mut::<Boat>(handle).unwrap();
            if rng.gen_bool(0.6) {
                boat.throttle_up();
            } else {
                boat.throttle_down();
            }
            let throttle = boat.get_throttle();
            assert!((0.0..=2.5).contains(&throttle), "throttle {} out of range", throttle);
        }
        grid.update(rng.gen_range(0.0..0.05), i as f64);
    }
}

#[test]
fn test_default_throttle_is_clamped_to_max() {
    let mut boat = Boat::new(boat_config()).unwrap();
    assert!(boat.throttle_up());
    assert_relative_eq!(boat.get_throttle(), 0.1);
    assert_relative_eq!(boat.get_max_throttle(), 0.1);
}

#[test]
fn test_single_throttle_step_moves_boat_forward() {
    let mut grid = calm_grid();
    let handle = grid.add(Boat::new(boat_config()).unwrap());

    assert!(grid.get_as_mut::<Boat>(handle).unwrap().throttle_up());
    grid.update(1.0, 1.0);

    let boat = boat_ref(&grid, handle);
    let velocity = boat.entity().get_linear_velocity();
    assert!(velocity.length() > 0.0);
    assert_relative_eq!(velocity.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(velocity.y, 0.0, epsilon = 1e-12);
    assert_relative_eq!(velocity.z, 0.05, epsilon = 1e-12);
    assert_relative_eq!(boat.entity().get_position().z, 0.05, epsilon = 1e-12);
    assert!(!boat.is_sinking());

    let telemetry = boat.telemetry();
    assert_relative_eq!(telemetry.speed, 0.05, epsilon = 1e-12);
    assert_relative_eq!(telemetry.acceleration_magnitude, 0.05, epsilon = 1e-12);
    assert_relative_eq!(telemetry.throttle, 0.1);
}

#[test]
fn test_surface_clamp_stops_rising() {
    let mut grid = calm_grid();
    let handle = grid.add(boat_at(Vector3::zero(), Vector3::new(0.0, 2.0, 0.0)));

    grid.update(0.1, 0.1);

    let boat = boat_ref(&grid, handle);
    assert_eq!(boat.entity().get_linear_velocity().y, 0.0);
    assert!(boat.entity().get_position().y <= 0.0);
}

#[test]
fn test_heavy_boat_sinks() {
    let mut grid = calm_grid();
    let handle = grid.add(Boat::new(BoatConfig { mass: 2000.0, ..boat_config() }).unwrap());
    grid.drain_events();

    grid.update(0.1, 0.1);

    let boat = boat_ref(&grid, handle);
    assert!(boat.is_sinking());
    assert!(boat.telemetry().is_sinking);

    // Per-call penalty of 0.5, then (9800 - 19600) / 2000 over 0.1 s
    assert_relative_eq!(boat.entity().get_linear_velocity().y, -0.99, epsilon = 1e-9);
    assert!(boat.entity().get_position().y < 0.0);

    let started = grid.events().get_node_events_of_type(NodeEventType::SinkingStarted);
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].node, handle);

    // Only the transition is reported
    grid.update(0.1, 0.2);
    assert!(boat_ref(&grid, handle).is_sinking());
    assert!(grid
        .events()
        .get_node_events_of_type(NodeEventType::SinkingStarted)
        .is_empty());
}

#[test]
fn test_heading_from_yaw() {
    let south = Boat::new(boat_config()).unwrap();
    assert_eq!(south.heading(), CompassDirection::South);

    let turned = Boat::new(BoatConfig {
        yaw: std::f64::consts::FRAC_PI_2,
        ..boat_config()
    })
    .unwrap();
    assert_ne!(turned.heading(), CompassDirection::South);
    assert_eq!(turned.heading(), CompassDirection::East);
}

#[test]
fn test_overlapping_boats_collide() {
    let mut grid = calm_grid();
    let a = grid.add(boat_at(Vector3::zero(), Vector3::new(0.0, 0.0, 4.0)));
    let b = grid.add(boat_at(Vector3::new(0.5, 0.0, 0.0), Vector3::new(0.0, 0.0, 2.0)));
    grid.drain_events();

    grid.update(0.001, 0.001);

    let events = grid.drain_events();
    let first = events
        .collision_events()
        .find(|e| e.body_a == a)
        .expect("a collided with b");
    assert_eq!(first.body_b, b);
    assert_relative_eq!(first.speed_before, 4.0);
    assert_relative_eq!(first.speed_after, 3.0);

    // The later sibling resolves against the earlier one's updated state
    let second = events
        .collision_events()
        .find(|e| e.body_a == b)
        .expect("b collided with a");
    assert_eq!(second.body_b, a);
    let a_speed = boat_ref(&grid, a).speed();
    assert_relative_eq!(second.speed_before, 2.0);
    assert_relative_eq!(second.speed_after, (2.0 + a_speed) / 2.0, epsilon = 1e-12);
}

#[test]
fn test_distant_boats_do_not_collide() {
    let mut grid = calm_grid();
    grid.add(boat_at(Vector3::zero(), Vector3::new(0.0, 0.0, 4.0)));
    grid.add(boat_at(Vector3::new(5.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 2.0)));

    grid.update(0.001, 0.001);

    assert_eq!(grid.events().collision_events().count(), 0);
}

#[test]
fn test_non_collidable_boats_are_skipped() {
    let mut grid = calm_grid();
    grid.add(boat_at(Vector3::zero(), Vector3::new(0.0, 0.0, 4.0)));
    let mut ghost = boat_at(Vector3::zero(), Vector3::new(0.0, 0.0, 2.0));
    ghost.entity_mut().set_flags(EntityFlags::COLLIDABLE, false);
    grid.add(ghost);

    // Plain entities never collide either
    grid.add(Entity::at(Vector3::zero()));

    grid.update(0.001, 0.001);

    assert_eq!(grid.events().collision_events().count(), 0);
}

#[test]
fn test_turn_updates_sail_and_rotation() {
    let mut grid = calm_grid();
    let handle = grid.add(Boat::new(boat_config()).unwrap());

    grid.get_as_mut::<Boat>(handle).unwrap().turn(1.0);
    grid.update(1.0, 1.0);

    let boat = boat_ref(&grid, handle);
    assert_eq!(boat.get_sail_angle(), 0.0);
    assert_relative_eq!(boat.entity().get_rotation().y, 0.02, epsilon = 1e-12);
    assert_relative_eq!(boat.entity().get_angular_velocity().y, 0.02 * 0.98, epsilon = 1e-12);
    assert_relative_eq!(boat.telemetry().angular_speed, 0.02 * 0.98, epsilon = 1e-12);

    let boat = grid.get_as_mut::<Boat>(handle).unwrap();
    boat.turn(0.0);
    assert_relative_eq!(boat.get_sail_angle(), 0.01, epsilon = 1e-12);
}

#[test]
fn test_current_collision() {
    let mut boat = boat_at(Vector3::zero(), Vector3::new(0.0, 0.0, 4.0));
    let environment = Environment { water_speed: 2.0, ..Environment::calm() };

    let speed = boat.resolve_current_collision(&environment);

    assert_relative_eq!(speed, 3.0);
    assert_relative_eq!(boat.entity().get_linear_velocity().z, 3.0);
    assert_relative_eq!(boat.speed(), 3.0);
}

#[test]
fn test_wind_adjusts_speed_after_update() {
    let environment = Environment {
        wind_speed: 5.0,
        wind_direction: CompassDirection::South,
        sail_area: 0.0,
        ..Environment::calm()
    };
    let mut grid = Grid::with_config(SimulationConfig::with_environment(environment.clone()));
    let config = BoatConfig { wet_area: 0.0, ..boat_config() };

    let mut with_wind = Boat::new(config.clone()).unwrap();
    with_wind.entity_mut().set_linear_velocity(Vector3::new(0.0, 0.0, 1.0));
    let handle = grid.add(with_wind);

    grid.update(0.1, 0.1);

    let boat = boat_ref(&grid, handle);
    assert_relative_eq!(boat.telemetry().speed, 1.0, epsilon = 1e-12);
    assert_relative_eq!(boat.entity().get_linear_velocity().z, 1.25, epsilon = 1e-12);

    // Heading against the wind slows the boat down
    grid.set_environment(Environment {
        wind_direction: CompassDirection::North,
        ..environment
    });
    grid.update(0.1, 0.2);

    let boat = boat_ref(&grid, handle);
    assert_relative_eq!(boat.entity().get_linear_velocity().z, 1.0, epsilon = 1e-12);
}

#[test]
fn test_telemetry_snapshot() {
    let environment = Environment { water_speed: 1.5, ..Environment::default() };
    let mut grid = Grid::with_config(SimulationConfig::with_environment(environment));
    let handle = grid.add(Boat::new(boat_config()).unwrap());

    grid.update(0.1, 0.1);

    let telemetry = *boat_ref(&grid, handle).telemetry();
    assert_relative_eq!(telemetry.gravity_force, 9.8, epsilon = 1e-9);
    assert_relative_eq!(telemetry.buoyant_force, 9800.0, epsilon = 1e-9);
    assert_eq!(telemetry.wave_force, 0.0);
    assert_relative_eq!(telemetry.wind_torque, 50.0, epsilon = 1e-9);
    assert_eq!(telemetry.drag_force, 0.0);
    assert_relative_eq!(telemetry.thrust_force, 0.5 * 0.5 * 1.225 * 25.0 * 10.0, epsilon = 1e-9);
    assert_relative_eq!(telemetry.water_momentum, 1.5);
    assert_relative_eq!(telemetry.water_kinetic_energy, 1.125);
    assert_eq!(telemetry.compass_direction, CompassDirection::South);
    assert_relative_eq!(telemetry.heading_degrees, 270.0);
    assert!(!telemetry.is_sinking);
    assert_eq!(telemetry.speed, 0.0);
    assert_eq!(telemetry.throttle, 0.0);
}

#[test]
fn test_bobbing_does_not_drift() {
    let environment = Environment { wave_height: 8.0, ..Environment::calm() };
    let mut grid = Grid::with_config(SimulationConfig::with_environment(environment));

    // Static hulls are not integrated, so only the bobbing moves them
    let mut hull = Boat::new(boat_config()).unwrap();
    hull.entity_mut().set_flags(EntityFlags::STATIC, true);
    let handle = grid.add(hull);

    grid.update(0.5, 0.5);
    assert_relative_eq!(boat_ref(&grid, handle).entity().get_position().y, 0.5f64.sin(), epsilon = 1e-12);

    grid.update(0.5, 1.0);
    assert_relative_eq!(boat_ref(&grid, handle).entity().get_position().y, 1.0f64.sin(), epsilon = 1e-12);
    assert_relative_eq!(boat_ref(&grid, handle).get_bob_phase(), 1.0);
}

#[test]
fn test_attachments_follow_the_boat() {
    let mut grid = calm_grid();
    let mut carrier = boat_at(Vector3::new(1.0, 0.0, 2.0), Vector3::zero());

    let mut cargo = Entity::at(Vector3::new(0.0, 1.0, 0.0));
    cargo.set_linear_velocity(Vector3::new(1.0, 0.0, 0.0));
    let cargo_handle = carrier.attachments_mut().add(cargo);
    let attachments_id = carrier.attachments().id();

    let handle = grid.add(carrier);
    grid.update(1.0, 1.0);

    let carrier = boat_ref(&grid, handle);
    let cargo = carrier.attachments().get(cargo_handle).unwrap().entity();
    assert_eq!(cargo.owner(), Some(attachments_id));
    assert_relative_eq!(cargo.get_position().x, 1.0);

    let world = carrier.attachment_world_position(cargo_handle).unwrap();
    assert_relative_eq!(world.x, 2.0);
    assert_relative_eq!(world.y, 1.0);
    assert_relative_eq!(world.z, 2.0);

    // Moving the boat carries its attachments
    let boat = grid.get_as_mut::<Boat>(handle).unwrap();
    boat.move_by(Vector3::new(0.0, 0.0, 3.0));
    let world = boat.attachment_world_position(cargo_handle).unwrap();
    assert_relative_eq!(world.z, 5.0);
}

/// Runs a default boat with one throttle step for `frames` frames of `dt`,
/// checking the velocity after every frame
fn sail_for(wind_direction: CompassDirection, dt: f64, frames: usize) -> Vector3 {
    let mut grid = windy_grid(wind_direction);
    let handle = grid.add(Boat::new(boat_config()).unwrap());
    assert!(grid.get_as_mut::<Boat>(handle).unwrap().throttle_up());

    let sail = boat_grid::forces::wind_thrust(grid.environment(), &grid.get_config().constants);
    let bound = sail * dt + 1.0;

    for frame in 1..=frames {
        grid.update(dt, frame as f64 * dt);

        let velocity = boat_ref(&grid, handle).entity().get_linear_velocity();
        assert!(velocity.is_finite(), "frame {}: {}", frame, velocity);
        assert!(velocity.length() <= bound, "frame {}: speed {} over {}", frame, velocity.length(), bound);
        // Drag may stop the hull but never pushes it backwards
        assert!(velocity.z >= 0.0, "frame {}: reversed to {}", frame, velocity);
    }

    boat_ref(&grid, handle).entity().get_position()
}

#[test]
fn test_default_environment_tailwind_stays_bounded() {
    for dt in [1.0 / 60.0, 1.0 / 30.0] {
        let position = sail_for(CompassDirection::South, dt, 600);
        assert!(position.z > 0.0);
        assert_relative_eq!(position.y, 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_default_environment_headwind_stays_bounded() {
    for dt in [1.0 / 60.0, 1.0 / 30.0] {
        let position = sail_for(CompassDirection::North, dt, 600);
        assert!(position.is_finite());
        assert!(position.z >= 0.0);
    }
}

#[test]
fn test_default_environment_random_frame_times() {
    let mut rng = rand::thread_rng();
    let mut grid = windy_grid(CompassDirection::South);
    let handle = grid.add(Boat::new(BoatConfig::default()).unwrap());

    let mut now = 0.0;
    for _ in 0..500 {
        let dt = rng.gen_range(0.0..0.1);
        now += dt;
        if rng.gen_bool(0.1) {
            grid.get_as_mut::<Boat>(handle).unwrap().throttle_up();
        }
        grid.update(dt, now);

        let boat = boat_ref(&grid, handle);
        assert!(boat.entity().get_linear_velocity().is_finite());
        assert!(boat.speed() < 20.0, "speed {}", boat.speed());
        assert!(boat.telemetry().speed.is_finite());
    }
}

#[test]
fn test_events_last_one_frame() {
    let mut grid = calm_grid();
    grid.add(boat_at(Vector3::zero(), Vector3::zero()));
    grid.add(boat_at(Vector3::new(0.5, 0.0, 0.0), Vector3::zero()));

    // Added events are dropped by the next update
    assert_eq!(grid.events().get_node_events_of_type(NodeEventType::Added).len(), 2);

    for frame in 1..=100 {
        grid.update(0.01, frame as f64 * 0.01);
        assert!(grid.events().get_node_events_of_type(NodeEventType::Added).is_empty());
        assert_eq!(grid.events().collision_events().count(), 2, "frame {}", frame);
    }
}
