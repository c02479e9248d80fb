//! Drops a ball and a tilted box onto the ground and prints their motion.

use playground_physics::prelude::*;
use simplelog::{Config, LevelFilter, SimpleLogger};

fn main() -> Result<(), SimulationError> {
    let _ = SimpleLogger::init(LevelFilter::Debug, Config::default());

    println!("Playground Physics - Basic Simulation");
    println!("=====================================\n");

    let mut simulator = Simulator::default();
    simulator.set_ground_restitution(0.4);

    let ball = BodyId(1);
    simulator.add_physics_object(
        ball,
        RigidBodyDesc::default().with_position(Vec3::new(0.0, 5.0, 0.0)),
        Shape::sphere(0.5),
    )?;
    println!("Created ball at Y=5.0 (radius=0.5)");

    let cube = BodyId(2);
    simulator.add_physics_object(
        cube,
        RigidBodyDesc::default()
            .with_position(Vec3::new(2.0, 3.0, 0.0))
            .with_orientation(Quat::from_axis_angle(Vec3::new(1.0, 0.0, 1.0), 0.5)),
        Shape::cuboid(Vec3::splat(0.5)),
    )?;
    println!("Created tilted box at Y=3.0 (half-extent=0.5)\n");

    let dt = 1.0 / 60.0;
    let total_time = 3.0;
    let steps = (total_time / dt) as usize;
    println!("Simulating {total_time} seconds ({steps} steps at {}Hz)...\n", 1.0 / dt);

    let mut contacts = Vec::new();
    for i in 0..steps {
        simulator.simulate(dt, &mut contacts);

        // Every half second
        if i % 30 == 0 {
            for (id, body) in simulator.bodies() {
                let pos = body.position();
                let vel = body.velocity();
                println!(
                    "t={:.2}s {id}: position=({:.3}, {:.3}, {:.3}), velocity=({:.3}, {:.3}, {:.3}), contacts={}",
                    i as f32 * dt,
                    pos.x, pos.y, pos.z,
                    vel.x, vel.y, vel.z,
                    contacts.len()
                );
            }
        }
    }

    if let Some(body) = simulator.body(ball) {
        let pos = body.position();
        println!("\nFinal ball position: ({:.3}, {:.3}, {:.3})", pos.x, pos.y, pos.z);
    }
    println!("Expected resting height: ~0.5 (ball radius)");

    let hit = simulator.pick(Vec3::new(0.0, 10.0, 0.0), -Vec3::Y);
    println!("Picking straight down from Y=10 hits {hit:?}");
    Ok(())
}
