//! # Playground Physics
//!
//! A real-time 3D rigid body engine for spheres, boxes and a ground plane.
//!
//! ## Features
//!
//! - **Rigid Body Dynamics**: linear and angular motion with quaternion orientation and exponential damping
//! - **Collision Detection**: sphere, box and plane tests, with the separating axis theorem for box pairs
//! - **Contact Resolution**: sequential impulses with accumulated clamping, Coulomb friction and Baumgarte stabilization
//! - **Picking**: ray queries against individual objects or the whole scene
//!
//! ## Quick Start
//!
//! ```rust
//! use playground_physics::prelude::*;
//!
//! let mut simulator = Simulator::default();
//! simulator.set_gravity(9.0);
//!
//! let ball = BodyId(1);
//! simulator
//!     .add_physics_object(
//!         ball,
//!         RigidBodyDesc::default().with_position(Vec3::new(0.0, 4.0, 0.0)),
//!         Shape::sphere(1.0),
//!     )
//!     .expect("fresh id");
//!
//! let mut contacts = Vec::new();
//! for _ in 0..120 {
//!     simulator.simulate(1.0 / 60.0, &mut contacts);
//! }
//!
//! let model_matrix = simulator.transform_cols(ball);
//! assert!(model_matrix.is_some());
//! ```

pub mod collision;
pub mod constraints;
pub mod dynamics;
mod error;
pub mod geometry;
pub mod math;
mod simulator;
pub mod solver;

pub use error::SimulationError;
pub use simulator::{Simulator, SimulatorConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collision::{BodyId, Collider, ContactInfo, PlaneCollider, NO_HIT};
    pub use crate::dynamics::{RigidBody, RigidBodyDesc};
    pub use crate::geometry::{Shape, ShapeType};
    pub use crate::math::{Mat3, Mat4, Quat, Vec3};
    pub use crate::solver::SolverConfig;
    pub use crate::{SimulationError, Simulator, SimulatorConfig};
}
