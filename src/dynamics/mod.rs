mod integrator;
mod rigid_body;

pub use integrator::{integrate_position, integrate_velocity};
pub use rigid_body::{RigidBody, RigidBodyDesc, DEFAULT_MASS};
