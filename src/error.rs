use thiserror::Error;

use crate::collision::BodyId;
use crate::geometry::ShapeType;

/// Errors reported by the [`Simulator`](crate::Simulator) entry points.
///
/// Every error is also logged where it is detected, and the failed
/// operation leaves the simulator unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimulationError {
    #[error("no physics object with id {0}")]
    UnknownObject(BodyId),

    #[error("a physics object with id {0} already exists")]
    DuplicateObject(BodyId),

    #[error("collider {0} has no rigid body with the same id")]
    MissingBody(BodyId),

    #[error("object {id} is a {expected}, got {found} dimensions")]
    ShapeMismatch {
        id: BodyId,
        expected: ShapeType,
        found: ShapeType,
    },

    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f32),

    #[error("friction must be non-negative and finite, got {0}")]
    InvalidFriction(f32),
}
