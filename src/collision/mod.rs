mod collider;
mod contact;
mod detector;
pub mod narrow_phase;

pub use collider::{BoundCollider, BoxCollider, Collider, PlaneCollider, SphereCollider};
pub use contact::{BodyId, Contact, ContactInfo};
pub use detector::{CollisionDetector, DetectorConfig};
pub use narrow_phase::NO_HIT;
