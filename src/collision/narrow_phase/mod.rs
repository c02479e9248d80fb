//! Pairwise shape tests, implemented as methods on
//! [`CollisionDetector`](super::CollisionDetector).

mod box_box;
mod plane;
mod ray;
mod sphere;

pub use ray::NO_HIT;
