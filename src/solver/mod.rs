mod pgs;

pub use pgs::{CollisionResolver, SolverConfig};
