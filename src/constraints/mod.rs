mod contact_constraint;

pub use contact_constraint::{ConstraintParams, ContactConstraint, SolverBody};
