mod shape;

pub use shape::{box_vertices, Shape, ShapeType};
