mod mat3;
mod mat4;
mod quat;
mod vec3;

pub use mat3::Mat3;
pub use mat4::Mat4;
pub use quat::Quat;
pub use vec3::Vec3;
