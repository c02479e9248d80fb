use crate::collision::{BoundCollider, BoxCollider, CollisionDetector, SphereCollider};
use crate::math::Vec3;

/// Returned by ray queries that miss.
pub const NO_HIT: f32 = -1.0;

/// Below this, a ray counts as parallel to a box slab.
const PARALLEL_THRESHOLD: f32 = 1e-3;

impl CollisionDetector {
    /// Distance along a unit `direction` to the first hit on `collider`, or
    /// [`NO_HIT`].
    pub fn ray_and_collider(origin: Vec3, direction: Vec3, collider: &BoundCollider<'_>) -> f32 {
        match collider {
            BoundCollider::Sphere(sphere) => Self::ray_and_sphere(origin, direction, sphere),
            BoundCollider::Box(cube) => Self::ray_and_box(origin, direction, cube),
        }
    }

    /// Ray against sphere. A ray starting inside the sphere hits at distance 0.
    pub fn ray_and_sphere(origin: Vec3, direction: Vec3, sphere: &SphereCollider<'_>) -> f32 {
        let to_center = sphere.center() - origin;
        let projection = to_center.dot(direction);
        let orthogonal_squared = to_center.length_squared() - projection * projection;
        let radius_squared = sphere.radius * sphere.radius;
        if orthogonal_squared > radius_squared {
            return NO_HIT;
        }

        let half_chord = (radius_squared - orthogonal_squared).sqrt();
        if projection + half_chord < 0.0 {
            // Sphere is entirely behind the origin.
            return NO_HIT;
        }
        (projection - half_chord).max(0.0)
    }

    /// Ray against oriented box with the slab method.
    pub fn ray_and_box(origin: Vec3, direction: Vec3, cube: &BoxCollider<'_>) -> f32 {
        let to_center = cube.center() - origin;
        let mut t_near = 0.0_f32;
        let mut t_far = f32::MAX;

        for i in 0..3 {
            let axis = cube.axis(i);
            let half = cube.half_extents[i];
            let e = axis.dot(to_center);
            let f = axis.dot(direction);

            if f.abs() > PARALLEL_THRESHOLD {
                let mut t1 = (e - half) / f;
                let mut t2 = (e + half) / f;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t_near = t_near.max(t1);
                t_far = t_far.min(t2);
                if t_far < t_near {
                    return NO_HIT;
                }
            } else if -e - half > 0.0 || -e + half < 0.0 {
                // Parallel and outside this slab.
                return NO_HIT;
            }
        }
        t_near
    }
}
