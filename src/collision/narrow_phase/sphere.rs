use crate::collision::{BoxCollider, CollisionDetector, Contact, SphereCollider};
use crate::math::Vec3;

impl CollisionDetector {
    /// Sphere against sphere. The normal points from `two` toward `one`.
    pub fn sphere_and_sphere(
        &self,
        contacts: &mut Vec<Contact>,
        one: &SphereCollider<'_>,
        two: &SphereCollider<'_>,
    ) -> bool {
        let offset = one.center() - two.center();
        let radius_sum = one.radius + two.radius;
        let distance_squared = offset.length_squared();
        if distance_squared >= radius_sum * radius_sum {
            return false;
        }

        let distance = distance_squared.sqrt();
        // Concentric spheres have no preferred direction; push along +Y.
        let normal = offset.try_normalize().unwrap_or(Vec3::Y);
        let points = (
            one.center() - normal * one.radius,
            two.center() + normal * two.radius,
        );

        contacts.push(self.object_contact(Contact::between(
            one.id,
            two.id,
            normal,
            points,
            radius_sum - distance,
        )));
        true
    }

    /// Sphere against box. The normal points from the box toward the sphere.
    pub fn sphere_and_box(
        &self,
        contacts: &mut Vec<Contact>,
        sphere: &SphereCollider<'_>,
        cube: &BoxCollider<'_>,
    ) -> bool {
        let center = sphere.center();
        let local_center = cube.body.to_local(center);
        let half = cube.half_extents;

        let closest = local_center.clamp_symmetric(half);
        let distance_squared = closest.distance_squared(local_center);
        if distance_squared >= sphere.radius * sphere.radius {
            return false;
        }

        let (normal, surface_point, penetration) = if distance_squared > 0.0 {
            let closest_world = cube.body.to_world(closest);
            let normal = (center - closest_world).normalize();
            (normal, closest_world, sphere.radius - distance_squared.sqrt())
        } else {
            // Center inside the box: leave through the nearest face.
            let depths = half - local_center.abs();
            let axis = (0..3)
                .min_by(|&a, &b| depths[a].total_cmp(&depths[b]))
                .unwrap_or(0);
            let sign = if local_center[axis] < 0.0 { -1.0 } else { 1.0 };

            let mut face_point = local_center;
            match axis {
                0 => face_point.x = sign * half.x,
                1 => face_point.y = sign * half.y,
                _ => face_point.z = sign * half.z,
            }
            let normal = cube.axis(axis) * sign;
            (normal, cube.body.to_world(face_point), sphere.radius + depths[axis])
        };

        contacts.push(self.object_contact(Contact::between(
            sphere.id,
            cube.id,
            normal,
            (center - normal * sphere.radius, surface_point),
            penetration,
        )));
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::collision::{BodyId, BoundCollider, Collider, CollisionDetector, Contact};
    use crate::dynamics::{RigidBody, RigidBodyDesc};
    use crate::geometry::Shape;
    use crate::math::{Quat, Vec3};
    use rstest::rstest;

    const EPSILON: f32 = 1e-5;

    fn body_at(position: Vec3) -> RigidBody {
        RigidBodyDesc::default().with_position(position).build()
    }

    fn collide(first: (&RigidBody, Shape), second: (&RigidBody, Shape)) -> Vec<Contact> {
        let a = Collider::new(BodyId(1), first.1).bind(first.0);
        let b = Collider::new(BodyId(2), second.1).bind(second.0);
        let mut contacts = Vec::new();
        let hit = CollisionDetector::default().collide(&mut contacts, &a, &b);
        assert_eq!(hit, !contacts.is_empty());
        contacts
    }

    #[rstest]
    #[case(Vec3::new(1.5, 0.0, 0.0), 1.0, 1.0)]
    #[case(Vec3::new(0.3, -0.4, 0.2), 0.5, 0.25)]
    #[case(Vec3::new(0.0, 0.0, 2.9), 2.0, 1.0)]
    #[case(Vec3::new(4.0, 0.0, 0.0), 1.0, 1.0)]
    fn test_sphere_pair_symmetry(#[case] offset: Vec3, #[case] ra: f32, #[case] rb: f32) {
        let a = body_at(Vec3::new(1.0, 2.0, 3.0));
        let b = body_at(Vec3::new(1.0, 2.0, 3.0) + offset);

        let ab = collide((&a, Shape::sphere(ra)), (&b, Shape::sphere(rb)));
        let ba = collide((&b, Shape::sphere(rb)), (&a, Shape::sphere(ra)));

        assert_eq!(ab.len(), ba.len());
        if let (Some(ab), Some(ba)) = (ab.first(), ba.first()) {
            assert!((ab.penetration - ba.penetration).abs() < EPSILON);
            assert_eq!(ab.normal, -ba.normal);
        }
    }

    #[test]
    fn test_sphere_pair_contact_geometry() {
        let a = body_at(Vec3::ZERO);
        let b = body_at(Vec3::new(1.5, 0.0, 0.0));
        let contacts = collide((&a, Shape::sphere(1.0)), (&b, Shape::sphere(1.0)));

        let contact = &contacts[0];
        assert!((contact.normal + Vec3::X).length() < EPSILON);
        assert!((contact.penetration - 0.5).abs() < EPSILON);
        assert!((contact.point1 - Vec3::new(1.0, 0.0, 0.0)).length() < EPSILON);
        let on_b = contact.point2.unwrap_or_default();
        assert!((on_b - Vec3::new(0.5, 0.0, 0.0)).length() < EPSILON);
    }

    #[rstest]
    #[case(Vec3::new(2.0001, 0.0, 0.0))]
    #[case(Vec3::new(0.0, 3.0, 0.0))]
    #[case(Vec3::new(-1.5, 1.5, 1.5))]
    fn test_separated_spheres_never_touch(#[case] offset: Vec3) {
        let a = body_at(Vec3::ZERO);
        let b = body_at(offset);
        assert!(collide((&a, Shape::sphere(1.0)), (&b, Shape::sphere(1.0))).is_empty());
    }

    #[test]
    fn test_concentric_spheres_push_up() {
        let a = body_at(Vec3::ZERO);
        let contacts = collide((&a, Shape::sphere(1.0)), (&a, Shape::sphere(0.5)));
        assert_eq!(contacts[0].normal, Vec3::Y);
        assert!((contacts[0].penetration - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_sphere_on_box_face() {
        let cube = body_at(Vec3::ZERO);
        let ball = body_at(Vec3::new(0.2, 1.25, -0.1));
        let contacts = collide(
            (&cube, Shape::cuboid(Vec3::splat(0.5))),
            (&ball, Shape::sphere(1.0)),
        );

        let contact = &contacts[0];
        assert_eq!(contact.body1, BodyId(2));
        assert!((contact.normal - Vec3::Y).length() < EPSILON);
        assert!((contact.penetration - 0.25).abs() < EPSILON);
        let on_box = contact.point2.unwrap_or_default();
        assert!((on_box - Vec3::new(0.2, 0.5, -0.1)).length() < EPSILON);
    }

    #[test]
    fn test_sphere_near_rotated_box_corner() {
        let mut cube = body_at(Vec3::ZERO);
        cube.set_orientation(Quat::from_axis_angle(Vec3::Z, std::f32::consts::FRAC_PI_4));
        // The rotated unit cube's corner points straight up at y = sqrt(2)/2.
        let corner = 0.5 * 2.0_f32.sqrt();
        let ball = body_at(Vec3::new(0.0, corner + 0.4, 0.0));

        let contacts = collide(
            (&ball, Shape::sphere(0.5)),
            (&cube, Shape::cuboid(Vec3::splat(0.5))),
        );

        let contact = &contacts[0];
        assert!((contact.normal - Vec3::Y).length() < 1e-4);
        assert!((contact.penetration - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_center_inside_box() {
        let cube = body_at(Vec3::ZERO);
        let ball = body_at(Vec3::new(0.0, 0.0, -0.4));
        let contacts = collide(
            (&ball, Shape::sphere(0.2)),
            (&cube, Shape::cuboid(Vec3::new(1.0, 1.0, 0.5))),
        );

        let contact = &contacts[0];
        assert!((contact.normal + Vec3::Z).length() < EPSILON);
        assert!((contact.penetration - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_sphere_beside_box_misses() {
        let cube = body_at(Vec3::ZERO);
        let ball = body_at(Vec3::new(1.6, 0.0, 0.0));
        let contacts = collide(
            (&ball, Shape::sphere(1.0)),
            (&cube, Shape::cuboid(Vec3::splat(0.5))),
        );
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_bound_collider_ids() {
        let body = body_at(Vec3::ZERO);
        let bound = Collider::new(BodyId(5), Shape::sphere(1.0)).bind(&body);
        assert!(matches!(bound, BoundCollider::Sphere(_)));
        assert_eq!(bound.id(), BodyId(5));
    }
}
