use crate::collision::{BoxCollider, CollisionDetector, Contact};
use crate::math::Vec3;

/// Face axes of each box plus the nine edge-edge cross products.
const SAT_AXIS_COUNT: usize = 15;

/// Overlap of the two boxes' projections onto `axis`.
fn penetration_on_axis(
    one: &BoxCollider<'_>,
    two: &BoxCollider<'_>,
    axis: Vec3,
    to_center: Vec3,
) -> f32 {
    one.project_onto(axis) + two.project_onto(axis) - to_center.dot(axis).abs()
}

/// The vertex of `cube` lying furthest along `direction`, in local space.
fn support_vertex(cube: &BoxCollider<'_>, direction: Vec3) -> Vec3 {
    let mut vertex = cube.half_extents;
    if cube.axis(0).dot(direction) < 0.0 {
        vertex.x = -vertex.x;
    }
    if cube.axis(1).dot(direction) < 0.0 {
        vertex.y = -vertex.y;
    }
    if cube.axis(2).dot(direction) < 0.0 {
        vertex.z = -vertex.z;
    }
    vertex
}

impl CollisionDetector {
    /// Box against box with the separating axis test.
    ///
    /// The contact axis is the one with the smallest overlap; when several
    /// overlap equally, the last one tested wins. Face axes produce a
    /// vertex-face contact, edge axes the closest points of the two edges.
    /// The normal points from `two` toward `one`.
    pub fn box_and_box(
        &self,
        contacts: &mut Vec<Contact>,
        one: &BoxCollider<'_>,
        two: &BoxCollider<'_>,
    ) -> bool {
        let to_center = two.center() - one.center();
        let axes_one = [one.axis(0), one.axis(1), one.axis(2)];
        let axes_two = [two.axis(0), two.axis(1), two.axis(2)];

        let mut best: Option<(usize, Vec3, f32)> = None;
        for index in 0..SAT_AXIS_COUNT {
            let axis = match index {
                0..=2 => axes_one[index],
                3..=5 => axes_two[index - 3],
                _ => {
                    let edge = index - 6;
                    // Parallel edges give no new axis.
                    match axes_one[edge / 3].cross(axes_two[edge % 3]).try_normalize() {
                        Some(axis) => axis,
                        None => continue,
                    }
                }
            };

            let penetration = penetration_on_axis(one, two, axis, to_center);
            if penetration <= 0.0 {
                return false;
            }
            if best.map_or(true, |(_, _, smallest)| penetration <= smallest) {
                best = Some((index, axis, penetration));
            }
        }

        let Some((index, axis, penetration)) = best else {
            return false;
        };
        let normal = if axis.dot(to_center) > 0.0 { -axis } else { axis };

        let (point1, point2) = match index {
            0..=2 => {
                // A vertex of box two pokes into a face of box one.
                let point2 = two.body.to_world(support_vertex(two, normal));
                (point2 - normal * penetration, point2)
            }
            3..=5 => {
                // A vertex of box one pokes into a face of box two.
                let point1 = one.body.to_world(support_vertex(one, -normal));
                (point1, point1 + normal * penetration)
            }
            _ => edge_contact_points(one, two, normal, (index - 6) / 3, (index - 6) % 3),
        };

        contacts.push(self.object_contact(Contact::between(
            one.id,
            two.id,
            normal,
            (point1, point2),
            penetration,
        )));
        true
    }
}

/// Closest points between edge `edge_one` of box one and `edge_two` of box two.
fn edge_contact_points(
    one: &BoxCollider<'_>,
    two: &BoxCollider<'_>,
    normal: Vec3,
    edge_one: usize,
    edge_two: usize,
) -> (Vec3, Vec3) {
    let vertex_one = support_vertex(one, -normal);
    let vertex_two = support_vertex(two, normal);

    // Each edge runs from its support vertex back across the box.
    let mut direction_one = one.axis(edge_one);
    if vertex_one[edge_one] > 0.0 {
        direction_one = -direction_one;
    }
    let mut direction_two = two.axis(edge_two);
    if vertex_two[edge_two] > 0.0 {
        direction_two = -direction_two;
    }

    let start_one = one.body.to_world(vertex_one);
    let start_two = two.body.to_world(vertex_two);

    let k = direction_one.dot(direction_two);
    let denominator = 1.0 - k * k;
    let s = if denominator > f32::EPSILON {
        (start_two - start_one).dot(direction_one - direction_two * k) / denominator
    } else {
        0.0
    };
    let point1 = start_one + direction_one * s;
    let point2 = start_two + direction_two * (point1 - start_two).dot(direction_two);
    (point1, point2)
}
