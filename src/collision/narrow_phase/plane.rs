use crate::collision::{BoxCollider, CollisionDetector, Contact, PlaneCollider, SphereCollider};

impl CollisionDetector {
    /// Sphere against the ground half-space.
    pub fn sphere_and_plane(
        &self,
        contacts: &mut Vec<Contact>,
        sphere: &SphereCollider<'_>,
        plane: &PlaneCollider,
    ) -> bool {
        let center = sphere.center();
        let distance = plane.signed_distance(center);
        if distance >= sphere.radius {
            return false;
        }

        contacts.push(self.ground_contact(Contact::with_ground(
            sphere.id,
            plane.normal,
            center - plane.normal * distance,
            sphere.radius - distance,
        )));
        true
    }

    /// Box against the ground half-space: one contact per vertex below the plane.
    pub fn box_and_plane(
        &self,
        contacts: &mut Vec<Contact>,
        cube: &BoxCollider<'_>,
        plane: &PlaneCollider,
    ) -> bool {
        let before = contacts.len();
        for vertex in cube.world_vertices() {
            let distance = plane.signed_distance(vertex);
            if distance < 0.0 {
                contacts.push(self.ground_contact(Contact::with_ground(
                    cube.id,
                    plane.normal,
                    vertex,
                    -distance,
                )));
            }
        }
        contacts.len() > before
    }
}
