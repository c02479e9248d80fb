use crate::collision::Contact;
use crate::dynamics::RigidBody;
use crate::math::{Mat3, Vec3};

/// Velocity state of one body while contacts are being solved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Vec3,
    pub inverse_mass: f32,
    pub inverse_inertia_world: Mat3,
}

impl SolverBody {
    /// Stand-in for the ground and any other immovable body.
    pub const FIXED: Self = Self {
        position: Vec3::ZERO,
        velocity: Vec3::ZERO,
        rotation: Vec3::ZERO,
        inverse_mass: 0.0,
        inverse_inertia_world: Mat3::ZERO,
    };

    pub fn from_body(body: &RigidBody) -> Self {
        if body.is_fixed() {
            return Self {
                position: body.position(),
                ..Self::FIXED
            };
        }
        Self {
            position: body.position(),
            velocity: body.velocity(),
            rotation: body.rotation(),
            inverse_mass: body.inverse_mass(),
            inverse_inertia_world: body.inverse_inertia_tensor_world(),
        }
    }

    #[inline]
    pub fn velocity_at(&self, r: Vec3) -> Vec3 {
        self.velocity + self.rotation.cross(r)
    }

    /// Applies `impulse` at offset `r` from the center of mass.
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vec3, r: Vec3) {
        self.velocity += impulse * self.inverse_mass;
        self.rotation += self.inverse_inertia_world * r.cross(impulse);
    }
}

/// A velocity constraint for one contact
#[derive(Debug, Clone, Copy)]
pub struct ContactConstraint {
    /// Contact normal (pointing from body2 to body1)
    pub normal: Vec3,
    pub tangent1: Vec3,
    pub tangent2: Vec3,
    /// Offset from body1's center to the contact point
    pub r1: Vec3,
    /// Offset from body2's center to the contact point
    pub r2: Vec3,
    /// Effective mass along the normal
    pub normal_mass: f32,
    pub tangent1_mass: f32,
    pub tangent2_mass: f32,
    /// Separating speed the normal constraint drives toward
    pub velocity_bias: f32,
    pub friction: f32,
    /// Accumulated normal impulse
    pub normal_impulse: f32,
    pub tangent1_impulse: f32,
    pub tangent2_impulse: f32,
}

/// Tunables used when turning a contact into a constraint.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintParams {
    pub baumgarte: f32,
    pub penetration_tolerance: f32,
    pub closing_speed_tolerance: f32,
    pub dt: f32,
}

impl ContactConstraint {
    pub fn new(
        contact: &Contact,
        one: &SolverBody,
        two: &SolverBody,
        params: &ConstraintParams,
    ) -> Self {
        // Both lever arms reach the same point, midway between the contact points.
        let point = match contact.point2 {
            Some(point2) => (contact.point1 + point2) * 0.5,
            None => contact.point1,
        };
        let normal = contact.normal;
        let (tangent1, tangent2) = compute_tangent_basis(normal);

        let r1 = point - one.position;
        let r2 = point - two.position;

        let normal_speed = (one.velocity_at(r1) - two.velocity_at(r2)).dot(normal);

        // Bounce only for impacts, not for resting contacts.
        let restitution_bias = if normal_speed < -params.closing_speed_tolerance {
            -contact.restitution * normal_speed
        } else {
            0.0
        };
        let penetration_bias = if contact.penetration > params.penetration_tolerance {
            params.baumgarte / params.dt * (contact.penetration - params.penetration_tolerance)
        } else {
            0.0
        };

        Self {
            normal,
            tangent1,
            tangent2,
            r1,
            r2,
            normal_mass: compute_effective_mass(one, two, r1, r2, normal),
            tangent1_mass: compute_effective_mass(one, two, r1, r2, tangent1),
            tangent2_mass: compute_effective_mass(one, two, r1, r2, tangent2),
            velocity_bias: restitution_bias + penetration_bias,
            friction: contact.friction,
            normal_impulse: 0.0,
            tangent1_impulse: 0.0,
            tangent2_impulse: 0.0,
        }
    }

    /// Solves the normal constraint (non-penetration)
    pub fn solve_normal(&mut self, one: &mut SolverBody, two: &mut SolverBody) {
        let normal_speed = self.relative_velocity(one, two).dot(self.normal);
        let impulse = self.normal_mass * (self.velocity_bias - normal_speed);
        if !impulse.is_finite() {
            log::warn!("non-finite normal impulse {impulse}, skipping contact");
            return;
        }

        let old_impulse = self.normal_impulse;
        self.normal_impulse = (old_impulse + impulse).max(0.0);
        self.apply(one, two, self.normal * (self.normal_impulse - old_impulse));
    }

    /// Solves both friction directions, bounded by the current normal impulse.
    pub fn solve_friction(&mut self, one: &mut SolverBody, two: &mut SolverBody) {
        // NaN and negative products collapse to zero so the clamp bounds stay ordered.
        let max_friction = (self.friction * self.normal_impulse).max(0.0);

        let tangent_speed = self.relative_velocity(one, two).dot(self.tangent1);
        let impulse = -self.tangent1_mass * tangent_speed;
        if impulse.is_finite() {
            let old_impulse = self.tangent1_impulse;
            self.tangent1_impulse = (old_impulse + impulse).clamp(-max_friction, max_friction);
            self.apply(one, two, self.tangent1 * (self.tangent1_impulse - old_impulse));
        }

        let tangent_speed = self.relative_velocity(one, two).dot(self.tangent2);
        let impulse = -self.tangent2_mass * tangent_speed;
        if impulse.is_finite() {
            let old_impulse = self.tangent2_impulse;
            self.tangent2_impulse = (old_impulse + impulse).clamp(-max_friction, max_friction);
            self.apply(one, two, self.tangent2 * (self.tangent2_impulse - old_impulse));
        }
    }

    pub fn store_impulses(&self, contact: &mut Contact) {
        contact.normal_impulse_sum = self.normal_impulse;
        contact.tangent_impulse_sum1 = self.tangent1_impulse;
        contact.tangent_impulse_sum2 = self.tangent2_impulse;
    }

    /// Velocity of body1 relative to body2 at the contact point.
    #[inline]
    fn relative_velocity(&self, one: &SolverBody, two: &SolverBody) -> Vec3 {
        one.velocity_at(self.r1) - two.velocity_at(self.r2)
    }

    /// Body1 receives `impulse`, body2 the opposite.
    #[inline]
    fn apply(&self, one: &mut SolverBody, two: &mut SolverBody, impulse: Vec3) {
        one.apply_impulse(impulse, self.r1);
        two.apply_impulse(-impulse, self.r2);
    }
}

/// Computes an orthonormal tangent basis from a unit normal
fn compute_tangent_basis(normal: Vec3) -> (Vec3, Vec3) {
    let reference = if normal.x.abs() > normal.y.abs() {
        Vec3::Y
    } else {
        Vec3::X
    };
    let tangent1 = normal.cross(reference).normalize();
    let tangent2 = normal.cross(tangent1).normalize();
    (tangent1, tangent2)
}

/// Inverse of the change in relative speed along `direction` per unit impulse.
fn compute_effective_mass(
    one: &SolverBody,
    two: &SolverBody,
    r1: Vec3,
    r2: Vec3,
    direction: Vec3,
) -> f32 {
    let angular1 = (one.inverse_inertia_world * r1.cross(direction)).cross(r1);
    let angular2 = (two.inverse_inertia_world * r2.cross(direction)).cross(r2);
    let k = one.inverse_mass + two.inverse_mass + (angular1 + angular2).dot(direction);

    if k > 0.0 {
        1.0 / k
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::BodyId;
    use crate::dynamics::RigidBodyDesc;
    use rstest::rstest;

    const PARAMS: ConstraintParams = ConstraintParams {
        baumgarte: 0.1,
        penetration_tolerance: 0.0005,
        closing_speed_tolerance: 0.005,
        dt: 1.0 / 60.0,
    };

    fn falling_ball(velocity: Vec3) -> SolverBody {
        let body = RigidBodyDesc::default()
            .with_position(Vec3::new(0.0, 0.5, 0.0))
            .with_velocity(velocity)
            .with_mass(2.0)
            .build();
        SolverBody::from_body(&body)
    }

    fn ground_contact(penetration: f32, restitution: f32) -> Contact {
        Contact::with_ground(BodyId(1), Vec3::Y, Vec3::ZERO, penetration)
            .with_coefficients(restitution, 0.5)
    }

    #[rstest]
    #[case(Vec3::Y)]
    #[case(Vec3::X)]
    #[case(Vec3::new(0.3, -0.8, 0.52))]
    fn test_tangent_basis(#[case] normal: Vec3) {
        let normal = normal.normalize();
        let (t1, t2) = compute_tangent_basis(normal);

        assert!(t1.dot(normal).abs() < 1e-5);
        assert!(t2.dot(normal).abs() < 1e-5);
        assert!(t1.dot(t2).abs() < 1e-5);
        assert!((t1.length() - 1.0).abs() < 1e-5);
        assert!((t2.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_effective_mass_against_fixed() {
        let ball = falling_ball(Vec3::ZERO);
        // Impulse through the center: only the linear term contributes.
        let mass = compute_effective_mass(&ball, &SolverBody::FIXED, Vec3::ZERO, Vec3::ZERO, Vec3::Y);
        assert!((mass - 2.0).abs() < 1e-5);

        let none = compute_effective_mass(
            &SolverBody::FIXED,
            &SolverBody::FIXED,
            Vec3::X,
            Vec3::X,
            Vec3::Y,
        );
        assert_eq!(none, 0.0);
    }

    #[test]
    fn test_fixed_body_ignores_velocity() {
        let body = RigidBodyDesc::default()
            .with_velocity(Vec3::X)
            .with_mass(0.0)
            .build();
        let solver_body = SolverBody::from_body(&body);
        assert_eq!(solver_body.velocity, Vec3::ZERO);
        assert_eq!(solver_body.inverse_mass, 0.0);
    }

    #[test]
    fn test_normal_impulse_stops_approach() {
        let mut ball = falling_ball(Vec3::new(0.0, -3.0, 0.0));
        let mut ground = SolverBody::FIXED;
        let contact = ground_contact(0.0, 0.0);
        let mut constraint = ContactConstraint::new(&contact, &ball, &ground, &PARAMS);

        constraint.solve_normal(&mut ball, &mut ground);

        assert!(ball.velocity.y.abs() < 1e-4);
        assert!((constraint.normal_impulse - 6.0).abs() < 1e-3);
        assert_eq!(ground, SolverBody::FIXED);
    }

    #[test]
    fn test_restitution_reverses_impact() {
        let mut ball = falling_ball(Vec3::new(0.0, -2.0, 0.0));
        let mut ground = SolverBody::FIXED;
        let contact = ground_contact(0.0, 0.5);
        let mut constraint = ContactConstraint::new(&contact, &ball, &ground, &PARAMS);

        constraint.solve_normal(&mut ball, &mut ground);

        assert!((ball.velocity.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_separating_contact_gets_no_impulse() {
        let mut ball = falling_ball(Vec3::new(0.0, 1.0, 0.0));
        let mut ground = SolverBody::FIXED;
        let mut constraint =
            ContactConstraint::new(&ground_contact(0.0, 0.3), &ball, &ground, &PARAMS);

        constraint.solve_normal(&mut ball, &mut ground);

        assert_eq!(constraint.normal_impulse, 0.0);
        assert_eq!(ball.velocity, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_penetration_adds_separating_bias() {
        let ball = falling_ball(Vec3::ZERO);
        let shallow =
            ContactConstraint::new(&ground_contact(0.0004, 0.0), &ball, &SolverBody::FIXED, &PARAMS);
        let deep =
            ContactConstraint::new(&ground_contact(0.1, 0.0), &ball, &SolverBody::FIXED, &PARAMS);

        assert_eq!(shallow.velocity_bias, 0.0);
        let expected = 0.1 * 60.0 * (0.1 - 0.0005);
        assert!((deep.velocity_bias - expected).abs() < 1e-4);
    }

    #[test]
    fn test_friction_is_bounded_by_normal_impulse() {
        // Sliding fast along X while pressed down.
        let mut ball = falling_ball(Vec3::new(10.0, -1.0, 0.0));
        let mut ground = SolverBody::FIXED;
        let mut constraint =
            ContactConstraint::new(&ground_contact(0.0, 0.0), &ball, &ground, &PARAMS);

        constraint.solve_normal(&mut ball, &mut ground);
        constraint.solve_friction(&mut ball, &mut ground);

        let limit = constraint.friction * constraint.normal_impulse;
        assert!(constraint.tangent1_impulse.abs() <= limit + 1e-5);
        assert!(constraint.tangent2_impulse.abs() <= limit + 1e-5);
        // Slowed, but not stopped.
        assert!(ball.velocity.x > 0.0 && ball.velocity.x < 10.0);
    }

    #[rstest]
    #[case(-0.1)]
    #[case(f32::NAN)]
    fn test_invalid_friction_applies_no_tangent_impulse(#[case] friction: f32) {
        let mut ball = falling_ball(Vec3::new(3.0, -1.0, 0.0));
        let mut ground = SolverBody::FIXED;
        let contact = ground_contact(0.0, 0.0).with_coefficients(0.0, friction);
        let mut constraint = ContactConstraint::new(&contact, &ball, &ground, &PARAMS);

        constraint.solve_normal(&mut ball, &mut ground);
        constraint.solve_friction(&mut ball, &mut ground);

        assert_eq!(constraint.tangent1_impulse, 0.0);
        assert_eq!(constraint.tangent2_impulse, 0.0);
        assert_eq!(ball.velocity.x, 3.0);
    }

    #[test]
    fn test_store_impulses() {
        let ball = falling_ball(Vec3::new(0.0, -1.0, 0.0));
        let mut contact = ground_contact(0.0, 0.0);
        let mut constraint = ContactConstraint::new(&contact, &ball, &SolverBody::FIXED, &PARAMS);
        constraint.normal_impulse = 1.5;
        constraint.tangent2_impulse = -0.25;

        constraint.store_impulses(&mut contact);

        assert_eq!(contact.normal_impulse_sum, 1.5);
        assert_eq!(contact.tangent_impulse_sum1, 0.0);
        assert_eq!(contact.tangent_impulse_sum2, -0.25);
    }
}
