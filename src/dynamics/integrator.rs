use super::rigid_body::RigidBody;

/// Applies acceleration, accumulated force/torque and damping to velocities.
pub fn integrate_velocity(body: &mut RigidBody, dt: f32) {
    let linear_acceleration = body.acceleration.add_scaled(body.force, body.inverse_mass);
    let angular_acceleration = body.inverse_inertia_tensor_world * body.torque;

    body.velocity = body.velocity.add_scaled(linear_acceleration, dt);
    body.rotation = body.rotation.add_scaled(angular_acceleration, dt);

    // Exponential damping, independent of step size.
    body.velocity *= (1.0 - body.linear_damping).powf(dt);
    body.rotation *= (1.0 - body.angular_damping).powf(dt);
}

/// Moves the body along its (already updated) velocities.
pub fn integrate_position(body: &mut RigidBody, dt: f32) {
    body.position = body.position.add_scaled(body.velocity, dt);
    body.orientation = body
        .orientation
        .rotate_by_scaled_vector(body.rotation, dt * 0.5)
        .normalize();
}

impl RigidBody {
    /// Advances the body by `duration` seconds with semi-implicit Euler.
    ///
    /// Fixed bodies (inverse mass 0) are left completely untouched.
    pub fn integrate(&mut self, duration: f32) {
        if self.is_fixed() {
            return;
        }

        integrate_velocity(self, duration);
        integrate_position(self, duration);
        self.calculate_derived_data();
        self.clear_accumulators();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::RigidBodyDesc;
    use crate::math::{Mat3, Quat, Vec3};

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn undamped(desc: RigidBodyDesc) -> RigidBody {
        desc.with_damping(0.0, 0.0).build()
    }

    #[test]
    fn test_fixed_body_is_untouched() {
        let mut body = RigidBodyDesc::default()
            .with_mass(0.0)
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_velocity(Vec3::new(4.0, 0.0, 0.0))
            .with_orientation(Quat::from_axis_angle(Vec3::X, 0.3))
            .build();
        body.set_acceleration(Vec3::new(0.0, -9.8, 0.0));
        body.add_force_at(Vec3::new(10.0, 10.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        let before = body.clone();

        for dt in [0.0, 1.0 / 60.0, 0.5, 10.0] {
            body.integrate(dt);
        }

        assert_eq!(body, before);
    }

    #[test]
    fn test_free_fall() {
        let g = 9.0;
        let dt = 0.01;
        let steps = 100;
        let y0 = 50.0;

        let mut body = undamped(RigidBodyDesc::default().with_position(Vec3::new(0.0, y0, 0.0)));
        body.set_acceleration(Vec3::new(0.0, -g, 0.0));
        for _ in 0..steps {
            body.integrate(dt);
        }

        let t = steps as f32 * dt;
        assert!(approx_eq(body.velocity().y, -g * t));
        // Semi-implicit Euler lands within 0.5 * g * t * dt of the analytic curve.
        let analytic = y0 - 0.5 * g * t * t;
        assert!((body.position().y - analytic).abs() <= 0.5 * g * t * dt + 1e-3);
        assert_eq!(body.position().x, 0.0);
    }

    #[test]
    fn test_force_is_applied_once() {
        let mut body = undamped(RigidBodyDesc::default().with_mass(2.0));
        body.add_force(Vec3::new(4.0, 0.0, 0.0));
        body.integrate(0.5);
        assert!(approx_eq(body.velocity().x, 1.0));
        assert_eq!(body.force(), Vec3::ZERO);

        body.integrate(0.5);
        assert!(approx_eq(body.velocity().x, 1.0));
    }

    #[test]
    fn test_damping_is_exponential() {
        let mut body = RigidBodyDesc::default()
            .with_velocity(Vec3::new(10.0, 0.0, 0.0))
            .with_damping(0.5, 0.0)
            .build();

        for _ in 0..10 {
            body.integrate(0.1);
        }

        // Ten steps of 0.1s lose the same fraction as one step of 1s.
        assert!(approx_eq(body.velocity().x, 5.0));
    }

    #[test]
    fn test_torque_spins_body() {
        let mut body = undamped(RigidBodyDesc::default());
        body.set_inverse_inertia_tensor(Mat3::IDENTITY);
        body.add_torque(Vec3::new(0.0, 2.0, 0.0));
        body.integrate(0.5);

        assert!(approx_eq(body.rotation().y, 1.0));
        let q = body.orientation();
        assert!(approx_eq(q.length_squared(), 1.0));
        assert!(q.y > 0.0);
    }
}
