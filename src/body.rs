//! Point-mass bodies integrated with semi-implicit Euler.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::{Vec, Vec3};

/// A point mass with a force accumulator.
///
/// Forces applied between integrations are summed; `integrate` turns the sum
/// into a velocity change and clears it.
#[derive(Clone, Debug, PartialEq)]
pub struct Body<V: Vec> {
    position: V,
    velocity: V,
    mass: V::Scalar,
    inv_mass: V::Scalar,
    force: V,
}

impl<V: Vec> Body<V> {
    pub fn new(position: V, velocity: V, mass: V::Scalar) -> Result<Self, PhysicsError> {
        if !mass.is_positive_finite() {
            log::warn!("rejected body mass {}", mass);
            return Err(PhysicsError::InvalidMass);
        }
        Ok(Body {
            position,
            velocity,
            mass,
            inv_mass: V::Scalar::one() / mass,
            force: V::zero(),
        })
    }

    pub fn at_rest(position: V, mass: V::Scalar) -> Result<Self, PhysicsError> {
        Self::new(position, V::zero(), mass)
    }

    pub fn apply_force(&mut self, force: V) {
        self.force = self.force + force;
    }

    /// Instantaneous change of momentum.
    pub fn apply_impulse(&mut self, impulse: V) {
        self.velocity = self.velocity + impulse.scale(self.inv_mass);
    }

    pub fn integrate(&mut self, dt: V::Scalar) -> Result<(), PhysicsError> {
        self.integrate_capped(dt, None)
    }

    /// Like [`Body::integrate`], clamping speed to `velocity_cap` before the
    /// position update.
    pub fn integrate_capped(
        &mut self,
        dt: V::Scalar,
        velocity_cap: Option<V::Scalar>,
    ) -> Result<(), PhysicsError> {
        if !dt.is_positive_finite() {
            return Err(PhysicsError::InvalidTimeStep);
        }
        let mut velocity = self.velocity + self.force.scale(self.inv_mass * dt);
        if let Some(cap) = velocity_cap {
            let speed = velocity.length();
            if speed > cap {
                velocity = velocity.scale(cap / speed);
            }
        }
        self.velocity = velocity;
        self.position = self.position + velocity.scale(dt);
        self.force = V::zero();
        Ok(())
    }

    pub fn position(&self) -> V { self.position }
    pub fn velocity(&self) -> V { self.velocity }
    pub fn mass(&self) -> V::Scalar { self.mass }
    pub fn inverse_mass(&self) -> V::Scalar { self.inv_mass }
    pub fn accumulated_force(&self) -> V { self.force }

    pub fn set_position(&mut self, position: V) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: V) {
        self.velocity = velocity;
    }

    pub fn set_mass(&mut self, mass: V::Scalar) -> Result<(), PhysicsError> {
        if !mass.is_positive_finite() {
            return Err(PhysicsError::InvalidMass);
        }
        self.mass = mass;
        self.inv_mass = V::Scalar::one() / mass;
        Ok(())
    }

    /// ½·m·|v|²
    pub fn kinetic_energy(&self) -> V::Scalar {
        V::Scalar::half() * self.mass * self.velocity.length_sq()
    }

    pub fn momentum(&self) -> V {
        self.velocity.scale(self.mass)
    }
}

pub type Body3D<F> = Body<Vec3<F>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vector;

    #[test]
    fn rejects_non_positive_mass() {
        assert_eq!(Body::at_rest(Vector::zero(), 0.0).unwrap_err(), PhysicsError::InvalidMass);
        assert_eq!(Body::at_rest(Vector::zero(), -1.0).unwrap_err(), PhysicsError::InvalidMass);
        assert_eq!(Body::at_rest(Vector::zero(), f64::NAN).unwrap_err(), PhysicsError::InvalidMass);
    }

    #[test]
    fn integrate_uses_updated_velocity() {
        let mut body = Body::at_rest(Vector::zero(), 2.0).unwrap();
        body.apply_force(Vector::new(4.0, 0.0, 0.0));
        body.integrate(0.5).unwrap();
        // v = 4 / 2 * 0.5 = 1, x = 1 * 0.5
        assert_eq!(body.velocity(), Vector::new(1.0, 0.0, 0.0));
        assert_eq!(body.position(), Vector::new(0.5, 0.0, 0.0));
        assert_eq!(body.accumulated_force(), Vector::zero());
    }

    #[test]
    fn invalid_dt_leaves_state() {
        let mut body = Body::new(Vector::zero(), Vector::new(1.0, 0.0, 0.0), 1.0).unwrap();
        body.apply_force(Vector::new(1.0, 0.0, 0.0));
        let before = body.clone();
        assert_eq!(body.integrate(0.0), Err(PhysicsError::InvalidTimeStep));
        assert_eq!(body.integrate(-0.1), Err(PhysicsError::InvalidTimeStep));
        assert_eq!(body.integrate(f64::INFINITY), Err(PhysicsError::InvalidTimeStep));
        assert_eq!(body, before);
    }

    #[test]
    fn forces_accumulate() {
        let mut body = Body::at_rest(Vector::zero(), 1.0).unwrap();
        body.apply_force(Vector::new(1.0, 0.0, 0.0));
        body.apply_force(Vector::new(0.0, 2.0, 0.0));
        assert_eq!(body.accumulated_force(), Vector::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn impulse_divides_by_mass() {
        let mut body = Body::at_rest(Vector::zero(), 4.0).unwrap();
        body.apply_impulse(Vector::new(0.0, 0.0, -2.0));
        assert_eq!(body.velocity(), Vector::new(0.0, 0.0, -0.5));
        assert_eq!(body.momentum(), Vector::new(0.0, 0.0, -2.0));
        assert_eq!(body.kinetic_energy(), 0.5);
    }

    #[test]
    fn velocity_cap_limits_speed() {
        let mut body = Body::at_rest(Vector::zero(), 1.0).unwrap();
        body.apply_force(Vector::new(100.0, 0.0, 0.0));
        body.integrate_capped(1.0, Some(2.0)).unwrap();
        assert!((body.velocity().length() - 2.0).abs() < 1e-12);
        assert!((body.position().x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn set_mass_validates() {
        let mut body = Body::at_rest(Vector::zero(), 1.0).unwrap();
        assert_eq!(body.set_mass(0.0), Err(PhysicsError::InvalidMass));
        body.set_mass(4.0).unwrap();
        assert_eq!(body.inverse_mass(), 0.25);
    }
}
