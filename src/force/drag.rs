//! Velocity-dependent drag.

use crate::body::Body;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::force::Force;
use crate::handle::BodySet;
use crate::vec::Vec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragLaw {
    /// `-strength·v`
    Linear,
    /// `-strength·|v|·v`
    Quadratic,
}

/// Resistance opposing a body's velocity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Drag<F: Float> {
    strength: F,
    law: DragLaw,
}

impl<F: Float> Drag<F> {
    pub fn new(strength: F, law: DragLaw) -> Result<Self, PhysicsError> {
        if !strength.is_non_negative_finite() {
            log::warn!("rejected drag strength {}", strength);
            return Err(PhysicsError::InvalidStrength);
        }
        Ok(Drag { strength, law })
    }

    pub fn linear(strength: F) -> Result<Self, PhysicsError> {
        Self::new(strength, DragLaw::Linear)
    }

    pub fn quadratic(strength: F) -> Result<Self, PhysicsError> {
        Self::new(strength, DragLaw::Quadratic)
    }

    pub fn strength(&self) -> F { self.strength }
    pub fn law(&self) -> DragLaw { self.law }
}

impl<V: Vec> Force<V> for Drag<V::Scalar> {
    fn evaluate(&self, body: &Body<V>, _bodies: &BodySet<'_, V>, _dt: V::Scalar) -> V {
        let velocity = body.velocity();
        match self.law {
            DragLaw::Linear => velocity.scale(-self.strength),
            DragLaw::Quadratic => velocity.scale(-self.strength * velocity.length()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vector;

    #[test]
    fn rejects_negative_strength() {
        assert_eq!(Drag::linear(-1.0f64).unwrap_err(), PhysicsError::InvalidStrength);
    }

    #[test]
    fn linear_opposes_velocity() {
        let drag = Drag::linear(0.5).unwrap();
        let body = Body::new(Vector::zero(), Vector::new(2.0, -4.0, 0.0), 1.0).unwrap();
        assert_eq!(drag.evaluate(&body, &BodySet::empty(), 0.1), Vector::new(-1.0, 2.0, 0.0));
    }

    #[test]
    fn quadratic_grows_with_speed() {
        let drag = Drag::quadratic(1.0).unwrap();
        let body = Body::new(Vector::zero(), Vector::new(0.0, 3.0, 4.0), 1.0).unwrap();
        assert_eq!(drag.evaluate(&body, &BodySet::empty(), 0.1), Vector::new(0.0, -15.0, -20.0));
    }
}
