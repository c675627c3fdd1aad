//! Damped springs pulling a body toward an anchor.

use crate::body::Body;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::force::Force;
use crate::handle::{BodyHandle, BodySet};
use crate::vec::{Vec, Vec3};

/// Damping mode for a period-tuned spring.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DampingMode<F: Float> {
    CriticallyDamped,
    Underdamped { ratio: F },
    Overdamped { ratio: F },
}

impl<F: Float> DampingMode<F> {
    /// Damping ratio ζ.
    pub fn ratio(&self) -> F {
        match *self {
            DampingMode::CriticallyDamped => F::one(),
            DampingMode::Underdamped { ratio } | DampingMode::Overdamped { ratio } => ratio,
        }
    }

    fn validate(&self) -> Result<(), PhysicsError> {
        let valid = match *self {
            DampingMode::CriticallyDamped => true,
            DampingMode::Underdamped { ratio } => {
                ratio.is_positive_finite() && ratio < F::one()
            }
            DampingMode::Overdamped { ratio } => ratio.is_finite() && ratio > F::one(),
        };
        if valid { Ok(()) } else { Err(PhysicsError::InvalidDampingRatio) }
    }
}

/// What the spring pulls toward.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Anchor<V: Vec> {
    /// A fixed point.
    Point(V),
    /// Another body's current position. A removed body exerts nothing.
    Body(BodyHandle),
}

impl<V: Vec> From<BodyHandle> for Anchor<V> {
    fn from(handle: BodyHandle) -> Self {
        Anchor::Body(handle)
    }
}

/// How stiffness and damping are obtained.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Tuning<F: Float> {
    /// Fixed coefficients.
    Stiffness { stiffness: F, damping: F },
    /// Derived from the target's mass: `k = m·ω²`, `c = 2·m·ζ·ω`, `ω = 2π/period`.
    Period { period: F, mode: DampingMode<F> },
}

/// Relation between stretch and spring force magnitude.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ForceLaw<F: Float> {
    /// Linear in the stretch.
    Hooke,
    /// Finitely extensible: diverges as the stretch nears `max_length`.
    Fene { max_length: F },
}

impl<F: Float> ForceLaw<F> {
    fn response(&self, stretch: F) -> F {
        match *self {
            ForceLaw::Hooke => stretch,
            ForceLaw::Fene { max_length } => {
                let limit = max_length * F::from_f32(0.99);
                let r = stretch.clamp(-limit, limit);
                r / (F::one() - r * r / (max_length * max_length))
            }
        }
    }

    /// Derivative of `response`: how much stiffer than Hooke the law is at
    /// this stretch.
    fn slope(&self, stretch: F) -> F {
        match *self {
            ForceLaw::Hooke => F::one(),
            ForceLaw::Fene { max_length } => {
                let limit = max_length * F::from_f32(0.99);
                let r = stretch.clamp(-limit, limit);
                let ratio = r * r / (max_length * max_length);
                let soft = F::one() - ratio;
                (F::one() + ratio) / (soft * soft)
            }
        }
    }
}

/// A spring from an anchor to the body it is attached to.
///
/// The force is `-(k·law(stretch) + c·closing_speed)` along the direction from
/// the anchor to the body, where `stretch = distance - rest_length`. A body
/// sitting exactly on the anchor has no direction to be pulled in and
/// receives no force.
///
/// Period-tuned springs report a stable sub-step to the engine, so they
/// settle at any frame `dt`. Springs with fixed coefficients rely on
/// [`EngineConfig::sub_steps`](crate::config::EngineConfig::sub_steps).
#[derive(Clone, Debug, PartialEq)]
pub struct Spring<V: Vec> {
    anchor: Anchor<V>,
    rest_length: V::Scalar,
    tuning: Tuning<V::Scalar>,
    law: ForceLaw<V::Scalar>,
}

impl<V: Vec> Spring<V> {
    /// Undamped spring with a fixed stiffness.
    pub fn hooke(anchor: Anchor<V>, stiffness: V::Scalar) -> Result<Self, PhysicsError> {
        Self::damped(anchor, stiffness, V::Scalar::zero())
    }

    pub fn damped(
        anchor: Anchor<V>,
        stiffness: V::Scalar,
        damping: V::Scalar,
    ) -> Result<Self, PhysicsError> {
        if !stiffness.is_non_negative_finite() {
            log::warn!("rejected spring stiffness {}", stiffness);
            return Err(PhysicsError::InvalidStiffness);
        }
        if !damping.is_non_negative_finite() {
            log::warn!("rejected spring damping {}", damping);
            return Err(PhysicsError::InvalidDamping);
        }
        Ok(Self::with_tuning(anchor, Tuning::Stiffness { stiffness, damping }))
    }

    /// Period-tuned spring that settles without overshoot.
    pub fn critically_damped(anchor: Anchor<V>, period: V::Scalar) -> Result<Self, PhysicsError> {
        Self::from_period(anchor, period, DampingMode::CriticallyDamped)
    }

    pub fn underdamped(
        anchor: Anchor<V>,
        period: V::Scalar,
        damping_ratio: V::Scalar,
    ) -> Result<Self, PhysicsError> {
        Self::from_period(anchor, period, DampingMode::Underdamped { ratio: damping_ratio })
    }

    pub fn overdamped(
        anchor: Anchor<V>,
        period: V::Scalar,
        damping_ratio: V::Scalar,
    ) -> Result<Self, PhysicsError> {
        Self::from_period(anchor, period, DampingMode::Overdamped { ratio: damping_ratio })
    }

    pub fn from_period(
        anchor: Anchor<V>,
        period: V::Scalar,
        mode: DampingMode<V::Scalar>,
    ) -> Result<Self, PhysicsError> {
        if !period.is_positive_finite() {
            log::warn!("rejected spring period {}", period);
            return Err(PhysicsError::InvalidPeriod);
        }
        mode.validate()?;
        Ok(Self::with_tuning(anchor, Tuning::Period { period, mode }))
    }

    fn with_tuning(anchor: Anchor<V>, tuning: Tuning<V::Scalar>) -> Self {
        Spring {
            anchor,
            rest_length: V::Scalar::zero(),
            tuning,
            law: ForceLaw::Hooke,
        }
    }

    pub fn with_rest_length(mut self, rest_length: V::Scalar) -> Result<Self, PhysicsError> {
        if !rest_length.is_non_negative_finite() {
            return Err(PhysicsError::InvalidRestLength);
        }
        self.rest_length = rest_length;
        Ok(self)
    }

    pub fn with_law(mut self, law: ForceLaw<V::Scalar>) -> Result<Self, PhysicsError> {
        if let ForceLaw::Fene { max_length } = law {
            if !max_length.is_positive_finite() {
                return Err(PhysicsError::InvalidMaxLength);
            }
        }
        self.law = law;
        Ok(self)
    }

    pub fn anchor(&self) -> Anchor<V> { self.anchor }
    pub fn rest_length(&self) -> V::Scalar { self.rest_length }
    pub fn tuning(&self) -> Tuning<V::Scalar> { self.tuning }
    pub fn law(&self) -> ForceLaw<V::Scalar> { self.law }

    pub fn set_anchor(&mut self, anchor: Anchor<V>) {
        self.anchor = anchor;
    }

    /// Stiffness and damping coefficients for a body of the given mass.
    pub fn coefficients(&self, mass: V::Scalar) -> (V::Scalar, V::Scalar) {
        match self.tuning {
            Tuning::Stiffness { stiffness, damping } => (stiffness, damping),
            Tuning::Period { period, mode } => {
                let omega = V::Scalar::two() * V::Scalar::pi() / period;
                let stiffness = mass * omega * omega;
                let damping = V::Scalar::two() * mass * mode.ratio() * omega;
                (stiffness, damping)
            }
        }
    }

    /// Anchor position and velocity, or `None` if the anchor body is gone.
    fn anchor_state(&self, bodies: &BodySet<'_, V>) -> Option<(V, V)> {
        match self.anchor {
            Anchor::Point(pos) => Some((pos, V::zero())),
            Anchor::Body(handle) => bodies.get(handle).map(|other| (other.position(), other.velocity())),
        }
    }
}

impl<V: Vec> Force<V> for Spring<V> {
    fn evaluate(&self, body: &Body<V>, bodies: &BodySet<'_, V>, _dt: V::Scalar) -> V {
        let Some((anchor_pos, anchor_vel)) = self.anchor_state(bodies) else {
            return V::zero();
        };

        let displacement = body.position() - anchor_pos;
        let dist = displacement.length();
        let inv_dist = V::Scalar::one() / dist;
        if dist == V::Scalar::zero() || !inv_dist.is_finite() {
            return V::zero(); // degenerate
        }
        let direction = displacement.scale(inv_dist);

        let (stiffness, damping) = self.coefficients(body.mass());
        let stretch = dist - self.rest_length;
        let closing_speed = (body.velocity() - anchor_vel).dot(direction);
        let magnitude = -(stiffness * self.law.response(stretch)) - damping * closing_speed;
        direction.scale(magnitude)
    }

    /// `ω·h ≤ 1` and `c·h/m ≤ 1`, which keeps semi-implicit Euler inside its
    /// stability region. FENE stiffening at the current stretch raises `ω`.
    fn stable_step(&self, body: &Body<V>, bodies: &BodySet<'_, V>) -> Option<V::Scalar> {
        let Tuning::Period { period, mode } = self.tuning else {
            return None;
        };
        let (anchor_pos, _) = self.anchor_state(bodies)?;
        let stretch = body.position().distance(anchor_pos) - self.rest_length;

        let one = V::Scalar::one();
        let omega = V::Scalar::two() * V::Scalar::pi() / period;
        let spring_limit = one / (omega * self.law.slope(stretch).sqrt());
        let damping_limit = one / (V::Scalar::two() * mode.ratio() * omega);
        Some(spring_limit.min(damping_limit))
    }

    fn anchors(&self) -> &[BodyHandle] {
        match &self.anchor {
            Anchor::Body(handle) => core::slice::from_ref(handle),
            Anchor::Point(_) => &[],
        }
    }
}

pub type Spring3D<F> = Spring<Vec3<F>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vector;

    fn origin() -> Anchor<Vector> {
        Anchor::Point(Vector::zero())
    }

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(Spring::hooke(origin(), -1.0).unwrap_err(), PhysicsError::InvalidStiffness);
        assert_eq!(Spring::damped(origin(), 1.0, -0.1).unwrap_err(), PhysicsError::InvalidDamping);
        assert_eq!(Spring::critically_damped(origin(), 0.0).unwrap_err(), PhysicsError::InvalidPeriod);
        assert_eq!(
            Spring::underdamped(origin(), 1.0, 1.5).unwrap_err(),
            PhysicsError::InvalidDampingRatio,
        );
        assert_eq!(
            Spring::overdamped(origin(), 1.0, 0.5).unwrap_err(),
            PhysicsError::InvalidDampingRatio,
        );
        let spring = Spring::hooke(origin(), 1.0).unwrap();
        assert_eq!(spring.clone().with_rest_length(-1.0).unwrap_err(), PhysicsError::InvalidRestLength);
        assert_eq!(
            spring.with_law(ForceLaw::Fene { max_length: 0.0 }).unwrap_err(),
            PhysicsError::InvalidMaxLength,
        );
    }

    #[test]
    fn zero_length_gives_zero_force() {
        let spring = Spring::damped(origin(), 10.0, 3.0).unwrap();
        let body = Body::new(Vector::zero(), Vector::new(1.0, 0.0, 0.0), 1.0).unwrap();
        assert_eq!(spring.evaluate(&body, &BodySet::empty(), 0.01), Vector::zero());
    }

    #[test]
    fn body_beside_anchor_still_pulled() {
        let spring = Spring::damped(origin(), 1.0, 2.0).unwrap();
        let body = Body::new(Vector::new(1e-12, 0.0, 0.0), Vector::new(1.0, 0.0, 0.0), 1.0).unwrap();
        let f = spring.evaluate(&body, &BodySet::empty(), 0.01);
        assert!((f.x - (-1e-12 - 2.0)).abs() < 1e-9, "force {:?}", f);
        assert_eq!(f.y, 0.0);
        assert_eq!(f.z, 0.0);
    }

    #[test]
    fn stable_step_only_for_period_tuning() {
        let body = Body::at_rest(Vector::new(1.0, 0.0, 0.0), 1.0).unwrap();
        let fixed = Spring::hooke(origin(), 900.0).unwrap();
        assert_eq!(fixed.stable_step(&body, &BodySet::empty()), None);

        // c/m = 2ω is the tighter bound for a critically damped spring
        let tuned = Spring::critically_damped(origin(), 100.0).unwrap();
        let omega = 2.0 * core::f64::consts::PI / 100.0;
        let h = tuned.stable_step(&body, &BodySet::empty()).unwrap();
        assert!((h - 1.0 / (2.0 * omega)).abs() < 1e-9);

        let stretched = Body::at_rest(Vector::new(0.9, 0.0, 0.0), 1.0).unwrap();
        let fene = Spring::underdamped(origin(), 100.0, 0.1)
            .unwrap()
            .with_law(ForceLaw::Fene { max_length: 1.0 })
            .unwrap();
        let hooke = Spring::underdamped(origin(), 100.0, 0.1).unwrap();
        let fene_h = fene.stable_step(&stretched, &BodySet::empty()).unwrap();
        let hooke_h = hooke.stable_step(&stretched, &BodySet::empty()).unwrap();
        assert!(fene_h < hooke_h / 4.0, "fene {} vs hooke {}", fene_h, hooke_h);
    }

    #[test]
    fn hooke_pulls_toward_anchor() {
        let spring = Spring::hooke(origin(), 2.0).unwrap();
        let body = Body::at_rest(Vector::new(3.0, 0.0, 0.0), 1.0).unwrap();
        let f = spring.evaluate(&body, &BodySet::empty(), 0.01);
        assert_eq!(f, Vector::new(-6.0, 0.0, 0.0));
    }

    #[test]
    fn rest_length_pushes_when_compressed() {
        let spring = Spring::hooke(origin(), 1.0).unwrap().with_rest_length(2.0).unwrap();
        let body = Body::at_rest(Vector::new(0.0, 1.0, 0.0), 1.0).unwrap();
        let f = spring.evaluate(&body, &BodySet::empty(), 0.01);
        assert_eq!(f, Vector::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn damping_opposes_motion_along_axis() {
        let spring = Spring::damped(origin(), 0.0, 2.0).unwrap();
        let body = Body::new(Vector::new(1.0, 0.0, 0.0), Vector::new(3.0, 5.0, 0.0), 1.0).unwrap();
        let f = spring.evaluate(&body, &BodySet::empty(), 0.01);
        // only the radial component of velocity is damped
        assert_eq!(f, Vector::new(-6.0, 0.0, 0.0));
    }

    #[test]
    fn period_coefficients_scale_with_mass() {
        let spring = Spring::<Vector>::critically_damped(origin(), 1.0).unwrap();
        let omega = 2.0 * core::f64::consts::PI;
        let (k, c) = spring.coefficients(2.0);
        assert!((k - 2.0 * omega * omega).abs() < 1e-9);
        assert!((c - 4.0 * omega).abs() < 1e-9);
    }

    #[test]
    fn fene_stiffer_than_hooke_near_limit() {
        let hooke = Spring::hooke(origin(), 1.0).unwrap();
        let fene = hooke.clone().with_law(ForceLaw::Fene { max_length: 1.0 }).unwrap();
        let body = Body::at_rest(Vector::new(0.9, 0.0, 0.0), 1.0).unwrap();
        let h = hooke.evaluate(&body, &BodySet::empty(), 0.01).length();
        let f = fene.evaluate(&body, &BodySet::empty(), 0.01).length();
        assert!(f > 4.0 * h, "fene {} vs hooke {}", f, h);
    }

    #[test]
    fn missing_anchor_body_gives_zero_force() {
        use crate::arena::Arena;
        let mut arena = Arena::new();
        let key = arena.insert(Body::at_rest(Vector::zero(), 1.0).unwrap());
        arena.remove(key);
        let spring = Spring::hooke(Anchor::Body(BodyHandle(key)), 1.0).unwrap();
        let body = Body::at_rest(Vector::new(1.0, 0.0, 0.0), 1.0).unwrap();
        assert_eq!(spring.evaluate(&body, &BodySet::new(&arena), 0.01), Vector::zero());
        assert!(spring.depends_on(BodyHandle(key)));
    }
}
