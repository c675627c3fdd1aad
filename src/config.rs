//! Configuration types for the physics engine.

use crate::float::Float;
use crate::vec::Vec;

/// Options for [`PhysicsEngine`](crate::engine::PhysicsEngine).
///
/// # Builder Pattern
/// ```
/// use impulse::config::EngineConfig;
/// use impulse::vec::Vector;
///
/// let config: EngineConfig<Vector> = EngineConfig::new()
///     .with_sub_steps(4)
///     .with_gravity(Vector::new(0.0, -9.81, 0.0))
///     .with_velocity_cap(50.0)
///     .with_sleep_tolerance(1e-6);
/// assert_eq!(config.sub_steps, 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig<V: Vec> {
    /// Sub-steps per `step` call; forces are re-evaluated for each.
    /// Higher = more stable for stiff springs. Default: 1.
    pub sub_steps: usize,
    /// Ceiling on the sub-steps the engine adds on its own to keep
    /// period-tuned springs stable. Default: 1024.
    pub max_sub_steps: usize,
    /// Uniform acceleration applied to every body. Default: zero.
    pub gravity: V,
    /// Maximum speed after integration. Default: none.
    pub velocity_cap: Option<V::Scalar>,
    /// Kinetic energy below which a body counts as settled. Default: 1e-7.
    pub sleep_tolerance: V::Scalar,
}

impl<V: Vec> EngineConfig<V> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        EngineConfig {
            sub_steps: 1,
            max_sub_steps: 1024,
            gravity: V::zero(),
            velocity_cap: None,
            sleep_tolerance: V::Scalar::from_f32(1e-7),
        }
    }

    /// Set the number of sub-steps.
    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps.max(1);
        self
    }

    /// Set the ceiling on automatic sub-steps.
    pub fn with_max_sub_steps(mut self, max_sub_steps: usize) -> Self {
        self.max_sub_steps = max_sub_steps.max(1);
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: V) -> Self {
        self.gravity = gravity;
        self
    }

    /// Clamp body speed. Non-positive or non-finite caps are ignored.
    pub fn with_velocity_cap(mut self, cap: V::Scalar) -> Self {
        self.velocity_cap = if cap.is_positive_finite() { Some(cap) } else { None };
        self
    }

    /// Set the settle threshold on kinetic energy.
    pub fn with_sleep_tolerance(mut self, tolerance: V::Scalar) -> Self {
        self.sleep_tolerance = tolerance.max(V::Scalar::zero());
        self
    }
}

impl<V: Vec> Default for EngineConfig<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vector;

    #[test]
    fn sub_steps_at_least_one() {
        let config: EngineConfig<Vector> = EngineConfig::new().with_sub_steps(0).with_max_sub_steps(0);
        assert_eq!(config.sub_steps, 1);
        assert_eq!(config.max_sub_steps, 1);
    }

    #[test]
    fn invalid_velocity_cap_ignored() {
        let config: EngineConfig<Vector> = EngineConfig::new().with_velocity_cap(-1.0);
        assert_eq!(config.velocity_cap, None);
        let config: EngineConfig<Vector> = EngineConfig::new().with_velocity_cap(3.0);
        assert_eq!(config.velocity_cap, Some(3.0));
    }
}
