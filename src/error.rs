//! Error types for physics operations.

use core::fmt;

/// Errors that can occur during physics operations.
///
/// Parameter errors are raised by the call that introduced the bad value.
/// Stale-handle errors are raised only by queries and `attach`; removal and
/// detachment are idempotent and never fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Mass must be positive and finite.
    InvalidMass,
    /// Time step must be positive and finite.
    InvalidTimeStep,
    /// Spring stiffness must be non-negative and finite.
    InvalidStiffness,
    /// Damping coefficient must be non-negative and finite.
    InvalidDamping,
    /// Rest length must be non-negative and finite.
    InvalidRestLength,
    /// Period must be positive and finite.
    InvalidPeriod,
    /// Damping ratio is outside the range its mode allows.
    InvalidDampingRatio,
    /// FENE maximum length must be positive and finite.
    InvalidMaxLength,
    /// Drag strength must be non-negative and finite.
    InvalidStrength,
    /// The body handle refers to a body that was removed.
    StaleBody,
    /// The force handle refers to a force that was removed.
    StaleForce,
}

impl PhysicsError {
    /// True for errors caused by an out-of-range argument.
    pub fn is_invalid_parameter(&self) -> bool {
        !self.is_stale_reference()
    }

    /// True for errors caused by a handle that no longer resolves.
    pub fn is_stale_reference(&self) -> bool {
        matches!(self, PhysicsError::StaleBody | PhysicsError::StaleForce)
    }
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidMass => write!(f, "mass must be positive and finite"),
            PhysicsError::InvalidTimeStep => write!(f, "time step must be positive and finite"),
            PhysicsError::InvalidStiffness => write!(f, "stiffness must be non-negative"),
            PhysicsError::InvalidDamping => write!(f, "damping must be non-negative"),
            PhysicsError::InvalidRestLength => write!(f, "rest length must be non-negative"),
            PhysicsError::InvalidPeriod => write!(f, "period must be positive"),
            PhysicsError::InvalidDampingRatio => {
                write!(f, "damping ratio out of range for damping mode")
            }
            PhysicsError::InvalidMaxLength => write!(f, "max length must be positive"),
            PhysicsError::InvalidStrength => write!(f, "drag strength must be non-negative"),
            PhysicsError::StaleBody => write!(f, "body handle is stale"),
            PhysicsError::StaleForce => write!(f, "force handle is stale"),
        }
    }
}

impl core::error::Error for PhysicsError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn classification() {
        assert!(PhysicsError::InvalidMass.is_invalid_parameter());
        assert!(PhysicsError::InvalidTimeStep.is_invalid_parameter());
        assert!(!PhysicsError::InvalidMass.is_stale_reference());
        assert!(PhysicsError::StaleBody.is_stale_reference());
        assert!(PhysicsError::StaleForce.is_stale_reference());
    }

    #[test]
    fn display_messages() {
        assert_eq!(PhysicsError::InvalidTimeStep.to_string(), "time step must be positive and finite");
        assert_eq!(PhysicsError::StaleBody.to_string(), "body handle is stale");
    }
}
