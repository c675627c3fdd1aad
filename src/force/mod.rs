//! Forces acting on bodies.
//!
//! A force is anything implementing [`Force`]: given a body and a read-only
//! view of the other bodies, it returns the push to add to that body's
//! accumulator. The engine evaluates every attachment against the pre-step
//! state before integrating, so forces never observe a half-advanced world.

pub mod drag;
pub mod spring;

use crate::body::Body;
use crate::handle::{BodyHandle, BodySet};
use crate::vec::Vec;

pub use drag::{Drag, DragLaw};
pub use spring::{Anchor, DampingMode, ForceLaw, Spring, Spring3D, Tuning};

/// A source of force on a body.
pub trait Force<V: Vec> {
    /// Force exerted on `body` for a step of length `dt`.
    fn evaluate(&self, body: &Body<V>, bodies: &BodySet<'_, V>, dt: V::Scalar) -> V;

    /// Evaluate and add the result to `body`'s accumulator.
    fn apply_to(&self, body: &mut Body<V>, bodies: &BodySet<'_, V>, dt: V::Scalar) {
        let force = self.evaluate(body, bodies, dt);
        body.apply_force(force);
    }

    /// Longest sub-step over which this force stays stable on `body`, if it
    /// imposes one. The engine sub-steps until every attachment fits.
    fn stable_step(&self, _body: &Body<V>, _bodies: &BodySet<'_, V>) -> Option<V::Scalar> {
        None
    }

    /// Bodies this force reads besides its targets, e.g. as an anchor.
    /// The force is detached when any of them is removed.
    fn anchors(&self) -> &[BodyHandle] {
        &[]
    }

    fn depends_on(&self, body: BodyHandle) -> bool {
        self.anchors().contains(&body)
    }
}
