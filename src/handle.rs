//! Typed handles into a [`PhysicsEngine`](crate::engine::PhysicsEngine) and the
//! read-only body view passed to forces.

use crate::arena::{Arena, Key};
use crate::body::Body;
use crate::vec::Vec;

/// Identifies a body inside one engine. Stale once the body is removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) Key);

/// Identifies a registered force inside one engine. Stale once removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForceHandle(pub(crate) Key);

/// Pre-step view of the engine's bodies, used to resolve body anchors.
#[derive(Copy, Clone)]
pub struct BodySet<'a, V: Vec> {
    bodies: Option<&'a Arena<Body<V>>>,
}

impl<'a, V: Vec> BodySet<'a, V> {
    pub(crate) fn new(bodies: &'a Arena<Body<V>>) -> Self {
        BodySet { bodies: Some(bodies) }
    }

    /// A view with no bodies, for applying a force outside an engine.
    pub fn empty() -> Self {
        BodySet { bodies: None }
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&'a Body<V>> {
        self.bodies.and_then(|bodies| bodies.get(handle.0))
    }
}
