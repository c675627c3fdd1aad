//! Point-mass physics for driving UI animation.
//!
//! `impulse` advances bodies under attached forces, one frame at a time. A
//! driver (scene graph, event loop) owns a [`PhysicsEngine`], calls
//! [`PhysicsEngine::step`] once per animation frame and reads body positions
//! back into visual transforms. User input is fed in between steps as forces
//! or impulses.
//!
//! # Features
//!
//! - **Semi-implicit Euler**: velocity first, then position with the new
//!   velocity; stable for springs
//! - **Two-phase stepping**: all forces see the pre-step state, so attachment
//!   order never changes the result
//! - **Springs**: fixed stiffness or period-tuned (critically/under/over-damped),
//!   Hooke or FENE, anchored at a point or on another body
//! - **Automatic sub-steps**: period-tuned springs settle at any frame `dt`
//! - **Open force set**: implement [`Force`] for drag, repulsion, anything
//! - **Generational handles**: removed bodies and forces are detected, never
//!   dangled
//! - **Observable**: monitor steps via the `StepObserver` trait
//! - **`no_std` compatible**: needs only `alloc`

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod arena;
pub mod handle;
pub mod body;
pub mod force;
pub mod engine;
pub mod observer;
pub mod config;
pub mod error;
pub mod counter;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec3, Vector};
pub use handle::{BodyHandle, BodySet, ForceHandle};
pub use body::{Body, Body3D};
pub use force::{Anchor, DampingMode, Drag, DragLaw, Force, ForceLaw, Spring, Spring3D, Tuning};
pub use engine::{PhysicsEngine, PhysicsEngine3D};
pub use config::EngineConfig;
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::PhysicsError;
pub use counter::next_display_value;
