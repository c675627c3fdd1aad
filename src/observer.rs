//! Step observer trait for monitoring engine progress.

/// Trait for observing engine steps.
///
/// Implement this trait to watch a step's phases (e.g., for debugging,
/// visualization, or performance profiling). All methods have default
/// no-op implementations.
pub trait StepObserver {
    /// Called once per sub-step after every force has been evaluated.
    /// `count` is the number of (force, body) evaluations made.
    fn on_forces_applied(&mut self, _count: usize) {}

    /// Called once per sub-step after every body has been integrated.
    fn on_integrate(&mut self) {}

    /// Called when a `step` call is fully complete, with the engine's
    /// simulated time.
    fn on_step_complete(&mut self, _time: f64) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
