//! The physics engine: bodies, force attachments and the step loop.

use crate::arena::Arena;
use crate::body::Body;
use crate::config::EngineConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::force::Force;
use crate::handle::{BodyHandle, BodySet, ForceHandle};
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::vec::{Vec, Vec3};
use alloc::boxed::Box;
use alloc::vec::Vec as AllocVec;

struct Attachment<V: Vec> {
    force: Box<dyn Force<V>>,
    // empty while detached
    targets: AllocVec<BodyHandle>,
}

/// Owns bodies and the forces attached to them, and advances both through
/// time.
///
/// Each `step(dt)` evaluates every (force, target) pair against the current
/// state, then integrates every body with semi-implicit Euler. Evaluation
/// never moves a body, so the result does not depend on the order forces were
/// attached in.
///
/// ```
/// use impulse::{Anchor, Body, PhysicsEngine, Spring, Vector};
/// use impulse::vec::Vec;
///
/// let mut engine = PhysicsEngine::new();
/// let body = engine.add_body(Body::at_rest(Vector::zero(), 1.0)?);
/// let spring = Spring::critically_damped(Anchor::Point(Vector::zero()), 100.0)?;
/// engine.attach_new(spring, body)?;
///
/// engine.apply_force(body, Vector::new(0.0, 0.0, -0.5))?;
/// engine.step(1.0)?;
/// assert!(engine.position(body)?.z < 0.0);
/// # Ok::<(), impulse::PhysicsError>(())
/// ```
pub struct PhysicsEngine<V: Vec> {
    bodies: Arena<Body<V>>,
    forces: Arena<Attachment<V>>,
    config: EngineConfig<V>,
    time: V::Scalar,
    pending: AllocVec<(BodyHandle, V)>,
}

impl<V: Vec> PhysicsEngine<V> {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::new())
    }

    pub fn with_config(config: EngineConfig<V>) -> Self {
        PhysicsEngine {
            bodies: Arena::new(),
            forces: Arena::new(),
            config,
            time: V::Scalar::zero(),
            pending: AllocVec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig<V> { &self.config }
    pub fn config_mut(&mut self) -> &mut EngineConfig<V> { &mut self.config }

    /// Simulated time advanced so far.
    pub fn time(&self) -> V::Scalar { self.time }

    // ---------------------------------------------------------------------
    // Bodies
    // ---------------------------------------------------------------------

    pub fn add_body(&mut self, body: Body<V>) -> BodyHandle {
        let handle = BodyHandle(self.bodies.insert(body));
        log::debug!("added body {:?}", handle);
        handle
    }

    /// Removes the body and every attachment that targets or anchors on it.
    /// Returns `None` if the handle is already stale.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body<V>> {
        let body = self.bodies.remove(handle.0)?;
        for (key, attachment) in self.forces.iter_mut() {
            if attachment.force.depends_on(handle) {
                if !attachment.targets.is_empty() {
                    log::debug!("detached {:?}: anchor body {:?} removed", ForceHandle(key), handle);
                }
                attachment.targets.clear();
            } else {
                attachment.targets.retain(|&target| target != handle);
            }
        }
        log::debug!("removed body {:?}", handle);
        Some(body)
    }

    pub fn contains_body(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    pub fn body(&self, handle: BodyHandle) -> Result<&Body<V>, PhysicsError> {
        self.bodies.get(handle.0).ok_or(PhysicsError::StaleBody)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body<V>, PhysicsError> {
        self.bodies.get_mut(handle.0).ok_or(PhysicsError::StaleBody)
    }

    pub fn position(&self, handle: BodyHandle) -> Result<V, PhysicsError> {
        self.body(handle).map(Body::position)
    }

    pub fn velocity(&self, handle: BodyHandle) -> Result<V, PhysicsError> {
        self.body(handle).map(Body::velocity)
    }

    /// Adds `force` to the body's accumulator for the next step.
    pub fn apply_force(&mut self, handle: BodyHandle, force: V) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.apply_force(force);
        Ok(())
    }

    /// Changes the body's velocity immediately by `impulse / mass`.
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: V) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.apply_impulse(impulse);
        Ok(())
    }

    pub fn body_count(&self) -> usize { self.bodies.len() }

    /// Bodies in stepping order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body<V>)> + '_ {
        self.bodies.iter().map(|(key, body)| (BodyHandle(key), body))
    }

    /// True when every body's kinetic energy is below the configured
    /// sleep tolerance.
    pub fn is_settled(&self) -> bool {
        let tolerance = self.config.sleep_tolerance;
        self.bodies.iter().all(|(_, body)| body.kinetic_energy() < tolerance)
    }

    // ---------------------------------------------------------------------
    // Forces
    // ---------------------------------------------------------------------

    /// Registers a force without attaching it to any body.
    pub fn add_force<F: Force<V> + 'static>(&mut self, force: F) -> ForceHandle {
        let handle = ForceHandle(self.forces.insert(Attachment {
            force: Box::new(force),
            targets: AllocVec::new(),
        }));
        log::debug!("added force {:?}", handle);
        handle
    }

    /// Registers `force` and attaches it to `body` in one call.
    pub fn attach_new<F: Force<V> + 'static>(
        &mut self,
        force: F,
        body: BodyHandle,
    ) -> Result<ForceHandle, PhysicsError> {
        self.check_live(body)?;
        self.check_anchors(&force)?;
        let handle = self.add_force(force);
        self.attach(handle, body)?;
        Ok(handle)
    }

    /// Makes the force act on `body` only. A force already attached elsewhere
    /// is re-targeted.
    pub fn attach(&mut self, force: ForceHandle, body: BodyHandle) -> Result<(), PhysicsError> {
        self.attach_all(force, &[body])
    }

    /// Makes the force act on each body in `targets`, replacing any previous
    /// targets. Duplicates are ignored.
    pub fn attach_all(
        &mut self,
        force: ForceHandle,
        targets: &[BodyHandle],
    ) -> Result<(), PhysicsError> {
        for &target in targets {
            self.check_live(target)?;
        }
        let attachment = self.forces.get(force.0).ok_or(PhysicsError::StaleForce)?;
        self.check_anchors(&*attachment.force)?;

        let attachment = self.forces.get_mut(force.0).ok_or(PhysicsError::StaleForce)?;
        attachment.targets.clear();
        for &target in targets {
            if !attachment.targets.contains(&target) {
                attachment.targets.push(target);
            }
        }
        log::debug!("attached {:?} to {:?}", force, targets);
        Ok(())
    }

    /// Stops the force acting on anything; it stays registered. Returns
    /// whether it was attached. Stale handles are ignored.
    pub fn detach(&mut self, force: ForceHandle) -> bool {
        match self.forces.get_mut(force.0) {
            Some(attachment) if !attachment.targets.is_empty() => {
                attachment.targets.clear();
                log::debug!("detached {:?}", force);
                true
            }
            _ => false,
        }
    }

    /// Unregisters the force and hands it back. `None` if already removed.
    pub fn remove_force(&mut self, force: ForceHandle) -> Option<Box<dyn Force<V>>> {
        let attachment = self.forces.remove(force.0)?;
        log::debug!("removed force {:?}", force);
        Some(attachment.force)
    }

    pub fn contains_force(&self, force: ForceHandle) -> bool {
        self.forces.contains(force.0)
    }

    /// Bodies the force currently acts on.
    pub fn targets(&self, force: ForceHandle) -> Result<&[BodyHandle], PhysicsError> {
        self.forces
            .get(force.0)
            .map(|attachment| attachment.targets.as_slice())
            .ok_or(PhysicsError::StaleForce)
    }

    pub fn force_count(&self) -> usize { self.forces.len() }

    fn check_live(&self, body: BodyHandle) -> Result<(), PhysicsError> {
        if self.bodies.contains(body.0) {
            Ok(())
        } else {
            log::warn!("stale body handle {:?}", body);
            Err(PhysicsError::StaleBody)
        }
    }

    fn check_anchors(&self, force: &dyn Force<V>) -> Result<(), PhysicsError> {
        force.anchors().iter().try_for_each(|&anchor| self.check_live(anchor))
    }

    // ---------------------------------------------------------------------
    // Stepping
    // ---------------------------------------------------------------------

    /// Advances the simulation by `dt`.
    pub fn step(&mut self, dt: V::Scalar) -> Result<(), PhysicsError> {
        self.step_observed(dt, &mut NoOpStepObserver)
    }

    /// Advances the simulation by `dt`, reporting each phase to `observer`.
    /// A non-positive or non-finite `dt`, or one too small to split into
    /// sub-steps, is rejected before anything moves. Period-tuned springs
    /// may raise the sub-step count above the configured one.
    pub fn step_observed<O: StepObserver>(
        &mut self,
        dt: V::Scalar,
        observer: &mut O,
    ) -> Result<(), PhysicsError> {
        if !dt.is_positive_finite() {
            log::warn!("rejected time step {}", dt);
            return Err(PhysicsError::InvalidTimeStep);
        }
        let sub_steps = self.sub_steps_for(dt);
        let sub_dt = dt / V::Scalar::from_f32(sub_steps as f32);
        if !sub_dt.is_positive_finite() {
            log::warn!("rejected time step {}: vanishes over {} sub-steps", dt, sub_steps);
            return Err(PhysicsError::InvalidTimeStep);
        }
        let velocity_cap = self.config.velocity_cap;
        log::trace!(
            "step: dt={} sub_steps={} bodies={} forces={}",
            dt,
            sub_steps,
            self.bodies.len(),
            self.forces.len(),
        );

        for _sub in 0..sub_steps {
            let evaluated = self.accumulate_forces(sub_dt);
            observer.on_forces_applied(evaluated);

            for body in self.bodies.values_mut() {
                body.integrate_capped(sub_dt, velocity_cap)?;
            }
            observer.on_integrate();
        }

        self.time = self.time + dt;
        observer.on_step_complete(self.time.to_f64());
        Ok(())
    }

    /// The configured sub-step count, raised so that no sub-step exceeds any
    /// attachment's stable step. Never more than `max_sub_steps`.
    fn sub_steps_for(&self, dt: V::Scalar) -> usize {
        let configured = self.config.sub_steps.max(1);
        let bodies = BodySet::new(&self.bodies);
        let mut limit: Option<V::Scalar> = None;
        for (_, attachment) in self.forces.iter() {
            for &target in &attachment.targets {
                let Some(body) = bodies.get(target) else { continue };
                if let Some(h) = attachment.force.stable_step(body, &bodies) {
                    limit = Some(limit.map_or(h, |l| l.min(h)));
                }
            }
        }

        let required = match limit {
            Some(h) if h.is_positive_finite() => libm::ceil((dt / h).to_f64()) as usize,
            _ => return configured,
        };
        if required <= configured {
            return configured;
        }
        let ceiling = self.config.max_sub_steps.max(configured);
        if required > ceiling {
            log::warn!("step {} needs {} sub-steps, capped at {}", dt, required, ceiling);
        }
        required.min(ceiling)
    }

    /// Evaluates every attachment against the unmoved bodies, then feeds the
    /// results and gravity into the accumulators. Returns the number of
    /// evaluations.
    fn accumulate_forces(&mut self, dt: V::Scalar) -> usize {
        let mut pending = core::mem::take(&mut self.pending);
        pending.clear();

        let bodies = BodySet::new(&self.bodies);
        for (_, attachment) in self.forces.iter() {
            for &target in &attachment.targets {
                if let Some(body) = bodies.get(target) {
                    pending.push((target, attachment.force.evaluate(body, &bodies, dt)));
                }
            }
        }

        let gravity = self.config.gravity;
        if gravity != V::zero() {
            for body in self.bodies.values_mut() {
                let weight = gravity.scale(body.mass());
                body.apply_force(weight);
            }
        }
        for &(target, force) in &pending {
            if let Some(body) = self.bodies.get_mut(target.0) {
                body.apply_force(force);
            }
        }

        let evaluated = pending.len();
        self.pending = pending;
        evaluated
    }
}

impl<V: Vec> Default for PhysicsEngine<V> {
    fn default() -> Self {
        Self::new()
    }
}

pub type PhysicsEngine3D<F> = PhysicsEngine<Vec3<F>>;
