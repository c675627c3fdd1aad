//! Headless replay of the click-and-spring surface.
//!
//! A particle sits on a spring anchored at the origin. Every "click" bumps the
//! displayed counter and pushes the particle away from the viewer; the spring
//! pulls it back. Each frame prints the transform a renderer would apply.

use impulse::vec::Vec as _;
use impulse::{next_display_value, Anchor, Body, PhysicsEngine, PhysicsError, Spring, Vector};

const FRAME_MS: f64 = 16.0;
const CLICK_FRAMES: [usize; 3] = [10, 40, 45];

fn main() -> Result<(), PhysicsError> {
    let mut engine = PhysicsEngine::new();

    let particle = engine.add_body(Body::new(Vector::zero(), Vector::zero(), 1.0)?);
    let spring = Spring::critically_damped(Anchor::Point(Vector::zero()), 100.0)?
        .with_rest_length(0.0)?;
    engine.attach_new(spring, particle)?;

    let mut shown = 1;
    println!("frame  label  translate(x, y, z)");
    for frame in 0..120 {
        if CLICK_FRAMES.contains(&frame) {
            shown = next_display_value(shown).unwrap_or(shown);
            engine.apply_force(particle, Vector::new(0.0, 0.0, -0.005 * 100.0))?;
        }
        engine.step(FRAME_MS)?;

        let [x, y, z] = engine.position(particle)?.to_array();
        println!("{:>5}  {:>5}  ({:.3}, {:.3}, {:.3})", frame, shown, x, y, z);
    }

    let settled = engine.position(particle)?.length();
    println!("distance from rest after {} frames: {:.6}", 120, settled);
    Ok(())
}
