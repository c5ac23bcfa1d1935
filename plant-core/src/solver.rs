//! Position-based constraint solver.
//!
//! One tick is:
//! 1. [`integration_phase`] — damped Verlet step, optional jitter and the
//!    bias displacement for every free point.
//! 2. [`relaxation_pass`], repeated — every constraint is corrected once
//!    per pass, in stored order.
//!
//! [`step`] runs both phases in that order.

use crate::{
    config::SolverConfig, point_store::PointStore, sampling::random_unit_vector,
};
use rand::Rng;
use tracing::trace;

/// Advances every free point by one damped Verlet step.
///
/// For each point that is not pinned:
///
/// 1. `v = (pos - prev_pos) * cfg.damping`.
/// 2. If `cfg.jitter > 0`, a random direction scaled by `cfg.jitter` is
///    added to `v`.
/// 3. `prev_pos = pos`, then `pos += v`.
/// 4. The bias displacement for the new position is added
///    (see [`crate::config::BiasForce`]).
///
/// Pinned points are left untouched.
///
/// ### Parameters
/// - `store` - Point arena; only positions are written.
/// - `cfg` - Solver parameters (damping, jitter, bias).
/// - `rng` - Random source for the jitter term.
pub fn integration_phase(store: &mut PointStore, cfg: &SolverConfig, rng: &mut impl Rng) {
    for p in store.points.iter_mut().filter(|p| !p.pinned) {
        let mut v = (p.pos - p.prev_pos) * cfg.damping;
        if cfg.jitter > 0.0 {
            v += random_unit_vector(rng) * cfg.jitter;
        }

        p.prev_pos = p.pos;
        p.pos += v;
        p.pos += cfg.bias.displacement(p.pos);
    }
}

/// Visits every constraint once, in stored order, and moves its endpoints
/// toward the rest length.
///
/// Corrections are applied immediately, so later constraints in the same
/// pass see the updated positions.
///
/// For a constraint `(a, b, rest)` with separation `d = pos[b] - pos[a]`:
///
/// - If `|d| < cfg.degenerate_epsilon`, the points are treated as
///   coincident: the correction is `-rest` along a fresh random direction.
/// - Otherwise the correction is `d * (rest - |d|) / |d|`.
///
/// The correction is then split by the pinned flags: both pinned, nothing
/// happens; one pinned, the free endpoint takes the whole correction;
/// neither pinned, `a` moves by `-correction / 2` and `b` by
/// `+correction / 2`.
///
/// ### Panics
/// Panics if a constraint references an index outside the arena.
pub fn relaxation_pass(store: &mut PointStore, cfg: &SolverConfig, rng: &mut impl Rng) {
    let points = &mut store.points;

    for c in &store.constraints {
        let pa = points[c.a];
        let pb = points[c.b];
        if pa.pinned && pb.pinned {
            continue;
        }

        let d = pb.pos - pa.pos;
        let dist = d.length();

        let correction = if dist < cfg.degenerate_epsilon {
            let axis = random_unit_vector(rng);
            trace!(a = c.a, b = c.b, dist, "separating coincident points");
            axis * -c.rest_length
        } else {
            d * ((c.rest_length - dist) / dist)
        };

        if pa.pinned {
            points[c.b].pos += correction;
        } else if pb.pinned {
            points[c.a].pos -= correction;
        } else {
            points[c.a].pos -= correction * 0.5;
            points[c.b].pos += correction * 0.5;
        }
    }
}

/// Runs one full tick: [`integration_phase`] followed by `passes`
/// relaxation passes.
///
/// ### Panics
/// Panics if `passes` is zero.
pub fn step(store: &mut PointStore, cfg: &SolverConfig, passes: u32, rng: &mut impl Rng) {
    assert!(passes > 0, "a tick needs at least one relaxation pass");

    integration_phase(store, cfg, rng);
    for _ in 0..passes {
        relaxation_pass(store, cfg, rng);
    }
}
