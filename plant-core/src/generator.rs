//! Branch topology generation.
//!
//! [`generate`] grows the plant once, level by level:
//! 1. The main branch is allocated and chained.
//! 2. Every branch of the current level is scanned node by node; each node
//!    draws against the branching probability and may start a branch event.
//! 3. A branch event grafts a symmetric pair of children onto the parent,
//!    braces each child to the parent ([`brace_parent_child`]) and the two
//!    children to each other ([`brace_siblings`]).
//! 4. The new children form the next level.

use crate::{
    branch::{Branch, BranchTree},
    config::{GeneratorConfig, ProbabilityProfile},
    error::ConfigResult,
    point_store::PointStore,
    types::BranchId,
};
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Output of [`generate`]: the point arena and the branch tree that
/// describes how its index ranges were laid out.
#[derive(Debug, Clone)]
pub struct GeneratedPlant {
    pub store: PointStore,
    pub tree: BranchTree,
    /// Number of successful branch events (each adds two branches).
    pub branch_events: usize,
}

/// Grows a plant from `cfg`.
///
/// Branches are processed breadth-first by depth: the current level is
/// drained completely before any branch of the next level is scanned, and
/// at most `cfg.max_branch_levels` levels are processed after the main
/// branch. Point indices are handed out monotonically, so every branch owns
/// a contiguous range that lies after all previously allocated ones.
///
/// ### Parameters
/// - `cfg` - Generator parameters; validated before anything is allocated.
/// - `rng` - Random source for initial positions and branching draws.
///
/// ### Returns
/// The generated plant, or the [`crate::error::ConfigError`] describing the
/// first invalid parameter.
pub fn generate(cfg: &GeneratorConfig, rng: &mut impl Rng) -> ConfigResult<GeneratedPlant> {
    cfg.validate()?;

    let mut store = PointStore::new();
    let mut tree = BranchTree::new();

    let n = cfg.main_branch_points;
    let start = store.allocate(n, rng);
    store.add_chain(start, n, cfg.point_spacing);
    let main = tree.add_root(start, n, cfg.point_spacing);

    let mut current: VecDeque<BranchId> = VecDeque::from([main]);
    let mut next: VecDeque<BranchId> = VecDeque::new();
    let mut branch_events = 0;

    for level in 0..cfg.max_branch_levels {
        if current.is_empty() {
            break;
        }
        while let Some(id) = current.pop_front() {
            branch_events += grow_branch(cfg, id, &mut store, &mut tree, &mut next, rng);
        }
        debug!(level, new_branches = next.len(), "branching level processed");
        std::mem::swap(&mut current, &mut next);
    }

    info!(
        points = store.len(),
        constraints = store.constraints.len(),
        branches = tree.len(),
        branch_events,
        "plant generated"
    );

    Ok(GeneratedPlant {
        store,
        tree,
        branch_events,
    })
}

/// Scans one branch and performs its branch events.
///
/// Returns the number of events; the new children are pushed onto `next`.
fn grow_branch(
    cfg: &GeneratorConfig,
    id: BranchId,
    store: &mut PointStore,
    tree: &mut BranchTree,
    next: &mut VecDeque<BranchId>,
    rng: &mut impl Rng,
) -> usize {
    let (count, spacing) = {
        let b = &tree.branches[id];
        (b.point_count, b.spacing)
    };
    let child_spacing = (spacing * spacing + cfg.widening * cfg.widening).sqrt();
    let mut events = 0;

    let mut j = 0;
    while j < count {
        if draws_branch(cfg, j, count, rng) {
            let child_count = child_size(count, j, cfg.halving_ratio);

            // Too short to brace.
            if child_count > 1 {
                let mut pair = [0; 2];
                for slot in &mut pair {
                    let c_start = store.allocate(child_count, rng);
                    store.add_chain(c_start, child_count, child_spacing);
                    let child = tree.add_child(id, j, c_start, child_count, child_spacing);
                    brace_parent_child(
                        store,
                        &tree.branches[id],
                        j,
                        &tree.branches[child],
                        cfg.parent_distance,
                        cfg.widening,
                    );
                    next.push_back(child);
                    *slot = child;
                }
                brace_siblings(
                    store,
                    &tree.branches[pair[0]],
                    &tree.branches[pair[1]],
                    cfg.parent_distance,
                    cfg.widening,
                );

                debug!(
                    parent = id,
                    offset = j,
                    child_count,
                    children = ?pair,
                    "branch event"
                );
                events += 1;

                // Keep sibling roots on the same parent apart.
                j += child_count.saturating_sub(4);
            }
        }
        j += 1;
    }
    events
}

/// Draws one branching decision for local node `j` of a branch of
/// `count` points.
///
/// The draw is an integer in `0..90` divided by 10, giving one decimal of
/// resolution over `0.0..9.0`; it succeeds when it falls below the
/// node's threshold.
fn draws_branch(cfg: &GeneratorConfig, j: usize, count: usize, rng: &mut impl Rng) -> bool {
    let sample = rng.random_range(0..90u32) as f32 / 10.0;
    let threshold = match cfg.probability_profile {
        ProbabilityProfile::Uniform => cfg.branch_probability,
        ProbabilityProfile::RampTowardTip if count > 1 => {
            cfg.branch_probability * j as f32 / (count - 1) as f32
        }
        ProbabilityProfile::RampTowardTip => cfg.branch_probability,
    };
    sample < threshold
}

/// Size of a child grafted at offset `j` of a branch with `count` points:
/// never longer than the parent's remaining nodes past the graft.
pub fn child_size(count: usize, j: usize, halving_ratio: f32) -> usize {
    let remaining = count.saturating_sub(j + 1);
    let halved = (count as f32 / halving_ratio) as usize;
    remaining.min(halved)
}

/// Rung length at ladder step `i`.
fn rung_length(distance: f32, widening: f32, i: usize) -> f32 {
    distance + i as f32 * widening
}

/// Braces a child to the parent's spine starting at local offset `offset`.
///
/// Emits a ladder of rungs `(p0 + i, c0 + i)` of length
/// `distance + i * widening`, and an X of diagonals inside every ladder
/// square: `(p0 + i, c0 + i + 1)` and `(p0 + i + 1, c0 + i)`, each as long
/// as the hypotenuse of the parent spacing and the adjacent rung.
///
/// ### Parameters
/// - `store` - Point arena receiving the constraints.
/// - `parent` - Parent branch; its `spacing` sizes the diagonals.
/// - `offset` - Local graft offset on the parent.
/// - `child` - The grafted child branch.
/// - `distance` - First rung length.
/// - `widening` - Rung growth per step.
pub fn brace_parent_child(
    store: &mut PointStore,
    parent: &Branch,
    offset: usize,
    child: &Branch,
    distance: f32,
    widening: f32,
) {
    let p0 = parent.start + offset;
    let c0 = child.start;
    let steps = (parent.last() - p0).min(child.last() - c0);
    let s2 = parent.spacing * parent.spacing;

    for i in 0..=steps {
        let rung = rung_length(distance, widening, i);
        store.add_constraint(p0 + i, c0 + i, rung);

        if i < steps {
            let next_rung = rung_length(distance, widening, i + 1);
            store.add_constraint(p0 + i, c0 + i + 1, (s2 + next_rung * next_rung).sqrt());
            store.add_constraint(p0 + i + 1, c0 + i, (s2 + rung * rung).sqrt());
        }
    }
}

/// Keeps the two children of one branch event apart with struts of twice
/// the parent rung length.
pub fn brace_siblings(
    store: &mut PointStore,
    first: &Branch,
    second: &Branch,
    distance: f32,
    widening: f32,
) {
    let count = first.point_count.min(second.point_count);
    for i in 0..count {
        store.add_constraint(
            first.start + i,
            second.start + i,
            2.0 * rung_length(distance, widening, i),
        );
    }
}
