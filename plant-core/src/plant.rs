use crate::{
    branch::{Branch, BranchTree},
    config::PlantConfig,
    error::ConfigResult,
    generator::generate,
    point_store::{DistanceConstraint, Point, PointStore},
    render::{RenderGroup, render_groups},
    solver,
    types::PointIndex,
};
use glam::Vec3;
use rand::Rng;

/// A generated plant and the state needed to simulate it.
///
/// `Plant` owns the point arena, the branch tree, the render groups derived
/// from it, and the random source used by the solver. The host drives it
/// with [`Plant::tick`] and reads [`Plant::positions`]; [`Plant::pin`] is
/// the only way to move a point from outside.
#[derive(Debug)]
pub struct Plant<R: Rng> {
    config: PlantConfig,
    store: PointStore,
    tree: BranchTree,
    groups: Vec<RenderGroup>,
    branch_events: usize,
    rng: R,
}

impl<R: Rng> Plant<R> {
    /// Validates `config` and grows a new plant.
    ///
    /// ### Returns
    /// The plant, or the first configuration error. Nothing is generated
    /// when the configuration is rejected.
    pub fn generate(config: PlantConfig, mut rng: R) -> ConfigResult<Self> {
        config.solver.validate()?;
        let grown = generate(&config.generator, &mut rng)?;
        let groups = render_groups(&grown.tree, 0);

        Ok(Self {
            config,
            store: grown.store,
            tree: grown.tree,
            groups,
            branch_events: grown.branch_events,
            rng,
        })
    }

    /// Pins point `index` at `pos`. Idempotent and callable at any time.
    ///
    /// ### Panics
    /// Panics if `index` is out of range.
    pub fn pin(&mut self, index: PointIndex, pos: Vec3) {
        self.store.pin(index, pos);
    }

    /// Releases point `index`.
    ///
    /// ### Panics
    /// Panics if `index` is out of range.
    pub fn unpin(&mut self, index: PointIndex) {
        self.store.unpin(index);
    }

    /// Advances the simulation by one step with `passes` relaxation passes.
    ///
    /// ### Panics
    /// Panics if `passes` is zero.
    pub fn tick(&mut self, passes: u32) {
        solver::step(&mut self.store, &self.config.solver, passes, &mut self.rng);
    }

    /// [`Plant::tick`] with the configured number of passes.
    pub fn step(&mut self) {
        self.tick(self.config.solver.relaxation_passes);
    }

    /// Snapshot of all positions, ordered by point index.
    pub fn positions(&self) -> Vec<Vec3> {
        self.store.positions()
    }

    pub fn points(&self) -> &[Point] {
        &self.store.points
    }

    pub fn constraints(&self) -> &[DistanceConstraint] {
        &self.store.constraints
    }

    pub fn branches(&self) -> &[Branch] {
        &self.tree.branches
    }

    pub fn tree(&self) -> &BranchTree {
        &self.tree
    }

    /// One group per branch, breadth-first from the main branch.
    pub fn render_groups(&self) -> &[RenderGroup] {
        &self.groups
    }

    pub fn branch_events(&self) -> usize {
        self.branch_events
    }

    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    /// Sum of squared rest-length errors over all constraints.
    pub fn constraint_error(&self) -> f32 {
        self.store.constraint_error()
    }
}
