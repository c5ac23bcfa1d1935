use crate::error::{ConfigError, ConfigResult, ensure_non_negative, ensure_positive};
use glam::Vec3;

/// How the branching probability varies along a branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProbabilityProfile {
    /// Every node uses `branch_probability` as is.
    #[default]
    Uniform,
    /// The probability grows linearly from 0 at the branch root to
    /// `branch_probability` at its last node, so branches sprout near tips.
    RampTowardTip,
}

/// Parameters of the branch topology generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Points on the main branch.
    pub main_branch_points: usize,
    /// Number of branching levels processed after the main branch.
    pub max_branch_levels: u32,
    /// A child branch gets `parent_points / halving_ratio` points at most.
    pub halving_ratio: f32,
    /// Rest length between consecutive points of the main branch.
    pub point_spacing: f32,
    /// Linear widening added per node on braces, and per level on spacing.
    pub widening: f32,
    /// Rest length of the first rung between a parent and a new child.
    pub parent_distance: f32,
    /// Branching probability in `0.0..=9.0` with one decimal of resolution.
    pub branch_probability: f32,
    pub probability_profile: ProbabilityProfile,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            main_branch_points: 8,
            max_branch_levels: 2,
            halving_ratio: 2.0,
            point_spacing: 0.3,
            widening: 0.05,
            parent_distance: 0.2,
            branch_probability: 4.5,
            probability_profile: ProbabilityProfile::Uniform,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.main_branch_points == 0 {
            return Err(ConfigError::EmptyMainBranch);
        }
        ensure_positive("halving_ratio", self.halving_ratio)?;
        ensure_positive("point_spacing", self.point_spacing)?;
        ensure_non_negative("widening", self.widening)?;
        ensure_positive("parent_distance", self.parent_distance)?;
        if !self.branch_probability.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "branch_probability",
            });
        }
        if !(0.0..=9.0).contains(&self.branch_probability) {
            return Err(ConfigError::ProbabilityOutOfRange {
                value: self.branch_probability,
            });
        }
        Ok(())
    }
}

/// Positional bias applied to every free point once per tick.
///
/// `AltitudeAttenuated(g)` applies, per axis, `1 / (max(0, y) + 1 / g)`:
/// the full pull `g` at or below height zero, fading as the point rises.
/// It is evaluated as `g / (1 + max(0, y) * g)`, which is the same curve
/// for non-zero `g` and its limit (no pull) for a zero component. Negative
/// components would put a pole at `y = -1 / g`, so validation rejects them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BiasForce {
    None,
    /// Constant displacement added every tick.
    Constant(Vec3),
    AltitudeAttenuated(Vec3),
}

impl BiasForce {
    /// Displacement for a point whose integrated position is `pos`.
    pub fn displacement(&self, pos: Vec3) -> Vec3 {
        match *self {
            BiasForce::None => Vec3::ZERO,
            BiasForce::Constant(g) => g,
            BiasForce::AltitudeAttenuated(g) => {
                let h = pos.y.max(0.0);
                g / (Vec3::ONE + h * g)
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        match *self {
            BiasForce::None => Ok(()),
            BiasForce::Constant(g) => {
                if g.is_finite() {
                    Ok(())
                } else {
                    Err(ConfigError::NonFinite { field: "bias" })
                }
            }
            BiasForce::AltitudeAttenuated(g) => {
                for (axis, value) in [('x', g.x), ('y', g.y), ('z', g.z)] {
                    if !value.is_finite() || value < 0.0 {
                        return Err(ConfigError::InvalidBias { axis, value });
                    }
                }
                Ok(())
            }
        }
    }
}

/// Parameters of the constraint solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    /// Velocity retained per tick.
    pub damping: f32,
    pub bias: BiasForce,
    /// Magnitude of the random jitter added to each free point's velocity;
    /// `0.0` disables it.
    pub jitter: f32,
    /// Below this separation a constraint is treated as degenerate.
    pub degenerate_epsilon: f32,
    /// Passes used by [`crate::plant::Plant::step`].
    pub relaxation_passes: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            damping: 0.99,
            bias: BiasForce::Constant(Vec3::new(0.0, 0.01, 0.0)),
            jitter: 0.0,
            degenerate_epsilon: 1e-3,
            relaxation_passes: 5,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        ensure_non_negative("damping", self.damping)?;
        ensure_non_negative("jitter", self.jitter)?;
        ensure_positive("degenerate_epsilon", self.degenerate_epsilon)?;
        if self.relaxation_passes == 0 {
            return Err(ConfigError::NoRelaxationPasses);
        }
        self.bias.validate()
    }
}

/// Everything needed to grow and simulate one plant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlantConfig {
    pub generator: GeneratorConfig,
    pub solver: SolverConfig,
}

impl PlantConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.generator.validate()?;
        self.solver.validate()
    }
}
