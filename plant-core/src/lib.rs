//! Procedural plant skeleton growth and position-based relaxation.
//!
//! Main components:
//! - [`point_store`] — flat arena of points and distance constraints.
//! - [`branch`] — arena of branches with contiguous point ranges.
//! - [`generator`] — stochastic branch topology and bracing.
//! - [`solver`] — Verlet integration and constraint relaxation.
//! - [`render`] — per-branch index lists for poly-line renderers.
//! - [`plant`] — the [`Plant`] handle tying the above together.
//! - [`config`] / [`error`] — parameters and their validation.
//! - [`sampling`] — random points and directions.
//! - [`types`] — shared index aliases.

pub mod branch;
pub mod config;
pub mod error;
pub mod generator;
pub mod plant;
pub mod point_store;
pub mod render;
pub mod sampling;
pub mod solver;
pub mod types;

pub use config::{BiasForce, GeneratorConfig, PlantConfig, ProbabilityProfile, SolverConfig};
pub use error::{ConfigError, ConfigResult};
pub use plant::Plant;
pub use render::RenderGroup;
pub use types::{BranchId, PointIndex};
