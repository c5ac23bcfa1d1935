//! Interactive plant viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Plant`] and its
//! configuration and implements [`eframe::App`] to drive ticks and draw
//! the branch poly-lines.

use eframe::App;
use glam::{Vec2, Vec3};
use plant_core::{
    BiasForce, ConfigResult, Plant, PlantConfig, ProbabilityProfile, RenderGroup,
};
use rand::{SeedableRng, rng, rngs::StdRng};
use tracing::{info, warn};

/// Which [`BiasForce`] variant the config panel edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BiasKind {
    None,
    Constant,
    AltitudeAttenuated,
}

impl BiasKind {
    fn of(bias: &BiasForce) -> (Self, Vec3) {
        match *bias {
            BiasForce::None => (BiasKind::None, Vec3::new(0.0, 0.01, 0.0)),
            BiasForce::Constant(g) => (BiasKind::Constant, g),
            BiasForce::AltitudeAttenuated(g) => (BiasKind::AltitudeAttenuated, g),
        }
    }

    fn with(self, pull: Vec3) -> BiasForce {
        match self {
            BiasKind::None => BiasForce::None,
            BiasKind::Constant => BiasForce::Constant(pull),
            BiasKind::AltitudeAttenuated => BiasForce::AltitudeAttenuated(pull),
        }
    }
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: a [`Plant`] grown from `cfg`.
/// - UI configuration (pan/zoom/yaw, timing, anchor).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Render the branches and the anchor.
///
/// ### Fields
/// - `plant` - Current plant being simulated.
/// - `cfg` - Configuration edited in the side panel; applied on regenerate.
/// - `bias_kind` / `bias_pull` - Editable form of `cfg.solver.bias`.
/// - `anchor` - World position point 0 is pinned at.
/// - `last_error` - Message of the last rejected configuration, if any.
///
/// - `running` - Whether the simulation is currently auto-advancing.
/// - `zoom` - Zoom factor for world-to-screen coordinate mapping.
/// - `pan` - Screen-space pan offset in pixels.
/// - `yaw` - Rotation of the view around the vertical axis (radians).
///
/// - `step_interval` - Target time between automatic ticks (seconds).
/// - `last_step_time` - Time stamp of the last tick (egui time).
/// - `last_step_dt` - Actual time delta between the last two ticks.
pub struct Viewer {
    plant: Plant<StdRng>,
    cfg: PlantConfig,
    bias_kind: BiasKind,
    bias_pull: Vec3,
    anchor: Vec3,
    last_error: Option<String>,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,
    yaw: f32,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Grows a plant from `cfg` and pins its root at `(0, 1, 0)`.
    ///
    /// ### Returns
    /// The viewer, or the configuration error if `cfg` is invalid.
    pub fn new(cfg: PlantConfig) -> ConfigResult<Self> {
        let anchor = Vec3::new(0.0, 1.0, 0.0);
        let plant = Self::grow(cfg, anchor)?;
        let (bias_kind, bias_pull) = BiasKind::of(&cfg.solver.bias);

        Ok(Self {
            plant,
            cfg,
            bias_kind,
            bias_pull,
            anchor,
            last_error: None,
            running: false,
            zoom: 120.0,
            pan: egui::vec2(0.0, 0.0),
            yaw: 0.0,
            step_interval: 1.0 / 60.0,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    fn grow(cfg: PlantConfig, anchor: Vec3) -> ConfigResult<Plant<StdRng>> {
        let mut plant = Plant::generate(cfg, StdRng::from_rng(&mut rng()))?;
        plant.pin(0, anchor);
        Ok(plant)
    }

    /// Replaces the plant with a fresh one grown from the edited config.
    ///
    /// On a configuration error the current plant is kept and the error is
    /// shown in the status bar.
    fn regenerate(&mut self) {
        self.cfg.solver.bias = self.bias_kind.with(self.bias_pull);
        match Self::grow(self.cfg, self.anchor) {
            Ok(plant) => {
                info!(
                    points = plant.points().len(),
                    branches = plant.branches().len(),
                    "regenerated"
                );
                self.plant = plant;
                self.last_error = None;
            }
            Err(e) => {
                warn!(error = %e, "rejected plant config");
                self.last_error = Some(e.to_string());
            }
        }
        self.running = false;
    }

    /// Advances the simulation by a single tick with the configured passes.
    fn step_once(&mut self) {
        self.plant.step();
    }

    /// Moves the root anchor and re-pins point 0 there.
    fn move_anchor(&mut self, anchor: Vec3) {
        self.anchor = anchor;
        self.plant.pin(0, anchor);
    }

    /// Projects a world position onto the view plane (rotated by `yaw`
    /// around the vertical axis).
    fn world_to_view(&self, p: Vec3) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        Vec2::new(p.x * c - p.z * s, p.y)
    }

    /// Lifts a view-plane position back to the world plane through the
    /// origin facing the camera.
    fn view_to_world(&self, v: Vec2) -> Vec3 {
        let (s, c) = self.yaw.sin_cos();
        Vec3::new(v.x * c, v.y, -v.x * s)
    }

    /// Converts a world-space position to screen-space.
    ///
    /// The projected view position is scaled by `zoom`, offset by `pan`,
    /// and centered inside `rect`. The y-axis is flipped so that positive
    /// y goes up in world space.
    fn world_to_screen(&self, p: Vec3, rect: egui::Rect) -> egui::Pos2 {
        let v = self.world_to_view(p);
        let center = rect.center();
        egui::pos2(
            center.x + v.x * self.zoom + self.pan.x,
            center.y - v.y * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to view-plane coordinates.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] for points on the
    /// view plane, using the same `zoom`, `pan`, and `rect` center.
    fn screen_to_view(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    /// Stroke width for a branch of the given order.
    fn branch_width(order: u32) -> f32 {
        (4.0 / (1.0 + order as f32)).max(1.0)
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `u32` [`egui::DragValue`].
    fn labeled_drag_u32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut u32,
        range: std::ops::RangeInclusive<u32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, view).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.005..=1.0)
                        .speed(0.005),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Regenerate").clicked() {
                    self.regenerate();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 10.0..=600.0).text("Zoom"));
                ui.add(
                    egui::Slider::new(&mut self.yaw, -std::f32::consts::PI..=std::f32::consts::PI)
                        .text("Yaw"),
                );
            });
        });
    }

    /// Builds the bottom status bar (timing, counts, constraint error).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("points = {}", self.plant.points().len()));
                ui.label(format!("constraints = {}", self.plant.constraints().len()));
                ui.label(format!("branches = {}", self.plant.branches().len()));
                ui.label(format!("error = {:.4}", self.plant.constraint_error()));
                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }
            });
        });
    }

    /// Builds the right-hand configuration panel for generator and solver
    /// parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Topology");
                let generator = &mut self.cfg.generator;
                Self::labeled_drag_usize(
                    ui,
                    "main_branch_points:",
                    &mut generator.main_branch_points,
                    1..=64,
                    1.0,
                );
                Self::labeled_drag_u32(
                    ui,
                    "max_branch_levels:",
                    &mut generator.max_branch_levels,
                    0..=6,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "halving_ratio:",
                    &mut generator.halving_ratio,
                    0.1..=8.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "branch_probability:",
                    &mut generator.branch_probability,
                    0.0..=9.0,
                    0.1,
                );
                egui::ComboBox::from_label("profile")
                    .selected_text(match generator.probability_profile {
                        ProbabilityProfile::Uniform => "uniform",
                        ProbabilityProfile::RampTowardTip => "ramp toward tip",
                    })
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut generator.probability_profile,
                            ProbabilityProfile::Uniform,
                            "uniform",
                        );
                        ui.selectable_value(
                            &mut generator.probability_profile,
                            ProbabilityProfile::RampTowardTip,
                            "ramp toward tip",
                        );
                    });

                ui.separator();
                ui.label("Spacing");
                Self::labeled_drag_f32(
                    ui,
                    "point_spacing:",
                    &mut generator.point_spacing,
                    0.01..=2.0,
                    0.01,
                );
                Self::labeled_drag_f32(ui, "widening:", &mut generator.widening, 0.0..=1.0, 0.005);
                Self::labeled_drag_f32(
                    ui,
                    "parent_distance:",
                    &mut generator.parent_distance,
                    0.01..=2.0,
                    0.01,
                );

                ui.separator();
                ui.label("Solver");
                let solver = &mut self.cfg.solver;
                Self::labeled_drag_f32(ui, "damping:", &mut solver.damping, 0.0..=1.0, 0.005);
                Self::labeled_drag_f32(ui, "jitter:", &mut solver.jitter, 0.0..=0.05, 0.0005);
                Self::labeled_drag_u32(
                    ui,
                    "relaxation_passes:",
                    &mut solver.relaxation_passes,
                    1..=50,
                    1.0,
                );

                ui.label("Bias");
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.bias_kind, BiasKind::None, "none");
                    ui.selectable_value(&mut self.bias_kind, BiasKind::Constant, "constant");
                    ui.selectable_value(
                        &mut self.bias_kind,
                        BiasKind::AltitudeAttenuated,
                        "attenuated",
                    );
                });
                Self::labeled_drag_f32(ui, "pull.x:", &mut self.bias_pull.x, -0.1..=0.1, 0.001);
                Self::labeled_drag_f32(ui, "pull.y:", &mut self.bias_pull.y, -0.1..=0.1, 0.001);
                Self::labeled_drag_f32(ui, "pull.z:", &mut self.bias_pull.z, -0.1..=0.1, 0.001);

                ui.separator();
                if ui.button("Apply (regenerate)").clicked() {
                    self.regenerate();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = PlantConfig::default();
                    (self.bias_kind, self.bias_pull) = BiasKind::of(&self.cfg.solver.bias);
                }
            });
    }

    /// Draws one branch as a poly-line whose width tapers with its order.
    fn draw_group(
        &self,
        painter: &egui::Painter,
        rect: egui::Rect,
        positions: &[Vec3],
        group: &RenderGroup,
    ) {
        let pts: Vec<egui::Pos2> = group
            .indices
            .iter()
            .map(|&i| self.world_to_screen(positions[i], rect))
            .collect();
        let color = if group.order == 0 {
            egui::Color32::from_rgb(140, 100, 60)
        } else {
            egui::Color32::LIGHT_GREEN
        };
        painter.line(pts, egui::Stroke::new(Self::branch_width(group.order), color));
    }

    /// Builds the central panel where the plant is drawn and interacted with.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Click moves the root anchor.
            if response.clicked()
                && let Some(p) = response.hover_pos()
            {
                let v = self.screen_to_view(p, rect);
                self.move_anchor(self.view_to_world(v));
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let view_before = self.screen_to_view(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(10.0, 600.0);

                let screen_after = self.world_to_screen(self.view_to_world(view_before), rect);
                self.pan += pointer_screen - screen_after;
            }

            let positions = self.plant.positions();
            for group in self.plant.render_groups() {
                self.draw_group(&painter, rect, &positions, group);
            }

            // Pinned points.
            for p in self.plant.points().iter().filter(|p| p.pinned) {
                let s = self.world_to_screen(p.pos, rect);
                painter.circle_filled(s, 4.0, egui::Color32::RED);
            }

            // Auto-run simulation if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let mut viewer = Viewer::new(PlantConfig::default()).unwrap();
        viewer.zoom = 2.0;
        viewer.pan = egui::vec2(15.0, -7.0);
        viewer.yaw = 0.7;
        let rect = test_rect();

        let eps = 1e-3;
        for v in [Vec2::new(0.0, 0.0), Vec2::new(10.0, -5.0), Vec2::new(-3.5, 8.25)] {
            let world = viewer.view_to_world(v);
            let screen = viewer.world_to_screen(world, rect);
            let back = viewer.screen_to_view(screen, rect);

            assert!(
                (back - v).abs().max_element() < eps,
                "roundtrip mismatch: v={v:?}, back={back:?}"
            );
        }
    }

    #[test]
    fn new_pins_root_at_anchor() {
        let viewer = Viewer::new(PlantConfig::default()).unwrap();

        let root = viewer.plant.points()[0];
        assert!(root.pinned);
        assert_eq!(root.pos, viewer.anchor);
    }

    #[test]
    fn regenerate_keeps_plant_on_invalid_config() {
        let mut viewer = Viewer::new(PlantConfig::default()).unwrap();
        let before = viewer.plant.points().len();

        viewer.cfg.generator.halving_ratio = 0.0;
        viewer.regenerate();

        assert!(viewer.last_error.is_some());
        assert_eq!(viewer.plant.points().len(), before);
    }

    #[test]
    fn regenerate_applies_edited_bias() {
        let mut viewer = Viewer::new(PlantConfig::default()).unwrap();
        viewer.bias_kind = BiasKind::None;
        viewer.cfg.generator.max_branch_levels = 0;
        viewer.cfg.generator.main_branch_points = 5;

        viewer.regenerate();

        assert!(viewer.last_error.is_none());
        assert_eq!(viewer.plant.points().len(), 5);
        assert_eq!(viewer.plant.config().solver.bias, BiasForce::None);
    }

    #[test]
    fn move_anchor_repins_root() {
        let mut viewer = Viewer::new(PlantConfig::default()).unwrap();
        viewer.move_anchor(Vec3::new(0.5, 2.0, 0.0));
        viewer.step_once();

        assert_eq!(viewer.plant.points()[0].pos, Vec3::new(0.5, 2.0, 0.0));
    }

    #[test]
    fn branch_width_tapers_with_order() {
        assert!(Viewer::branch_width(0) > Viewer::branch_width(1));
        assert!(Viewer::branch_width(1) > Viewer::branch_width(2));
        assert_eq!(Viewer::branch_width(10), 1.0);
    }
}
