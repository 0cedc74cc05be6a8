use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points};

use tdc_sim::scenario::{presets, Scenario};
use tdc_sim::kinematics::{KinematicState, TdcInputs};
use tdc_sim::sim::{self, TdcOutputs};
use tdc_sim::trajectory::TorpedoTrajectory;

fn main() -> eframe::Result {
    env_logger::init();

    let scenarios = presets::all();
    let mut app = TdcViz { scenarios, selected: 4, samples: Vec::new(), trajectory: None, track: Vec::new() };
    app.rerun();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("TDC Mark III", options, Box::new(|_| Ok(Box::new(app))))
}

struct TdcViz {
    scenarios: Vec<Scenario>,
    selected: usize,
    samples: Vec<TdcOutputs>,
    trajectory: Option<TorpedoTrajectory>,
    track: Vec<[f64; 2]>,
}

impl TdcViz {
    fn rerun(&mut self) {
        let Some(scenario) = self.scenarios.get(self.selected) else {
            return;
        };
        match sim::run(scenario) {
            Ok((samples, _)) => {
                self.trajectory = samples.last().map(|last| {
                    TorpedoTrajectory::compute(
                        scenario.inputs.own_course,
                        last.gyro_angle,
                        &scenario.config.torpedo,
                        last.run,
                    )
                });
                self.track = target_track(scenario, samples.last());
                self.samples = samples;
            }
            Err(e) => log::error!("{}", e),
        }
    }
}

/// Target's track over the torpedo run, relative to the launch point.
fn target_track(scenario: &Scenario, last: Option<&TdcOutputs>) -> Vec<[f64; 2]> {
    let Some(last) = last else {
        return Vec::new();
    };
    let mut state = KinematicState::from_inputs(&TdcInputs {
        own_speed: 0.0,
        target_bearing: last.bearing,
        target_range: last.range,
        ..scenario.inputs
    });
    let end = last.run_time.min(600.0);
    let mut track = Vec::new();
    let mut t = 0.0;
    while t <= end {
        track.push([state.target.position.x, state.target.position.y]);
        state.advance(1.0);
        t += 1.0;
    }
    track
}

impl eframe::App for TdcViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut changed = false;
                for (i, s) in self.scenarios.iter().enumerate() {
                    changed |= ui.selectable_value(&mut self.selected, i, s.name.as_str()).changed();
                }
                if changed {
                    self.rerun();
                }
            });
            if let Some(last) = self.samples.last() {
                ui.label(format!(
                    "Gyro: {:.1}°  |  Run: {:.0} yd  |  Run time: {:.0} s  |  Track: {:.0}° {}  |  {}",
                    last.gyro_angle,
                    last.run,
                    last.run_time,
                    last.track_angle,
                    last.track_side.letter(),
                    if last.solved { "SOLUTION" } else { "HUNTING" },
                ));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Gyro angle vs Time
                ui.vertical(|ui| {
                    ui.label("Gyro Angle (deg)");
                    let gyro: PlotPoints = self.samples.iter().map(|s| [s.time, s.gyro_angle]).collect();
                    let bearing: PlotPoints =
                        self.samples.iter().map(|s| [s.time, s.relative_bearing]).collect();
                    Plot::new("gyro")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("G", gyro));
                            plot_ui.line(Line::new("Br", bearing));
                        });
                });

                // Error XVIII vs Time
                ui.vertical(|ui| {
                    ui.label("Error XVIII (yd)");
                    let points: PlotPoints = self.samples.iter().map(|s| [s.time, s.error_18]).collect();
                    Plot::new("error_18")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("E18", points));
                        });
                });
            });

            ui.horizontal(|ui| {
                // Servo rate vs Time
                ui.vertical(|ui| {
                    ui.label("Servo Rate (deg/s)");
                    let points: PlotPoints = self.samples.iter().map(|s| [s.time, s.servo_rate]).collect();
                    Plot::new("servo")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Rate", points));
                        });
                });

                // Torpedo path and target track
                ui.vertical(|ui| {
                    ui.label("Torpedo Path (yd)");
                    let path: PlotPoints = self
                        .trajectory
                        .iter()
                        .flat_map(|t| t.points.iter())
                        .map(|p| [p.position.x, p.position.y])
                        .collect();
                    let target: PlotPoints = self.track.iter().copied().collect();
                    Plot::new("path")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("East (yd)")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Torpedo", path));
                            plot_ui.points(Points::new("Target", target).radius(1.5));
                        });
                });
            });
        });
    }
}
