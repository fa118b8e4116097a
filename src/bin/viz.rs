use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use marker_lander::config::ControllerConfig;
use marker_lander::gnc::Mode;
use marker_lander::sim::{self, presets, CycleRecord, FlightLog};

fn main() -> eframe::Result {
    let scenario = std::env::args()
        .nth(1)
        .and_then(|name| presets::by_name(&name))
        .unwrap_or_else(presets::acquire_and_descend);
    let log = match sim::run(&scenario, &ControllerConfig::default()) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("run failed: {e}");
            std::process::exit(1);
        }
    };

    let app = LandingViz { log };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Marker Landing Controller", options, Box::new(|_| Ok(Box::new(app))))
}

struct LandingViz {
    log: FlightLog,
}

fn series(records: &[CycleRecord], f: impl Fn(&CycleRecord) -> f64) -> PlotPoints {
    records.iter().map(|r| [r.cycle as f64, f(r)]).collect()
}

impl eframe::App for LandingViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let records = &self.log.records;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Scenario: {}", self.log.scenario));
            ui.label(format!(
                "Cycles: {}  |  Acquired at: {}  |  Landing cycles: {}  |  Override: {}",
                self.log.len(),
                self.log.first_acquisition().map_or("-".to_string(), |c| c.to_string()),
                self.log.cycles_in(Mode::Landing),
                if records.iter().any(|r| r.overridden) { "yes" } else { "no" },
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Altitude");
                    Plot::new("altitude")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Cycle")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Altitude", series(records, |r| r.altitude)));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Throttle");
                    Plot::new("throttle")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Cycle")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Throttle", series(records, |r| r.action.throttle)));
                        });
                });
            });

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Roll / Pitch");
                    Plot::new("attitude")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Cycle")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Roll", series(records, |r| r.action.roll)));
                            plot_ui.line(Line::new("Pitch", series(records, |r| r.action.pitch)));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Mode (1 = landing) / marker seen");
                    Plot::new("mode")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Cycle")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new(
                                "Landing",
                                series(records, |r| if r.mode == Mode::Landing { 1.0 } else { 0.0 }),
                            ));
                            plot_ui.line(Line::new(
                                "Marker seen",
                                series(records, |r| if r.marker_seen { 0.5 } else { 0.0 }),
                            ));
                        });
                });
            });
        });
    }
}
