use crate::chemistry::{reaction_probability, speed_multiplier};
use crate::frame::Simulation;
use crate::params::ReactionParams;
use crate::state::{SimState, parse_quantity};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

pub fn setup_scene(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub fn ui_system(
    mut contexts: EguiContexts,
    mut state: ResMut<SimState>,
    params: Res<ReactionParams>,
    sim: Res<Simulation>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Window::new("Reaction Controls").show(ctx, |ui| {
            ui.label("Conditions");

            ui.add(
                egui::Slider::new(
                    &mut state.temperature,
                    0.5..=params.max_temperature,
                )
                .text("Temperature")
                .custom_parser(|text| Some(parse_quantity(text))),
            );
            ui.label(format!(
                "Speed x{:.2}   p(reaction) {:.0}%",
                speed_multiplier(state.temperature, &params),
                100.0 * reaction_probability(state.temperature, &params)
            ));

            ui.separator();
            ui.label("Initial quantities");

            let mut changed = false;
            changed |= count_slider(ui, &mut state.zinc_count, 0..=120, "Zn(s)");
            changed |= count_slider(ui, &mut state.h_plus_count, 0..=200, "H⁺");
            changed |= count_slider(ui, &mut state.cl_minus_count, 0..=200, "Cl⁻");
            if changed {
                state.request_reset(false);
            }

            ui.separator();
            ui.horizontal(|ui| {
                let labels = if state.show_labels {
                    "Labels: ON"
                } else {
                    "Labels: OFF"
                };
                if ui.button(labels).clicked() {
                    state.toggle_labels();
                }

                let pause = if state.paused { "Resume" } else { "Pause" };
                if ui.button(pause).clicked() {
                    state.toggle_pause();
                }

                if ui.button("Reset").clicked() {
                    state.request_reset(true);
                }
            });

            let census = sim.census();
            ui.label(format!(
                "{} of {} Zn atoms dissolved",
                census.zinc_ions,
                census.zinc + census.zinc_ions
            ));
        });
    }
}

fn count_slider(
    ui: &mut egui::Ui,
    value: &mut usize,
    range: std::ops::RangeInclusive<usize>,
    label: &str,
) -> bool {
    ui.add(
        egui::Slider::new(value, range)
            .text(label)
            .custom_parser(|text| Some(parse_quantity(text))),
    )
    .changed()
}
