use bevy::prelude::*;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

mod beaker;
mod chemistry;
mod frame;
mod params;
mod render;
mod state;
mod ui;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Zinc + HCl".into(),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: false,
                    ..default()
                }),
                ..default()
            }),
            EguiPlugin::default(),
        ))
        .init_resource::<state::SimState>()
        .init_resource::<params::ReactionParams>()
        .init_resource::<frame::SimRng>()
        .init_resource::<frame::Simulation>()
        .add_systems(Startup, ui::setup_scene)
        .add_systems(Update, beaker::reset_system)
        .add_systems(
            EguiPrimaryContextPass,
            (ui::ui_system, frame::frame_system).chain(),
        )
        .run();
}
