//! Bevy application setup

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use plantview_core::ProcessTopology;

use crate::flow::FlowPlugin;
use crate::picking::InteractionPlugin;
use crate::process::ProcessPlugin;
use crate::scene::ScenePlugin;
use crate::ui::UiPlugin;

/// The loaded process topology, static for the life of the scene
#[derive(Debug, Clone, Resource)]
pub struct Process(pub ProcessTopology);

/// Flow animation settings
#[derive(Debug, Clone, Resource)]
pub struct FlowSettings {
    /// Marker traversal speed, world units per second
    pub speed: f32,
    /// Markers spawned per route, evenly phase-offset
    pub markers_per_route: usize,
    /// Marker sphere radius
    pub marker_radius: f32,
    /// Lift above the pipe centerline so markers stay visible
    pub y_offset: f32,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            speed: plantview_core::FLOW_SPEED,
            markers_per_route: plantview_core::MARKERS_PER_ROUTE,
            marker_radius: 0.12,
            y_offset: 0.15,
        }
    }
}

/// Run the Bevy application
pub fn run(topology: ProcessTopology) {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.10, 0.10, 0.18)))
        .insert_resource(Process(topology))
        .init_resource::<FlowSettings>()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Plantview".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(ScenePlugin)
        .add_plugins(ProcessPlugin)
        .add_plugins(FlowPlugin)
        .add_plugins(InteractionPlugin)
        .add_plugins(UiPlugin)
        .run();
}
