//! Info panel UI

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::app::Process;
use crate::picking::InfoDisplay;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, info_panel);
    }
}

/// Side panel describing the selected component, or help text when nothing
/// is selected
fn info_panel(mut contexts: EguiContexts, process: Res<Process>, info: Res<InfoDisplay>) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::SidePanel::right("info_panel")
        .default_width(260.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.add_space(4.0);

            let selected = info.0.as_ref().and_then(|id| process.0.component(id));

            match selected {
                Some(component) => {
                    ui.heading(&component.name);
                    ui.separator();

                    egui::Grid::new("component_info")
                        .num_columns(2)
                        .spacing([8.0, 4.0])
                        .show(ui, |ui| {
                            ui.label("Type:");
                            ui.label(component.kind.label());
                            ui.end_row();

                            ui.label("ID:");
                            ui.monospace(component.id.as_str());
                            ui.end_row();
                        });

                    if !component.description.is_empty() {
                        ui.add_space(8.0);
                        ui.label(&component.description);
                    }

                    // Connections touching this component
                    let connections: Vec<_> = process
                        .0
                        .connections
                        .iter()
                        .filter(|c| c.from == component.id || c.to == component.id)
                        .collect();

                    if !connections.is_empty() {
                        ui.add_space(8.0);
                        ui.separator();
                        ui.strong("Connections");
                        for connection in connections {
                            ui.label(format!(
                                "{} \u{2192} {}  ({})",
                                connection.from,
                                connection.to,
                                connection.medium.label()
                            ));
                        }
                    }
                }
                None => {
                    ui.heading(&process.0.name);
                    ui.separator();
                    if !process.0.description.is_empty() {
                        ui.label(&process.0.description);
                        ui.add_space(8.0);
                    }
                    ui.label("Click a component to inspect it.");
                    ui.add_space(8.0);
                    ui.weak("Rotate: left mouse drag");
                    ui.weak("Pan: right mouse drag");
                    ui.weak("Zoom: scroll wheel");
                    ui.weak("Deselect: Escape");
                }
            }
        });
}
