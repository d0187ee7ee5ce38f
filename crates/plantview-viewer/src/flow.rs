//! Flow marker animation

use bevy::prelude::*;

use plantview_core::advance_progress;

use crate::app::FlowSettings;
use crate::process::PipeRoutes;

pub struct FlowPlugin;

impl Plugin for FlowPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, advance_flow_markers);
    }
}

/// A marker sphere traversing one pipe route
#[derive(Debug, Component)]
pub struct FlowMarker {
    /// Index into [`PipeRoutes`]
    pub route: usize,
    /// Normalized arc-length position in [0, 1]
    pub progress: f32,
}

/// Advance every marker at constant world speed along its route.
///
/// Speed is normalized by route length, so markers on short and long pipes
/// move at the same apparent rate. Markers on zero-length routes hold still.
fn advance_flow_markers(
    time: Res<Time>,
    settings: Res<FlowSettings>,
    routes: Res<PipeRoutes>,
    mut markers: Query<(&mut FlowMarker, &mut Transform)>,
) {
    let delta = time.delta_secs();

    for (mut marker, mut transform) in markers.iter_mut() {
        let Some(route) = routes.0.get(marker.route) else {
            continue;
        };

        marker.progress = advance_progress(
            marker.progress,
            settings.speed,
            delta,
            route.total_length(),
        );

        transform.translation = route.position_at(marker.progress) + Vec3::Y * settings.y_offset;
    }
}
