//! Process scene construction
//!
//! Spawns equipment groups for every component, plans a pipe route per
//! connection, and builds the pipe meshes and flow markers from the same
//! route geometry the animator samples.

use std::collections::HashMap;

use bevy::prelude::*;
use tracing::{debug, info, warn};

use plantview_core::{plan_route, ComponentId, Connection, Medium, Route};

use crate::app::{FlowSettings, Process};
use crate::equipment::{spawn_equipment, ConnectionAnchor, EquipmentMaterials};
use crate::flow::FlowMarker;
use crate::picking::{ComponentGroups, PickOwnership};

/// Pipe tube radius
pub const PIPE_RADIUS: f32 = 0.08;
/// Flange disc radius at each pipe end
pub const FLANGE_RADIUS: f32 = 0.18;
/// Flange disc thickness
pub const FLANGE_THICKNESS: f32 = 0.06;
/// Segments shorter than this spawn no mesh
const MIN_SEGMENT_LENGTH: f32 = 0.01;

pub struct ProcessPlugin;

impl Plugin for ProcessPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PipeRoutes>()
            .add_systems(Startup, build_process_scene);
    }
}

/// All planned pipe routes, indexed by the flow markers
#[derive(Debug, Default, Resource)]
pub struct PipeRoutes(pub Vec<Route>);

fn pipe_color(medium: Medium) -> Color {
    match medium {
        Medium::Product => Color::srgb_u8(0x44, 0xbb, 0x44),
        Medium::Gas => Color::srgb_u8(0xff, 0x88, 0x33),
        Medium::Air => Color::srgb_u8(0x66, 0xcc, 0xff),
        Medium::Water => Color::srgb_u8(0x22, 0x55, 0xaa),
        Medium::Steam => Color::srgb_u8(0x99, 0x99, 0x99),
    }
}

fn marker_color(medium: Medium) -> Color {
    match medium {
        Medium::Product => Color::srgb_u8(0x88, 0xff, 0x88),
        Medium::Gas => Color::srgb_u8(0xff, 0xbb, 0x66),
        Medium::Air => Color::srgb_u8(0xaa, 0xee, 0xff),
        Medium::Water => Color::srgb_u8(0x55, 0x99, 0xff),
        Medium::Steam => Color::srgb_u8(0xdd, 0xdd, 0xdd),
    }
}

fn build_process_scene(
    mut commands: Commands,
    process: Res<Process>,
    settings: Res<FlowSettings>,
    mut routes: ResMut<PipeRoutes>,
    mut ownership: ResMut<PickOwnership>,
    mut groups: ResMut<ComponentGroups>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let equipment_materials = EquipmentMaterials::create(&mut materials);

    // Spawn equipment and record each component's placement and clearance
    // for the route planner
    let mut anchors: HashMap<ComponentId, (Vec3, ConnectionAnchor)> = HashMap::new();

    for component in &process.0.components {
        let spawned = spawn_equipment(&mut commands, &mut meshes, &equipment_materials, component);

        ownership.0.insert(spawned.root, component.id.clone());
        for &part in &spawned.parts {
            ownership.0.insert(part, component.id.clone());
        }
        groups.0.insert(component.id.clone(), spawned.parts);

        let position = Vec3::new(
            component.position[0] as f32,
            component.position[1] as f32,
            component.position[2] as f32,
        );
        anchors.insert(component.id.clone(), (position, spawned.anchor));
    }

    info!(count = process.0.components.len(), "Equipment spawned");

    // Shared pipe materials, one per medium actually used
    let mut pipe_materials: HashMap<Medium, Handle<StandardMaterial>> = HashMap::new();
    let mut marker_materials: HashMap<Medium, Handle<StandardMaterial>> = HashMap::new();
    let flange_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.45, 0.50),
        metallic: 0.7,
        perceptual_roughness: 0.3,
        ..default()
    });
    let marker_mesh = meshes.add(Sphere::new(settings.marker_radius));

    for route in plan_connection_routes(&process.0.connections, &anchors) {
        let medium = route.medium();

        let pipe_material = pipe_materials
            .entry(medium)
            .or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: pipe_color(medium),
                    metallic: 0.6,
                    perceptual_roughness: 0.35,
                    ..default()
                })
            })
            .clone();

        spawn_pipe_meshes(
            &mut commands,
            &mut meshes,
            &route,
            &pipe_material,
            &flange_material,
        );

        // Evenly phase-offset markers on this route
        let marker_material = marker_materials
            .entry(medium)
            .or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: marker_color(medium),
                    unlit: true,
                    ..default()
                })
            })
            .clone();

        let route_index = routes.0.len();
        let count = settings.markers_per_route;
        for i in 0..count {
            let progress = plantview_core::initial_phase(i, count);
            let position = route.position_at(progress) + Vec3::Y * settings.y_offset;
            commands.spawn((
                Mesh3d(marker_mesh.clone()),
                MeshMaterial3d(marker_material.clone()),
                Transform::from_translation(position),
                FlowMarker {
                    route: route_index,
                    progress,
                },
            ));
        }

        routes.0.push(route);
    }

    info!(count = routes.0.len(), "Pipe routes built");
}

/// Plan a route for every connection whose endpoints both resolve.
///
/// Connections naming an unknown component id are skipped with a log line
/// and yield no route; pipes and markers are spawned per planned route, so
/// dangling connections get neither.
fn plan_connection_routes(
    connections: &[Connection],
    anchors: &HashMap<ComponentId, (Vec3, ConnectionAnchor)>,
) -> Vec<Route> {
    let mut planned = Vec::new();

    for connection in connections {
        let (Some(&(from_pos, from_anchor)), Some(&(to_pos, to_anchor))) =
            (anchors.get(&connection.from), anchors.get(&connection.to))
        else {
            warn!(
                from = %connection.from,
                to = %connection.to,
                "Skipping connection with unresolved endpoint"
            );
            continue;
        };

        let route = plan_route(
            from_pos,
            to_pos,
            from_anchor.radius,
            to_anchor.radius,
            connection.medium,
        );
        debug!(
            from = %connection.from,
            to = %connection.to,
            waypoints = route.waypoints().len(),
            length = route.total_length(),
            "Route planned"
        );
        planned.push(route);
    }

    planned
}

/// Spawn one cylinder per route segment plus flange discs at both ends.
///
/// The cylinders follow the route waypoints exactly, so the rendered pipe
/// matches the path the markers traverse.
fn spawn_pipe_meshes(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    route: &Route,
    pipe_material: &Handle<StandardMaterial>,
    flange_material: &Handle<StandardMaterial>,
) {
    let waypoints = route.waypoints();

    for pair in waypoints.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = a.distance(b);
        if length < MIN_SEGMENT_LENGTH {
            continue;
        }

        let direction = (b - a) / length;
        commands.spawn((
            Mesh3d(meshes.add(Cylinder::new(PIPE_RADIUS, length))),
            MeshMaterial3d(pipe_material.clone()),
            Transform::from_translation((a + b) / 2.0)
                .with_rotation(Quat::from_rotation_arc(Vec3::Y, direction)),
        ));
    }

    // Flanges at the anchor ends, aligned with the adjoining segment
    let flange_mesh = meshes.add(Cylinder::new(FLANGE_RADIUS, FLANGE_THICKNESS));
    for (end, towards) in [
        (route.start(), waypoints[1]),
        (route.end(), waypoints[waypoints.len() - 2]),
    ] {
        let direction = (towards - end).normalize_or_zero();
        let rotation = if direction.length_squared() > 0.0 {
            Quat::from_rotation_arc(Vec3::Y, direction)
        } else {
            Quat::IDENTITY
        };
        commands.spawn((
            Mesh3d(flange_mesh.clone()),
            MeshMaterial3d(flange_material.clone()),
            Transform::from_translation(end).with_rotation(rotation),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor_at(x: f32, z: f32) -> (Vec3, ConnectionAnchor) {
        (
            Vec3::new(x, 0.0, z),
            ConnectionAnchor {
                radius: 1.0,
                height: 0.8,
            },
        )
    }

    fn connection(from: &str, to: &str, medium: Medium) -> Connection {
        Connection {
            from: ComponentId::new(from),
            to: ComponentId::new(to),
            medium,
        }
    }

    #[test]
    fn unresolved_connection_endpoints_plan_no_route() {
        let mut anchors = HashMap::new();
        anchors.insert(ComponentId::new("V-101"), anchor_at(0.0, 0.0));
        anchors.insert(ComponentId::new("P-101"), anchor_at(5.0, 0.0));

        let connections = vec![
            connection("V-101", "P-101", Medium::Water),
            connection("V-101", "X-999", Medium::Product),
            connection("X-999", "P-101", Medium::Product),
        ];

        // Only the fully resolved connection yields a route; the dangling
        // ones are dropped without planning anything.
        let planned = plan_connection_routes(&connections, &anchors);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].medium(), Medium::Water);
    }

    #[test]
    fn resolved_connections_route_between_their_anchors() {
        let mut anchors = HashMap::new();
        anchors.insert(ComponentId::new("A"), anchor_at(0.0, 0.0));
        anchors.insert(ComponentId::new("B"), anchor_at(6.0, 0.0));

        let planned =
            plan_connection_routes(&[connection("A", "B", Medium::Steam)], &anchors);
        assert_eq!(planned.len(), 1);
        assert!((planned[0].total_length() - 4.0).abs() < 1e-5);
    }
}
