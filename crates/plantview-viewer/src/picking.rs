//! Mouse picking and highlight execution
//!
//! Pointer events are resolved to a component id with a ray-sphere test
//! against part pick bounds, then fed to the pure interaction state machine.
//! The returned highlight transitions are executed here by swapping material
//! handles; originals are cached per group so restoring is lossless.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy_egui::EguiContexts;
use tracing::debug;

use plantview_core::{
    ComponentId, HighlightChange, HighlightState, InfoRequest, InteractionState,
};

use crate::equipment::PickBounds;
use crate::scene::MainCamera;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PickState>()
            .init_resource::<PickOwnership>()
            .init_resource::<ComponentGroups>()
            .init_resource::<MaterialCache>()
            .init_resource::<InfoDisplay>()
            .add_systems(Update, (handle_hover, handle_click, handle_deselection));
    }
}

/// The hover/selection state machine
#[derive(Debug, Default, Resource)]
pub struct PickState(pub InteractionState);

/// Part entity to owning component id, built at scene construction.
///
/// Lets picking resolve a hit mesh to its logical component with a map
/// lookup instead of walking the entity hierarchy.
#[derive(Debug, Default, Resource)]
pub struct PickOwnership(pub HashMap<Entity, ComponentId>);

/// Component id to its part entities, for highlight application
#[derive(Debug, Default, Resource)]
pub struct ComponentGroups(pub HashMap<ComponentId, Vec<Entity>>);

/// Original material handles per group, captured before the first highlight.
///
/// Retained for the life of the scene, so restore always goes back to the
/// true originals no matter how many highlight swaps happened in between.
#[derive(Debug, Default, Resource)]
pub struct MaterialCache(pub HashMap<ComponentId, Vec<(Entity, Handle<StandardMaterial>)>>);

/// Which component the info panel describes; `None` shows the help text
#[derive(Debug, Default, Resource)]
pub struct InfoDisplay(pub Option<ComponentId>);

struct PickCandidate {
    entity: Entity,
    t: f32,
}

/// Resolve ray candidates to the owning component of the nearest hit.
///
/// Candidates without an ownership entry (grid lines, pipes, markers) are
/// skipped rather than blocking whatever lies behind them.
fn resolve_nearest(
    mut candidates: Vec<PickCandidate>,
    ownership: &HashMap<Entity, ComponentId>,
) -> Option<ComponentId> {
    candidates.sort_by(|a, b| a.t.total_cmp(&b.t));
    candidates
        .iter()
        .find_map(|candidate| ownership.get(&candidate.entity).cloned())
}

/// Distance along the ray where it enters the sphere, `None` on a miss or a
/// center behind the ray origin.
///
/// Ordering by entry distance rather than the perpendicular-foot distance
/// keeps nearest-first correct when bounds of different radii overlap.
fn ray_sphere_entry(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let t = (center - origin).dot(direction);
    if t < 0.0 {
        return None;
    }
    let d2 = (origin + direction * t).distance_squared(center);
    let r2 = radius * radius;
    if d2 > r2 {
        return None;
    }
    Some(t - (r2 - d2).sqrt())
}

/// Cast a ray through the cursor and test it against every pick sphere
fn pick_at_cursor(
    cursor: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    parts: &Query<(Entity, &GlobalTransform, &PickBounds)>,
    ownership: &PickOwnership,
) -> Option<ComponentId> {
    let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;

    let mut candidates = Vec::new();
    for (entity, transform, bounds) in parts.iter() {
        let center = transform.translation();
        if let Some(t) = ray_sphere_entry(ray.origin, *ray.direction, center, bounds.radius) {
            candidates.push(PickCandidate { entity, t });
        }
    }

    resolve_nearest(candidates, &ownership.0)
}

fn emissive_for(state: HighlightState) -> Option<LinearRgba> {
    match state {
        HighlightState::Normal => None,
        HighlightState::Hovered => Some(Color::srgb_u8(0x66, 0x66, 0xff).to_linear() * 0.15),
        HighlightState::Selected => Some(Color::srgb_u8(0x44, 0x44, 0xff).to_linear() * 0.35),
    }
}

/// Execute highlight transitions by swapping material handles.
///
/// Highlighting clones the cached original material and adds an emissive
/// tint, so shared base materials are never mutated and other groups using
/// the same material stay untouched.
fn apply_highlight_changes(
    changes: &[HighlightChange],
    groups: &ComponentGroups,
    cache: &mut MaterialCache,
    materials: &mut Assets<StandardMaterial>,
    material_query: &mut Query<&mut MeshMaterial3d<StandardMaterial>>,
) {
    for change in changes {
        match emissive_for(change.state) {
            None => {
                let Some(entries) = cache.0.get(&change.id) else {
                    continue;
                };
                for (entity, original) in entries {
                    if let Ok(mut material) = material_query.get_mut(*entity) {
                        material.0 = original.clone();
                    }
                }
            }
            Some(emissive) => {
                let Some(parts) = groups.0.get(&change.id) else {
                    continue;
                };
                let entries = cache.0.entry(change.id.clone()).or_insert_with(|| {
                    parts
                        .iter()
                        .filter_map(|&entity| {
                            material_query
                                .get(entity)
                                .ok()
                                .map(|material| (entity, material.0.clone()))
                        })
                        .collect()
                });
                for (entity, original) in entries.iter() {
                    let Some(mut tinted) = materials.get(original).cloned() else {
                        continue;
                    };
                    tinted.emissive = emissive;
                    let handle = materials.add(tinted);
                    if let Ok(mut material) = material_query.get_mut(*entity) {
                        material.0 = handle;
                    }
                }
            }
        }
    }
}

fn apply_info_request(request: InfoRequest, info: &mut InfoDisplay) {
    info.0 = match request {
        InfoRequest::Show(id) => Some(id),
        InfoRequest::Reset => None,
    };
}

fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false)
}

#[allow(clippy::too_many_arguments)]
fn handle_hover(
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    parts: Query<(Entity, &GlobalTransform, &PickBounds)>,
    ownership: Res<PickOwnership>,
    groups: Res<ComponentGroups>,
    mut pick_state: ResMut<PickState>,
    mut cache: ResMut<MaterialCache>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut material_query: Query<&mut MeshMaterial3d<StandardMaterial>>,
    mut contexts: EguiContexts,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let hit = if egui_wants_pointer(&mut contexts) {
        // Pointer is over the UI; treat as hovering empty space
        None
    } else {
        pick_at_cursor(cursor, camera, camera_transform, &parts, &ownership)
    };

    let changes = pick_state.0.pointer_moved(hit);
    apply_highlight_changes(
        &changes,
        &groups,
        &mut cache,
        &mut materials,
        &mut material_query,
    );
}

#[allow(clippy::too_many_arguments)]
fn handle_click(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    parts: Query<(Entity, &GlobalTransform, &PickBounds)>,
    ownership: Res<PickOwnership>,
    groups: Res<ComponentGroups>,
    mut pick_state: ResMut<PickState>,
    mut cache: ResMut<MaterialCache>,
    mut info: ResMut<InfoDisplay>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut material_query: Query<&mut MeshMaterial3d<StandardMaterial>>,
    mut contexts: EguiContexts,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    if egui_wants_pointer(&mut contexts) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let hit = pick_at_cursor(cursor, camera, camera_transform, &parts, &ownership);
    if let Some(id) = &hit {
        debug!(component = %id, "Component selected");
    }

    let (changes, request) = pick_state.0.pointer_clicked(hit);
    apply_highlight_changes(
        &changes,
        &groups,
        &mut cache,
        &mut materials,
        &mut material_query,
    );
    apply_info_request(request, &mut info);
}

/// Escape clears the selection, same path as clicking empty space
fn handle_deselection(
    keys: Res<ButtonInput<KeyCode>>,
    groups: Res<ComponentGroups>,
    mut pick_state: ResMut<PickState>,
    mut cache: ResMut<MaterialCache>,
    mut info: ResMut<InfoDisplay>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut material_query: Query<&mut MeshMaterial3d<StandardMaterial>>,
) {
    if !keys.just_pressed(KeyCode::Escape) {
        return;
    }

    let (changes, request) = pick_state.0.pointer_clicked(None);
    apply_highlight_changes(
        &changes,
        &groups,
        &mut cache,
        &mut materials,
        &mut material_query,
    );
    apply_info_request(request, &mut info);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::SystemState;

    fn id(s: &str) -> ComponentId {
        ComponentId::new(s)
    }

    fn entities(world: &mut World, n: usize) -> Vec<Entity> {
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn nearest_owned_candidate_wins() {
        let mut world = World::new();
        let e = entities(&mut world, 2);
        let ownership: HashMap<_, _> = [(e[0], id("A")), (e[1], id("B"))].into();

        let candidates = vec![
            PickCandidate {
                entity: e[1],
                t: 5.0,
            },
            PickCandidate {
                entity: e[0],
                t: 2.0,
            },
        ];
        assert_eq!(resolve_nearest(candidates, &ownership), Some(id("A")));
    }

    #[test]
    fn unowned_hits_are_skipped_not_blocking() {
        let mut world = World::new();
        let e = entities(&mut world, 2);
        // Only the far entity belongs to a component
        let ownership: HashMap<_, _> = [(e[1], id("B"))].into();

        let candidates = vec![
            PickCandidate {
                entity: e[0],
                t: 1.0,
            },
            PickCandidate {
                entity: e[1],
                t: 4.0,
            },
        ];
        assert_eq!(resolve_nearest(candidates, &ownership), Some(id("B")));
    }

    #[test]
    fn no_candidates_resolves_to_none() {
        let ownership = HashMap::new();
        assert_eq!(resolve_nearest(Vec::new(), &ownership), None);
    }

    #[test]
    fn sibling_parts_resolve_to_the_same_component() {
        let mut world = World::new();
        let e = entities(&mut world, 3);
        let ownership: HashMap<_, _> =
            [(e[0], id("T-201")), (e[1], id("T-201")), (e[2], id("T-201"))].into();

        for entity in &e {
            let candidates = vec![PickCandidate {
                entity: *entity,
                t: 1.0,
            }];
            assert_eq!(resolve_nearest(candidates, &ownership), Some(id("T-201")));
        }
    }

    #[test]
    fn ray_entry_orders_overlapping_bounds_by_surface_not_center() {
        // The big sphere is entered at t = 1 even though its center's
        // perpendicular foot (t = 5) lies beyond the small sphere's (t = 3)
        let big = ray_sphere_entry(Vec3::ZERO, Vec3::X, Vec3::new(5.0, 0.0, 0.0), 4.0).unwrap();
        let small = ray_sphere_entry(Vec3::ZERO, Vec3::X, Vec3::new(3.0, 0.0, 0.5), 1.0).unwrap();
        assert!((big - 1.0).abs() < 1e-5);
        assert!(big < small);
    }

    #[test]
    fn rays_miss_spheres_outside_or_behind() {
        assert!(ray_sphere_entry(Vec3::ZERO, Vec3::X, Vec3::new(5.0, 3.0, 0.0), 1.0).is_none());
        assert!(ray_sphere_entry(Vec3::ZERO, Vec3::X, Vec3::new(-5.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn highlight_restore_reassigns_the_original_material_handle() {
        let mut world = World::new();
        let mut materials = Assets::<StandardMaterial>::default();
        let original = materials.add(StandardMaterial::default());
        let entity = world.spawn(MeshMaterial3d(original.clone())).id();

        let mut groups = ComponentGroups::default();
        groups.0.insert(id("T-201"), vec![entity]);
        let mut cache = MaterialCache::default();

        let mut state: SystemState<Query<&mut MeshMaterial3d<StandardMaterial>>> =
            SystemState::new(&mut world);
        let mut query = state.get_mut(&mut world);

        apply_highlight_changes(
            &[HighlightChange {
                id: id("T-201"),
                state: HighlightState::Hovered,
            }],
            &groups,
            &mut cache,
            &mut materials,
            &mut query,
        );

        // Hover swaps in a tinted clone, leaving the original asset intact
        let hovered = query.get(entity).unwrap().0.clone();
        assert_ne!(hovered, original);
        assert_ne!(materials.get(&hovered).unwrap().emissive, LinearRgba::BLACK);
        assert_eq!(materials.get(&original).unwrap().emissive, LinearRgba::BLACK);

        apply_highlight_changes(
            &[HighlightChange {
                id: id("T-201"),
                state: HighlightState::Normal,
            }],
            &groups,
            &mut cache,
            &mut materials,
            &mut query,
        );

        // Restore goes back to the very same handle, not an equivalent clone
        assert_eq!(query.get(entity).unwrap().0, original);
    }
}
