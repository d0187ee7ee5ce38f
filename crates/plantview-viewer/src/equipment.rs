//! Procedural equipment geometry
//!
//! Each component spawns as a group: one root entity carrying the logical
//! identity and connection anchor, with child part entities carrying the
//! meshes. Child parts have no identity of their own; picking resolves them
//! through the ownership map built at spawn time.

use bevy::prelude::*;
use plantview_core::{Component as ProcessComponent, ComponentId, ComponentKind};

/// Logical identity of an equipment group, carried at the root only
#[derive(Debug, Clone, Component)]
pub struct ComponentGroup {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub name: String,
    pub description: String,
}

/// Connection anchor descriptor for a spawned component.
///
/// `radius` is the planar clearance from center used by the route planner to
/// offset pipe endpoints to the equipment skin. `height` is reserved for the
/// external label placer and unused by routing.
#[derive(Debug, Clone, Copy, Component)]
pub struct ConnectionAnchor {
    pub radius: f32,
    pub height: f32,
}

/// Pick bounding sphere for a part entity, centered on its global transform
#[derive(Debug, Clone, Copy, Component)]
pub struct PickBounds {
    pub radius: f32,
}

/// Shared base materials for equipment parts.
///
/// Groups of the same kind share material assets; highlighting clones them
/// per group, so shared instances are never mutated in place.
pub struct EquipmentMaterials {
    tank: Handle<StandardMaterial>,
    pump: Handle<StandardMaterial>,
    valve: Handle<StandardMaterial>,
    handwheel: Handle<StandardMaterial>,
    heat_exchanger: Handle<StandardMaterial>,
    heat_exchanger_tubes: Handle<StandardMaterial>,
    column: Handle<StandardMaterial>,
    column_tray: Handle<StandardMaterial>,
    compressor: Handle<StandardMaterial>,
    reactor: Handle<StandardMaterial>,
    furnace: Handle<StandardMaterial>,
}

fn metal(color: Color, metallic: f32, roughness: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        metallic,
        perceptual_roughness: roughness,
        ..default()
    }
}

impl EquipmentMaterials {
    pub fn create(materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            tank: materials.add(metal(Color::srgb_u8(0xaa, 0xaa, 0xbb), 0.6, 0.3)),
            pump: materials.add(metal(Color::srgb_u8(0x44, 0x77, 0xcc), 0.5, 0.4)),
            valve: materials.add(metal(Color::srgb_u8(0xcc, 0x44, 0x44), 0.5, 0.4)),
            handwheel: materials.add(metal(Color::srgb_u8(0x33, 0x33, 0x44), 0.6, 0.3)),
            heat_exchanger: materials.add(metal(Color::srgb_u8(0xcc, 0x88, 0x44), 0.5, 0.35)),
            heat_exchanger_tubes: materials.add(metal(Color::srgb_u8(0xbb, 0x77, 0x33), 0.6, 0.3)),
            column: materials.add(metal(Color::srgb_u8(0x88, 0x99, 0xaa), 0.55, 0.3)),
            column_tray: materials.add(metal(Color::srgb_u8(0x66, 0x77, 0x88), 0.5, 0.4)),
            compressor: materials.add(metal(Color::srgb_u8(0x55, 0x66, 0xbb), 0.55, 0.35)),
            reactor: materials.add(metal(Color::srgb_u8(0x99, 0xaa, 0x88), 0.5, 0.35)),
            furnace: materials.add(metal(Color::srgb_u8(0x88, 0x55, 0x55), 0.4, 0.6)),
        }
    }
}

/// Result of spawning one equipment group
pub struct SpawnedEquipment {
    pub root: Entity,
    pub parts: Vec<Entity>,
    pub anchor: ConnectionAnchor,
}

struct GroupBuilder<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    root: Entity,
    parts: Vec<Entity>,
}

impl GroupBuilder<'_, '_, '_> {
    fn part(
        &mut self,
        mesh: impl Into<Mesh>,
        material: &Handle<StandardMaterial>,
        transform: Transform,
        pick_radius: f32,
    ) {
        let entity = self
            .commands
            .spawn((
                Mesh3d(self.meshes.add(mesh)),
                MeshMaterial3d(material.clone()),
                transform,
                PickBounds {
                    radius: pick_radius,
                },
                ChildOf(self.root),
            ))
            .id();
        self.parts.push(entity);
    }
}

/// Spawn the renderable group for one process component
pub fn spawn_equipment(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    mats: &EquipmentMaterials,
    component: &ProcessComponent,
) -> SpawnedEquipment {
    let position = Vec3::new(
        component.position[0] as f32,
        component.position[1] as f32,
        component.position[2] as f32,
    );

    let root = commands
        .spawn((
            Transform::from_translation(position),
            Visibility::default(),
            ComponentGroup {
                id: component.id.clone(),
                kind: component.kind,
                name: component.name.clone(),
                description: component.description.clone(),
            },
        ))
        .id();

    let mut builder = GroupBuilder {
        commands,
        meshes,
        root,
        parts: Vec::new(),
    };

    let anchor = match component.kind {
        ComponentKind::Tank => build_tank(&mut builder, mats),
        ComponentKind::Pump => build_pump(&mut builder, mats),
        ComponentKind::Valve => build_valve(&mut builder, mats),
        ComponentKind::HeatExchanger => build_heat_exchanger(&mut builder, mats),
        ComponentKind::Column => build_column(&mut builder, mats),
        ComponentKind::Compressor => build_compressor(&mut builder, mats),
        ComponentKind::Reactor => build_reactor(&mut builder, mats),
        ComponentKind::Furnace => build_furnace(&mut builder, mats),
    };

    builder.commands.entity(root).insert(anchor);

    SpawnedEquipment {
        root,
        parts: builder.parts,
        anchor,
    }
}

const HORIZONTAL: f32 = std::f32::consts::FRAC_PI_2;

/// Vertical cylinder with dished top and bottom heads
fn build_tank(b: &mut GroupBuilder, mats: &EquipmentMaterials) -> ConnectionAnchor {
    let radius = 1.2;
    let body_height = 3.0;
    // Lift the whole vessel so the bottom head rests on the grid
    let base_y = radius;

    b.part(
        Cylinder::new(radius, body_height),
        &mats.tank,
        Transform::from_xyz(0.0, base_y + body_height / 2.0, 0.0),
        1.9,
    );
    b.part(
        Sphere::new(radius),
        &mats.tank,
        Transform::from_xyz(0.0, base_y + body_height, 0.0),
        radius,
    );
    b.part(
        Sphere::new(radius),
        &mats.tank,
        Transform::from_xyz(0.0, base_y, 0.0),
        radius,
    );

    ConnectionAnchor {
        radius,
        height: 0.8,
    }
}

/// Horizontal casing with suction/discharge nozzles on a baseplate
fn build_pump(b: &mut GroupBuilder, mats: &EquipmentMaterials) -> ConnectionAnchor {
    b.part(
        Cylinder::new(0.6, 1.4),
        &mats.pump,
        Transform::from_xyz(0.0, 0.8, 0.0).with_rotation(Quat::from_rotation_z(HORIZONTAL)),
        1.0,
    );
    b.part(
        Cylinder::new(0.2, 0.6),
        &mats.pump,
        Transform::from_xyz(-1.0, 0.8, 0.0).with_rotation(Quat::from_rotation_z(HORIZONTAL)),
        0.4,
    );
    b.part(
        Cylinder::new(0.2, 0.6),
        &mats.pump,
        Transform::from_xyz(1.0, 0.8, 0.0).with_rotation(Quat::from_rotation_z(HORIZONTAL)),
        0.4,
    );
    b.part(
        Cuboid::new(1.6, 0.3, 1.0),
        &mats.pump,
        Transform::from_xyz(0.0, 0.15, 0.0),
        0.95,
    );

    ConnectionAnchor {
        radius: 1.3,
        height: 0.8,
    }
}

/// Bowtie valve body with stem and handwheel
fn build_valve(b: &mut GroupBuilder, mats: &EquipmentMaterials) -> ConnectionAnchor {
    b.part(
        Cone::new(0.5, 0.8),
        &mats.valve,
        Transform::from_xyz(-0.4, 0.6, 0.0).with_rotation(Quat::from_rotation_z(HORIZONTAL)),
        0.6,
    );
    b.part(
        Cone::new(0.5, 0.8),
        &mats.valve,
        Transform::from_xyz(0.4, 0.6, 0.0).with_rotation(Quat::from_rotation_z(-HORIZONTAL)),
        0.6,
    );
    b.part(
        Cylinder::new(0.06, 0.8),
        &mats.handwheel,
        Transform::from_xyz(0.0, 1.3, 0.0),
        0.45,
    );
    b.part(
        Torus {
            minor_radius: 0.04,
            major_radius: 0.3,
        },
        &mats.handwheel,
        Transform::from_xyz(0.0, 1.7, 0.0),
        0.35,
    );

    ConnectionAnchor {
        radius: 0.8,
        height: 0.6,
    }
}

/// Shell-and-tube exchanger: shell, tube sheets, end caps, nozzles, saddles
fn build_heat_exchanger(b: &mut GroupBuilder, mats: &EquipmentMaterials) -> ConnectionAnchor {
    let shell_radius = 0.7;
    let shell_length = 2.8;
    let base_y = shell_radius + 0.4;

    b.part(
        Cylinder::new(shell_radius, shell_length),
        &mats.heat_exchanger,
        Transform::from_xyz(0.0, base_y, 0.0).with_rotation(Quat::from_rotation_z(HORIZONTAL)),
        1.6,
    );

    for sign in [-1.0, 1.0] {
        // Tube sheet disc
        b.part(
            Cylinder::new(shell_radius + 0.05, 0.08),
            &mats.heat_exchanger_tubes,
            Transform::from_xyz(sign * shell_length / 2.0, base_y, 0.0)
                .with_rotation(Quat::from_rotation_z(HORIZONTAL)),
            0.8,
        );
        // End cap
        b.part(
            Sphere::new(shell_radius),
            &mats.heat_exchanger,
            Transform::from_xyz(sign * (shell_length / 2.0 + 0.04), base_y, 0.0),
            shell_radius,
        );
        // Shell-side nozzle
        b.part(
            Cylinder::new(0.15, 0.5),
            &mats.heat_exchanger_tubes,
            Transform::from_xyz(sign * shell_length / 4.0, base_y + shell_radius + 0.25, 0.0),
            0.3,
        );
        // Support saddle
        b.part(
            Cuboid::new(0.3, 0.4, 1.0),
            &mats.handwheel,
            Transform::from_xyz(sign * shell_length / 3.0, 0.2, 0.0),
            0.55,
        );
    }

    ConnectionAnchor {
        radius: shell_length / 2.0 + shell_radius + 0.1,
        height: base_y,
    }
}

/// Tall fractionating column with trays, nozzles, and a support skirt
fn build_column(b: &mut GroupBuilder, mats: &EquipmentMaterials) -> ConnectionAnchor {
    let radius = 1.0;
    let body_height = 7.0;
    let base_y = radius;

    b.part(
        Cylinder::new(radius, body_height),
        &mats.column,
        Transform::from_xyz(0.0, base_y + body_height / 2.0, 0.0),
        3.7,
    );
    b.part(
        Sphere::new(radius),
        &mats.column,
        Transform::from_xyz(0.0, base_y + body_height, 0.0),
        radius,
    );
    b.part(
        Sphere::new(radius),
        &mats.column,
        Transform::from_xyz(0.0, base_y, 0.0),
        radius,
    );

    // Tray rings along the shell
    let tray_count = 5;
    for i in 0..tray_count {
        let y = base_y + body_height * (i + 1) as f32 / (tray_count + 1) as f32;
        b.part(
            Torus {
                minor_radius: 0.04,
                major_radius: radius + 0.05,
            },
            &mats.column_tray,
            Transform::from_xyz(0.0, y, 0.0),
            1.1,
        );
    }

    // Feed nozzle at mid-height
    b.part(
        Cylinder::new(0.15, 0.6),
        &mats.column_tray,
        Transform::from_xyz(radius + 0.3, base_y + body_height * 0.4, 0.0)
            .with_rotation(Quat::from_rotation_z(HORIZONTAL)),
        0.35,
    );
    // Overhead nozzle
    b.part(
        Cylinder::new(0.15, 0.6),
        &mats.column_tray,
        Transform::from_xyz(0.0, base_y + body_height + radius + 0.3, 0.0),
        0.35,
    );
    // Support skirt
    b.part(
        Cylinder::new(radius + 0.15, 1.0),
        &mats.column_tray,
        Transform::from_xyz(0.0, 0.5, 0.0),
        1.2,
    );

    ConnectionAnchor {
        radius: radius + 0.4,
        height: 0.8,
    }
}

/// Horizontal compressor casing with motor and baseplate
fn build_compressor(b: &mut GroupBuilder, mats: &EquipmentMaterials) -> ConnectionAnchor {
    b.part(
        Cylinder::new(0.8, 2.0),
        &mats.compressor,
        Transform::from_xyz(-0.4, 1.2, 0.0).with_rotation(Quat::from_rotation_z(HORIZONTAL)),
        1.3,
    );
    b.part(
        Cuboid::new(1.2, 1.0, 1.0),
        &mats.compressor,
        Transform::from_xyz(1.3, 1.0, 0.0),
        0.9,
    );
    b.part(
        Cuboid::new(3.6, 0.4, 1.4),
        &mats.handwheel,
        Transform::from_xyz(0.0, 0.2, 0.0),
        1.9,
    );

    ConnectionAnchor {
        radius: 1.8,
        height: 1.2,
    }
}

/// Vertical reactor vessel on legs
fn build_reactor(b: &mut GroupBuilder, mats: &EquipmentMaterials) -> ConnectionAnchor {
    let radius = 1.1;
    let body_height = 5.0;
    let base_y = radius;

    b.part(
        Cylinder::new(radius, body_height),
        &mats.reactor,
        Transform::from_xyz(0.0, base_y + body_height / 2.0, 0.0),
        2.7,
    );
    b.part(
        Sphere::new(radius),
        &mats.reactor,
        Transform::from_xyz(0.0, base_y + body_height, 0.0),
        radius,
    );
    b.part(
        Sphere::new(radius),
        &mats.reactor,
        Transform::from_xyz(0.0, base_y, 0.0),
        radius,
    );

    for (x, z) in [(-0.8, -0.8), (-0.8, 0.8), (0.8, -0.8), (0.8, 0.8)] {
        b.part(
            Cuboid::new(0.15, 1.0, 0.15),
            &mats.handwheel,
            Transform::from_xyz(x, 0.5, z),
            0.55,
        );
    }

    ConnectionAnchor {
        radius: 1.5,
        height: 0.8,
    }
}

/// Fired heater box with a stack
fn build_furnace(b: &mut GroupBuilder, mats: &EquipmentMaterials) -> ConnectionAnchor {
    b.part(
        Cuboid::new(3.0, 5.0, 3.0),
        &mats.furnace,
        Transform::from_xyz(0.0, 2.5, 0.0),
        3.3,
    );
    b.part(
        Cylinder::new(0.35, 3.0),
        &mats.furnace,
        Transform::from_xyz(0.9, 6.5, 0.0),
        1.6,
    );
    b.part(
        Cuboid::new(1.2, 1.5, 0.1),
        &mats.handwheel,
        Transform::from_xyz(0.0, 1.2, 1.55),
        0.95,
    );

    ConnectionAnchor {
        radius: 2.0,
        height: 0.8,
    }
}
