// human scale figure, stands on the middle floor
use bevy::prelude::*;

use crate::config::*;
use crate::systems::house::{FloorLevel, HouseRoot, HouseSettings};
use crate::systems::view::ViewSettings;

#[derive(Component)]
pub struct ScaleFigure;

pub struct PersonPlugin;

impl Plugin for PersonPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(Startup, spawn_person.after(crate::systems::house::spawn_house))
            .add_systems(
                Update,
                sync_person.run_if(
                    resource_changed::<HouseSettings>.or(resource_changed::<ViewSettings>),
                ),
            );
    }
}

// feet position inside the house group
pub fn person_position(floor_spacing: f32) -> Vec3 {
    Vec3::new(
        PERSON_OFFSET.x,
        FloorLevel::Middle.elevation(floor_spacing),
        PERSON_OFFSET.y,
    )
}

fn spawn_person(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    house: Query<Entity, With<HouseRoot>>,
    settings: Res<HouseSettings>,
    view: Res<ViewSettings>,
) {
    let body = commands
        .spawn((
            Mesh3d(meshes.add(Cylinder::new(PERSON_RADIUS, PERSON_HEIGHT))),
            MeshMaterial3d(materials.add(Color::srgb_u8(0x00, 0x7b, 0xff))),
            Transform::from_xyz(0.0, PERSON_HEIGHT * 0.5, 0.0),
        ))
        .id();
    let head = commands
        .spawn((
            Mesh3d(meshes.add(Sphere::new(PERSON_HEAD_RADIUS))),
            MeshMaterial3d(materials.add(Color::srgb_u8(0xff, 0xcc, 0xaa))),
            Transform::from_xyz(0.0, PERSON_HEIGHT + PERSON_HEAD_RADIUS, 0.0),
        ))
        .id();

    let person = commands
        .spawn((
            ScaleFigure,
            Transform::from_translation(person_position(settings.floor_spacing)),
            if view.show_person { Visibility::Inherited } else { Visibility::Hidden },
        ))
        .add_children(&[body, head])
        .id();

    // commands from spawn_house are applied before this system runs
    if let Ok(house) = house.single() {
        commands.entity(house).add_children(&[person]);
    }
}

fn sync_person(
    settings: Res<HouseSettings>,
    view: Res<ViewSettings>,
    mut people: Query<(&mut Transform, &mut Visibility), With<ScaleFigure>>,
) {
    for (mut transform, mut visibility) in &mut people {
        transform.translation = person_position(settings.floor_spacing);
        *visibility = if view.show_person {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}
