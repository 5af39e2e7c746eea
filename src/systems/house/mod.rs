// entry point for the house plugin: three stacked floor plans
use bevy::asset::LoadState;
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;

use crate::config::*;

pub mod material;
pub mod shading;
pub mod surface;

use material::{FloorPlanMaterial, FloorPlanParams};
use surface::SurfaceSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloorLevel {
    Bottom,
    Middle,
    Top,
}

impl FloorLevel {
    pub const ALL: [FloorLevel; 3] = [FloorLevel::Bottom, FloorLevel::Middle, FloorLevel::Top];

    // how many spacings above the ground
    pub fn index(self) -> usize {
        match self {
            FloorLevel::Bottom => 0,
            FloorLevel::Middle => 1,
            FloorLevel::Top => 2,
        }
    }

    pub fn image_path(self) -> &'static str {
        match self {
            FloorLevel::Bottom => BOTTOM_FLOOR_IMAGE,
            FloorLevel::Middle => MIDDLE_FLOOR_IMAGE,
            FloorLevel::Top => TOP_FLOOR_IMAGE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FloorLevel::Bottom => "Bottom Floor (Ground)",
            FloorLevel::Middle => "Middle Floor (Level 1)",
            FloorLevel::Top => "Top Floor (Level 2)",
        }
    }

    /// Elevation inside the house group
    pub fn elevation(self, spacing: f32) -> f32 {
        spacing * self.index() as f32
    }
}

// resources

/// Everything the control panel says about the house
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HouseSettings {
    pub floor_spacing: f32,
    pub opacity: f32,
    pub wall_height: f32,
    pub visible: [bool; 3], // indexed by FloorLevel::index
}

impl Default for HouseSettings {
    fn default() -> Self {
        Self {
            floor_spacing: DEFAULT_FLOOR_SPACING,
            opacity: DEFAULT_OPACITY,
            wall_height: 0.0,
            visible: [true; 3],
        }
    }
}

impl HouseSettings {
    pub fn is_visible(&self, level: FloorLevel) -> bool {
        self.visible[level.index()]
    }

    pub fn set_visible(&mut self, level: FloorLevel, visible: bool) {
        self.visible[level.index()] = visible;
    }

    pub fn toggle(&mut self, level: FloorLevel) {
        let idx = level.index();
        self.visible[idx] = !self.visible[idx];
    }
}

// components

#[derive(Component)]
pub struct HouseRoot;

/// One floor level, the parent of its quad and slab
#[derive(Component, Debug, Clone)]
pub struct FloorSpec {
    pub level: FloorLevel,
    pub image: Handle<Image>,
    pub height_ratio: f32,
    pub vertical_offset: f32,
    pub visible: bool,
    pub opacity: f32,
    pub displacement_scale: f32,
    pub texture_ready: bool,
    pub load_failed: bool,
}

impl FloorSpec {
    pub fn new(level: FloorLevel, image: Handle<Image>) -> Self {
        Self {
            level,
            image,
            height_ratio: 1.0,
            vertical_offset: 0.0,
            visible: true,
            opacity: DEFAULT_OPACITY,
            displacement_scale: 0.0,
            texture_ready: false,
            load_failed: false,
        }
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::from_ratio(self.height_ratio)
    }

    // nothing renders until the texture arrives
    pub fn is_rendered(&self) -> bool {
        self.visible && self.texture_ready
    }

    pub fn apply(&mut self, settings: &HouseSettings) {
        self.vertical_offset = self.level.elevation(settings.floor_spacing);
        self.visible = settings.is_visible(self.level);
        self.opacity = settings.opacity;
        self.displacement_scale = settings.wall_height.max(0.0);
    }

    pub fn plan_params(&self) -> FloorPlanParams {
        FloorPlanParams::new(self.opacity, self.displacement_scale)
    }
}

/// Handles to the two children of a floor
#[derive(Component)]
pub struct FloorSurface {
    pub quad: Entity,
    pub slab: Entity,
    pub plan_material: Handle<FloorPlanMaterial>,
    pub slab_material: Handle<StandardMaterial>,
}

pub struct HousePlugin;

impl Plugin for HousePlugin {
    fn build(&self, app: &mut App) {
        app
            .add_plugins(MaterialPlugin::<FloorPlanMaterial> {
                // relief only exists in our vertex stage, so no depth/shadow prepass
                prepass_enabled: false,
                shadows_enabled: false,
                ..default()
            })
            .init_resource::<HouseSettings>()
            .add_systems(Startup, spawn_house)
            .add_systems(
                Update,
                (
                    track_floor_textures,
                    sync_floor_layout.run_if(resource_changed::<HouseSettings>),
                    sync_floor_materials,
                )
                    .chain(),
            );
    }
}

pub fn spawn_house(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut plan_materials: ResMut<Assets<FloorPlanMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<HouseSettings>,
) {
    let house = commands
        .spawn((
            HouseRoot,
            Transform::from_xyz(0.0, HOUSE_BASE_OFFSET, 0.0),
            Visibility::default(),
        ))
        .id();

    // shadow catcher
    let ground = commands
        .spawn((
            Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.94, 0.94, 0.94),
                perceptual_roughness: 1.0,
                ..default()
            })),
            Transform::from_xyz(0.0, -GROUND_DROP, 0.0),
        ))
        .id();
    commands.entity(house).add_children(&[ground]);

    for level in FloorLevel::ALL {
        let mut spec = FloorSpec::new(level, asset_server.load(level.image_path()));
        spec.apply(&settings);
        let size = spec.size();

        let plan_material = plan_materials.add(FloorPlanMaterial {
            texture: spec.image.clone(),
            params: spec.plan_params(),
        });
        let slab_material = materials.add(surface::slab_material(spec.opacity));

        let quad = commands
            .spawn((
                Mesh3d(meshes.add(surface::quad_mesh(size))),
                MeshMaterial3d(plan_material.clone()),
                Transform::default(),
                NotShadowCaster,
            ))
            .id();
        let slab = commands
            .spawn((
                Mesh3d(meshes.add(surface::slab_mesh(size))),
                MeshMaterial3d(slab_material.clone()),
                Transform::from_translation(surface::slab_offset()),
            ))
            .id();

        let floor = commands
            .spawn((
                Transform::from_xyz(0.0, spec.vertical_offset, 0.0),
                Visibility::Hidden,
                FloorSurface {
                    quad,
                    slab,
                    plan_material,
                    slab_material,
                },
                spec,
            ))
            .add_children(&[quad, slab])
            .id();
        commands.entity(house).add_children(&[floor]);
    }

    info!("Spawned {} floors", FloorLevel::ALL.len());
}

// texture ready signal: resize to the real aspect and reveal
pub fn track_floor_textures(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut floors: Query<(&mut FloorSpec, &FloorSurface, &mut Visibility)>,
) {
    for (mut spec, surface, mut visibility) in &mut floors {
        if spec.texture_ready || spec.load_failed {
            continue;
        }

        if let Some(image) = images.get(&spec.image) {
            spec.height_ratio = surface::image_ratio(image.width(), image.height());
            spec.texture_ready = true;
            let size = spec.size();

            commands.entity(surface.quad).insert(Mesh3d(meshes.add(surface::quad_mesh(size))));
            commands.entity(surface.slab).insert(Mesh3d(meshes.add(surface::slab_mesh(size))));
            *visibility = floor_visibility(&spec);

            info!(
                "{:?} floor texture ready, {:.1} x {:.1} m",
                spec.level, size.width, size.depth
            );
        } else if matches!(asset_server.load_state(spec.image.id()), LoadState::Failed(_)) {
            spec.load_failed = true;
            warn!(
                "{:?} floor texture {} failed to load, floor stays hidden",
                spec.level,
                spec.level.image_path()
            );
        }
    }
}

fn floor_visibility(spec: &FloorSpec) -> Visibility {
    if spec.is_rendered() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

// spacing, visibility and uniforms flow from the panel into every floor
pub fn sync_floor_layout(
    settings: Res<HouseSettings>,
    mut floors: Query<(&mut FloorSpec, &mut Transform, &mut Visibility)>,
) {
    for (mut spec, mut transform, mut visibility) in &mut floors {
        spec.apply(&settings);
        transform.translation.y = spec.vertical_offset;
        *visibility = floor_visibility(&spec);
    }
}

// memoized: only touch a material when its inputs differ
pub fn sync_floor_materials(
    floors: Query<(&FloorSpec, &FloorSurface), Changed<FloorSpec>>,
    mut plan_materials: ResMut<Assets<FloorPlanMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (spec, surface) in &floors {
        let params = spec.plan_params();
        let stale = plan_materials
            .get(&surface.plan_material)
            .is_some_and(|material| material.params != params);
        if stale {
            if let Some(material) = plan_materials.get_mut(&surface.plan_material) {
                material.params = params;
            }
        }

        let slab_color = surface::slab_color(spec.opacity);
        let slab_stale = materials
            .get(&surface.slab_material)
            .is_some_and(|material| material.base_color != slab_color);
        if slab_stale {
            if let Some(material) = materials.get_mut(&surface.slab_material) {
                material.base_color = slab_color;
            }
        }
    }
}
