use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::surface::FrameDots;

/// Shared unit-circle mesh and fill material for every dot.
#[derive(Resource)]
pub struct DotAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<ColorMaterial>,
    pub color: Color,
}

impl DotAssets {
    pub fn new(meshes: &mut Assets<Mesh>, materials: &mut Assets<ColorMaterial>, color: Color) -> Self {
        DotAssets {
            mesh: meshes.add(Circle { radius: 1.0 }),
            material: materials.add(color),
            color,
        }
    }
}

/// Marks a pooled dot mesh entity.
#[derive(Component)]
pub struct DotSprite;

/// Link stroke width in logical units, as last requested by the field.
#[derive(Resource)]
pub struct LinkStroke(pub f32);

fn dot_transform(center: Vec2, radius: f32) -> Transform {
    Transform::from_translation(center.extend(0.0)).with_scale(Vec3::splat(radius))
}

/// Keeps one circle mesh entity per queued dot, moving existing ones and
/// spawning or despawning the difference.
pub fn sync_dots(
    mut commands: Commands,
    frame_dots: Res<FrameDots>,
    mut assets: ResMut<DotAssets>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut sprites: Query<(Entity, &mut Transform), With<DotSprite>>,
) {
    let dots = &frame_dots.0;

    if let Some(first) = dots.first() {
        if first.color != assets.color {
            assets.color = first.color;
            if let Some(material) = materials.get_mut(&assets.material) {
                material.color = first.color;
            }
        }
    }

    let mut pooled = 0;
    for (entity, mut transform) in sprites.iter_mut() {
        match dots.get(pooled) {
            Some(dot) => *transform = dot_transform(dot.center, dot.radius),
            None => commands.entity(entity).despawn(),
        }
        pooled += 1;
    }

    for dot in dots.iter().skip(pooled) {
        commands.spawn((
            Mesh2d(assets.mesh.clone()),
            MeshMaterial2d(assets.material.clone()),
            dot_transform(dot.center, dot.radius),
            DotSprite,
        ));
    }
}

/// Gizmo widths are in physical pixels, so this follows the window's scale
/// factor as it moves between monitors.
pub fn apply_line_width(
    stroke: Res<LinkStroke>,
    window: Single<&Window, With<PrimaryWindow>>,
    mut config_store: ResMut<GizmoConfigStore>,
) {
    let width = stroke.0 * window.scale_factor();
    let (config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    if config.line.width != width {
        config.line.width = width;
    }
}

#[cfg(test)]
mod tests {
    use bevy::color::Alpha;
    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::surface::DotInstance;

    fn dot(x: f32, radius: f32) -> DotInstance {
        DotInstance {
            center: Vec2::new(x, 5.0),
            radius,
            color: Color::srgba_u8(235, 251, 41, 153),
        }
    }

    fn world_with(dots: Vec<DotInstance>) -> World {
        let mut world = World::new();
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<ColorMaterial>::default();
        let assets = DotAssets::new(&mut meshes, &mut materials, Color::srgba_u8(235, 251, 41, 153));
        world.insert_resource(meshes);
        world.insert_resource(materials);
        world.insert_resource(assets);
        world.insert_resource(FrameDots(dots));
        world
    }

    fn sprites(world: &mut World) -> Vec<Transform> {
        let mut transforms: Vec<Transform> = world
            .query_filtered::<&Transform, With<DotSprite>>()
            .iter(world)
            .copied()
            .collect();
        transforms.sort_by(|a, b| a.translation.x.total_cmp(&b.translation.x));
        transforms
    }

    #[test]
    fn one_mesh_per_dot_at_its_centre_and_radius() {
        let mut world = world_with(vec![dot(-10.0, 1.0), dot(0.0, 2.5), dot(10.0, 3.0)]);
        world.run_system_once(sync_dots).expect("sync_dots should run");

        let transforms = sprites(&mut world);
        assert_eq!(transforms.len(), 3);
        assert_eq!(transforms[1].translation, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(transforms[1].scale, Vec3::splat(2.5));
        assert_eq!(transforms[2].scale, Vec3::splat(3.0));
    }

    #[test]
    fn pool_shrinks_and_empties_with_the_field() {
        let mut world = world_with(vec![dot(-10.0, 1.0), dot(0.0, 2.0), dot(10.0, 3.0)]);
        world.run_system_once(sync_dots).expect("sync_dots should run");

        world.resource_mut::<FrameDots>().0 = vec![dot(42.0, 2.0)];
        world.run_system_once(sync_dots).expect("sync_dots should run");
        let transforms = sprites(&mut world);
        assert_eq!(transforms.len(), 1);
        assert_eq!(transforms[0].translation.x, 42.0);

        world.resource_mut::<FrameDots>().0.clear();
        world.run_system_once(sync_dots).expect("sync_dots should run");
        assert!(sprites(&mut world).is_empty());
    }

    #[test]
    fn fill_color_is_the_dot_color_not_a_stack_of_strokes() {
        let mut world = world_with(vec![dot(0.0, 3.0)]);
        world.run_system_once(sync_dots).expect("sync_dots should run");

        let handle = world.resource::<DotAssets>().material.clone();
        let material = world.resource::<Assets<ColorMaterial>>().get(&handle).map(|m| m.color);
        let alpha = material.map(|c| c.alpha()).unwrap_or_default();
        assert!((alpha - 0.6).abs() < 0.01, "dot alpha should stay 0.6, got {alpha}");
    }

    #[test]
    fn line_width_follows_scale_factor() {
        let mut world = World::new();
        let mut store = GizmoConfigStore::default();
        store.insert(GizmoConfig::default(), DefaultGizmoConfigGroup);
        world.insert_resource(store);
        world.insert_resource(LinkStroke(0.5));
        let window = world.spawn((Window::default(), PrimaryWindow)).id();

        world.run_system_once(apply_line_width).expect("apply_line_width should run");
        let width = world.resource::<GizmoConfigStore>().config::<DefaultGizmoConfigGroup>().0.line.width;
        assert_eq!(width, 0.5);

        if let Some(mut w) = world.get_mut::<Window>(window) {
            w.resolution.set_scale_factor_override(Some(2.0));
        }
        world.run_system_once(apply_line_width).expect("apply_line_width should run");
        let width = world.resource::<GizmoConfigStore>().config::<DefaultGizmoConfigGroup>().0.line.width;
        assert_eq!(width, 1.0);
    }
}
