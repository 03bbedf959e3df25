use std::time::{Duration, Instant};

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::args::ARGS;
use crate::field::DotField;
use crate::keyboard::{handle_keypress, KeyboardCommands};
use crate::render::{apply_line_width, sync_dots, DotAssets, LinkStroke};
use crate::surface::{FrameDots, WindowSurface};
use crate::tunables::Tunables;

mod args;
mod field;
mod field_settings;
mod keyboard;
mod particle;
mod render;
mod surface;
mod tunables;

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Dots".into(),
                resolution: ARGS.win.into(),
                ..default()
            }),
            ..default()
        }))
        .init_resource::<FrameDots>()
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (handle_keypress, sync_surface, animate, sync_dots, apply_line_width, show_notices).chain(),
        )
        .run();
}

pub struct NoticeText {
    pub text: String,
    pub start_time: Instant,
    pub duration: Duration,
}

/// Short-lived messages shown in the top-left corner.
#[derive(Component, Default)]
pub struct Notices {
    pub notices: Vec<NoticeText>,
}

impl Notices {
    pub fn push(&mut self, text: impl Into<String>, duration: Duration) {
        self.notices.push(NoticeText {
            text: text.into(),
            start_time: Instant::now(),
            duration,
        });
    }
}

#[derive(Component)]
struct NoticeOverlay;

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let tunables = Tunables::from_args(&ARGS);

    commands.insert_resource(DotAssets::new(&mut meshes, &mut materials, tunables.dot_color));
    commands.insert_resource(LinkStroke(tunables.link_width));
    commands.spawn(Camera2d);

    // The grid itself is laid out by `sync_surface` once the window reports its size.
    commands.spawn(DotField::new(tunables, ARGS.seed));
    commands.spawn(KeyboardCommands::create());

    let mut notices = Notices::default();
    notices.push("Press ? for help", Duration::from_secs(3));
    commands.spawn(notices);
    commands.spawn((
        Text::new(""),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
        NoticeOverlay,
    ));
}

/// Feeds the field the window's logical size and the cursor position.
fn sync_surface(window: Single<&Window, With<PrimaryWindow>>, mut field: Single<&mut DotField>) {
    let size = Vec2::new(window.width(), window.height());
    if size != field.size {
        info!("Surface is now {}x{}", size.x, size.y);
        field.resize(size);
    }

    match window.cursor_position() {
        Some(position) => field.pointer_moved(position),
        None => field.pointer_left(),
    }
}

fn animate(
    mut commands: Commands,
    field: Single<(Entity, &mut DotField)>,
    mut gizmos: Gizmos,
    mut frame_dots: ResMut<FrameDots>,
    mut stroke: ResMut<LinkStroke>,
) {
    let (entity, mut field) = field.into_inner();
    let mut surface = WindowSurface::new(&mut gizmos, &mut frame_dots.0, field.size);
    let running = field.frame(&mut surface);
    let line_width = surface.line_width();

    if !running {
        // Once the field entity is gone no system touches it again, and the
        // empty queue lets `sync_dots` remove the meshes.
        frame_dots.0.clear();
        commands.entity(entity).despawn();
        return;
    }
    if let Some(width) = line_width {
        if stroke.0 != width {
            stroke.0 = width;
        }
    }
}

fn show_notices(mut notices: Single<&mut Notices>, mut overlay: Single<&mut Text, With<NoticeOverlay>>) {
    let now = Instant::now();
    notices
        .notices
        .retain(|notice| now.duration_since(notice.start_time) < notice.duration);

    let text = notices
        .notices
        .iter()
        .map(|notice| notice.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    if overlay.0 != text {
        overlay.0 = text;
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    fn world_with_window(width: u32, height: u32) -> World {
        let mut world = World::new();
        world.spawn((
            Window {
                resolution: (width, height).into(),
                ..default()
            },
            PrimaryWindow,
        ));
        world.spawn(DotField::new(Tunables::default(), Some(9)));
        world
    }

    fn set_window(world: &mut World, change: impl FnOnce(&mut Window)) {
        let mut window = world
            .query_filtered::<&mut Window, With<PrimaryWindow>>()
            .single_mut(world)
            .expect("one primary window");
        change(&mut window);
    }

    fn field(world: &mut World) -> &DotField {
        world.query::<&DotField>().single(world).expect("one field")
    }

    #[test]
    fn first_sync_lays_out_the_grid() {
        let mut world = world_with_window(400, 200);
        world.run_system_once(sync_surface).expect("sync_surface should run");

        let f = field(&mut world);
        assert_eq!(f.size, Vec2::new(400.0, 200.0));
        assert_eq!(f.particles.len(), 10 * 5);
        assert!(!f.pointer.hovering, "no cursor means not hovering");
    }

    #[test]
    fn cursor_position_drives_hovering() {
        let mut world = world_with_window(400, 200);
        set_window(&mut world, |w| w.set_cursor_position(Some(Vec2::new(30.0, 40.0))));
        world.run_system_once(sync_surface).expect("sync_surface should run");

        let pointer = field(&mut world).pointer;
        assert!(pointer.hovering);
        assert_eq!(pointer.position, Vec2::new(30.0, 40.0));

        set_window(&mut world, |w| w.set_cursor_position(None));
        world.run_system_once(sync_surface).expect("sync_surface should run");
        let pointer = field(&mut world).pointer;
        assert!(!pointer.hovering, "cursor leaving the window stops the repulsion");
        assert_eq!(pointer.position, Vec2::new(30.0, 40.0));
    }

    #[test]
    fn window_resize_regenerates_dots() {
        let mut world = world_with_window(400, 200);
        world.run_system_once(sync_surface).expect("sync_surface should run");
        let old_ids: Vec<u64> = field(&mut world).particles.iter().map(|p| p.id).collect();

        // Unchanged size leaves the dots alone.
        world.run_system_once(sync_surface).expect("sync_surface should run");
        let same_ids: Vec<u64> = field(&mut world).particles.iter().map(|p| p.id).collect();
        assert_eq!(old_ids, same_ids);

        set_window(&mut world, |w| w.resolution.set(600.0, 200.0));
        world.run_system_once(sync_surface).expect("sync_surface should run");
        let f = field(&mut world);
        assert_eq!(f.size, Vec2::new(600.0, 200.0));
        assert_eq!(f.particles.len(), 15 * 5);
        assert!(f.particles.iter().all(|p| !old_ids.contains(&p.id)), "a dot survived the resize");
    }
}
