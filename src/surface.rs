use bevy::color::Color;
use bevy::math::Vec2;
use bevy::prelude::{Gizmos, Resource};

/// A 2-D drawing target in surface-local coordinates: origin at the top-left
/// corner, y growing downward, logical (not physical) pixels.
pub trait Surface {
    fn clear(&mut self, size: Vec2);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
}

/// Converts a surface-local point to the world space of a default `Camera2d`
/// looking at a window of `size` (origin at the centre, y up).
pub fn surface_to_world(p: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(p.x - size.x / 2.0, size.y / 2.0 - p.y)
}

/// A filled dot queued for this frame, already in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotInstance {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// Dots drawn during the current frame. Mesh entities are synced from it.
#[derive(Resource, Default)]
pub struct FrameDots(pub Vec<DotInstance>);

/// Draws onto the window: lines through Bevy's immediate-mode gizmos, dots
/// queued into [`FrameDots`] to be shown as circle meshes.
pub struct WindowSurface<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
    dots: &'a mut Vec<DotInstance>,
    size: Vec2,
    line_width: Option<f32>,
}

impl<'a, 'w, 's> WindowSurface<'a, 'w, 's> {
    pub fn new(gizmos: &'a mut Gizmos<'w, 's>, dots: &'a mut Vec<DotInstance>, size: Vec2) -> Self {
        WindowSurface {
            gizmos,
            dots,
            size,
            line_width: None,
        }
    }

    /// Width of the last line drawn, in logical units.
    pub fn line_width(&self) -> Option<f32> {
        self.line_width
    }
}

impl Surface for WindowSurface<'_, '_, '_> {
    fn clear(&mut self, size: Vec2) {
        // Gizmos only live for one frame; queued dots are dropped.
        self.size = size;
        self.dots.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.dots.push(DotInstance {
            center: surface_to_world(center, self.size),
            radius,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        // Gizmo stroke width is per config group, applied after drawing.
        self.line_width = Some(width);
        self.gizmos
            .line_2d(surface_to_world(from, self.size), surface_to_world(to, self.size), color);
    }
}
