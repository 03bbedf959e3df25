use std::fmt::{Debug, Formatter};

use bevy::color::Color;
use bevy::math::Vec2;

use crate::args::Args;

/// Smallest spacing / radius the field accepts. Keeps the grid finite and the
/// force falloff well defined.
pub const MIN_DISTANCE: f32 = 10.0;

#[derive(Clone)]
pub struct Tunables {
    pub spacing: f32,
    pub initial_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,

    // Mouse repulsion:
    pub interaction_radius: f32,
    pub push_gain: f32,

    // Return-to-rest spring:
    pub return_gain: f32,
    pub friction: f32,

    // Links between neighbouring dots:
    pub link_radius: f32,
    pub link_opacity: f32,
    pub link_width: f32,

    pub dot_color: Color,
    pub link_color: Color,
}

impl Default for Tunables {
    fn default() -> Self {
        Tunables {
            spacing: 40.0,
            initial_speed: 0.25,
            min_radius: 1.0,
            max_radius: 3.0,
            interaction_radius: 100.0,
            push_gain: 0.3,
            return_gain: 0.02,
            friction: 0.95,
            link_radius: 80.0,
            link_opacity: 0.3,
            link_width: 0.5,
            dot_color: Color::srgba_u8(235, 251, 41, 153),
            link_color: Color::srgb_u8(235, 251, 41),
        }
    }
}

impl Tunables {
    pub fn from_args(args: &Args) -> Self {
        Tunables {
            spacing: args.spacing.max(MIN_DISTANCE),
            interaction_radius: args.interaction_radius.max(MIN_DISTANCE),
            push_gain: args.push_gain,
            return_gain: args.return_gain,
            friction: args.friction.clamp(0.0, 1.0),
            link_radius: args.link_radius.max(0.0),
            link_opacity: args.link_opacity.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Velocity change pushing a dot at `position` away from the pointer.
    ///
    /// Zero outside `interaction_radius`; inside it the magnitude falls off
    /// linearly from `push_gain` at the pointer to zero at the radius.
    pub fn repulsion(&self, pointer: Vec2, position: Vec2) -> Vec2 {
        let toward_pointer = pointer - position;
        let distance = toward_pointer.length();
        if distance >= self.interaction_radius {
            return Vec2::ZERO;
        }
        let force = (self.interaction_radius - distance) / self.interaction_radius;
        let angle = toward_pointer.y.atan2(toward_pointer.x);
        -Vec2::from_angle(angle) * force * self.push_gain
    }

    /// Linear spring towards the rest position.
    pub fn restoring(&self, rest: Vec2, position: Vec2) -> Vec2 {
        (rest - position) * self.return_gain
    }

    /// Opacity of the line joining two dots `distance` apart, if any is drawn.
    pub fn link_alpha(&self, distance: f32) -> Option<f32> {
        if distance < self.link_radius {
            Some((self.link_radius - distance) / self.link_radius * self.link_opacity)
        } else {
            None
        }
    }
}

impl Debug for Tunables {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tunables:")?;
        writeln!(f, "    spacing: {}", self.spacing)?;
        writeln!(f, "    interaction_radius: {}", self.interaction_radius)?;
        writeln!(f, "    push_gain: {}", self.push_gain)?;
        writeln!(f, "    return_gain: {}", self.return_gain)?;
        writeln!(f, "    friction: {}", self.friction)?;
        writeln!(f, "    link_radius: {}", self.link_radius)?;
        writeln!(f, "    link_opacity: {}", self.link_opacity)
    }
}
