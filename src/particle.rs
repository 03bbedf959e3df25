use bevy::math::Vec2;

/// One dot of the field. Position and velocity change every frame; the rest
/// position and radius are fixed when the dot is created.
#[derive(Clone, Debug)]
pub struct Particle {
    pub id: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    radius: f32,
    rest: Vec2,
}

impl Particle {
    pub fn new(id: u64, rest: Vec2, velocity: Vec2, radius: f32) -> Self {
        Particle {
            id,
            position: rest,
            velocity,
            radius,
            rest,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn rest(&self) -> Vec2 {
        self.rest
    }
}
