use bevy::color::Alpha;
use bevy::log::{debug, info};
use bevy::math::Vec2;
use bevy::prelude::Component;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::particle::Particle;
use crate::surface::Surface;
use crate::tunables::Tunables;

/// Last pointer sample delivered by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub position: Vec2,
    pub hovering: bool,
}

/// A pair of dots close enough to be joined by a line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub from: usize,
    pub to: usize,
    pub alpha: f32,
}

/// The particle field: a grid of dots that spring back to their rest
/// positions, get pushed away by a hovering pointer and are joined to their
/// neighbours by faint lines.
///
/// All state lives here. Pointer and resize handlers only record what the
/// host told them; the simulation work happens in [`DotField::frame`].
#[derive(Component)]
pub struct DotField {
    pub tunables: Tunables,
    pub particles: Vec<Particle>,
    pub pointer: Pointer,
    pub size: Vec2,
    pub show_links: bool,
    /// `u32::MAX` == run freely, 0 == paused, otherwise frames left before pausing.
    pub frames_to_show: u32,
    pub frame_count: u64,
    next_id: u64,
    torn_down: bool,
    rng: StdRng,
}

impl DotField {
    pub fn new(tunables: Tunables, seed: Option<u64>) -> DotField {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        info!("{tunables:?}");

        DotField {
            tunables,
            particles: Vec::new(),
            pointer: Pointer::default(),
            size: Vec2::ZERO,
            show_links: true,
            frames_to_show: u32::MAX,
            frame_count: 0,
            next_id: 0,
            torn_down: false,
            rng,
        }
    }

    /// The surface reported new logical dimensions. Every existing dot is
    /// dropped and a fresh grid is laid out.
    pub fn resize(&mut self, size: Vec2) {
        if self.torn_down {
            return;
        }
        self.size = size;
        self.place_particles();
    }

    pub fn place_particles(&mut self) {
        self.particles.clear();
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return;
        }

        let spacing = self.tunables.spacing;
        let cols = (self.size.x / spacing).floor() as u32;
        let rows = (self.size.y / spacing).floor() as u32;
        let speed = self.tunables.initial_speed;
        let (min_radius, max_radius) = (self.tunables.min_radius, self.tunables.max_radius);

        self.particles.reserve((cols * rows) as usize);
        for c in 0..cols {
            for r in 0..rows {
                let rest = Vec2::new(c as f32 * spacing + spacing / 2.0, r as f32 * spacing + spacing / 2.0);
                let velocity = Vec2::new(
                    self.rng.random_range(-speed..=speed),
                    self.rng.random_range(-speed..=speed),
                );
                let radius = self.rng.random_range(min_radius..=max_radius);
                self.particles.push(Particle::new(self.next_id, rest, velocity, radius));
                self.next_id += 1;
            }
        }
        debug!(
            "Placed {} dots ({cols}x{rows}) in {}x{}",
            self.particles.len(),
            self.size.x,
            self.size.y
        );
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        if self.torn_down {
            return;
        }
        self.pointer = Pointer {
            position,
            hovering: true,
        };
    }

    pub fn pointer_left(&mut self) {
        if self.torn_down {
            return;
        }
        self.pointer.hovering = false;
    }

    /// Stop for good: no more frames, and handlers stop mutating state.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            info!("Tearing down dot field after {} frames", self.frame_count);
        }
        self.torn_down = true;
    }

    /// Runs one display refresh worth of work. Returns `false` once the field
    /// has been torn down and no further frame should be scheduled.
    pub fn frame(&mut self, surface: &mut impl Surface) -> bool {
        if self.torn_down {
            return false;
        }
        if self.frames_to_show > 0 {
            self.step();
            if self.frames_to_show != u32::MAX {
                self.frames_to_show -= 1;
            }
        }
        self.render(surface);
        true
    }

    /// Advances every dot by one frame: pointer repulsion, spring towards
    /// rest, friction, then explicit Euler integration.
    pub fn step(&mut self) {
        let tunables = &self.tunables;
        let pointer = self.pointer;

        self.particles.par_iter_mut().for_each(|p| {
            if pointer.hovering {
                p.velocity += tunables.repulsion(pointer.position, p.position);
            }
            p.velocity += tunables.restoring(p.rest(), p.position);
            p.velocity *= tunables.friction;
            p.position += p.velocity;
        });
        self.frame_count += 1;
    }

    /// Every ordered pair of distinct dots closer than the link radius.
    pub fn links(&self) -> Vec<Link> {
        let particles = &self.particles;
        let tunables = &self.tunables;

        (0..particles.len())
            .into_par_iter()
            .flat_map_iter(move |i| {
                let here = particles[i].position;
                particles.iter().enumerate().filter_map(move |(j, other)| {
                    if i == j {
                        return None;
                    }
                    let alpha = tunables.link_alpha(here.distance(other.position))?;
                    Some(Link { from: i, to: j, alpha })
                })
            })
            .collect()
    }

    pub fn render(&self, surface: &mut impl Surface) {
        surface.clear(self.size);

        for p in &self.particles {
            surface.fill_circle(p.position, p.radius(), self.tunables.dot_color);
        }

        if !self.show_links {
            return;
        }
        for link in self.links() {
            surface.line(
                self.particles[link.from].position,
                self.particles[link.to].position,
                self.tunables.link_color.with_alpha(link.alpha),
                self.tunables.link_width,
            );
        }
    }
}
