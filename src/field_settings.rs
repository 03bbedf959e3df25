use bevy::log::info;

use crate::field::DotField;
use crate::tunables::MIN_DISTANCE;

impl DotField {
    pub fn reset(&mut self) {
        self.place_particles();
    }

    pub fn frames_to_advance(&self) -> u32 {
        self.frames_to_show
    }

    pub fn set_frames_to_show(&mut self, val: u32) {
        self.frames_to_show = val;
    }

    pub fn toggle_links(&mut self) {
        self.show_links = !self.show_links;
    }

    pub fn adj_interaction_radius(&mut self, increment: f32) {
        self.tunables.interaction_radius = (self.tunables.interaction_radius + increment).max(MIN_DISTANCE);
    }

    /// Changing the spacing lays out a new grid.
    pub fn adj_spacing(&mut self, increment: f32) {
        let spacing = (self.tunables.spacing + increment).max(MIN_DISTANCE);
        if spacing != self.tunables.spacing {
            self.tunables.spacing = spacing;
            self.place_particles();
        }
    }

    pub fn mean_displacement(&self) -> f32 {
        if self.particles.is_empty() {
            return 0.0;
        }
        let total: f32 = self.particles.iter().map(|p| p.position.distance(p.rest())).sum();
        total / self.particles.len() as f32
    }

    pub fn log_stats(&self) {
        info!(
            "frame {}: {} dots in {}x{}, spacing {}, mean displacement {:.3}, hovering {}",
            self.frame_count,
            self.particles.len(),
            self.size.x,
            self.size.y,
            self.tunables.spacing,
            self.mean_displacement(),
            self.pointer.hovering
        );
    }
}
