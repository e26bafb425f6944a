//! Decorative backdrop: drifting particles and floating shapes.
//!
//! Positions are fractions of the viewport; the scroll offset pushes them down
//! with a parallax factor. Nothing here affects visibility tracking.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::render::strip::{CellStyle, Strip, Tone};
use crate::visibility::ScrollOffset;

/// Number of particles on the page.
pub const PARTICLE_COUNT: usize = 50;

const PARTICLE_GLYPHS: [char; 3] = ['·', '∙', '•'];
const SHAPE_GLYPHS: [char; 4] = ['◐', '◓', '◑', '◒'];
/// Twinkle period of one particle.
const TWINKLE_SECS: f64 = 20.0;

/// One particle, placed once at random.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Horizontal position, `[0, 1)` of the viewport width.
    pub left: f64,
    /// Vertical position, `[0, 1)` of the viewport height.
    pub top: f64,
    /// Animation delay in seconds, `[0, 20)`.
    pub delay: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shape {
    left: f64,
    top: f64,
    tone: Tone,
}

const SHAPES: [Shape; 3] = [
    Shape { left: 0.08, top: 0.18, tone: Tone::Accent },
    Shape { left: 0.86, top: 0.55, tone: Tone::AccentAlt },
    Shape { left: 0.22, top: 0.82, tone: Tone::Accent },
];

/// Parallax distance of particle `index` in pixels.
pub fn particle_offset(index: usize, scroll: ScrollOffset) -> f64 {
    scroll.parallax(0.1 * ((index % 3) + 1) as f64)
}

/// Parallax distance of the shape layer in pixels.
pub fn shape_offset(scroll: ScrollOffset) -> f64 {
    scroll.parallax(0.05)
}

/// Rotation of the shape layer in degrees.
pub fn shape_rotation(scroll: ScrollOffset) -> f64 {
    scroll.parallax(0.1)
}

/// The particle field and shapes.
#[derive(Debug, Clone)]
pub struct Backdrop {
    particles: Vec<Particle>,
}

impl Backdrop {
    /// `count` particles placed from `seed`.
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = (0..count)
            .map(|_| Particle {
                left: rng.gen::<f64>(),
                top: rng.gen::<f64>(),
                delay: rng.gen_range(0.0..TWINKLE_SECS),
            })
            .collect();
        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Viewport-space strips for a `width x height` viewport.
    pub fn render(
        &self,
        width: u16,
        height: u16,
        scroll: ScrollOffset,
        cell_height: i32,
        elapsed: Duration,
    ) -> Vec<Strip> {
        if width == 0 || height == 0 {
            return Vec::new();
        }
        let (w, h) = (width as f64, height as f64);
        let cell = cell_height.max(1) as f64;
        let t = elapsed.as_secs_f64();

        let mut strips = Vec::with_capacity(self.particles.len() + SHAPES.len());
        for (i, p) in self.particles.iter().enumerate() {
            let rows = particle_offset(i, scroll) / cell;
            let x = (p.left * w) as i32;
            let y = (p.top * h + rows).rem_euclid(h) as i32;
            let phase = ((t + p.delay) / TWINKLE_SECS).fract();
            let glyph = PARTICLE_GLYPHS[(phase * PARTICLE_GLYPHS.len() as f64) as usize % 3];
            strips.push(Strip::text(y, x, &glyph.to_string(), CellStyle::fg(Tone::Particle)));
        }

        let rows = shape_offset(scroll) / cell;
        let quadrant = (shape_rotation(scroll) / 90.0).rem_euclid(4.0) as usize % 4;
        for shape in SHAPES {
            let x = (shape.left * w) as i32;
            let y = (shape.top * h + rows).rem_euclid(h) as i32;
            let glyph = SHAPE_GLYPHS[quadrant];
            strips.push(Strip::text(y, x, &glyph.to_string(), CellStyle::fg(shape.tone).dimmed()));
        }
        strips
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new(PARTICLE_COUNT, 0x5eed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_field() {
        let a = Backdrop::new(10, 7);
        let b = Backdrop::new(10, 7);
        assert_eq!(a.particles(), b.particles());
        assert_eq!(Backdrop::default().particles().len(), PARTICLE_COUNT);
    }

    #[test]
    fn particles_in_unit_square() {
        for p in Backdrop::default().particles() {
            assert!((0.0..1.0).contains(&p.left));
            assert!((0.0..1.0).contains(&p.top));
            assert!((0.0..TWINKLE_SECS).contains(&p.delay));
        }
    }

    #[test]
    fn parallax_factors() {
        let scroll = ScrollOffset(100);
        assert!((particle_offset(0, scroll) - 10.0).abs() < 1e-9);
        assert!((particle_offset(1, scroll) - 20.0).abs() < 1e-9);
        assert!((particle_offset(5, scroll) - 30.0).abs() < 1e-9);
        assert!((shape_offset(scroll) - 5.0).abs() < 1e-9);
        assert!((shape_rotation(scroll) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn render_stays_inside_viewport() {
        let backdrop = Backdrop::default();
        let strips = backdrop.render(40, 12, ScrollOffset(4000), 16, Duration::from_secs(3));
        assert_eq!(strips.len(), PARTICLE_COUNT + 3);
        for s in &strips {
            assert!((0..12).contains(&s.y), "row {}", s.y);
            assert!((0..40).contains(&s.x_offset));
        }
    }

    #[test]
    fn scrolling_moves_particles() {
        let backdrop = Backdrop::new(1, 1);
        let before = backdrop.render(40, 200, ScrollOffset(0), 16, Duration::ZERO);
        let after = backdrop.render(40, 200, ScrollOffset(160), 16, Duration::ZERO);
        assert_ne!(before[0].y, after[0].y);
    }

    #[test]
    fn empty_viewport_renders_nothing() {
        assert!(Backdrop::default()
            .render(0, 10, ScrollOffset::ZERO, 16, Duration::ZERO)
            .is_empty());
    }
}
