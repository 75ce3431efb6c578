//! Smooth-follow 2D camera
//!
//! Purely presentational: the camera trails the player and produces a
//! world-to-screen transform for the renderer. It never feeds back into
//! gameplay.

use platformer_math::{Rect, Vec2};

/// Translation from world space to screen space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    /// Added to world coordinates to get screen coordinates
    pub offset: Vec2,
    pub viewport: Vec2,
}

impl CameraTransform {
    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        point + self.offset
    }

    pub fn screen_to_world(&self, point: Vec2) -> Vec2 {
        point - self.offset
    }

    /// World-space rectangle currently on screen
    pub fn visible_area(&self) -> Rect {
        Rect::from_origin_size(self.screen_to_world(Vec2::ZERO), self.viewport)
    }
}

/// Camera that follows a target with exponential smoothing
#[derive(Clone, Debug)]
pub struct Camera2D {
    /// World point at the center of the screen
    pub center: Vec2,
    pub viewport: Vec2,
    /// Time for the camera to close half the distance to its target;
    /// zero or less snaps instantly
    pub follow_half_life: f32,
}

impl Camera2D {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            center: viewport * 0.5,
            viewport,
            follow_half_life: 0.15,
        }
    }

    /// Builder: set follow half-life (lower = tighter follow)
    pub fn with_follow_half_life(mut self, half_life: f32) -> Self {
        self.follow_half_life = half_life;
        self
    }

    pub fn snap_to(&mut self, target: Vec2) {
        self.center = target;
    }

    /// Move toward the target for `dt` seconds
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        if self.follow_half_life <= 0.0 {
            self.center = target;
            return;
        }
        if dt <= 0.0 {
            return;
        }
        // factor = 2^(-dt / half_life): the share of the gap left after dt
        let remaining = 2.0f32.powf(-dt / self.follow_half_life);
        self.center = target.lerp(self.center, remaining);
    }

    pub fn transform(&self) -> CameraTransform {
        CameraTransform {
            offset: self.viewport * 0.5 - self.center,
            viewport: self.viewport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_camera_is_identity() {
        let camera = Camera2D::new(Vec2::new(1400.0, 900.0));
        let transform = camera.transform();
        assert_eq!(transform.world_to_screen(Vec2::new(10.0, 20.0)), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_target_maps_to_screen_center() {
        let mut camera = Camera2D::new(Vec2::new(1400.0, 900.0));
        camera.snap_to(Vec2::new(175.0, 700.0));
        let transform = camera.transform();
        assert_eq!(transform.world_to_screen(Vec2::new(175.0, 700.0)), Vec2::new(700.0, 450.0));
        assert_eq!(transform.screen_to_world(Vec2::new(700.0, 450.0)), Vec2::new(175.0, 700.0));
        assert_eq!(transform.visible_area().min, Vec2::new(-525.0, 250.0));
    }

    #[test]
    fn test_follow_closes_half_the_gap_per_half_life() {
        let mut camera = Camera2D::new(Vec2::new(100.0, 100.0)).with_follow_half_life(0.5);
        camera.snap_to(Vec2::ZERO);
        camera.follow(Vec2::new(100.0, 0.0), 0.5);
        assert!((camera.center.x - 50.0).abs() < 0.001);
        camera.follow(Vec2::new(100.0, 0.0), 0.5);
        assert!((camera.center.x - 75.0).abs() < 0.001);
    }

    #[test]
    fn test_zero_half_life_snaps() {
        let mut camera = Camera2D::new(Vec2::new(100.0, 100.0)).with_follow_half_life(0.0);
        camera.follow(Vec2::new(-30.0, 12.0), 1.0 / 60.0);
        assert_eq!(camera.center, Vec2::new(-30.0, 12.0));
    }
}
