//! Camera module for pan/zoom transforms.
//!
//! The camera looks straight down at the board plane from `distance` units
//! away. Screen points map to the plane linearly: the visible half height is
//! `tan(fov_y / 2) * distance`, the half width follows from the aspect ratio.

use crate::config::EngineConfig;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Size of the drawing surface in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Width over height. Degenerate viewports report 1.
    pub fn aspect(&self) -> f64 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Half extents of the board in world units, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardBounds {
    pub half_width: f64,
    pub half_height: f64,
}

impl Default for BoardBounds {
    fn default() -> Self {
        Self::new(14.0, 8.0)
    }
}

impl BoardBounds {
    pub fn new(half_width: f64, half_height: f64) -> Self {
        Self {
            half_width: half_width.abs(),
            half_height: half_height.abs(),
        }
    }

    /// Clamp a point onto the board.
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(-self.half_width, self.half_width),
            point.y.clamp(-self.half_height, self.half_height),
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x.abs() <= self.half_width && point.y.abs() <= self.half_height
    }
}

/// Camera over the board plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    /// Distance from the board plane. Larger is further out.
    pub distance: f64,
    /// Vertical field of view in radians.
    pub fov_y: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub initial_distance: f64,
    pub bounds: BoardBounds,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let min_distance = config.min_distance.min(config.max_distance);
        let max_distance = config.max_distance.max(config.min_distance);
        let initial_distance = config.initial_distance.clamp(min_distance, max_distance);
        Self {
            x: 0.0,
            y: 0.0,
            distance: initial_distance,
            fov_y: config.fov_y_degrees.to_radians(),
            min_distance,
            max_distance,
            initial_distance,
            bounds: config.bounds(),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Visible half extents on the board plane for `viewport`.
    pub fn half_extent(&self, viewport: Viewport) -> Vec2 {
        let half_height = (self.fov_y / 2.0).tan() * self.distance;
        Vec2::new(half_height * viewport.aspect(), half_height)
    }

    /// Convert a screen point (pixels, y down) to a board point (y up).
    pub fn screen_to_world(&self, screen: Point, viewport: Viewport) -> Point {
        let ndc = to_ndc(screen, viewport);
        let half = self.half_extent(viewport);
        Point::new(self.x + ndc.x * half.x, self.y + ndc.y * half.y)
    }

    /// Convert a board point to screen pixels.
    pub fn world_to_screen(&self, world: Point, viewport: Viewport) -> Point {
        let half = self.half_extent(viewport);
        let ndc = Vec2::new((world.x - self.x) / half.x, (world.y - self.y) / half.y);
        Point::new(
            (ndc.x + 1.0) / 2.0 * viewport.width,
            (1.0 - ndc.y) / 2.0 * viewport.height,
        )
    }

    /// Convert a pixel delta to a world delta at the current zoom.
    pub fn pixels_to_world(&self, delta: Vec2, viewport: Viewport) -> Vec2 {
        let half = self.half_extent(viewport);
        let width = viewport.width.max(1.0);
        let height = viewport.height.max(1.0);
        Vec2::new(delta.x * 2.0 / width * half.x, -delta.y * 2.0 / height * half.y)
    }

    /// How far from the board center the camera may sit at the current zoom.
    ///
    /// Full board half extent when fully zoomed in, zero when fully zoomed out.
    pub fn pan_range(&self) -> Vec2 {
        let span = self.max_distance - self.min_distance;
        let t = if span > 0.0 {
            ((self.max_distance - self.distance) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Vec2::new(self.bounds.half_width * t, self.bounds.half_height * t)
    }

    /// Pull the camera center back into the pan range.
    pub fn clamp_pan(&mut self) {
        let range = self.pan_range();
        self.x = self.x.clamp(-range.x, range.x);
        self.y = self.y.clamp(-range.y, range.y);
    }

    /// Pan by a pointer movement in pixels. The board follows the pointer.
    pub fn pan(&mut self, pixel_delta: Vec2, viewport: Viewport) {
        let world = self.pixels_to_world(pixel_delta, viewport);
        self.x -= world.x;
        self.y -= world.y;
        self.clamp_pan();
    }

    /// Zoom by a wheel delta, keeping the board point under `screen` fixed.
    ///
    /// Returns false if the distance did not change.
    pub fn zoom_at(&mut self, screen: Point, delta: f64, factor: f64, viewport: Viewport) -> bool {
        let new_distance =
            (self.distance * (1.0 + delta * factor)).clamp(self.min_distance, self.max_distance);
        if (new_distance - self.distance).abs() < f64::EPSILON {
            return false;
        }

        let before = self.screen_to_world(screen, viewport);
        self.distance = new_distance;
        let after = self.screen_to_world(screen, viewport);
        self.x += before.x - after.x;
        self.y += before.y - after.y;
        self.clamp_pan();
        true
    }

    /// Reset camera to the board center at the initial distance.
    pub fn reset(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.distance = self.initial_distance;
    }
}

fn to_ndc(screen: Point, viewport: Viewport) -> Vec2 {
    let width = viewport.width.max(1.0);
    let height = viewport.height.max(1.0);
    Vec2::new(screen.x / width * 2.0 - 1.0, -(screen.y / height * 2.0 - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 500.0)
    }

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.center(), Point::ZERO);
        assert!((camera.distance - 10.0).abs() < EPS);
        assert!((camera.fov_y - 50f64.to_radians()).abs() < EPS);
    }

    #[test]
    fn test_screen_center_is_camera_center() {
        let mut camera = Camera::new();
        camera.x = 1.5;
        camera.y = -2.0;
        let world = camera.screen_to_world(Point::new(500.0, 250.0), viewport());
        assert!((world.x - 1.5).abs() < EPS);
        assert!((world.y + 2.0).abs() < EPS);
    }

    #[test]
    fn test_screen_edges_match_half_extent() {
        let camera = Camera::new();
        let half = camera.half_extent(viewport());
        let top_left = camera.screen_to_world(Point::ZERO, viewport());
        assert!((top_left.x + half.x).abs() < EPS);
        assert!((top_left.y - half.y).abs() < EPS);
        assert!((half.x - 2.0 * half.y).abs() < EPS);
    }

    #[test]
    fn test_world_to_screen_inverts() {
        let mut camera = Camera::new();
        camera.distance = 7.0;
        camera.x = 0.3;
        let screen = Point::new(123.0, 456.0);
        let world = camera.screen_to_world(screen, viewport());
        let back = camera.world_to_screen(world, viewport());
        assert!((back.x - screen.x).abs() < 1e-6);
        assert!((back.y - screen.y).abs() < 1e-6);
    }

    #[test]
    fn test_pan_range_shrinks_with_distance() {
        let mut camera = Camera::new();
        camera.distance = camera.min_distance;
        assert!((camera.pan_range().x - 14.0).abs() < EPS);
        camera.distance = camera.max_distance;
        assert_eq!(camera.pan_range(), Vec2::ZERO);
        camera.distance = 11.0;
        assert!((camera.pan_range().y - 4.0).abs() < EPS);
    }

    #[test]
    fn test_pan_follows_pointer_and_clamps() {
        let mut camera = Camera::new();
        camera.distance = camera.min_distance;
        // drag the board to the left, camera moves right
        camera.pan(Vec2::new(-100.0, 0.0), viewport());
        assert!(camera.x > 0.0);

        camera.pan(Vec2::new(-1.0e6, 1.0e6), viewport());
        assert!((camera.x - 14.0).abs() < EPS);
        assert!((camera.y - 8.0).abs() < EPS);
    }

    #[test]
    fn test_zoomed_out_camera_is_centered() {
        let mut camera = Camera::new();
        camera.x = 3.0;
        camera.y = 2.0;
        assert!(camera.zoom_at(Point::new(10.0, 10.0), 1.0e6, 0.001, viewport()));
        assert!((camera.distance - camera.max_distance).abs() < EPS);
        assert_eq!(camera.center(), Point::ZERO);
    }

    #[test]
    fn test_zoom_keeps_cursor_point_fixed() {
        let mut camera = Camera::new();
        camera.distance = camera.min_distance + 1.0;
        let cursor = Point::new(600.0, 300.0);
        let before = camera.screen_to_world(cursor, viewport());
        assert!(camera.zoom_at(cursor, -100.0, 0.001, viewport()));
        let after = camera.screen_to_world(cursor, viewport());
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamps_and_reports_noop() {
        let mut camera = Camera::new();
        camera.distance = camera.min_distance;
        assert!(!camera.zoom_at(Point::ZERO, -500.0, 0.001, viewport()));
        assert!((camera.distance - camera.min_distance).abs() < EPS);
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = BoardBounds::default();
        assert_eq!(bounds.clamp(Point::new(100.0, -100.0)), Point::new(14.0, -8.0));
        assert!(bounds.contains(Point::new(-14.0, 8.0)));
    }
}
