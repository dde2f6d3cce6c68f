//! Collision primitives for axis-aligned play-field geometry
//!
//! Everything here is pure: rectangles, circle-vs-rectangle contact and the
//! velocity reflection used by walls, paddle and blocks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, top-left origin, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap test (touching edges do not overlap)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersects_padded(other, 0.0)
    }

    /// Overlap test where each rectangle is grown by `padding` on its
    /// right and bottom edges, so a gap narrower than `padding` counts
    pub fn intersects_padded(&self, other: &Rect, padding: f32) -> bool {
        self.x < other.right() + padding
            && self.right() + padding > other.x
            && self.y < other.bottom() + padding
            && self.bottom() + padding > other.y
    }

    /// Closest point inside the rectangle to `p`
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.x, self.right()),
            p.y.clamp(self.y, self.bottom()),
        )
    }
}

/// Velocity component to negate on a bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Left/right face: negate vx
    X,
    /// Top/bottom face: negate vy
    Y,
}

/// Contact between a circle and a rectangle
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Overlap of the circle's bounding box with the rectangle, per axis
    pub overlap: Vec2,
}

impl Contact {
    /// Face that was hit: a contact wider than tall came through the top
    /// or bottom, so the vertical component reflects
    pub fn reflection_axis(&self) -> Axis {
        if self.overlap.x > self.overlap.y {
            Axis::Y
        } else {
            Axis::X
        }
    }
}

/// Circle-vs-rectangle contact
///
/// Clamps the center onto the rectangle to find the closest point and
/// compares its distance against the radius.
pub fn circle_rect_contact(center: Vec2, radius: f32, rect: &Rect) -> Option<Contact> {
    let closest = rect.clamp_point(center);
    if center.distance(closest) >= radius {
        return None;
    }

    let overlap_x = (center.x + radius - rect.x).min(rect.right() - (center.x - radius));
    let overlap_y = (center.y + radius - rect.y).min(rect.bottom() - (center.y - radius));
    Some(Contact {
        overlap: Vec2::new(overlap_x, overlap_y),
    })
}

/// Boolean form of [`circle_rect_contact`]
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    circle_rect_contact(center, radius, rect).is_some()
}

/// Negate one velocity component
#[inline]
pub fn reflect(vel: Vec2, axis: Axis) -> Vec2 {
    match axis {
        Axis::X => Vec2::new(-vel.x, vel.y),
        Axis::Y => Vec2::new(vel.x, -vel.y),
    }
}

/// Rotate a velocity by `angle` radians (magnitude preserved)
#[inline]
pub fn rotate(vel: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(vel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 40.0, 20.0);
        assert_eq!(r.right(), 50.0);
        assert_eq!(r.bottom(), 40.0);
        assert_eq!(r.clamp_point(Vec2::new(0.0, 30.0)), Vec2::new(10.0, 30.0));
        assert_eq!(r.clamp_point(Vec2::new(60.0, 50.0)), Vec2::new(50.0, 40.0));
    }

    #[test]
    fn test_padded_intersection() {
        let a = Rect::new(0.0, 0.0, 40.0, 20.0);
        // 5px gap to the right
        let b = Rect::new(45.0, 0.0, 40.0, 20.0);
        assert!(!a.intersects(&b));
        assert!(!a.intersects_padded(&b, 5.0));
        assert!(a.intersects_padded(&b, 6.0));
        // Touching edges are not an overlap
        let c = Rect::new(40.0, 0.0, 40.0, 20.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_circle_rect_top_face() {
        let rect = Rect::new(100.0, 100.0, 40.0, 20.0);
        // Ball just above the middle of the top face
        let contact = circle_rect_contact(Vec2::new(120.0, 95.0), 8.0, &rect).unwrap();
        assert_eq!(contact.overlap, Vec2::new(28.0, 3.0));
        assert_eq!(contact.reflection_axis(), Axis::Y);
    }

    #[test]
    fn test_circle_rect_side_face() {
        let rect = Rect::new(100.0, 100.0, 40.0, 20.0);
        let contact = circle_rect_contact(Vec2::new(95.0, 110.0), 8.0, &rect).unwrap();
        assert_eq!(contact.overlap, Vec2::new(3.0, 18.0));
        assert_eq!(contact.reflection_axis(), Axis::X);
    }

    #[test]
    fn test_circle_rect_corner_miss() {
        let rect = Rect::new(100.0, 100.0, 40.0, 20.0);
        // Bounding boxes overlap but the corner is outside the radius
        assert!(!circle_rect_overlap(Vec2::new(94.0, 94.0), 8.0, &rect));
        assert!(circle_rect_overlap(Vec2::new(96.0, 96.0), 8.0, &rect));
    }

    #[test]
    fn test_center_inside_rect() {
        let rect = Rect::new(0.0, 0.0, 40.0, 20.0);
        assert!(circle_rect_overlap(Vec2::new(20.0, 10.0), 8.0, &rect));
    }

    #[test]
    fn test_reflect() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(reflect(v, Axis::X), Vec2::new(-3.0, 4.0));
        assert_eq!(reflect(v, Axis::Y), Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn reflect_preserves_speed(vx in -20.0f32..20.0, vy in -20.0f32..20.0, horizontal in any::<bool>()) {
            let v = Vec2::new(vx, vy);
            let axis = if horizontal { Axis::X } else { Axis::Y };
            prop_assert!((reflect(v, axis).length() - v.length()).abs() < 1e-4);
        }

        #[test]
        fn rotate_preserves_speed(vx in -20.0f32..20.0, vy in -20.0f32..20.0, angle in -7.0f32..7.0) {
            let v = Vec2::new(vx, vy);
            prop_assert!((rotate(v, angle).length() - v.length()).abs() < 1e-3);
        }
    }
}
