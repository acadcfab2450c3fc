//! Contact categories and classification
//!
//! Bodies carry bit-mask categories; the physics layer reports touching pairs
//! and `classify` turns a raw pair into a game-level contact kind without any
//! simulation running.

use glam::Vec2;

/// Category bit mask for the ball body
pub const BALL_CATEGORY: u32 = 0x1 << 0;
/// Category bit mask for pad bodies
pub const PAD_CATEGORY: u32 = 0x2 << 2;
/// Category bit mask for hazard bodies
pub const HAZARD_CATEGORY: u32 = 0x3 << 3;

/// Game-level meaning of a reported contact pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Ball touched a pad surface: the ball stops
    BallPad,
    /// Ball touched a hazard body: the fire sequence starts
    BallHazard,
    /// Any other combination; dropped without error
    Ignored,
}

/// A raw contact event between two tagged bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub category_a: u32,
    pub category_b: u32,
}

impl Contact {
    pub fn new(category_a: u32, category_b: u32) -> Self {
        Self {
            category_a,
            category_b,
        }
    }

    pub fn kind(&self) -> ContactKind {
        classify(self.category_a, self.category_b)
    }
}

/// Classify a contact pair by the OR of the two categories.
///
/// Unknown combinations are `Ignored`; the physics layer may report pairs
/// the game has no interest in (pad-vs-hazard of a sibling body, say).
pub fn classify(category_a: u32, category_b: u32) -> ContactKind {
    let mask = category_a | category_b;
    if mask == (BALL_CATEGORY | PAD_CATEGORY) {
        ContactKind::BallPad
    } else if mask == (BALL_CATEGORY | HAZARD_CATEGORY) {
        ContactKind::BallHazard
    } else {
        ContactKind::Ignored
    }
}

/// Axis-aligned body rectangle (min corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyRect {
    pub min: Vec2,
    pub size: Vec2,
}

impl BodyRect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }
}

/// Check overlap between the ball circle and a body rectangle.
///
/// Closest-point test: clamp the circle center into the rect and compare the
/// distance to the radius.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &BodyRect) -> bool {
    let max = rect.max();
    let closest = Vec2::new(
        center.x.clamp(rect.min.x, max.x),
        center.y.clamp(rect.min.y, max.y),
    );
    (center - closest).length_squared() <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_ball_pad() {
        assert_eq!(classify(BALL_CATEGORY, PAD_CATEGORY), ContactKind::BallPad);
        // Order must not matter
        assert_eq!(classify(PAD_CATEGORY, BALL_CATEGORY), ContactKind::BallPad);
    }

    #[test]
    fn test_classify_ball_hazard() {
        assert_eq!(
            classify(BALL_CATEGORY, HAZARD_CATEGORY),
            ContactKind::BallHazard
        );
        assert_eq!(
            classify(HAZARD_CATEGORY, BALL_CATEGORY),
            ContactKind::BallHazard
        );
    }

    #[test]
    fn test_classify_unknown_pairs_ignored() {
        assert_eq!(classify(PAD_CATEGORY, HAZARD_CATEGORY), ContactKind::Ignored);
        assert_eq!(classify(BALL_CATEGORY, BALL_CATEGORY), ContactKind::Ignored);
        assert_eq!(classify(0, 0), ContactKind::Ignored);
        assert_eq!(classify(0x40, BALL_CATEGORY), ContactKind::Ignored);
    }

    #[test]
    fn test_circle_rect_overlap() {
        let rect = BodyRect::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 30.0));

        // Center inside
        assert!(circle_rect_overlap(Vec2::new(50.0, 15.0), 25.0, &rect));
        // Touching from above
        assert!(circle_rect_overlap(Vec2::new(50.0, 54.0), 25.0, &rect));
        // Clear miss
        assert!(!circle_rect_overlap(Vec2::new(50.0, 56.0), 25.0, &rect));
        // Corner case: diagonal distance matters, not the bounding box
        assert!(!circle_rect_overlap(Vec2::new(120.0, 50.0), 25.0, &rect));
    }
}
