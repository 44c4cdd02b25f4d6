//! Collision predicates
//!
//! Circle-circle overlap for actors, projectiles and the prize, and a
//! line-distance-plus-bounding-box test for walls.

use super::geometry::segment_distance;
use super::state::Body;
use super::wall::{BounceMode, Wall};
use crate::consts::SLOW_WALL_STICK_FACTOR;

/// True iff the centers are closer than the summed sizes
///
/// Sizes may be negative, which shrinks (or disables) contact.
#[inline]
pub fn circles_overlap(a: &Body, b: &Body) -> bool {
    a.pos.distance(b.pos) < a.size + b.size
}

/// Contact radius against a wall: size plus half the per-tick travel
///
/// Slow walls use a larger radius so reflected actors clear them before the
/// next tick instead of sticking and oscillating.
pub fn wall_contact_radius(body: &Body, mode: BounceMode) -> f32 {
    let s = body.size + body.speed.abs() / 2.0;
    match mode {
        BounceMode::Slow => s * SLOW_WALL_STICK_FACTOR,
        _ => s,
    }
}

/// Wall contact test
///
/// The body must be inside the wall's bounding box grown by the contact
/// radius and within that radius of the wall's (infinite) line. Near the
/// ends this reports hits a true segment distance would not.
pub fn hits_wall(body: &Body, wall: &Wall) -> bool {
    let s = wall_contact_radius(body, wall.bounce_mode);
    let min = wall.p1.min(wall.p2);
    let max = wall.p1.max(wall.p2);
    let p = body.pos;

    let in_box = min.x - s < p.x && p.x < max.x + s && min.y - s < p.y && p.y < max.y + s;
    in_box && segment_distance(p, wall.p1, wall.p2) < s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Point2D;
    use glam::Vec2;
    use proptest::prelude::*;

    fn body(x: f32, y: f32, heading: f32, speed: f32, size: f32) -> Body {
        Body::new(Point2D::new(x, y, heading), speed, size)
    }

    #[test]
    fn test_circles_overlap() {
        let a = body(0.0, 0.0, 0.0, 0.0, 10.0);
        let b = body(15.0, 0.0, 0.0, 0.0, 10.0);
        assert!(circles_overlap(&a, &b));

        let c = body(25.0, 0.0, 0.0, 0.0, 5.0);
        assert!(!circles_overlap(&a, &c));
    }

    #[test]
    fn test_negative_size_never_touches() {
        let ghost = body(0.0, 0.0, 0.0, 0.0, -20.0);
        let other = body(1.0, 0.0, 0.0, 0.0, 10.0);
        assert!(!circles_overlap(&ghost, &other));
    }

    #[test]
    fn test_actor_hits_vertical_wall() {
        let wall = Wall::new(Vec2::new(0.0, -5.0), Vec2::new(0.0, 5.0), BounceMode::Standard);
        let actor = body(0.0, 0.0, 0.0, 4.0, 10.0);
        assert!((wall_contact_radius(&actor, wall.bounce_mode) - 12.0).abs() < 1e-6);
        assert!(hits_wall(&actor, &wall));

        let far = body(20.0, 0.0, 0.0, 4.0, 10.0);
        assert!(!hits_wall(&far, &wall));
    }

    #[test]
    fn test_slow_wall_grows_radius() {
        let standard = Wall::new(Vec2::new(0.0, -100.0), Vec2::new(0.0, 100.0), BounceMode::Standard);
        let slow = Wall::new(Vec2::new(0.0, -100.0), Vec2::new(0.0, 100.0), BounceMode::Slow);
        let actor = body(14.0, 0.0, 0.0, 4.0, 10.0);
        assert!(!hits_wall(&actor, &standard));
        assert!(hits_wall(&actor, &slow));
    }

    #[test]
    fn test_endpoint_margin_false_positive() {
        // Collinear with the wall, past its end but inside the grown box
        let wall = Wall::new(Vec2::new(0.0, -5.0), Vec2::new(0.0, 5.0), BounceMode::Standard);
        let actor = body(0.0, 15.0, 0.0, 4.0, 10.0);
        assert!(hits_wall(&actor, &wall));
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, asz in -20.0f32..40.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, bsz in -20.0f32..40.0,
        ) {
            let a = body(ax, ay, 0.0, 0.0, asz);
            let b = body(bx, by, 0.0, 0.0, bsz);
            prop_assert_eq!(circles_overlap(&a, &b), circles_overlap(&b, &a));
        }
    }
}
