//! Enemy guidance: picks the aim point an enemy's autopilot steers toward
//!
//! Modes:
//! - Patrol: no maneuver, aim point left alone
//! - Random: wanders to a fresh random aim point every few ticks
//! - Pursuit: aims straight at the target
//! - ProNav: aims at the intercept point ahead of the target
//! - Mirror: aims at the target's reflection through the arena center
//! - Scatter: aims directly away from the target

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Point2D, distance, relative_bearing};
use super::state::{ArenaContext, Body};
use crate::consts::RANDOM_RESAMPLE_TICKS;
use crate::heading_vector;

/// Guidance law, with the integer codes used in options and colour tables
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum GuidanceMode {
    #[default]
    Patrol,
    Random,
    Pursuit,
    ProNav,
    Mirror,
    Scatter,
}

impl GuidanceMode {
    pub const ALL: [GuidanceMode; 6] = [
        GuidanceMode::Patrol,
        GuidanceMode::Random,
        GuidanceMode::Pursuit,
        GuidanceMode::ProNav,
        GuidanceMode::Mirror,
        GuidanceMode::Scatter,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Codes wrap modulo the number of modes
    pub fn from_code(code: u32) -> Self {
        Self::ALL[code as usize % Self::ALL.len()]
    }

    /// Patrol holds course; every other mode runs the autopilot
    pub fn maneuvers(self) -> bool {
        self != GuidanceMode::Patrol
    }
}

/// Per-enemy guidance state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guidance {
    pub mode: GuidanceMode,
    /// Current aim point, recomputed every tick
    pub aim: Vec2,
    random_steps: u32,
}

impl Guidance {
    pub fn new(mode: GuidanceMode, aim: Vec2) -> Self {
        Self {
            mode,
            aim,
            random_steps: 0,
        }
    }

    /// Switch modes; Random starts a fresh wander cycle
    pub fn set_mode(&mut self, mode: GuidanceMode) {
        self.mode = mode;
        self.random_steps = 0;
    }

    /// Recompute and store the aim point for `own` chasing `target`
    ///
    /// The result is clamped into the arena shrunk by the enemy's size.
    pub fn update(
        &mut self,
        ctx: &ArenaContext,
        own: &Body,
        target: &Body,
        rng: &mut impl Rng,
    ) -> Vec2 {
        let aim = match self.mode {
            GuidanceMode::Patrol => self.aim,
            GuidanceMode::Random => {
                let resample = self.random_steps == 0;
                self.random_steps = (self.random_steps + 1) % RANDOM_RESAMPLE_TICKS;
                if resample {
                    ctx.bounds.random_point(rng, own.size)
                } else {
                    self.aim
                }
            }
            GuidanceMode::Pursuit => target.pos,
            GuidanceMode::ProNav => intercept_point(own, target),
            GuidanceMode::Mirror => -target.pos,
            GuidanceMode::Scatter => 2.0 * own.pos - target.pos,
        };
        self.aim = ctx.bounds.clamp(aim, own.size);
        self.aim
    }
}

/// Intercept point along the target's heading ray
///
/// Law of cosines on the triangle target / enemy / intercept, where the enemy
/// covers `d / N` while the target covers `d`:
/// `(1/N² - 1)·d² + 2a·cos(C)·d - a² = 0`.
/// A stationary target is aimed at directly.
pub fn intercept_point(own: &Body, target: &Body) -> Vec2 {
    let target_pt = target.point();
    let range = distance(&own.point(), &target_pt);
    let ratio = target.speed / own.speed.max(1.0);
    let off_axis = relative_bearing(&target_pt, &Point2D::at(own.pos));

    let mut d = intercept_distance(range, off_axis, ratio);
    if target.speed < 0.0 {
        d = -d;
    }
    target.pos + heading_vector(target.heading) * d
}

/// Distance the target travels before interception
///
/// `range`: enemy-target distance, `off_axis_deg`: angle between the target's
/// heading and its bearing to the enemy, `speed_ratio`: target / enemy speed.
pub fn intercept_distance(range: f32, off_axis_deg: f32, speed_ratio: f32) -> f32 {
    if speed_ratio == 0.0 {
        return 0.0;
    }
    let c0 = -(range * range);
    let c1 = 2.0 * range * off_axis_deg.to_radians().cos();
    let c2 = 1.0 / (speed_ratio * speed_ratio) - 1.0;

    if c2.abs() < 1e-6 {
        // Equal speeds: linear
        if c1.abs() < f32::EPSILON {
            return 0.0;
        }
        return -c0 / c1;
    }

    let disc = (c1 * c1 - 4.0 * c2 * c0).max(0.0).sqrt();
    let b1 = (-c1 + disc) / (2.0 * c2);
    let b2 = (-c1 - disc) / (2.0 * c2);
    b1.min(b2).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ArenaOptions;
    use crate::sim::state::Bounds;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(options: &ArenaOptions) -> ArenaContext<'_> {
        ArenaContext {
            bounds: Bounds::new(800.0, 450.0),
            options,
            now: 0.0,
        }
    }

    fn body(x: f32, y: f32, heading: f32, speed: f32) -> Body {
        Body::new(Point2D::new(x, y, heading), speed, 10.0)
    }

    #[test]
    fn test_pronav_stationary_target() {
        let options = ArenaOptions::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let own = body(0.0, 0.0, 0.0, 4.0);
        let target = body(100.0, 0.0, 180.0, 0.0);

        let mut g = Guidance::new(GuidanceMode::ProNav, Vec2::ZERO);
        let aim = g.update(&ctx(&options), &own, &target, &mut rng);
        assert!((aim - Vec2::new(100.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_pronav_leads_moving_target() {
        let own = body(0.0, 0.0, 90.0, 4.0);
        // Target crossing left-to-right above the enemy
        let target = body(-100.0, 100.0, 0.0, 4.0);
        let aim = intercept_point(&own, &target);
        assert!(aim.x > -100.0);
        assert!((aim.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_intercept_distance_equal_speeds() {
        // N = 1, C = 0: d = a / 2
        let d = intercept_distance(100.0, 0.0, 1.0);
        assert!((d - 50.0).abs() < 1e-3);
        // Near-perpendicular geometry stays finite
        assert!(intercept_distance(100.0, 90.0, 1.0).is_finite());
    }

    #[test]
    fn test_intercept_distance_faster_target_never_negative() {
        for off in [-90.0, -45.0, 0.0, 45.0, 90.0] {
            let d = intercept_distance(200.0, off, 3.0);
            assert!(d >= 0.0 && d.is_finite());
        }
    }

    #[test]
    fn test_pursuit_mirror_scatter() {
        let options = ArenaOptions::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let own = body(10.0, 20.0, 0.0, 4.0);
        let target = body(50.0, -30.0, 0.0, 4.0);
        let c = ctx(&options);

        let mut g = Guidance::new(GuidanceMode::Pursuit, Vec2::ZERO);
        assert_eq!(g.update(&c, &own, &target, &mut rng), Vec2::new(50.0, -30.0));

        g.set_mode(GuidanceMode::Mirror);
        assert_eq!(g.update(&c, &own, &target, &mut rng), Vec2::new(-50.0, 30.0));

        g.set_mode(GuidanceMode::Scatter);
        assert_eq!(g.update(&c, &own, &target, &mut rng), Vec2::new(-30.0, 70.0));
    }

    #[test]
    fn test_aim_clamped_to_bounds() {
        let options = ArenaOptions::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let own = body(700.0, 0.0, 0.0, 4.0);
        let target = body(-200.0, 0.0, 0.0, 0.0);

        let mut g = Guidance::new(GuidanceMode::Scatter, Vec2::ZERO);
        let aim = g.update(&ctx(&options), &own, &target, &mut rng);
        assert_eq!(aim, Vec2::new(790.0, 0.0));
    }

    #[test]
    fn test_patrol_keeps_aim() {
        let options = ArenaOptions::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let own = body(0.0, 0.0, 0.0, 4.0);
        let target = body(300.0, 300.0, 0.0, 4.0);

        let mut g = Guidance::new(GuidanceMode::Patrol, Vec2::new(5.0, 6.0));
        assert_eq!(g.update(&ctx(&options), &own, &target, &mut rng), Vec2::new(5.0, 6.0));
        assert!(!g.mode.maneuvers());
    }

    #[test]
    fn test_random_holds_between_resamples() {
        let options = ArenaOptions::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let own = body(0.0, 0.0, 0.0, 4.0);
        let target = body(0.0, 0.0, 0.0, 4.0);
        let c = ctx(&options);

        let mut g = Guidance::new(GuidanceMode::Random, Vec2::ZERO);
        let first = g.update(&c, &own, &target, &mut rng);
        for _ in 1..RANDOM_RESAMPLE_TICKS {
            assert_eq!(g.update(&c, &own, &target, &mut rng), first);
        }
        let next = g.update(&c, &own, &target, &mut rng);
        assert!(next.x.abs() <= 790.0 && next.y.abs() <= 440.0);
    }

    #[test]
    fn test_mode_codes_wrap() {
        assert_eq!(GuidanceMode::from_code(3), GuidanceMode::ProNav);
        assert_eq!(GuidanceMode::from_code(7), GuidanceMode::Random);
        assert_eq!(GuidanceMode::Scatter.code(), 5);
    }
}
