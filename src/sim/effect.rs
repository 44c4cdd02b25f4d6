//! Timed status effects
//!
//! One value type for every temporary status (invulnerable, flashing,
//! scattered, can't-fire, prize relocation). Times are simulation seconds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub active: bool,
    pub started_at: f64,
    pub expires_at: f64,
}

impl Default for TimedEffect {
    fn default() -> Self {
        Self::inactive()
    }
}

impl TimedEffect {
    pub const fn inactive() -> Self {
        Self {
            active: false,
            started_at: f64::NEG_INFINITY,
            expires_at: f64::NEG_INFINITY,
        }
    }

    /// Activate (or re-arm) for `duration` seconds from `now`
    pub fn start(&mut self, now: f64, duration: f32) {
        self.active = true;
        self.started_at = now;
        self.expires_at = now + duration as f64;
    }

    /// Active and not yet past its expiry time
    #[inline]
    pub fn is_active(&self, now: f64) -> bool {
        self.active && now <= self.expires_at
    }

    /// Clear the effect if it has run out. Returns true on the tick it expires.
    pub fn expire(&mut self, now: f64) -> bool {
        if self.active && now > self.expires_at {
            *self = Self::inactive();
            true
        } else {
            false
        }
    }

    /// Seconds since activation (0 when inactive)
    pub fn elapsed(&self, now: f64) -> f64 {
        if self.active { now - self.started_at } else { 0.0 }
    }

    pub fn clear(&mut self) {
        *self = Self::inactive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_lifecycle() {
        let mut fx = TimedEffect::inactive();
        assert!(!fx.is_active(0.0));

        fx.start(1.0, 3.0);
        assert!(fx.is_active(1.0));
        assert!(fx.is_active(4.0));
        assert!(!fx.expire(4.0));

        assert!(!fx.is_active(4.5));
        assert!(fx.expire(4.5));
        assert!(!fx.active);
        // Falling edge reported once
        assert!(!fx.expire(5.0));
    }

    #[test]
    fn test_restart_extends() {
        let mut fx = TimedEffect::default();
        fx.start(0.0, 1.0);
        fx.start(0.5, 1.0);
        assert!(fx.is_active(1.2));
        assert!((fx.elapsed(1.0) - 0.5).abs() < 1e-9);
    }
}
