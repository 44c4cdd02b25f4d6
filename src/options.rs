//! Arena construction options
//!
//! Every field has a default, so a JSON file only needs the options it
//! changes.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{BORDER_X, BORDER_Y};
use crate::error::{ConfigError, ConfigResult};
use crate::sim::{BounceMode, GuidanceMode};

/// Upper bound on enemies per arena
pub const MAX_ENEMIES: u32 = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaOptions {
    /// Running out of lives resets the game
    pub player_can_die: bool,
    /// Overrides every wall's bounce mode
    pub all_walls_bounce_mode: Option<BounceMode>,
    /// Guidance modes handed out to enemies (cycled in order)
    pub allowed_guidance_modes: BTreeSet<GuidanceMode>,
    /// Enemies copy the player's absolute speed every tick
    pub all_enemies_speed_match: bool,
    /// Enemies pick a random other actor to chase instead of the player
    pub all_enemies_aim_at_random_target: bool,
    pub enemies_can_move: bool,
    pub enemies_can_fire: bool,
    /// Emit aim point dots with the renderables
    pub show_aim_points: bool,
    pub num_enemies: u32,
    /// Arena half-extents
    pub border_x: f32,
    pub border_y: f32,
    /// RNG seed
    pub seed: u64,
}

impl Default for ArenaOptions {
    fn default() -> Self {
        Self {
            player_can_die: false,
            all_walls_bounce_mode: None,
            allowed_guidance_modes: GuidanceMode::ALL.into_iter().collect(),
            all_enemies_speed_match: false,
            all_enemies_aim_at_random_target: false,
            enemies_can_move: true,
            enemies_can_fire: false,
            show_aim_points: false,
            num_enemies: 6,
            border_x: BORDER_X,
            border_y: BORDER_Y,
            seed: 0,
        }
    }
}

impl ArenaOptions {
    /// Parse and validate options from JSON text
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let options = Self::from_json(&json)?;
        log::info!("Loaded arena options from {}", path.display());
        Ok(options)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.border_x > 0.0 && self.border_x.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "border_x",
                reason: format!("must be positive, got {}", self.border_x),
            });
        }
        if !(self.border_y > 0.0 && self.border_y.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "border_y",
                reason: format!("must be positive, got {}", self.border_y),
            });
        }
        if self.allowed_guidance_modes.is_empty() {
            return Err(ConfigError::Invalid {
                field: "allowed_guidance_modes",
                reason: "at least one mode is required".to_string(),
            });
        }
        if self.num_enemies > MAX_ENEMIES {
            return Err(ConfigError::Invalid {
                field: "num_enemies",
                reason: format!("at most {} allowed, got {}", MAX_ENEMIES, self.num_enemies),
            });
        }
        Ok(())
    }

    /// Guidance mode for the i-th enemy: `i mod 6`, moved forward to the
    /// next allowed mode when filtered out
    pub fn guidance_for_enemy(&self, index: u32) -> GuidanceMode {
        let preferred = GuidanceMode::from_code(index);
        self.allowed_guidance_modes
            .range(preferred..)
            .next()
            .or_else(|| self.allowed_guidance_modes.iter().next())
            .copied()
            .unwrap_or(preferred)
    }
}
