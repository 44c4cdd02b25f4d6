//! Turn-rate-limited proportional autopilot

use glam::Vec2;

use super::geometry::{Point2D, relative_bearing};
use super::state::Body;
use crate::consts::AUTOPILOT_GAIN;

/// Heading change (degrees) that steers `body` toward `aim`
///
/// Proportional command on the relative bearing, clamped to ±`max_turn`.
pub fn steer_command(body: &Body, aim: Vec2, max_turn: f32) -> f32 {
    let error = relative_bearing(&body.point(), &Point2D::at(aim));
    (AUTOPILOT_GAIN * error).clamp(-max_turn, max_turn)
}

/// Rotate `body` one step toward `aim`. Returns the applied turn.
pub fn steer(body: &mut Body, aim: Vec2, max_turn: f32) -> f32 {
    let command = steer_command(body, aim, max_turn);
    body.turn(command);
    command
}
