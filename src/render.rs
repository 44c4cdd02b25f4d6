//! Renderable records for an external drawing backend
//!
//! The simulation never draws. It hands out one [`Renderable`] per live
//! actor, projectile, wall and (optionally) aim point; a GPU backend can pack
//! them into [`InstanceData`] and upload the bytes as an instance buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{BounceMode, GuidanceMode};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Triangle,
    Square,
    Circle,
    /// Line from `position` along `heading`
    Segment { length: f32 },
    /// Aim point marker
    Dot,
}

impl Shape {
    pub fn code(&self) -> u32 {
        match self {
            Shape::Triangle => 0,
            Shape::Square => 1,
            Shape::Circle => 2,
            Shape::Segment { .. } => 3,
            Shape::Dot => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub position: Vec2,
    /// Degrees
    pub heading: f32,
    pub shape: Shape,
    /// Collision radius (segment length for walls)
    pub size: f32,
    pub color: [f32; 4],
}

impl Renderable {
    pub fn to_instance(&self) -> InstanceData {
        let scale = match self.shape {
            Shape::Segment { length } => length,
            _ => self.size,
        };
        InstanceData {
            position: self.position.to_array(),
            heading: self.heading,
            scale,
            color: self.color,
            shape: self.shape.code(),
        }
    }
}

/// Per-instance GPU record
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceData {
    pub position: [f32; 2],
    pub heading: f32,
    pub scale: f32,
    pub color: [f32; 4],
    pub shape: u32,
}

/// Pack renderables into instance records
pub fn instances(renderables: &[Renderable]) -> Vec<InstanceData> {
    renderables.iter().map(Renderable::to_instance).collect()
}

/// Raw bytes of an instance slice, ready for a buffer upload
pub fn instance_bytes(instances: &[InstanceData]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

/// Colors for game elements
pub mod colors {
    use super::*;

    pub const PLAYER: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const PRIZE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BULLET: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const BOUNCE_SHOT: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    pub const BOMB: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const AIM_POINT: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    /// Flash-off frames
    pub const BLANK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    pub fn enemy(mode: GuidanceMode) -> [f32; 4] {
        match mode {
            GuidanceMode::Patrol => [0.0, 0.5, 0.0, 1.0],
            GuidanceMode::Random => [0.56, 0.93, 0.56, 1.0],
            GuidanceMode::Pursuit => [1.0, 0.27, 0.0, 1.0],
            GuidanceMode::ProNav => [1.0, 0.0, 0.0, 1.0],
            GuidanceMode::Mirror => [0.65, 0.16, 0.16, 1.0],
            GuidanceMode::Scatter => [0.0, 0.0, 1.0, 1.0],
        }
    }

    pub fn wall(mode: BounceMode) -> [f32; 4] {
        match mode {
            BounceMode::Standard => [1.0, 1.0, 1.0, 1.0],
            BounceMode::Slow => [0.5, 0.5, 0.5, 1.0],
            BounceMode::SemiRandom => [1.0, 0.75, 0.8, 1.0],
            BounceMode::ActorsPass => [0.0, 1.0, 1.0, 1.0],
            BounceMode::BulletsPass => [1.0, 1.0, 0.0, 1.0],
            BounceMode::Warp => [0.0, 0.0, 1.0, 1.0],
            BounceMode::Lethal => [1.0, 0.0, 0.0, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<InstanceData>(), 36);
    }

    #[test]
    fn test_segment_scale_is_length() {
        let wall = Renderable {
            position: Vec2::ZERO,
            heading: 90.0,
            shape: Shape::Segment { length: 250.0 },
            size: 0.0,
            color: colors::wall(BounceMode::Lethal),
        };
        let inst = wall.to_instance();
        assert_eq!(inst.scale, 250.0);
        assert_eq!(inst.shape, 3);
    }

    #[test]
    fn test_instance_bytes() {
        let r = Renderable {
            position: Vec2::new(1.0, 2.0),
            heading: 0.0,
            shape: Shape::Circle,
            size: 10.0,
            color: colors::PRIZE,
        };
        let packed = instances(&[r, r]);
        assert_eq!(instance_bytes(&packed).len(), 72);
    }
}
