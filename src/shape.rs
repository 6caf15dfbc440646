use std::f32::consts::TAU;

use glam::{vec2, Affine2, Vec2};
use itertools::Itertools;

/// Read view over anything that has a local space outline, such as a collider.
pub trait ShapeOutline {
    /// One point loop per disjoint part of the shape, in local space.
    ///
    /// Loops are implicitly closed and may be wound either way.
    fn local_loops(&self) -> Vec<Vec<Vec2>>;
}

/// Read view over anything that places a shape in the world.
pub trait WorldTransform {
    fn world_affine(&self) -> Affine2;
}

impl WorldTransform for Affine2 {
    fn world_affine(&self) -> Affine2 {
        *self
    }
}

/// Position, rotation in radians and per-axis scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub translation: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
    };

    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl WorldTransform for Transform2D {
    fn world_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// Arbitrary simple outline
    Polygon(Vec<Vec2>),
    /// Axis aligned box centered on the origin
    Rect { half_extents: Vec2 },
    /// Circle approximated by `segments` evenly spaced points
    Circle { radius: f32, segments: u32 },
    /// Several disjoint parts
    Composite(Vec<CollisionShape>),
}

impl CollisionShape {
    pub fn rect(width: f32, height: f32) -> Self {
        Self::Rect {
            half_extents: vec2(width, height) * 0.5,
        }
    }

    pub fn circle(radius: f32, segments: u32) -> Self {
        Self::Circle { radius, segments }
    }
}

impl ShapeOutline for CollisionShape {
    fn local_loops(&self) -> Vec<Vec<Vec2>> {
        match self {
            CollisionShape::Polygon(points) => vec![points.clone()],
            CollisionShape::Rect { half_extents: h } => vec![vec![
                vec2(-h.x, -h.y),
                vec2(h.x, -h.y),
                vec2(h.x, h.y),
                vec2(-h.x, h.y),
            ]],
            &CollisionShape::Circle { radius, segments } => vec![(0..segments)
                .map(|i| {
                    let theta = i as f32 * TAU / segments as f32;
                    vec2(theta.cos(), theta.sin()) * radius
                })
                .collect_vec()],
            CollisionShape::Composite(parts) => {
                parts.iter().flat_map(|v| v.local_loops()).collect_vec()
            }
        }
    }
}
