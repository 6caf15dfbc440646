use glam::Vec2;

use crate::util::perpendicular;

/// An oriented segment from `a` to `b` with a cached unit normal.
///
/// The normal is the direction `b - a` rotated clockwise by a quarter turn, so for a
/// counter-clockwise loop every border faces out of the enclosed area. When both endpoints
/// coincide the normal is [`Vec2::ZERO`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    a: Vec2,
    b: Vec2,
    normal: Vec2,
}

impl Border {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            a,
            b,
            normal: perpendicular(b - a),
        }
    }

    pub fn a(&self) -> Vec2 {
        self.a
    }

    pub fn b(&self) -> Vec2 {
        self.b
    }

    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    pub fn set_a(&mut self, a: Vec2) {
        self.a = a;
        self.normal = perpendicular(self.b - self.a);
    }

    pub fn set_b(&mut self, b: Vec2) {
        self.b = b;
        self.normal = perpendicular(self.b - self.a);
    }

    pub fn direction(&self) -> Vec2 {
        self.b - self.a
    }

    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }

    /// The same segment walked the other way
    pub fn flipped(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
            normal: -self.normal,
        }
    }

    /// Distance of `point` from the supporting line, positive on the side the normal faces.
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        (point - self.a).dot(self.normal)
    }

    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let dir = self.direction();
        let len_sq = dir.length_squared();
        if len_sq == 0.0 {
            return self.a;
        }

        let t = ((point - self.a).dot(dir) / len_sq).clamp(0.0, 1.0);
        self.a + dir * t
    }

    pub fn distance_to_point(&self, point: Vec2) -> f32 {
        self.closest_point(point).distance(point)
    }
}
