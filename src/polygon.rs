use glam::Vec2;
use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::{
    border::Border,
    error::DegenerateLoop,
    util::{area_tolerance, doubled_signed_area, TOLERANCE},
};

/// Closed loop of world space points describing an obstacle.
///
/// The last point connects back to the first; the closing point is never stored twice.
/// Points are always wound counter-clockwise, so the normal of every border faces out of
/// the obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    /// Validates a loop of points and normalizes it to counter-clockwise winding.
    ///
    /// Consecutive duplicate points are collapsed, including an explicit closing point.
    /// Loops with fewer than three distinct points are rejected, as are loops whose area is
    /// lost in the rounding of their coordinates or does not exceed `min_area`.
    pub fn from_loop(
        points: impl IntoIterator<Item = Vec2>,
        min_area: f32,
    ) -> Result<Self, DegenerateLoop> {
        let mut points = points
            .into_iter()
            .dedup_by(|a, b| a.distance_squared(*b) <= TOLERANCE * TOLERANCE)
            .collect_vec();

        if points.iter().any(|p| !p.is_finite()) {
            return Err(DegenerateLoop::NonFinite);
        }

        while points.len() > 1
            && points[0].distance_squared(points[points.len() - 1]) <= TOLERANCE * TOLERANCE
        {
            points.pop();
        }

        if points.len() < 3 {
            return Err(DegenerateLoop::TooFewPoints(points.len()));
        }

        let area = doubled_signed_area(&points) * 0.5;
        if area.abs() <= area_tolerance(&points) || area.abs() <= min_area {
            return Err(DegenerateLoop::ZeroArea(area.abs()));
        }

        if area < 0.0 {
            points.reverse();
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Vec2> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Every edge of the loop, including the one closing it
    pub fn borders(&self) -> impl Iterator<Item = Border> + '_ {
        self.points
            .iter()
            .circular_tuple_windows()
            .map(|(&a, &b)| Border::new(a, b))
    }

    pub fn signed_area(&self) -> f32 {
        doubled_signed_area(&self.points) * 0.5
    }

    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    /// Average of the vertices
    pub fn centroid(&self) -> Vec2 {
        self.points.iter().copied().sum::<Vec2>() / self.points.len() as f32
    }

    /// Minimum and maximum corner of the axis aligned bounds
    pub fn bounds(&self) -> (Vec2, Vec2) {
        self.points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), &p| (min.min(p), max.max(p)),
        )
    }

    /// Even-odd containment test
    pub fn contains_point(&self, point: Vec2) -> bool {
        let mut inside = false;
        for (&a, &b) in self.points.iter().circular_tuple_windows() {
            if (a.y > point.y) != (b.y > point.y) {
                let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x {
                    inside = !inside;
                }
            }
        }

        inside
    }

    pub fn closest_border(&self, point: Vec2) -> Option<Border> {
        self.borders()
            .min_by_key(|border| OrderedFloat(border.distance_to_point(point)))
    }

    /// Pushes every vertex out along its mitred border normals by `radius`.
    ///
    /// Miters longer than four times the radius are clipped square at that distance, which
    /// turns the sharp vertex into two and keeps both neighbouring borders `radius` away
    /// from the original ones. Concave loops inflated past their narrowest gap may
    /// self-intersect.
    pub fn inflated(&self, radius: f32) -> Self {
        const MAX_MITER: f32 = 4.0;

        let borders = self.borders().collect_vec();
        let count = borders.len();
        let limit = radius * MAX_MITER;

        let mut points = Vec::with_capacity(count);
        for (i, &p) in self.points.iter().enumerate() {
            let incoming = borders[(i + count - 1) % count];
            let outgoing = borders[i];
            let (n_in, n_out) = (incoming.normal(), outgoing.normal());
            let miter = (n_in + n_out).normalize_or_zero();

            let cos_half = miter.dot(n_out);
            if cos_half > TOLERANCE && radius / cos_half <= limit {
                points.push(p + miter * (radius / cos_half));
                continue;
            }

            let d_in = incoming.direction().normalize_or_zero();
            let d_out = outgoing.direction().normalize_or_zero();
            let (along_in, along_out) = (d_in.dot(miter), d_out.dot(miter));

            if along_in.abs() > TOLERANCE && along_out.abs() > TOLERANCE {
                // Walk each offset border until it meets the clip line at `limit`
                let t_in = (limit - radius * cos_half) / along_in;
                let t_out = (limit - radius * cos_half) / along_out;
                points.push(p + n_in * radius + d_in * t_in);
                points.push(p + n_out * radius + d_out * t_out);
            } else {
                points.push(p + n_in * radius);
                points.push(p + n_out * radius);
            }
        }

        Self { points }
    }
}
