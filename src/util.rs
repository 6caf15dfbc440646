use glam::{vec2, Vec2};

pub(crate) const TOLERANCE: f32 = 1e-5;

/// Unit vector perpendicular to `dir`, rotated clockwise.
///
/// Returns zero when `dir` has no length.
pub(crate) fn perpendicular(dir: Vec2) -> Vec2 {
    vec2(dir.y, -dir.x).normalize_or_zero()
}

/// Twice the signed area of the closed loop. Positive for counter-clockwise loops.
///
/// Summed relative to the first point in f64, so loops far from the origin do not lose
/// their area to cancellation.
pub(crate) fn doubled_signed_area(points: &[Vec2]) -> f32 {
    let Some(origin) = points.first().map(|p| p.as_dvec2()) else {
        return 0.0;
    };

    let mut sum = 0.0;
    for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
        sum += (a.as_dvec2() - origin).perp_dot(b.as_dvec2() - origin);
    }

    sum as f32
}

/// Smallest area a loop can meaningfully enclose.
///
/// Grows with the loop's extent and with the magnitude of its coordinates, since f32
/// rounding displaces points far from the origin by more than points close to it.
pub(crate) fn area_tolerance(points: &[Vec2]) -> f32 {
    let (min, max) = points.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(min, max), &p| (min.min(p), max.max(p)),
    );

    let extent = (max - min).length();
    let magnitude = min.abs().max(max.abs()).max_element().max(extent);

    extent * magnitude * f32::EPSILON * 16.0
}
