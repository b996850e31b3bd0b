//! Directed joint angle from three landmarks.
//!
//! The angle is swept from ray b→a to ray b→c in image coordinates
//! (y down), so the landmark order decides which side of 180° a pose
//! lands on. Exercise thresholds are tuned against this convention.

use super::keypoint::Keypoint;

/// Angle at `b` in degrees, in `[0, 360)`.
///
/// Returns `None` when `a` or `c` coincides with `b`, or the result is not finite.
pub fn angle_at(a: &Keypoint, b: &Keypoint, c: &Keypoint) -> Option<f32> {
    if a.coincides_with(b) || c.coincides_with(b) {
        return None;
    }

    let to_c = f32::atan2(c.y - b.y, c.x - b.x);
    let to_a = f32::atan2(a.y - b.y, a.x - b.x);
    let mut degrees = (to_c - to_a).to_degrees();
    if !degrees.is_finite() {
        return None;
    }

    if degrees < 0.0 {
        degrees += 360.0;
    }
    // -1e-6 + 360 rounds to 360 in f32
    if degrees >= 360.0 {
        degrees -= 360.0;
    }
    Some(degrees)
}
