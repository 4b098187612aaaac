/*
 * Math Helpers
 *
 * Small vector operations shared by the steering rules, built on the
 * glam `Vec2` that nannou re-exports.
 */

use nannou::prelude::*;

/// Slack allowed when comparing a bearing against the edge of a vision cone.
pub const ANGLE_TOLERANCE: f32 = 1e-5;

// Signed angle of `v` measured from the world +x axis, in (-PI, PI]
#[inline]
pub fn bearing(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// True when `offset` lies inside a cone of half-width `half_angle` (radians)
/// centred on the world +x axis. The boundary is inclusive.
#[inline]
pub fn within_cone(offset: Vec2, half_angle: f32) -> bool {
    bearing(offset).abs() <= half_angle + ANGLE_TOLERANCE
}

/// Unit vector along `v`, or `None` for the zero vector.
#[inline]
pub fn normalize_or_none(v: Vec2) -> Option<Vec2> {
    let length_squared = v.length_squared();
    if length_squared > 0.0 {
        Some(v / length_squared.sqrt())
    } else {
        None
    }
}

/// Rescale `velocity` so its magnitude lies in `[min, max]`.
///
/// A zero velocity has no direction of its own, so it is replaced by
/// `fallback` (expected to be a unit vector) scaled to `min`.
pub fn clamp_speed(velocity: Vec2, fallback: Vec2, min: f32, max: f32) -> Vec2 {
    // Measured in f64: the squared length of a tiny f32 vector is subnormal
    // in f32 and its square root loses most of its precision
    let (x, y) = (velocity.x as f64, velocity.y as f64);
    let speed = (x * x + y * y).sqrt();
    if speed == 0.0 {
        return fallback * min;
    }

    let target = if speed < min as f64 {
        min as f64
    } else if speed > max as f64 {
        max as f64
    } else {
        return velocity;
    };
    let scale = target / speed;
    vec2((x * scale) as f32, (y * scale) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn bearing_is_measured_from_positive_x() {
        assert_eq!(bearing(vec2(1.0, 0.0)), 0.0);
        assert!((bearing(vec2(0.0, 1.0)) - FRAC_PI_2).abs() < 1e-6);
        assert!((bearing(vec2(-1.0, 0.0)) - PI).abs() < 1e-6);
    }

    #[test]
    fn full_circle_cone_accepts_everything() {
        assert!(within_cone(vec2(-1.0, 0.0), PI));
        assert!(within_cone(vec2(-1.0, -0.0), PI));
        assert!(within_cone(Vec2::ZERO, PI));
    }

    #[test]
    fn normalize_rejects_zero() {
        assert_eq!(normalize_or_none(Vec2::ZERO), None);
        let unit = normalize_or_none(vec2(3.0, 4.0)).unwrap();
        assert!((unit - vec2(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn clamp_speed_scales_into_range() {
        let slow = clamp_speed(vec2(0.1, 0.0), Vec2::X, 1.0, 2.0);
        assert!((slow.length() - 1.0).abs() < 1e-6);

        let fast = clamp_speed(vec2(0.0, 10.0), Vec2::X, 1.0, 2.0);
        assert!((fast - vec2(0.0, 2.0)).length() < 1e-6);

        let ok = clamp_speed(vec2(1.5, 0.0), Vec2::X, 1.0, 2.0);
        assert_eq!(ok, vec2(1.5, 0.0));
    }

    #[test]
    fn clamp_speed_uses_fallback_for_zero_velocity() {
        let v = clamp_speed(Vec2::ZERO, vec2(0.0, -1.0), 0.5, 1.0);
        assert_eq!(v, vec2(0.0, -0.5));

        let still = clamp_speed(Vec2::ZERO, Vec2::X, 0.0, 1.0);
        assert_eq!(still, Vec2::ZERO);
    }

    #[test]
    fn clamp_speed_is_exact_for_tiny_velocities() {
        for magnitude in [1e-22, 3e-22, 1e-21, 5e-21, 1e-20, 1e-40] {
            for direction in [vec2(1.0, 0.0), vec2(0.0, -1.0), vec2(0.6, 0.8)] {
                let v = clamp_speed(direction * magnitude, Vec2::X, 1.0, 1.0);
                assert!(
                    (v.length() - 1.0).abs() < 1e-5,
                    "|{:?}| -> {}",
                    direction * magnitude,
                    v.length()
                );
            }
        }
    }
}
