use nalgebra::{vector, Vector2};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

pub const EPSILON: f64 = 1e-5;

/// Fixed slack applied to circle containment so a point sitting on the
/// boundary does not flip in and out between ticks.
pub const CIRCLE_MARGIN: f64 = 0.1;

/// Reduces an angle into [0, TAU).
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to TAU.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Signed difference `to - from` wrapped into [-PI, PI).
pub fn angle_diff(from: f64, to: f64) -> f64 {
    (to - from + PI).rem_euclid(TAU) - PI
}

pub fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

pub fn is_equal(a: f64, b: f64) -> bool {
    is_zero(a - b)
}

pub fn is_abs_equal(a: f64, b: f64) -> bool {
    is_zero(a.abs() - b.abs())
}

pub fn is_zero_vector(v: &Vector2<f64>) -> bool {
    is_zero(v.x) && is_zero(v.y)
}

/// Unit vector pointing along `angle`.
pub fn heading(angle: f64) -> Vector2<f64> {
    vector![angle.cos(), angle.sin()]
}

/// Radius of the arc flown at `speed` with turn rate `angular_speed`.
/// Infinite when `angular_speed` is zero.
pub fn turn_radius(speed: f64, angular_speed: f64) -> f64 {
    (speed / angular_speed).abs()
}

/// Center of the arc flown from `position`. Lies to the left of the heading
/// for a positive turn rate and to the right otherwise.
pub fn turn_center(
    position: Vector2<f64>,
    angle: f64,
    speed: f64,
    angular_speed: f64,
) -> Vector2<f64> {
    let normal_angle = if angular_speed > 0.0 {
        angle + FRAC_PI_2
    } else {
        angle - FRAC_PI_2
    };
    position + heading(normal_angle) * turn_radius(speed, angular_speed)
}

pub fn point_in_circle(point: Vector2<f64>, center: Vector2<f64>, radius: f64) -> bool {
    (point - center).magnitude() < radius - CIRCLE_MARGIN
}
