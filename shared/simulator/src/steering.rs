//! Bang-bang heading control.
//!
//! Every function here is pure: it takes a pose and a goal and returns the
//! turn rate to apply over the next tick. Integration of the resulting motion
//! is left to [`advance`], which the aircraft calls after steering.

use crate::geometry::{
    angle_diff, heading, is_abs_equal, is_equal, is_zero_vector, normalize_angle,
    point_in_circle, turn_center, turn_radius,
};
use nalgebra::Vector2;
use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Correction {
    /// Heading already points at the goal.
    Aligned,
    /// Goal is directly behind; either direction is equally good.
    Behind,
    /// Turn with the given sign (+1 left, -1 right).
    Turn(f64),
}

/// Classifies a wrapped heading error into the turn it calls for.
pub fn correction(diff: f64) -> Correction {
    if is_equal(diff.cos(), 1.0) {
        Correction::Aligned
    } else if is_abs_equal(diff, PI) {
        Correction::Behind
    } else if diff.sin() >= 0.0 {
        Correction::Turn(1.0)
    } else {
        Correction::Turn(-1.0)
    }
}

/// Turn rate that brings the heading onto `goal`.
///
/// When the turn circle implied by the chosen direction already contains the
/// goal, the aircraft would circle it without ever closing in, so the
/// direction is reversed.
pub fn head_toward(
    position: Vector2<f64>,
    angle: f64,
    speed: f64,
    goal: Vector2<f64>,
    max_angular_speed: f64,
) -> f64 {
    let direction = goal - position;
    if is_zero_vector(&direction) {
        return 0.0;
    }

    let diff = angle_diff(angle, direction.y.atan2(direction.x));
    let angular_speed = match correction(diff) {
        Correction::Aligned => return 0.0,
        Correction::Behind => return max_angular_speed,
        Correction::Turn(sign) => sign * max_angular_speed,
    };

    let center = turn_center(position, angle, speed, angular_speed);
    if point_in_circle(goal, center, turn_radius(speed, angular_speed)) {
        -angular_speed
    } else {
        angular_speed
    }
}

/// Turn rate that carries the aircraft onto a circle of `radius` around `goal`.
///
/// Steers toward whichever tangent of the circle is closer to the current
/// heading. Once the aircraft is on or inside the circle no turn is commanded
/// and it coasts until it drifts back out.
pub fn orbit(
    position: Vector2<f64>,
    angle: f64,
    goal: Vector2<f64>,
    radius: f64,
    max_angular_speed: f64,
) -> f64 {
    if point_in_circle(position, goal, radius) {
        return 0.0;
    }
    let direction = goal - position;
    let distance = direction.magnitude();
    if distance <= radius {
        return 0.0;
    }

    let target_angle = direction.y.atan2(direction.x);
    let offset = (radius / distance).asin();
    let left = angle_diff(angle, target_angle + offset);
    let right = angle_diff(angle, target_angle - offset);
    let diff = if left.cos() >= right.cos() { left } else { right };

    match correction(diff) {
        Correction::Aligned => 0.0,
        Correction::Behind => max_angular_speed,
        Correction::Turn(sign) => sign * max_angular_speed,
    }
}

/// Forward Euler step: rotate first, then move along the new heading.
pub fn advance(
    position: Vector2<f64>,
    angle: f64,
    speed: f64,
    angular_speed: f64,
    dt: f64,
) -> (Vector2<f64>, f64) {
    let angle = normalize_angle(angle + angular_speed * dt);
    (position + heading(angle) * speed * dt, angle)
}

/// Ramps `speed` toward `max_speed`, never past it.
pub fn accelerate(speed: f64, acceleration: f64, max_speed: f64, dt: f64) -> f64 {
    (speed + acceleration * dt).clamp(0.0, max_speed)
}
