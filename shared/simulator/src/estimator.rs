//! Return-to-base timing.
//!
//! The estimate is deliberately pessimistic: it assumes the aircraft first
//! flies one complete loop of its current turn circle and only then heads
//! straight for the carrier.

use crate::geometry::{is_zero, turn_radius};
use crate::params::AircraftParams;
use nalgebra::Vector2;
use std::f64::consts::TAU;

/// Seconds added on top of the travel estimate.
pub const SAFETY_PAD: f64 = 1.0;

/// Worst-case seconds needed to get from `position` back to `base`.
pub fn travel_time(
    position: Vector2<f64>,
    speed: f64,
    angular_speed: f64,
    base: Vector2<f64>,
    params: &AircraftParams,
) -> f64 {
    let speed = if is_zero(speed) {
        params.linear_speed
    } else {
        speed.abs()
    };
    let angular_speed = if is_zero(angular_speed) {
        params.angular_speed
    } else {
        angular_speed
    };
    let loop_length = TAU * turn_radius(speed, angular_speed);
    (loop_length + (base - position).magnitude()) / speed
}

/// Time at which the aircraft would be back aboard if it turned around now.
pub fn projected_arrival(
    now: f64,
    position: Vector2<f64>,
    speed: f64,
    angular_speed: f64,
    base: Vector2<f64>,
    params: &AircraftParams,
) -> f64 {
    now + travel_time(position, speed, angular_speed, base, params) + SAFETY_PAD
}

/// Whether loitering any longer risks missing `deadline`.
pub fn should_return_now(
    now: f64,
    deadline: f64,
    position: Vector2<f64>,
    speed: f64,
    angular_speed: f64,
    base: Vector2<f64>,
    params: &AircraftParams,
) -> bool {
    projected_arrival(now, position, speed, angular_speed, base, params) > deadline
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::vector;
    use test_log::test;

    #[test]
    fn test_travel_time_includes_loop() {
        let params = AircraftParams::default();
        // Unit radius loop at speed 1 plus 3 units of straight line.
        let t = travel_time(vector![3.0, 0.0], 1.0, 1.0, vector![0.0, 0.0], &params);
        assert_abs_diff_eq!(t, TAU + 3.0, epsilon = 1e-9);
        let t = travel_time(vector![3.0, 0.0], 1.0, -1.0, vector![0.0, 0.0], &params);
        assert_abs_diff_eq!(t, TAU + 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_travel_time_degenerate_inputs() {
        let params = AircraftParams::default();
        let straight = travel_time(vector![5.0, 0.0], 2.5, 0.0, vector![0.0, 0.0], &params);
        let turning = travel_time(
            vector![5.0, 0.0],
            2.5,
            params.angular_speed,
            vector![0.0, 0.0],
            &params,
        );
        assert!(straight.is_finite());
        assert_abs_diff_eq!(straight, turning, epsilon = 1e-9);

        let parked = travel_time(vector![5.0, 0.0], 0.0, 0.0, vector![0.0, 0.0], &params);
        assert!(parked.is_finite());
    }

    #[test]
    fn test_late_in_flight_returns() {
        // Five second flight, 4.5 s elapsed, 0.8 s of travel left: the safety
        // pad pushes the arrival past the deadline.
        let params = AircraftParams {
            flight_time: 5.0,
            ..Default::default()
        };
        let speed = 2.5;
        let angular_speed = speed * TAU;
        let position = vector![1.0, 0.0];
        let base = vector![0.0, 0.0];
        let t = travel_time(position, speed, angular_speed, base, &params);
        assert_abs_diff_eq!(t, 0.8, epsilon = 1e-9);
        assert!(should_return_now(
            4.5,
            params.flight_time,
            position,
            speed,
            angular_speed,
            base,
            &params
        ));
    }

    #[test]
    fn test_early_in_flight_keeps_loitering() {
        let params = AircraftParams::default();
        let speed = 2.5;
        let angular_speed = speed * TAU;
        let position = vector![1.0, 0.0];
        let base = vector![0.0, 0.0];
        assert!(!should_return_now(
            1.0,
            params.flight_time,
            position,
            speed,
            angular_speed,
            base,
            &params
        ));
    }

    #[test]
    fn test_idempotent() {
        let params = AircraftParams::default();
        let args = (100.0, 120.0, vector![12.0, -7.0], 2.5, -params.angular_speed);
        let first = should_return_now(
            args.0,
            args.1,
            args.2,
            args.3,
            args.4,
            vector![0.5, 0.5],
            &params,
        );
        let second = should_return_now(
            args.0,
            args.1,
            args.2,
            args.3,
            args.4,
            vector![0.5, 0.5],
            &params,
        );
        assert_eq!(first, second);
    }
}
