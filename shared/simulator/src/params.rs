use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const TICK_LENGTH: f64 = 1.0 / 60.0;

pub mod carrier {
    pub const LINEAR_SPEED: f64 = 0.25;
    pub const ANGULAR_SPEED: f64 = 0.25;
    pub const AIRCRAFT_COUNT: usize = 5;
    pub const DECK_LENGTH: f64 = 0.5;
}

pub mod aircraft {
    use super::PI;

    pub const LINEAR_SPEED: f64 = 2.5;
    pub const ACCELERATION: f64 = 0.2;
    pub const ANGULAR_SPEED: f64 = 0.25 * 2.0 * PI;
    pub const FLIGHT_TIME: f64 = 120.0;
    pub const FUELING_TIME: f64 = 20.0;
    pub const ORBIT_RADIUS_SPACING: f64 = 0.1;
    pub const LANDING_DISTANCE: f64 = 0.1;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarrierParams {
    pub linear_speed: f64,
    pub angular_speed: f64,
    pub aircraft_count: usize,
    pub deck_length: f64,
}

impl Default for CarrierParams {
    fn default() -> Self {
        CarrierParams {
            linear_speed: carrier::LINEAR_SPEED,
            angular_speed: carrier::ANGULAR_SPEED,
            aircraft_count: carrier::AIRCRAFT_COUNT,
            deck_length: carrier::DECK_LENGTH,
        }
    }
}

/// Flight envelope and timers shared by every aircraft of a carrier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AircraftParams {
    /// Cruise speed, also the upper clamp for `speed`.
    pub linear_speed: f64,
    pub acceleration: f64,
    /// Magnitude of the bang-bang turn rate.
    pub angular_speed: f64,
    pub flight_time: f64,
    pub fueling_time: f64,
    pub orbit_radius_spacing: f64,
    pub landing_distance: f64,
}

impl AircraftParams {
    /// Radius of the tightest circle flown at cruise speed.
    pub fn min_turn_radius(&self) -> f64 {
        crate::geometry::turn_radius(self.linear_speed, self.angular_speed)
    }
}

impl Default for AircraftParams {
    fn default() -> Self {
        AircraftParams {
            linear_speed: aircraft::LINEAR_SPEED,
            acceleration: aircraft::ACCELERATION,
            angular_speed: aircraft::ANGULAR_SPEED,
            flight_time: aircraft::FLIGHT_TIME,
            fueling_time: aircraft::FUELING_TIME,
            orbit_radius_spacing: aircraft::ORBIT_RADIUS_SPACING,
            landing_distance: aircraft::LANDING_DISTANCE,
        }
    }
}
