use crate::aircraft::{AircraftHandle, AircraftState};
use crate::carrier::LaunchRejected;
use crate::simulation::{LateLanding, Transition};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Snapshot {
    pub nonce: u32,
    pub time: f64,
    pub carrier: CarrierSnapshot,
    /// In launch order.
    pub aircraft: Vec<AircraftSnapshot>,
    pub transitions: Vec<Transition>,
    pub late_landings: Vec<LateLanding>,
    pub launch_rejections: Vec<LaunchRejected>,
    pub timing: Timing,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CarrierSnapshot {
    pub position: Point2<f64>,
    pub heading: f64,
    pub speed: f64,
    pub angular_velocity: f64,
    pub target: Point2<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AircraftSnapshot {
    pub id: AircraftHandle,
    pub number: i32,
    pub state: AircraftState,
    pub position: Point2<f64>,
    pub heading: f64,
    pub speed: f64,
    pub angular_velocity: f64,
    pub deck_offset: f64,
    pub next_state_time: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Timing {
    pub step: f64,
}
