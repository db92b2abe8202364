use crate::aircraft::{AircraftHandle, AircraftState};
use crate::carrier::{Carrier, Key, LaunchRejected};
use crate::command::Command;
use crate::params::{AircraftParams, CarrierParams, TICK_LENGTH};
use crate::scene::{HeadlessScene, Scene};
use crate::snapshot::*;
use instant::Instant;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

pub struct Simulation<S: Scene = HeadlessScene> {
    pub carrier: Carrier,
    pub scene: S,
    pub(crate) events: SimEvents,
    // Recorded by commands between steps, reported by the next step.
    pending_events: SimEvents,
    tick: u32,
    timing: Timing,
}

impl Simulation<HeadlessScene> {
    pub fn new() -> Simulation<HeadlessScene> {
        Simulation::with_params(
            HeadlessScene::new(),
            CarrierParams::default(),
            AircraftParams::default(),
        )
    }
}

impl Default for Simulation<HeadlessScene> {
    fn default() -> Self {
        Simulation::new()
    }
}

impl<S: Scene> Simulation<S> {
    pub fn with_params(
        mut scene: S,
        carrier_params: CarrierParams,
        aircraft_params: AircraftParams,
    ) -> Simulation<S> {
        log::info!(
            "carrier with {} aircraft, flight time {}s",
            carrier_params.aircraft_count,
            aircraft_params.flight_time
        );
        let carrier = Carrier::new(carrier_params, aircraft_params, &mut scene);
        Simulation {
            carrier,
            scene,
            events: SimEvents::new(),
            pending_events: SimEvents::new(),
            tick: 0,
            timing: Default::default(),
        }
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn time(&self) -> f64 {
        self.tick as f64 * TICK_LENGTH
    }

    pub fn step(&mut self) {
        self.events.clear();
        self.events.append(&mut self.pending_events);
        let start_time = Instant::now();
        let now = self.time();
        self.carrier
            .tick(now, TICK_LENGTH, &mut self.scene, &mut self.events);
        self.timing.step = (Instant::now() - start_time).as_secs_f64();
        self.tick += 1;
    }

    pub fn request_launch(&mut self) -> Result<AircraftHandle, LaunchRejected> {
        let now = self.time();
        self.carrier
            .request_launch(now, &mut self.scene, &mut self.pending_events)
    }

    pub fn set_target(&mut self, target: Vector2<f64>) {
        self.carrier.set_target(target, &mut self.scene);
    }

    pub fn key_pressed(&mut self, key: Key) {
        self.carrier.key_pressed(key);
    }

    pub fn key_released(&mut self, key: Key) {
        self.carrier.key_released(key);
    }

    /// Executes an operator command. Waits are left to the caller.
    pub fn apply(&mut self, command: &Command) {
        match command {
            Command::Launch => {
                // Rejections are logged and reported by the next step.
                let _ = self.request_launch();
            }
            Command::Target(target) => self.set_target(*target),
            Command::Press(key) => self.key_pressed(*key),
            Command::Release(key) => self.key_released(*key),
            Command::Wait(_) => {}
        }
    }

    /// Events from the last step, including those of commands applied just
    /// before it.
    pub fn events(&self) -> &SimEvents {
        &self.events
    }

    pub fn hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let fixedpoint = |v: f64| (v * 1e9) as i64;
        let mut s = DefaultHasher::new();
        let carrier = &self.carrier;
        s.write_i64(fixedpoint(carrier.position.x));
        s.write_i64(fixedpoint(carrier.position.y));
        s.write_i64(fixedpoint(carrier.angle));
        for handle in carrier.queue() {
            let aircraft = carrier.aircraft(handle);
            s.write_u64(handle.into());
            aircraft.state.hash(&mut s);
            s.write_i64(fixedpoint(aircraft.position.x));
            s.write_i64(fixedpoint(aircraft.position.y));
            s.write_i64(fixedpoint(aircraft.angle));
            s.write_i64(fixedpoint(aircraft.speed));
            s.write_i64(fixedpoint(aircraft.angular_speed));
        }
        s.finish()
    }

    pub fn snapshot(&self, nonce: u32) -> Snapshot {
        let carrier = &self.carrier;
        let mut snapshot = Snapshot {
            nonce,
            time: self.time(),
            carrier: CarrierSnapshot {
                position: carrier.position.into(),
                heading: carrier.angle,
                speed: carrier.speed,
                angular_velocity: carrier.angular_speed,
                target: carrier.target.into(),
            },
            aircraft: vec![],
            transitions: self.events.transitions.clone(),
            late_landings: self.events.late_landings.clone(),
            launch_rejections: self.events.launch_rejections.clone(),
            timing: self.timing.clone(),
        };

        for handle in carrier.queue() {
            let aircraft = carrier.aircraft(handle);
            snapshot.aircraft.push(AircraftSnapshot {
                id: handle,
                number: aircraft.number,
                state: aircraft.state,
                position: aircraft.position.into(),
                heading: aircraft.angle,
                speed: aircraft.speed,
                angular_velocity: aircraft.angular_speed,
                deck_offset: aircraft.deck_offset,
                next_state_time: aircraft.next_state_time,
            });
        }

        snapshot
    }
}

impl<S: Scene> Drop for Simulation<S> {
    fn drop(&mut self) {
        self.carrier.deinit(&mut self.scene);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Same slot as [`AircraftSnapshot::id`].
    pub aircraft: AircraftHandle,
    pub from: AircraftState,
    pub to: AircraftState,
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateLanding {
    /// Same slot as [`AircraftSnapshot::id`].
    pub aircraft: AircraftHandle,
    /// Seconds past the flight deadline.
    pub overrun: f64,
    pub time: f64,
}

impl fmt::Display for LateLanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Aircraft {} landed {:.0} ms after its deadline",
            self.aircraft.number(),
            self.overrun * 1000.0
        )
    }
}

#[derive(Debug, Default)]
pub struct SimEvents {
    pub transitions: Vec<Transition>,
    pub late_landings: Vec<LateLanding>,
    pub launch_rejections: Vec<LaunchRejected>,
}

impl SimEvents {
    pub fn new() -> Self {
        Self {
            transitions: vec![],
            late_landings: vec![],
            launch_rejections: vec![],
        }
    }

    /// Moves every event of `other` onto the end of this one.
    pub fn append(&mut self, other: &mut SimEvents) {
        self.transitions.append(&mut other.transitions);
        self.late_landings.append(&mut other.late_landings);
        self.launch_rejections.append(&mut other.launch_rejections);
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
        self.late_landings.clear();
        self.launch_rejections.clear();
    }
}
