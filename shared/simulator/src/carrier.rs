use crate::aircraft::{Aircraft, AircraftHandle, AircraftState, Context};
use crate::geometry::{heading, normalize_angle};
use crate::params::{AircraftParams, CarrierParams};
use crate::scene::{MeshClass, MeshHandle, Scene};
use crate::simulation::SimEvents;
use nalgebra::{vector, Vector2};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Carrier state an aircraft may read while it ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarrierPose {
    pub position: Vector2<f64>,
    pub angle: f64,
    pub deck_length: f64,
}

impl CarrierPose {
    /// World position `offset` units along the deck from the launch point.
    pub fn deck_point(&self, offset: f64) -> Vector2<f64> {
        self.position + heading(self.angle) * offset
    }
}

#[derive(Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
}

impl FromStr for Key {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Key::Forward),
            "backward" => Ok(Key::Backward),
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            _ => anyhow::bail!("Unknown key {:?}", s),
        }
    }
}

/// Operator key state.
#[derive(Clone, Debug, Default)]
pub struct Helm {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
}

impl Helm {
    pub fn set(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Forward => self.forward = pressed,
            Key::Backward => self.backward = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
        }
    }

    /// Commanded (linear, angular) speed. The carrier only turns while moving.
    pub fn command(&self, params: &CarrierParams) -> (f64, f64) {
        let linear_speed = if self.forward {
            params.linear_speed
        } else if self.backward {
            -params.linear_speed
        } else {
            0.0
        };

        let angular_speed = if linear_speed == 0.0 {
            0.0
        } else if self.left {
            params.angular_speed
        } else if self.right {
            -params.angular_speed
        } else {
            0.0
        };

        (linear_speed, angular_speed)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchRejected {
    EmptyFleet,
    NotReady {
        aircraft: i32,
        state: AircraftState,
    },
}

impl fmt::Display for LaunchRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchRejected::EmptyFleet => write!(f, "There are no aircraft aboard"),
            LaunchRejected::NotReady { aircraft, state } => write!(
                f,
                "There are no ready aircraft (next is {} in state {})",
                aircraft,
                state.name()
            ),
        }
    }
}

impl std::error::Error for LaunchRejected {}

pub struct Carrier {
    pub position: Vector2<f64>,
    pub angle: f64,
    pub speed: f64,
    pub angular_speed: f64,
    pub target: Vector2<f64>,
    aircraft: Vec<Aircraft>,
    // Front is the next aircraft offered for launch.
    queue: VecDeque<AircraftHandle>,
    helm: Helm,
    mesh: Option<MeshHandle>,
    params: CarrierParams,
}

impl Carrier {
    pub fn new(
        params: CarrierParams,
        aircraft_params: AircraftParams,
        scene: &mut dyn Scene,
    ) -> Carrier {
        let aircraft = (0..params.aircraft_count)
            .map(|index| {
                let mut aircraft = Aircraft::new();
                aircraft.init(index, aircraft_params.clone());
                aircraft
            })
            .collect();
        let queue = (0..params.aircraft_count).map(AircraftHandle).collect();
        let mesh = scene.create_mesh(MeshClass::Carrier);
        scene.place_mesh(mesh, 0.0, 0.0, 0.0);

        Carrier {
            position: vector![0.0, 0.0],
            angle: 0.0,
            speed: 0.0,
            angular_speed: 0.0,
            target: vector![0.0, 0.0],
            aircraft,
            queue,
            helm: Default::default(),
            mesh: Some(mesh),
            params,
        }
    }

    /// Releases every mesh owned by the carrier and its aircraft.
    pub fn deinit(&mut self, scene: &mut dyn Scene) {
        for aircraft in self.aircraft.iter_mut() {
            aircraft.deinit(scene);
        }
        if let Some(mesh) = self.mesh.take() {
            scene.destroy_mesh(mesh);
        }
    }

    pub fn params(&self) -> &CarrierParams {
        &self.params
    }

    pub fn pose(&self) -> CarrierPose {
        CarrierPose {
            position: self.position,
            angle: self.angle,
            deck_length: self.params.deck_length,
        }
    }

    pub fn aircraft(&self, handle: AircraftHandle) -> &Aircraft {
        &self.aircraft[handle.0]
    }

    pub fn aircraft_mut(&mut self, handle: AircraftHandle) -> &mut Aircraft {
        &mut self.aircraft[handle.0]
    }

    pub fn aircraft_count(&self) -> usize {
        self.aircraft.len()
    }

    /// Aircraft handles in launch order.
    pub fn queue(&self) -> impl Iterator<Item = AircraftHandle> + '_ {
        self.queue.iter().copied()
    }

    pub fn peek_front(&self) -> Option<AircraftHandle> {
        self.queue.front().copied()
    }

    pub fn rotate_to_back(&mut self) -> Option<AircraftHandle> {
        let handle = self.queue.pop_front()?;
        self.queue.push_back(handle);
        Some(handle)
    }

    /// True when every aircraft is aboard and ready.
    pub fn is_idle(&self) -> bool {
        self.aircraft
            .iter()
            .all(|aircraft| aircraft.state == AircraftState::Ready)
    }

    /// Launches the aircraft at the front of the queue if it is ready.
    ///
    /// Only the front is considered; a ready aircraft further back has to wait
    /// for its turn.
    pub fn request_launch(
        &mut self,
        now: f64,
        scene: &mut dyn Scene,
        events: &mut SimEvents,
    ) -> Result<AircraftHandle, LaunchRejected> {
        let rejection = match self.peek_front() {
            None => Some(LaunchRejected::EmptyFleet),
            Some(handle) => {
                let aircraft = self.aircraft(handle);
                if aircraft.state == AircraftState::Ready {
                    None
                } else {
                    Some(LaunchRejected::NotReady {
                        aircraft: aircraft.number,
                        state: aircraft.state,
                    })
                }
            }
        };
        if let Some(rejection) = rejection {
            log::info!("{}", rejection);
            events.launch_rejections.push(rejection.clone());
            return Err(rejection);
        }

        let carrier = self.pose();
        let handle = self
            .rotate_to_back()
            .ok_or(LaunchRejected::EmptyFleet)?;
        let mut ctx = Context {
            now,
            dt: 0.0,
            carrier,
            scene,
            events,
        };
        self.aircraft[handle.0].launch(&mut ctx);
        Ok(handle)
    }

    /// Sets the loiter point for every aircraft.
    pub fn set_target(&mut self, target: Vector2<f64>, scene: &mut dyn Scene) {
        self.target = target;
        scene.place_goal_marker(target.x, target.y);
        for aircraft in self.aircraft.iter_mut() {
            aircraft.set_target(target);
        }
    }

    pub fn key_pressed(&mut self, key: Key) {
        self.helm.set(key, true);
    }

    pub fn key_released(&mut self, key: Key) {
        self.helm.set(key, false);
    }

    pub fn tick(&mut self, now: f64, dt: f64, scene: &mut dyn Scene, events: &mut SimEvents) {
        let (speed, angular_speed) = self.helm.command(&self.params);
        self.speed = speed;
        self.angular_speed = angular_speed;
        self.angle = normalize_angle(self.angle + angular_speed * dt);
        self.position += heading(self.angle) * speed * dt;
        if let Some(mesh) = self.mesh {
            scene.place_mesh(mesh, self.position.x, self.position.y, self.angle);
        }

        let mut ctx = Context {
            now,
            dt,
            carrier: self.pose(),
            scene,
            events,
        };
        for handle in self.queue.iter() {
            self.aircraft[handle.0].tick(&mut ctx);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::TICK_LENGTH;
    use crate::scene::HeadlessScene;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;
    use test_log::test;

    fn carrier(count: usize, scene: &mut HeadlessScene) -> Carrier {
        Carrier::new(
            CarrierParams {
                aircraft_count: count,
                ..Default::default()
            },
            AircraftParams::default(),
            scene,
        )
    }

    fn states(carrier: &Carrier) -> Vec<AircraftState> {
        carrier
            .queue()
            .map(|handle| carrier.aircraft(handle).state)
            .collect()
    }

    #[test]
    fn test_new() {
        let mut scene = HeadlessScene::new();
        let carrier = carrier(5, &mut scene);
        assert_eq!(carrier.aircraft_count(), 5);
        assert_eq!(
            carrier.queue().collect::<Vec<_>>(),
            (0..5).map(AircraftHandle).collect::<Vec<_>>()
        );
        assert!(carrier.is_idle());
        assert_eq!(scene.live_meshes(MeshClass::Carrier), 1);
        assert_eq!(scene.live_meshes(MeshClass::Aircraft), 0);
    }

    #[test]
    fn test_rotate_to_back() {
        let mut scene = HeadlessScene::new();
        let mut carrier = carrier(3, &mut scene);
        assert_eq!(carrier.peek_front(), Some(AircraftHandle(0)));
        assert_eq!(carrier.rotate_to_back(), Some(AircraftHandle(0)));
        assert_eq!(
            carrier.queue().collect::<Vec<_>>(),
            vec![AircraftHandle(1), AircraftHandle(2), AircraftHandle(0)]
        );
        assert_eq!(carrier.aircraft_count(), 3);
    }

    #[test]
    fn test_round_robin_launch() {
        let mut scene = HeadlessScene::new();
        let mut events = SimEvents::new();
        let mut carrier = carrier(3, &mut scene);

        let mut launched = vec![];
        for _ in 0..3 {
            let handle = carrier
                .request_launch(0.0, &mut scene, &mut events)
                .unwrap();
            assert_eq!(carrier.queue().last(), Some(handle));
            assert_eq!(carrier.aircraft(handle).state, AircraftState::TakingOff);
            launched.push(handle);
        }
        launched.sort_by_key(|h| h.0);
        launched.dedup();
        assert_eq!(launched.len(), 3);

        let queue_before: Vec<_> = carrier.queue().collect();
        let states_before = states(&carrier);
        let result = carrier.request_launch(0.0, &mut scene, &mut events);
        assert_eq!(
            result,
            Err(LaunchRejected::NotReady {
                aircraft: 1,
                state: AircraftState::TakingOff
            })
        );
        assert_eq!(carrier.queue().collect::<Vec<_>>(), queue_before);
        assert_eq!(states(&carrier), states_before);
        assert_eq!(events.launch_rejections.len(), 1);
        assert_eq!(scene.live_meshes(MeshClass::Aircraft), 3);
    }

    #[test]
    fn test_launch_only_considers_front() {
        let mut scene = HeadlessScene::new();
        let mut events = SimEvents::new();
        let mut carrier = carrier(2, &mut scene);
        carrier.aircraft_mut(AircraftHandle(0)).state = AircraftState::Refueling;

        let result = carrier.request_launch(0.0, &mut scene, &mut events);
        assert!(result.is_err());
        assert_eq!(carrier.aircraft(AircraftHandle(1)).state, AircraftState::Ready);
        assert_eq!(carrier.peek_front(), Some(AircraftHandle(0)));
    }

    #[test]
    fn test_empty_fleet() {
        let mut scene = HeadlessScene::new();
        let mut events = SimEvents::new();
        let mut carrier = carrier(0, &mut scene);
        assert_eq!(
            carrier.request_launch(0.0, &mut scene, &mut events),
            Err(LaunchRejected::EmptyFleet)
        );
    }

    #[test]
    fn test_set_target_broadcast() {
        let mut scene = HeadlessScene::new();
        let mut carrier = carrier(4, &mut scene);
        carrier.set_target(vector![7.0, -2.0], &mut scene);
        assert_eq!(carrier.target, vector![7.0, -2.0]);
        for handle in carrier.queue().collect::<Vec<_>>() {
            assert_eq!(carrier.aircraft(handle).target, vector![7.0, -2.0]);
        }
        assert_eq!(scene.goal_marker(), Some(vector![7.0, -2.0]));
    }

    #[test]
    fn test_helm() {
        let params = CarrierParams::default();
        let mut helm = Helm::default();
        assert_eq!(helm.command(&params), (0.0, 0.0));

        helm.set(Key::Left, true);
        assert_eq!(helm.command(&params), (0.0, 0.0));

        helm.set(Key::Forward, true);
        assert_eq!(
            helm.command(&params),
            (params.linear_speed, params.angular_speed)
        );

        helm.set(Key::Backward, true);
        assert_eq!(helm.command(&params).0, params.linear_speed);

        helm.set(Key::Forward, false);
        helm.set(Key::Left, false);
        helm.set(Key::Right, true);
        assert_eq!(
            helm.command(&params),
            (-params.linear_speed, -params.angular_speed)
        );
    }

    #[test]
    fn test_key_from_str() {
        assert_eq!("forward".parse::<Key>().unwrap(), Key::Forward);
        assert_eq!("right".parse::<Key>().unwrap(), Key::Right);
        assert!("up".parse::<Key>().is_err());
    }

    #[test]
    fn test_carrier_moves() {
        let mut scene = HeadlessScene::new();
        let mut events = SimEvents::new();
        let mut carrier = carrier(1, &mut scene);
        carrier.key_pressed(Key::Forward);
        for i in 0..60 {
            carrier.tick(i as f64 * TICK_LENGTH, TICK_LENGTH, &mut scene, &mut events);
        }
        assert_abs_diff_eq!(carrier.position, vector![0.25, 0.0], epsilon = 1e-9);

        carrier.key_released(Key::Forward);
        for i in 60..120 {
            carrier.tick(i as f64 * TICK_LENGTH, TICK_LENGTH, &mut scene, &mut events);
        }
        assert_abs_diff_eq!(carrier.position, vector![0.25, 0.0], epsilon = 1e-9);
        assert_eq!(carrier.speed, 0.0);
    }

    #[test]
    fn test_taking_off_moves_with_carrier() {
        let mut scene = HeadlessScene::new();
        let mut events = SimEvents::new();
        let mut carrier = carrier(1, &mut scene);
        carrier.key_pressed(Key::Forward);
        carrier.key_pressed(Key::Left);
        let handle = carrier.request_launch(0.0, &mut scene, &mut events).unwrap();
        for i in 0..60 {
            carrier.tick(i as f64 * TICK_LENGTH, TICK_LENGTH, &mut scene, &mut events);
        }
        let aircraft = carrier.aircraft(handle);
        assert_eq!(aircraft.state, AircraftState::TakingOff);
        assert_eq!(aircraft.angle, carrier.angle);
        assert_abs_diff_eq!(
            aircraft.position,
            carrier.pose().deck_point(aircraft.deck_offset),
            epsilon = 1e-12
        );
        assert!(carrier.angle > 0.0 && carrier.angle < FRAC_PI_2);
    }
}
