use crate::carrier::CarrierPose;
use crate::estimator;
use crate::params::AircraftParams;
use crate::scene::{MeshClass, MeshHandle, Scene};
use crate::simulation::{LateLanding, SimEvents, Transition};
use crate::steering;
use nalgebra::{vector, Vector2};
use serde::{Deserialize, Serialize};

/// Stable slot index of an aircraft inside its carrier.
#[derive(
    Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Default, Serialize, Deserialize,
)]
pub struct AircraftHandle(pub usize);

impl AircraftHandle {
    /// One-based number shown to the operator.
    pub fn number(self) -> i32 {
        self.0 as i32 + 1
    }
}

impl From<AircraftHandle> for u64 {
    fn from(handle: AircraftHandle) -> u64 {
        handle.0 as u64
    }
}

#[derive(Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub enum AircraftState {
    Unavailable,
    Refueling,
    Ready,
    TakingOff,
    EnRouteToTarget,
    ReturningToBase,
}

impl AircraftState {
    pub fn name(&self) -> &'static str {
        match self {
            AircraftState::Unavailable => "Unavailable",
            AircraftState::Refueling => "Refueling",
            AircraftState::Ready => "Ready",
            AircraftState::TakingOff => "TakingOff",
            AircraftState::EnRouteToTarget => "EnRouteToTarget",
            AircraftState::ReturningToBase => "ReturningToBase",
        }
    }

    /// Flying free of the deck.
    pub fn is_airborne(&self) -> bool {
        matches!(
            self,
            AircraftState::EnRouteToTarget | AircraftState::ReturningToBase
        )
    }
}

/// Everything an aircraft may read or touch while it ticks.
pub struct Context<'a> {
    pub now: f64,
    pub dt: f64,
    pub carrier: CarrierPose,
    pub scene: &'a mut dyn Scene,
    pub events: &'a mut SimEvents,
}

#[derive(Debug, Clone)]
pub struct Aircraft {
    pub handle: AircraftHandle,
    pub number: i32,
    pub state: AircraftState,
    pub position: Vector2<f64>,
    pub angle: f64,
    pub speed: f64,
    pub angular_speed: f64,
    pub acceleration: f64,
    pub target: Vector2<f64>,
    pub deck_offset: f64,
    /// Flight deadline while away from the carrier, fueling deadline while
    /// refueling.
    pub next_state_time: f64,
    pub flyby_orbit_radius: f64,
    pub mesh: Option<MeshHandle>,
    pub params: AircraftParams,
}

impl Default for Aircraft {
    fn default() -> Aircraft {
        Aircraft {
            handle: AircraftHandle::default(),
            number: 0,
            state: AircraftState::Unavailable,
            position: vector![0.0, 0.0],
            angle: 0.0,
            speed: 0.0,
            angular_speed: 0.0,
            acceleration: 0.0,
            target: vector![0.0, 0.0],
            deck_offset: 0.0,
            next_state_time: 0.0,
            flyby_orbit_radius: 0.0,
            mesh: None,
            params: Default::default(),
        }
    }
}

impl Aircraft {
    pub fn new() -> Aircraft {
        Default::default()
    }

    /// Assigns the aircraft to carrier slot `index` and readies it.
    pub fn init(&mut self, index: usize, params: AircraftParams) {
        debug_assert_eq!(self.state, AircraftState::Unavailable);
        self.handle = AircraftHandle(index);
        self.number = self.handle.number();
        // Spread the loiter circles so aircraft sharing a target don't stack.
        self.flyby_orbit_radius =
            params.min_turn_radius() + index as f64 * params.orbit_radius_spacing;
        self.acceleration = params.acceleration;
        self.params = params;
        self.state = AircraftState::Ready;
    }

    pub fn deinit(&mut self, scene: &mut dyn Scene) {
        if let Some(mesh) = self.mesh.take() {
            scene.destroy_mesh(mesh);
        }
    }

    pub fn set_target(&mut self, target: Vector2<f64>) {
        self.target = target;
    }

    pub fn should_return_now(&self, now: f64, base: Vector2<f64>) -> bool {
        estimator::should_return_now(
            now,
            self.next_state_time,
            self.position,
            self.speed,
            self.angular_speed,
            base,
            &self.params,
        )
    }

    /// Starts the takeoff roll from the carrier's current pose.
    pub fn launch(&mut self, ctx: &mut Context) {
        debug_assert_eq!(self.state, AircraftState::Ready);
        self.position = ctx.carrier.position;
        self.angle = ctx.carrier.angle;
        self.speed = 0.0;
        self.angular_speed = 0.0;
        self.deck_offset = 0.0;
        self.next_state_time = ctx.now + self.params.flight_time;
        self.mesh = Some(ctx.scene.create_mesh(MeshClass::Aircraft));
        self.set_state(AircraftState::TakingOff, ctx);
        self.place(ctx.scene);
    }

    pub fn tick(&mut self, ctx: &mut Context) {
        self.update_state(ctx);

        match self.state {
            AircraftState::Unavailable | AircraftState::Refueling | AircraftState::Ready => return,
            AircraftState::TakingOff => self.taxi(&ctx.carrier, ctx.dt),
            AircraftState::EnRouteToTarget => {
                let angular_speed = steering::orbit(
                    self.position,
                    self.angle,
                    self.target,
                    self.flyby_orbit_radius,
                    self.params.angular_speed,
                );
                self.fly(angular_speed, ctx.dt);
            }
            AircraftState::ReturningToBase => {
                let angular_speed = steering::head_toward(
                    self.position,
                    self.angle,
                    self.speed,
                    ctx.carrier.position,
                    self.params.angular_speed,
                );
                self.fly(angular_speed, ctx.dt);
            }
        }

        self.place(ctx.scene);
    }

    fn update_state(&mut self, ctx: &mut Context) {
        match self.state {
            AircraftState::Unavailable | AircraftState::Ready => {}
            AircraftState::Refueling => {
                if ctx.now >= self.next_state_time {
                    self.set_state(AircraftState::Ready, ctx);
                }
            }
            AircraftState::TakingOff => {
                if self.deck_offset > ctx.carrier.deck_length {
                    self.angle = ctx.carrier.angle;
                    self.angular_speed = 0.0;
                    self.set_state(AircraftState::EnRouteToTarget, ctx);
                }
            }
            AircraftState::EnRouteToTarget => {
                if self.should_return_now(ctx.now, ctx.carrier.position) {
                    self.set_state(AircraftState::ReturningToBase, ctx);
                }
            }
            AircraftState::ReturningToBase => {
                let distance = (ctx.carrier.position - self.position).magnitude();
                if distance < self.params.landing_distance {
                    self.land(ctx);
                }
            }
        }
    }

    fn set_state(&mut self, state: AircraftState, ctx: &mut Context) {
        let from = self.state;
        self.state = state;
        log::info!(
            "{} state changed: {} -> {}",
            self.number,
            from.name(),
            state.name()
        );
        ctx.events.transitions.push(Transition {
            aircraft: self.handle,
            from,
            to: state,
            time: ctx.now,
        });
    }

    /// Rolls along the deck, carried by the carrier.
    fn taxi(&mut self, carrier: &CarrierPose, dt: f64) {
        self.speed =
            steering::accelerate(self.speed, self.acceleration, self.params.linear_speed, dt);
        self.deck_offset += self.speed * dt;
        self.position = carrier.deck_point(self.deck_offset);
        self.angle = carrier.angle;
    }

    fn fly(&mut self, angular_speed: f64, dt: f64) {
        self.angular_speed = angular_speed;
        let (position, angle) =
            steering::advance(self.position, self.angle, self.speed, angular_speed, dt);
        self.position = position;
        self.angle = angle;
        self.speed =
            steering::accelerate(self.speed, self.acceleration, self.params.linear_speed, dt);
    }

    fn land(&mut self, ctx: &mut Context) {
        self.deinit(ctx.scene);
        let overrun = ctx.now - self.next_state_time;
        if overrun > 0.0 {
            let late = LateLanding {
                aircraft: self.handle,
                overrun,
                time: ctx.now,
            };
            log::warn!("{}", late);
            ctx.events.late_landings.push(late);
        }
        self.speed = 0.0;
        self.angular_speed = 0.0;
        self.next_state_time = ctx.now + self.params.fueling_time;
        self.set_state(AircraftState::Refueling, ctx);
    }

    fn place(&self, scene: &mut dyn Scene) {
        if let Some(mesh) = self.mesh {
            scene.place_mesh(mesh, self.position.x, self.position.y, self.angle);
        }
    }
}
