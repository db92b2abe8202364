use nalgebra::{vector, Vector2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

#[derive(Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub enum MeshClass {
    Carrier,
    Aircraft,
}

/// Visual representation of the simulation.
///
/// The simulation only ever creates, places and destroys meshes; drawing them
/// is up to the implementation.
pub trait Scene {
    fn create_mesh(&mut self, class: MeshClass) -> MeshHandle;

    fn destroy_mesh(&mut self, mesh: MeshHandle);

    fn place_mesh(&mut self, mesh: MeshHandle, x: f64, y: f64, angle: f64);

    fn place_goal_marker(&mut self, x: f64, y: f64);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub class: MeshClass,
    pub position: Vector2<f64>,
    pub angle: f64,
}

/// Scene without a renderer. Keeps the last placement of every live mesh.
#[derive(Default, Debug)]
pub struct HeadlessScene {
    next_handle: u32,
    meshes: BTreeMap<MeshHandle, Placement>,
    goal_marker: Option<Vector2<f64>>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn placement(&self, mesh: MeshHandle) -> Option<&Placement> {
        self.meshes.get(&mesh)
    }

    pub fn live_meshes(&self, class: MeshClass) -> usize {
        self.meshes.values().filter(|p| p.class == class).count()
    }

    pub fn goal_marker(&self) -> Option<Vector2<f64>> {
        self.goal_marker
    }
}

impl Scene for HeadlessScene {
    fn create_mesh(&mut self, class: MeshClass) -> MeshHandle {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.meshes.insert(
            handle,
            Placement {
                class,
                position: vector![0.0, 0.0],
                angle: 0.0,
            },
        );
        handle
    }

    fn destroy_mesh(&mut self, mesh: MeshHandle) {
        if self.meshes.remove(&mesh).is_none() {
            log::warn!("Destroying unknown mesh {:?}", mesh);
        }
    }

    fn place_mesh(&mut self, mesh: MeshHandle, x: f64, y: f64, angle: f64) {
        match self.meshes.get_mut(&mesh) {
            Some(placement) => {
                placement.position = vector![x, y];
                placement.angle = angle;
            }
            None => log::warn!("Placing unknown mesh {:?}", mesh),
        }
    }

    fn place_goal_marker(&mut self, x: f64, y: f64) {
        self.goal_marker = Some(vector![x, y]);
    }
}
