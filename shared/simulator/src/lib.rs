pub mod aircraft;
pub mod carrier;
pub mod command;
pub mod estimator;
pub mod geometry;
pub mod params;
pub mod scene;
pub mod simulation;
pub mod snapshot;
pub mod steering;
