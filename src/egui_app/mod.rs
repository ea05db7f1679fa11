//! egui front end: controller wiring, view state and rendering.

pub mod controller;
pub mod state;
pub mod ui;
