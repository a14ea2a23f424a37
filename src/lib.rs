//! Global mortality dashboard.
//!
//! Loads the risk-factor and cause-of-death datasets once, then turns user
//! selections into filtered tables and aggregate views for the egui front
//! end. The [`data`] module holds everything that does not depend on egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
pub mod views;
