//! egui presentation layer: panels, chart widgets and the central dashboard.

pub mod dashboard;
pub mod panels;
pub mod plot;
pub mod treemap;
