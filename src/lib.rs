//! Car Advertisement EDA
//!
//! Loads a vehicle-listing CSV, derives manufacturer, model and date columns,
//! and turns the table into declarative chart specifications that are drawn
//! interactively (egui_plot) or exported (JSON, PNG).

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod gui;
pub mod stats;
