pub mod app;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod error;
pub mod links;
pub mod models;
pub mod params;
pub mod plan;
pub mod stats;
pub mod store;
