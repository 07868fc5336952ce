pub mod classifier;
pub mod dashboard;
pub mod db;
pub mod history_service;
pub mod image_service;
pub mod telemetry_service;
pub mod workflow;
