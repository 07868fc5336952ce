pub mod api_types;
pub mod classify_types;
pub mod dashboard_types;
pub mod history_types;
pub mod plant_types;
