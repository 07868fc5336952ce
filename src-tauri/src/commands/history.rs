use crate::data::plant_classes::PLANT_CLASSES;
use crate::error::AppError;
use crate::models::dashboard_types::DashboardView;
use crate::models::plant_types::PlantClass;
use crate::services::dashboard::Dashboard;
use tauri::State;

#[tauri::command]
pub async fn select_history_item(dashboard: State<'_, Dashboard>, id: String) -> Result<DashboardView, AppError> {
    Ok(dashboard.preview_history_item(&id))
}

#[tauri::command]
pub async fn remove_history_item(dashboard: State<'_, Dashboard>, id: String) -> Result<DashboardView, AppError> {
    Ok(dashboard.remove_history_item(&id).await)
}

#[tauri::command]
pub async fn clear_history(dashboard: State<'_, Dashboard>) -> Result<DashboardView, AppError> {
    Ok(dashboard.clear_history().await)
}

#[tauri::command]
pub fn list_plant_classes() -> Vec<PlantClass> {
    PLANT_CLASSES.to_vec()
}
