use crate::error::AppError;
use crate::models::dashboard_types::DashboardView;
use crate::services::dashboard::Dashboard;
use std::path::PathBuf;
use tauri::{AppHandle, State};
use tauri_plugin_dialog::DialogExt;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[tauri::command]
pub async fn get_dashboard(dashboard: State<'_, Dashboard>) -> Result<DashboardView, AppError> {
    Ok(dashboard.view())
}

#[tauri::command]
pub async fn select_image(dashboard: State<'_, Dashboard>, path: String) -> Result<DashboardView, AppError> {
    Ok(dashboard.select_file(&PathBuf::from(path)).await)
}

#[tauri::command]
pub async fn pick_image(app: AppHandle, dashboard: State<'_, Dashboard>) -> Result<DashboardView, AppError> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    app.dialog()
        .file()
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file(move |file| {
            let _ = tx.send(file);
        });

    let picked = rx
        .await
        .map_err(|_| AppError::Read("File dialog closed unexpectedly".to_string()))?;

    match picked {
        Some(file) => {
            let path = file.into_path().map_err(|e| AppError::Read(e.to_string()))?;
            Ok(dashboard.select_file(&path).await)
        }
        None => Ok(dashboard.view()),
    }
}

#[tauri::command]
pub async fn analyze_image(dashboard: State<'_, Dashboard>) -> Result<DashboardView, AppError> {
    Ok(dashboard.analyze().await)
}

#[tauri::command]
pub async fn clear_selection(dashboard: State<'_, Dashboard>) -> Result<DashboardView, AppError> {
    Ok(dashboard.clear())
}

#[tauri::command]
pub async fn set_confidence_threshold(
    dashboard: State<'_, Dashboard>,
    threshold: u8,
) -> Result<DashboardView, AppError> {
    Ok(dashboard.set_confidence_threshold(threshold))
}
