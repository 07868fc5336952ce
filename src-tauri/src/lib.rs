#[cfg(feature = "desktop")]
mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

use config::AppConfig;
use error::AppError;
use services::classifier::client::HttpClassifier;
use services::dashboard::Dashboard;
use services::db::{Database, KeyValueStore, MemoryStore};
use services::history_service::HistoryStore;
use services::telemetry_service;
use services::workflow::ClassificationWorkflow;
use std::path::Path;
use std::sync::Arc;

/// Open the history database, falling back to memory so the app still starts.
pub fn open_storage(db_path: &Path) -> Arc<dyn KeyValueStore> {
    match Database::new(db_path) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::error!(error = %e, path = %db_path.display(), "Failed to open database, history will not persist");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Wire the production components together.
pub fn build_dashboard(config: &AppConfig, storage: Arc<dyn KeyValueStore>) -> Result<Dashboard, AppError> {
    let history = HistoryStore::open(storage, config.history_cap);
    let classifier = Arc::new(HttpClassifier::new(config)?);
    let telemetry = telemetry_service::from_config(config);
    let workflow = ClassificationWorkflow::new(classifier, telemetry, history);
    Ok(Dashboard::new(workflow, config))
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::Manager;

    logging::init();
    let config = AppConfig::from_env();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_window_state::Builder::default().build())
        .setup(move |app| {
            let app_data_dir = app.path().app_data_dir()?;
            std::fs::create_dir_all(&app_data_dir)?;

            let storage = open_storage(&app_data_dir.join("leaf-lens.db"));
            let dashboard = build_dashboard(&config, storage)?;
            tracing::info!(
                endpoint = %config.classify_endpoint,
                history = dashboard.workflow().history().len(),
                "Dashboard ready"
            );
            app.manage(dashboard);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::dashboard::get_dashboard,
            commands::dashboard::select_image,
            commands::dashboard::pick_image,
            commands::dashboard::analyze_image,
            commands::dashboard::clear_selection,
            commands::dashboard::set_confidence_threshold,
            commands::history::select_history_item,
            commands::history::remove_history_item,
            commands::history::clear_history,
            commands::history::list_plant_classes,
        ])
        .run(tauri::generate_context!())
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error while running tauri application");
            std::process::exit(1);
        });
}
