use crate::models::AppData;
use crate::page::ScoutPage;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub page: Arc<Mutex<ScoutPage>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            page: Arc::new(Mutex::new(ScoutPage::load())),
        }
    }
}
