use std::sync::Arc;
use swach_core::store::TableStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TableStore>,
}

impl AppState {
    pub fn open(path: &str) -> Result<Self, String> {
        let store = TableStore::open(path).map_err(|e| e.to_string())?;
        Ok(Self {
            store: Arc::new(store),
        })
    }
}
