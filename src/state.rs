use crate::moods::MoodLog;
use crate::store::EntryStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<EntryStore>>,
    pub moods: Arc<Mutex<MoodLog>>,
}

impl AppState {
    pub fn new(store: EntryStore, moods: MoodLog) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            moods: Arc::new(Mutex::new(moods)),
        }
    }
}
