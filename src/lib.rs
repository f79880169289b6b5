pub mod app;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod moods;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;

pub use app::router;
pub use moods::MoodLog;
pub use state::AppState;
pub use storage::{resolve_data_path, resolve_mood_path};
pub use store::EntryStore;
