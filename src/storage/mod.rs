pub mod local_store;
pub mod models;

pub use local_store::LocalStore;
pub use models::StoredSession;

use std::fs;
use std::path::{Path, PathBuf};

/// Ensure the data directory exists and return the store path inside it.
pub fn store_path(data_dir: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(data_dir)?;
    Ok(Path::new(data_dir).join("finmate.db"))
}
