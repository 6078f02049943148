//! Application state shared across handlers.

use filekeep_processing::FileService;

#[derive(Clone)]
pub struct AppState {
    pub files: FileService,
}
