use std::path::Path;
use std::sync::Arc;

mod desktop;

/// Hands an exported file to the operating system.
pub trait UiFileOpener: Send + Sync {
    fn open_path(&self, path: &Path);
}

pub type FileOpenerRef = Arc<dyn UiFileOpener>;

pub use desktop::DesktopFileOpener;
