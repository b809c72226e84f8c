use std::path::Path;
use std::process::Command;

use tracing::warn;

use super::UiFileOpener;

/// Opens files with the platform's default application.
pub struct DesktopFileOpener;

impl UiFileOpener for DesktopFileOpener {
    fn open_path(&self, path: &Path) {
        let spawned = if cfg!(target_os = "macos") {
            Command::new("open").arg(path).spawn()
        } else if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/C", "start", ""]).arg(path).spawn()
        } else {
            Command::new("xdg-open").arg(path).spawn()
        };
        if let Err(err) = spawned {
            warn!(path = %path.display(), error = %err, "could not open exported file");
        }
    }
}
