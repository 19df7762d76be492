use crate::app::App;
use anyhow::Result;
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

pub struct Persistence;

impl Persistence {
    fn state_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "pabloagn", "tempo")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        let data_dir = proj_dirs.data_dir();
        fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("state.json"))
    }

    pub fn save(app: &App) -> Result<()> {
        let path = Self::state_path()?;
        let json = serde_json::to_string_pretty(app)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Returns `None` when there is no saved state yet. A corrupt state file
    /// is logged and treated the same way rather than blocking startup.
    pub fn load() -> Result<Option<App>> {
        let path = Self::state_path()?;

        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        match serde_json::from_str(&json) {
            Ok(app) => Ok(Some(app)),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "ignoring unreadable state file");
                Ok(None)
            }
        }
    }
}
