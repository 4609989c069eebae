use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;

/// Shared state for one CLI invocation.
pub struct AppContext {
    pub project_root: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
    pub robot_mode: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let project_root = Self::find_project_root()?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| default_config_path(&project_root));
        let config = Config::load(cli.config.as_deref(), &project_root)?;

        Ok(Self {
            project_root,
            config_path,
            config,
            robot_mode: cli.robot,
            verbosity: cli.verbose,
        })
    }

    fn find_project_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("LFMATCH_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        if let Some(found) = find_upwards(&cwd, "lfmatch.toml")? {
            return Ok(found);
        }
        Ok(cwd)
    }
}

fn default_config_path(project_root: &Path) -> PathBuf {
    let project_file = project_root.join("lfmatch.toml");
    if project_file.is_file() {
        project_file
    } else {
        dirs::config_dir()
            .unwrap_or_else(|| project_root.to_path_buf())
            .join("lfmatch/config.toml")
    }
}

/// Walk from `start` to the filesystem root looking for a directory that
/// contains `name`.
fn find_upwards(start: &Path, name: &str) -> Result<Option<PathBuf>> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(name).is_file() {
            return Ok(Some(dir.to_path_buf()));
        }
        current = dir.parent();
    }
    Ok(None)
}
