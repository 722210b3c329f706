use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// `~/.hostshift/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("Could not find home directory")?;
    Ok(home.join(".hostshift").join("config.toml"))
}

impl Config {
    /// Load from `path` when given (the file must exist), otherwise from the
    /// default location, writing a default file there on first run.
    /// Environment overrides are applied in both cases.
    pub fn load_or_init(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(explicit) => Self::load_from(explicit)?,
            None => {
                let default_path = default_config_path()?;
                if default_path.exists() {
                    Self::load_from(&default_path)?
                } else {
                    Self::init_at(&default_path)?
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    fn init_at(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent()
            && !dir.exists()
        {
            fs::create_dir_all(dir).context("Failed to create .hostshift directory")?;
        }
        let config = Self {
            config_path: path.to_path_buf(),
            ..Self::default()
        };
        config.save()?;
        tracing::info!("Wrote default config to {}", path.display());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
