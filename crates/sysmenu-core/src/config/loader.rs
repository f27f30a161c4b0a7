use std::path::PathBuf;

use super::Settings;
use crate::{Error, Result};

/// Returns the config directory: `~/.config/sysmenu/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("sysmenu"))
}

/// Returns the config file path: `~/.config/sysmenu/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Tries to load and parse `config.toml`.
pub fn try_load() -> Result<Settings> {
    let path = config_path().ok_or_else(|| Error::Config("could not determine config path".into()))?;
    let content = std::fs::read_to_string(&path)?;
    let mut settings: Settings =
        toml::from_str(&content).map_err(|source| Error::Parse { path, source })?;
    settings.validate();
    Ok(settings)
}

/// Loads the settings from disk, falling back to defaults.
///
/// Non-existent files silently return defaults; other errors are
/// reported on stderr since logging is not configured yet.
pub fn load() -> Settings {
    load_or_default(try_load, Settings::default)
}

fn load_or_default<T>(try_load: impl FnOnce() -> Result<T>, default: impl Fn() -> T) -> T {
    match try_load() {
        Ok(val) => val,
        Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => default(),
        Err(e) => {
            eprintln!("Warning: {e}");
            default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_silently() {
        // Arrange
        let missing = || -> Result<u32> {
            Err(Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")))
        };

        // Act
        let value = load_or_default(missing, || 7);

        // Assert
        assert_eq!(value, 7);
    }

    #[test]
    fn parse_error_falls_back_to_default() {
        // Arrange
        let broken = || -> Result<u32> { Err(Error::Config("bad".into())) };

        // Act
        let value = load_or_default(broken, || 3);

        // Assert
        assert_eq!(value, 3);
    }
}
