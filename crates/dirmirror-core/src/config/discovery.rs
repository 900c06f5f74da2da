//! Configuration file discovery

use std::path::{Path, PathBuf};

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Locate the configuration file to load, if any
    ///
    /// An explicit path always wins and is returned even if it does not exist,
    /// so that loading it reports the problem. Otherwise the global config in
    /// the XDG config directory is used when present.
    #[must_use]
    pub fn discover(cli_path: Option<&Path>) -> Option<PathBuf> {
        match cli_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_global_config(),
        }
    }

    /// Path of the global config file, whether or not it exists
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dirmirror").join("config.toml"))
    }

    fn find_global_config() -> Option<PathBuf> {
        Self::global_config_path().filter(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_cli_config() {
        let tmp = TempDir::new().unwrap();
        let cli_config = tmp.path().join("custom.toml");
        fs::write(&cli_config, "# config").unwrap();

        assert_eq!(ConfigDiscovery::discover(Some(&cli_config)), Some(cli_config));
    }

    #[test]
    fn test_discover_cli_config_nonexistent_is_kept() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nonexistent.toml");

        assert_eq!(ConfigDiscovery::discover(Some(&missing)), Some(missing));
    }

    #[test]
    fn test_global_config_location() {
        // Not every test environment has a config directory
        if let Some(path) = ConfigDiscovery::global_config_path() {
            assert!(path.ends_with("dirmirror/config.toml"));
        }
    }
}
