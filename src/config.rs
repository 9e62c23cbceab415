// Config file - optional TOML at <config_dir>/anilog/config.toml
//
// Everything has a default; the tool must work on a machine that has never
// seen it before.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Where the list file lives. Defaults to list.json next to the config.
    pub list_location: Option<PathBuf>,
}

impl Config {
    /// Load the config file if one exists. A missing file is the default
    /// config; an unreadable one is reported and ignored.
    pub fn load() -> Config {
        let Some(path) = config_dir().map(|dir| dir.join("config.toml")) else {
            return Config::default();
        };

        let Ok(raw) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("⚠️  Ignoring unreadable config {}: {err}", path.display());
                Config::default()
            }
        }
    }

    /// Resolve the list path: CLI override, then config, then the default.
    pub fn list_path(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.list_location.clone())
            .or_else(|| config_dir().map(|dir| dir.join("list.json")))
            .unwrap_or_else(|| PathBuf::from("list.json"))
    }
}

fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("anilog"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override_beats_config() {
        let config = Config {
            list_location: Some(PathBuf::from("/configured/list.json")),
        };

        let path = config.list_path(Some(PathBuf::from("/cli/list.json")));

        assert_eq!(path, PathBuf::from("/cli/list.json"));
    }

    #[test]
    fn test_config_location_used_without_override() {
        let config = Config {
            list_location: Some(PathBuf::from("/configured/list.json")),
        };

        assert_eq!(config.list_path(None), PathBuf::from("/configured/list.json"));
    }

    #[test]
    fn test_config_parses_toml() {
        let config: Config = toml::from_str(r#"list_location = "/tmp/anime.json""#).unwrap();
        assert_eq!(config.list_location, Some(PathBuf::from("/tmp/anime.json")));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.list_location.is_none());
    }
}
