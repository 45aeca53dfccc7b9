use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub shaping: ShapingSettings,
    #[serde(default)]
    pub loader: LoaderSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ShapingSettings {
    pub point_size: f64,
    pub features: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LoaderSettings {
    pub face_index: u32,
}

impl Default for ShapingSettings {
    fn default() -> Self {
        Self {
            point_size: 12.0,
            features: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = match config_file_path() {
            Some(path) => path,
            None => return Config::default(),
        };

        if !config_path.exists() {
            return Config::default();
        }

        let content = match fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Failed to read config file: {}", e);
                return Config::default();
            }
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to parse config file: {}", e);
                Config::default()
            }
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::config_dir()?,
    };
    Some(base.join("shapebridge").join("config.toml"))
}
