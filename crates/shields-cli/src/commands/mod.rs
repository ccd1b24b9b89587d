pub mod config;
pub mod helpers;
pub mod privacy;
pub mod telemetry;

use anyhow::Result;
use shields_core::config::{get_data_dir, Config};
use shields_core::Application;
use std::path::PathBuf;

/// Paths shared by every command
pub struct Context {
    pub data_dir: PathBuf,
    pub config_path: PathBuf,
}

impl Context {
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => get_data_dir()?,
        };
        let config_path = data_dir.join("config.toml");
        Ok(Self {
            data_dir,
            config_path,
        })
    }

    pub fn config(&self) -> Result<Config> {
        Config::load(&self.config_path)
    }

    pub fn application(&self) -> Result<Application> {
        Application::from_config(&self.config()?, &self.data_dir)
    }
}
