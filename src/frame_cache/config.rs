/*
This file is part of the OpenMap tools library.
Created: 17/10/2026
Last Modified: 18/10/2026
License: MIT
*/
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::io::{Error, ErrorKind};
use std::path::Path;

/// Settings for a frame-cache server, passed in at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// RPF directories handed to the frame source.
    pub data_paths: Vec<String>,
    /// Client population bound; the oldest client is evicted past it.
    pub max_users: usize,
    /// Idle time after which a client is dropped. Zero disables the sweep.
    pub time_window_ms: u64,
    pub sweep_interval_ms: u64,
    /// Decoded subframes kept per client.
    pub subframe_cache_size: usize,
}

impl Default for ServerConfig {
    fn default() -> ServerConfig {
        ServerConfig {
            data_paths: vec![],
            max_users: 10,
            time_window_ms: 300_000,
            sweep_interval_ms: 300_000,
            subframe_cache_size: 64,
        }
    }
}

impl ServerConfig {
    /// Reads a JSON settings file. A missing file yields the defaults; a
    /// file that exists but cannot be parsed is an error.
    pub fn load<P: AsRef<Path>>(config_file: P) -> Result<ServerConfig, Error> {
        let configs = match fs::read_to_string(config_file.as_ref()) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                Error::new(
                    ErrorKind::InvalidData,
                    format!("Failed to parse {}: {}", config_file.as_ref().display(), e),
                )
            })?,
            Err(ref e) if e.kind() == ErrorKind::NotFound => ServerConfig::default(),
            Err(e) => return Err(e),
        };
        Ok(configs)
    }

    pub fn save<P: AsRef<Path>>(&self, config_file: P) -> Result<(), Error> {
        let configs_json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?;
        let mut file = File::create(config_file)?;
        file.write_all(configs_json.as_bytes())?;
        Ok(())
    }
}
