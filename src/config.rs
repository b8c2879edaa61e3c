/*
 * This file is part of miot-purifier.
 *
 * Copyright (C) 2025 miot-purifier contributors
 *
 * miot-purifier is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * miot-purifier is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with miot-purifier. If not, see <https://www.gnu.org/licenses/>.
 */

use std::fs;
use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// MIoT devices answer at most 16 properties per request.
pub const MAX_PROPERTIES_PER_REQUEST: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PurifierConfig {
    /// Device IP, handed to whatever builds the transport.
    #[serde(default)]
    pub host: Option<String>,
    /// 128-bit device token as 32 hex characters.
    #[serde(default)]
    pub token: Option<String>,
    /// Split status reads into chunks of this size. Unset: one request.
    #[serde(default)]
    pub max_properties_per_request: Option<usize>,
    /// Optional JSON-lines event log.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

/// `<config dir>/miot-purifier/config.json`, or the system-wide file when
/// the platform has no per-user config directory.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("miot-purifier").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("/etc/miot-purifier/config.json"))
}

pub fn validate_config(cfg: &PurifierConfig) -> Result<(), String> {
    if let Some(host) = &cfg.host {
        if host.parse::<IpAddr>().is_err() {
            return Err(format!("invalid host address '{}'", host));
        }
    }
    if let Some(token) = &cfg.token {
        if token.len() != 32 || !token.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("token must be 32 hex characters".to_string());
        }
    }
    if let Some(n) = cfg.max_properties_per_request {
        if n == 0 || n > MAX_PROPERTIES_PER_REQUEST {
            return Err(format!(
                "max_properties_per_request out of range (1..{})",
                MAX_PROPERTIES_PER_REQUEST
            ));
        }
    }
    Ok(())
}

pub fn load_config_from(path: &Path) -> Result<PurifierConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg: PurifierConfig =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    validate_config(&cfg).map_err(|e| anyhow!("{}: {}", path.display(), e))?;
    Ok(cfg)
}

/// Load from [`config_path`]; a missing file yields the defaults.
pub fn load_config() -> Result<PurifierConfig> {
    let path = config_path();
    match fs::metadata(&path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PurifierConfig::default()),
        _ => load_config_from(&path),
    }
}

pub fn save_config(path: &Path, cfg: &PurifierConfig) -> Result<()> {
    validate_config(cfg).map_err(|e| anyhow!(e))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(cfg)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
