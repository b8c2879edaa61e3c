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

//! JSON-lines event log. One object per line: `{"ts_ms", "event", "data"}`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use lazy_static::lazy_static;
use serde_json::{json, Value};

lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

fn log_file() -> MutexGuard<'static, Option<File>> {
    match LOG_FILE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Open (append) the event log. Replaces any previously opened file.
pub fn init_logging<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let f = OpenOptions::new().create(true).append(true).open(path)?;
    *log_file() = Some(f);
    Ok(())
}

/// Stop writing events; later `log_event` calls are dropped.
pub fn shutdown_logging() {
    if let Some(mut f) = log_file().take() {
        let _ = f.flush();
    }
}

pub fn is_enabled() -> bool {
    log_file().is_some()
}

/// No-op while the log is not initialized.
pub fn log_event(event: &str, data: Value) {
    let mut guard = log_file();
    let Some(f) = guard.as_mut() else { return };
    let line = json!({
        "ts_ms": now_millis(),
        "event": event,
        "data": data,
    });
    let _ = writeln!(f, "{}", line);
}
