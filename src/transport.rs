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

//! Device-connection seam.
//!
//! The connection itself (discovery, handshake, encryption, retries) lives
//! outside this crate. Anything that can issue MIoT `get_properties` and
//! `set_properties` calls can drive the purifier by implementing [`Transport`].

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::address::PropertyAddress;

/// One entry of a batched read. `Value::Null` means the device reported no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    #[serde(flatten)]
    pub address: PropertyAddress,
    #[serde(default)]
    pub value: Value,
}

impl PropertyValue {
    pub fn new(address: PropertyAddress, value: Value) -> Self {
        Self { address, value }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Request timed out")]
    Timeout,
    #[error("Device returned error {code}: {message}")]
    Device { code: i64, message: String },
    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Batched property read. Results may come back in any order.
    fn get_properties(&mut self, addresses: &[PropertyAddress]) -> Result<Vec<PropertyValue>, TransportError>;

    /// Single property write; the device reply is handed back untouched.
    fn set_property(&mut self, address: PropertyAddress, value: Value) -> Result<Value, TransportError>;
}
