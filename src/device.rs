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

use std::sync::Arc;

use serde_json::{json, Value};

use crate::address::{AddressTable, PropertyAddress};
use crate::config::PurifierConfig;
use crate::error::{PurifierError, Result};
use crate::filter::{shared_classifier, FilterTypeClassifier};
use crate::logger;
use crate::status::{CodedEnum, LedBrightness, OperationMode, RawStatus, StatusSnapshot};
use crate::transport::Transport;

/// Air purifier speaking MIoT, driven through a [`Transport`].
pub struct AirPurifierMiot<T: Transport> {
    transport: T,
    table: AddressTable,
    classifier: Arc<FilterTypeClassifier>,
    max_properties_per_request: Option<usize>,
}

impl<T: Transport> AirPurifierMiot<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            table: AddressTable::new(),
            classifier: shared_classifier(),
            max_properties_per_request: None,
        }
    }

    /// Build from a loaded config. Opens the event log when one is configured.
    pub fn with_config(transport: T, cfg: &PurifierConfig) -> std::io::Result<Self> {
        if let Some(path) = &cfg.log_path {
            logger::init_logging(path)?;
        }
        let mut dev = Self::new(transport);
        dev.max_properties_per_request = cfg.max_properties_per_request.filter(|n| *n > 0);
        Ok(dev)
    }

    /// Use a dedicated filter classifier instead of the process-wide one.
    pub fn with_classifier(mut self, classifier: Arc<FilterTypeClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Read every known property and decode the result.
    pub fn status(&mut self) -> Result<StatusSnapshot> {
        let addresses = self.table.addresses();
        let chunk_size = self.max_properties_per_request.unwrap_or(addresses.len()).max(1);

        let mut values = Vec::with_capacity(addresses.len());
        for chunk in addresses.chunks(chunk_size) {
            values.extend(self.transport.get_properties(chunk)?);
        }

        if values.len() != addresses.len() {
            logger::log_event(
                "status_count_mismatch",
                json!({ "requested": addresses.len(), "received": values.len() }),
            );
        }

        // Results are matched by address; response order is not trusted
        let mut raw = RawStatus::with_capacity(values.len());
        for pv in values {
            match self.table.name_of(pv.address) {
                Some(name) => {
                    raw.insert(name.to_string(), pv.value);
                }
                None => logger::log_event(
                    "unmatched_property",
                    json!({ "siid": pv.address.siid, "piid": pv.address.piid }),
                ),
            }
        }

        logger::log_event("status_read", json!({ "requested": addresses.len(), "received": raw.len() }));
        Ok(StatusSnapshot::new(raw, &self.classifier)?)
    }

    /// Write one named property; the device reply is returned as-is.
    pub fn set_property(&mut self, name: &str, value: Value) -> Result<Value> {
        let address = self.table.resolve(name)?;
        self.send(name, address, value)
    }

    fn send(&mut self, name: &str, address: PropertyAddress, value: Value) -> Result<Value> {
        logger::log_event(
            "property_set",
            json!({ "name": name, "siid": address.siid, "piid": address.piid, "value": value }),
        );
        Ok(self.transport.set_property(address, value)?)
    }

    pub fn on(&mut self) -> Result<Value> {
        self.set_property("power", Value::Bool(true))
    }

    pub fn off(&mut self) -> Result<Value> {
        self.set_property("power", Value::Bool(false))
    }

    pub fn set_fan_level(&mut self, level: i64) -> Result<Value> {
        if !(1..=3).contains(&level) {
            return Err(invalid_argument(format!("Invalid fan level: {}", level)));
        }
        self.set_property("fan_level", json!(level))
    }

    pub fn set_mode(&mut self, mode: OperationMode) -> Result<Value> {
        self.set_property("mode", json!(mode.code()))
    }

    /// Level used while the mode is `Favorite`, 0..=14.
    pub fn set_favorite_level(&mut self, level: i64) -> Result<Value> {
        if !(0..=14).contains(&level) {
            return Err(invalid_argument(format!("Invalid favorite level: {}", level)));
        }
        self.set_property("favorite_level", json!(level))
    }

    pub fn set_led_brightness(&mut self, brightness: LedBrightness) -> Result<Value> {
        self.set_property("led_brightness", json!(brightness.code()))
    }

    pub fn set_led(&mut self, on: bool) -> Result<Value> {
        self.set_property("led", Value::Bool(on))
    }

    pub fn set_buzzer(&mut self, on: bool) -> Result<Value> {
        self.set_property("buzzer", Value::Bool(on))
    }

    pub fn set_child_lock(&mut self, on: bool) -> Result<Value> {
        self.set_property("child_lock", Value::Bool(on))
    }
}

fn invalid_argument(msg: String) -> PurifierError {
    logger::log_event("invalid_argument", json!({ "message": msg }));
    PurifierError::InvalidArgument(msg)
}
