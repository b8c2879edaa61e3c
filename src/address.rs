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

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PurifierError, Result};

/// MIoT coordinate of a single property: service instance id + property instance id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyAddress {
    pub siid: u32,
    pub piid: u32,
}

impl PropertyAddress {
    pub const fn new(siid: u32, piid: u32) -> Self {
        Self { siid, piid }
    }
}

impl fmt::Display for PropertyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "siid={} piid={}", self.siid, self.piid)
    }
}

/// Semantic name -> coordinate. Order is the order properties are requested in.
pub const PROPERTIES: &[(&str, PropertyAddress)] = &[
    // Air purifier (siid=2)
    ("power", PropertyAddress::new(2, 2)),
    ("fan_level", PropertyAddress::new(2, 4)),
    ("mode", PropertyAddress::new(2, 5)),
    // Environment (siid=3)
    ("humidity", PropertyAddress::new(3, 7)),
    ("temperature", PropertyAddress::new(3, 8)),
    ("aqi", PropertyAddress::new(3, 6)),
    // Filter (siid=4)
    ("filter_life_remaining", PropertyAddress::new(4, 3)),
    ("filter_hours_used", PropertyAddress::new(4, 5)),
    // Alarm (siid=5)
    ("buzzer", PropertyAddress::new(5, 1)),
    // Indicator light (siid=6)
    ("led_brightness", PropertyAddress::new(6, 1)),
    ("led", PropertyAddress::new(6, 6)),
    // Physical control locked (siid=7)
    ("child_lock", PropertyAddress::new(7, 1)),
    // Motor (siid=10)
    ("favorite_level", PropertyAddress::new(10, 10)),
    ("motor_speed", PropertyAddress::new(10, 8)),
    // Use time (siid=12)
    ("use_time", PropertyAddress::new(12, 1)),
    // Air quality counters (siid=13)
    ("purify_volume", PropertyAddress::new(13, 1)),
    ("average_aqi", PropertyAddress::new(13, 2)),
    // RFID (siid=14)
    ("filter_rfid_tag", PropertyAddress::new(14, 1)),
    ("filter_rfid_product_id", PropertyAddress::new(14, 3)),
    // Other (siid=15)
    ("app_extra", PropertyAddress::new(15, 1)),
];

/// Read-only view over [`PROPERTIES`].
#[derive(Debug, Clone, Copy)]
pub struct AddressTable {
    entries: &'static [(&'static str, PropertyAddress)],
}

impl Default for AddressTable {
    fn default() -> Self {
        Self { entries: PROPERTIES }
    }
}

impl AddressTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, name: &str) -> Result<PropertyAddress> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, addr)| *addr)
            .ok_or_else(|| PurifierError::UnknownProperty(name.to_string()))
    }

    /// Reverse lookup used to match batched read results back to names.
    pub fn name_of(&self, address: PropertyAddress) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, addr)| *addr == address)
            .map(|(n, _)| *n)
    }

    pub fn addresses(&self) -> Vec<PropertyAddress> {
        self.entries.iter().map(|(_, addr)| *addr).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, PropertyAddress)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
