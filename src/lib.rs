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

//! miot-purifier - typed client for MIoT air purifiers
//!
//! This library maps named purifier attributes onto MIoT (siid, piid)
//! coordinates, decodes batched property reads into a typed status snapshot,
//! and validates commands before handing them to a device transport.

pub mod address;
pub mod config;
pub mod device;
pub mod error;
pub mod filter;
pub mod logger;
pub mod status;
pub mod transport;

#[cfg(test)]
pub mod test_utils;

pub use address::{AddressTable, PropertyAddress};
pub use config::PurifierConfig;
pub use device::AirPurifierMiot;
pub use error::{DecodeError, PurifierError};
pub use filter::{FilterType, FilterTypeClassifier};
pub use status::{LedBrightness, OperationMode, RawStatus, StatusSnapshot};
pub use transport::{PropertyValue, Transport, TransportError};
