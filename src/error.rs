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

//! Error types shared by the address table, decoder and device facade.

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias using PurifierError
pub type Result<T> = std::result::Result<T, PurifierError>;

#[derive(Debug, Error)]
pub enum PurifierError {
    /// Semantic name has no entry in the address table.
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Caller-supplied value rejected before anything was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Raised while turning a raw property mapping into a status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing field '{field}'")]
    Missing { field: String },

    #[error("field '{field}' is not a {expected}")]
    InvalidType { field: String, expected: &'static str },

    #[error("field '{field}' has unrecognized value {value}")]
    InvalidEnum { field: String, value: i64 },
}
