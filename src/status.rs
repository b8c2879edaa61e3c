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

//! Decoding of raw property values into a typed status snapshot.
//!
//! Operationally meaningful fields fail loudly when the device reports
//! something unexpected: a bad `mode` rejects the whole snapshot. Display-only
//! fields degrade to `None` instead (`led_brightness`).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

use crate::error::DecodeError;
use crate::filter::{determine_filter_type, shared_classifier, FilterType, FilterTypeClassifier};
use crate::logger;

/// Property name -> raw value as reported by the device.
pub type RawStatus = HashMap<String, Value>;

/// Enums carried on the wire as small integer codes.
pub trait CodedEnum: Sized + Copy {
    fn from_code(code: i64) -> Option<Self>;
    fn code(&self) -> i64;
}

/// Decode a code that must be valid; anything else is an error.
pub fn decode_strict<E: CodedEnum>(field: &str, raw: i64) -> Result<E, DecodeError> {
    E::from_code(raw).ok_or_else(|| DecodeError::InvalidEnum { field: field.to_string(), value: raw })
}

/// Decode a code where absence and unrecognized values both map to `None`.
pub fn decode_lenient<E: CodedEnum>(raw: Option<i64>) -> Option<E> {
    raw.and_then(E::from_code)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationMode {
    Auto,
    Silent,
    Favorite,
    Fan,
}

impl CodedEnum for OperationMode {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(OperationMode::Auto),
            1 => Some(OperationMode::Silent),
            2 => Some(OperationMode::Favorite),
            3 => Some(OperationMode::Fan),
            _ => None,
        }
    }

    fn code(&self) -> i64 {
        match self {
            OperationMode::Auto => 0,
            OperationMode::Silent => 1,
            OperationMode::Favorite => 2,
            OperationMode::Fan => 3,
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationMode::Auto => "Auto",
            OperationMode::Silent => "Silent",
            OperationMode::Favorite => "Favorite",
            OperationMode::Fan => "Fan",
        };
        f.write_str(s)
    }
}

impl FromStr for OperationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(OperationMode::Auto),
            "silent" => Ok(OperationMode::Silent),
            "favorite" => Ok(OperationMode::Favorite),
            "fan" => Ok(OperationMode::Fan),
            _ => Err(format!("unknown operation mode '{}'", s)),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedBrightness {
    Bright,
    Dim,
    Off,
}

impl CodedEnum for LedBrightness {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(LedBrightness::Bright),
            1 => Some(LedBrightness::Dim),
            2 => Some(LedBrightness::Off),
            _ => None,
        }
    }

    fn code(&self) -> i64 {
        match self {
            LedBrightness::Bright => 0,
            LedBrightness::Dim => 1,
            LedBrightness::Off => 2,
        }
    }
}

impl fmt::Display for LedBrightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LedBrightness::Bright => "Bright",
            LedBrightness::Dim => "Dim",
            LedBrightness::Off => "Off",
        };
        f.write_str(s)
    }
}

impl FromStr for LedBrightness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bright" => Ok(LedBrightness::Bright),
            "dim" => Ok(LedBrightness::Dim),
            "off" => Ok(LedBrightness::Off),
            _ => Err(format!("unknown LED brightness '{}'", s)),
        }
    }
}

// Field extraction. A JSON null counts as absent.

fn present<'a>(data: &'a RawStatus, field: &str) -> Option<&'a Value> {
    data.get(field).filter(|v| !v.is_null())
}

fn required<'a>(data: &'a RawStatus, field: &str) -> Result<&'a Value, DecodeError> {
    present(data, field).ok_or_else(|| DecodeError::Missing { field: field.to_string() })
}

fn invalid_type(field: &str, expected: &'static str) -> DecodeError {
    DecodeError::InvalidType { field: field.to_string(), expected }
}

fn required_bool(data: &RawStatus, field: &str) -> Result<bool, DecodeError> {
    required(data, field)?.as_bool().ok_or_else(|| invalid_type(field, "boolean"))
}

fn required_int(data: &RawStatus, field: &str) -> Result<i64, DecodeError> {
    required(data, field)?.as_i64().ok_or_else(|| invalid_type(field, "integer"))
}

/// Integer code of a number, accepting floats with no fractional part.
fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn optional_bool(data: &RawStatus, field: &str) -> Result<Option<bool>, DecodeError> {
    present(data, field)
        .map(|v| v.as_bool().ok_or_else(|| invalid_type(field, "boolean")))
        .transpose()
}

fn optional_f64(data: &RawStatus, field: &str) -> Result<Option<f64>, DecodeError> {
    present(data, field)
        .map(|v| v.as_f64().ok_or_else(|| invalid_type(field, "number")))
        .transpose()
}

fn optional_string(data: &RawStatus, field: &str) -> Result<Option<String>, DecodeError> {
    present(data, field)
        .map(|v| v.as_str().map(str::to_string).ok_or_else(|| invalid_type(field, "string")))
        .transpose()
}

/// Immutable, decoded view over one batched status read.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    data: RawStatus,
    power: bool,
    aqi: i64,
    average_aqi: i64,
    humidity: i64,
    temperature: Option<f64>,
    fan_level: i64,
    mode: OperationMode,
    led: bool,
    led_brightness_raw: Option<Value>,
    led_brightness: Option<LedBrightness>,
    buzzer: Option<bool>,
    child_lock: bool,
    favorite_level: i64,
    filter_life_remaining: i64,
    filter_hours_used: i64,
    use_time: i64,
    purify_volume: i64,
    motor_speed: i64,
    filter_rfid_product_id: Option<String>,
    filter_rfid_tag: Option<String>,
    filter_type: Option<FilterType>,
    button_pressed: Option<String>,
}

impl StatusSnapshot {
    pub fn new(data: RawStatus, classifier: &FilterTypeClassifier) -> Result<Self, DecodeError> {
        let power = required_bool(&data, "power")?;
        let aqi = required_int(&data, "aqi")?;
        let average_aqi = required_int(&data, "average_aqi")?;
        let humidity = required_int(&data, "humidity")?;
        let temperature = optional_f64(&data, "temperature")?;
        let fan_level = required_int(&data, "fan_level")?;
        let mode = decode_strict("mode", required_int(&data, "mode")?)?;
        let led = required_bool(&data, "led")?;
        let buzzer = optional_bool(&data, "buzzer")?;
        let child_lock = required_bool(&data, "child_lock")?;
        let favorite_level = required_int(&data, "favorite_level")?;
        let filter_life_remaining = required_int(&data, "filter_life_remaining")?;
        let filter_hours_used = required_int(&data, "filter_hours_used")?;
        let use_time = required_int(&data, "use_time")?;
        let purify_volume = required_int(&data, "purify_volume")?;
        let motor_speed = required_int(&data, "motor_speed")?;
        let filter_rfid_product_id = optional_string(&data, "filter_rfid_product_id")?;
        let filter_rfid_tag = optional_string(&data, "filter_rfid_tag")?;
        let button_pressed = optional_string(&data, "button_pressed")?;

        let led_brightness_raw = present(&data, "led_brightness").cloned();
        let led_brightness = decode_lenient(led_brightness_raw.as_ref().and_then(integral));
        if let (Some(v), None) = (&led_brightness_raw, led_brightness) {
            logger::log_event("led_brightness_unrecognized", json!({ "value": v }));
        }

        // Classify only once the whole report has decoded, so a failed
        // snapshot leaves the classifier cache untouched.
        let filter_type = determine_filter_type(
            classifier,
            filter_rfid_tag.as_deref(),
            filter_rfid_product_id.as_deref(),
        );

        Ok(Self {
            data,
            power,
            aqi,
            average_aqi,
            humidity,
            temperature,
            fan_level,
            mode,
            led,
            led_brightness_raw,
            led_brightness,
            buzzer,
            child_lock,
            favorite_level,
            filter_life_remaining,
            filter_hours_used,
            use_time,
            purify_volume,
            motor_speed,
            filter_rfid_product_id,
            filter_rfid_tag,
            filter_type,
            button_pressed,
        })
    }

    pub fn raw(&self) -> &RawStatus {
        &self.data
    }

    pub fn is_on(&self) -> bool {
        self.power
    }

    pub fn power(&self) -> &'static str {
        if self.power { "on" } else { "off" }
    }

    /// Air quality index (PM2.5, μg/m³).
    pub fn aqi(&self) -> i64 {
        self.aqi
    }

    pub fn average_aqi(&self) -> i64 {
        self.average_aqi
    }

    pub fn humidity(&self) -> i64 {
        self.humidity
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn fan_level(&self) -> i64 {
        self.fan_level
    }

    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    pub fn led(&self) -> bool {
        self.led
    }

    pub fn led_brightness(&self) -> Option<LedBrightness> {
        self.led_brightness
    }

    /// Brightness value exactly as reported. `None` only when the device
    /// did not report it; `Some` together with `led_brightness() == None`
    /// means the device reported a level this client does not know.
    pub fn led_brightness_raw(&self) -> Option<&Value> {
        self.led_brightness_raw.as_ref()
    }

    pub fn buzzer(&self) -> Option<bool> {
        self.buzzer
    }

    pub fn child_lock(&self) -> bool {
        self.child_lock
    }

    /// Level used while the mode is `Favorite`.
    pub fn favorite_level(&self) -> i64 {
        self.favorite_level
    }

    /// Percentage of filter life left.
    pub fn filter_life_remaining(&self) -> i64 {
        self.filter_life_remaining
    }

    pub fn filter_hours_used(&self) -> i64 {
        self.filter_hours_used
    }

    /// Seconds the device has been active.
    pub fn use_time(&self) -> i64 {
        self.use_time
    }

    /// Purified air volume in m³.
    pub fn purify_volume(&self) -> i64 {
        self.purify_volume
    }

    pub fn motor_speed(&self) -> i64 {
        self.motor_speed
    }

    pub fn filter_rfid_product_id(&self) -> Option<&str> {
        self.filter_rfid_product_id.as_deref()
    }

    pub fn filter_rfid_tag(&self) -> Option<&str> {
        self.filter_rfid_tag.as_deref()
    }

    pub fn filter_type(&self) -> Option<FilterType> {
        self.filter_type
    }

    pub fn button_pressed(&self) -> Option<&str> {
        self.button_pressed.as_deref()
    }

    pub fn app_extra(&self) -> Option<&Value> {
        present(&self.data, "app_extra")
    }
}

impl TryFrom<RawStatus> for StatusSnapshot {
    type Error = DecodeError;

    fn try_from(data: RawStatus) -> Result<Self, Self::Error> {
        StatusSnapshot::new(data, &shared_classifier())
    }
}

// JSON form is the raw mapping
impl Serialize for StatusSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

struct Opt<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Opt<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => fmt::Display::fmt(v, f),
            None => f.write_str("None"),
        }
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Power: {}", self.power())?;
        writeln!(f, "AQI: {} μg/m³", self.aqi)?;
        writeln!(f, "Average AQI: {} μg/m³", self.average_aqi)?;
        writeln!(f, "Humidity: {} %", self.humidity)?;
        writeln!(f, "Temperature: {} °C", Opt(&self.temperature))?;
        writeln!(f, "Fan Level: {}", self.fan_level)?;
        writeln!(f, "Mode: {}", self.mode)?;
        writeln!(f, "LED: {}", self.led)?;
        writeln!(f, "LED brightness: {}", Opt(&self.led_brightness))?;
        writeln!(f, "Buzzer: {}", Opt(&self.buzzer))?;
        writeln!(f, "Child lock: {}", self.child_lock)?;
        writeln!(f, "Favorite level: {}", self.favorite_level)?;
        writeln!(f, "Filter life remaining: {} %", self.filter_life_remaining)?;
        writeln!(f, "Filter hours used: {}", self.filter_hours_used)?;
        writeln!(f, "Use time: {} s", self.use_time)?;
        writeln!(f, "Purify volume: {} m³", self.purify_volume)?;
        writeln!(f, "Motor speed: {} rpm", self.motor_speed)?;
        writeln!(f, "Filter RFID product id: {}", Opt(&self.filter_rfid_product_id))?;
        writeln!(f, "Filter RFID tag: {}", Opt(&self.filter_rfid_tag))?;
        writeln!(f, "Filter type: {}", Opt(&self.filter_type))
    }
}
