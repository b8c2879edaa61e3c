/*
 * Integration tests for miot-purifier
 *
 * These tests drive the device facade end to end against an in-memory
 * transport that stores property values per (siid, piid).
 */

use miot_purifier::address::PROPERTIES;
use miot_purifier::config::{load_config_from, save_config};
use miot_purifier::filter::FilterTypeClassifier;
use miot_purifier::{
    AirPurifierMiot, FilterType, LedBrightness, OperationMode, PropertyAddress, PropertyValue,
    PurifierConfig, PurifierError, StatusSnapshot, Transport, TransportError,
};
use serde_json::{json, Value};
use serial_test::serial;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

/// Device stand-in: writes update the stored state, reads echo it back.
struct FakeTransport {
    state: HashMap<PropertyAddress, Value>,
    get_calls: usize,
    set_calls: usize,
}

impl FakeTransport {
    fn new(initial: &[(&str, Value)]) -> Self {
        let mut state = HashMap::new();
        for (name, value) in initial {
            if let Some((_, addr)) = PROPERTIES.iter().find(|(n, _)| n == name) {
                state.insert(*addr, value.clone());
            }
        }
        Self { state, get_calls: 0, set_calls: 0 }
    }
}

impl Transport for FakeTransport {
    fn get_properties(&mut self, addresses: &[PropertyAddress]) -> Result<Vec<PropertyValue>, TransportError> {
        self.get_calls += 1;
        Ok(addresses
            .iter()
            .map(|addr| PropertyValue::new(*addr, self.state.get(addr).cloned().unwrap_or(Value::Null)))
            .collect())
    }

    fn set_property(&mut self, address: PropertyAddress, value: Value) -> Result<Value, TransportError> {
        self.set_calls += 1;
        self.state.insert(address, value);
        Ok(json!([{ "siid": address.siid, "piid": address.piid, "code": 0 }]))
    }
}

fn initial_state() -> Vec<(&'static str, Value)> {
    vec![
        ("power", json!(true)),
        ("aqi", json!(10)),
        ("average_aqi", json!(8)),
        ("humidity", json!(62)),
        ("temperature", json!(18.6)),
        ("fan_level", json!(2)),
        ("mode", json!(0)),
        ("led", json!(true)),
        ("led_brightness", json!(1)),
        ("buzzer", json!(false)),
        ("child_lock", json!(false)),
        ("favorite_level", json!(10)),
        ("filter_life_remaining", json!(80)),
        ("filter_hours_used", json!(682)),
        ("use_time", json!(2457000)),
        ("purify_volume", json!(25262)),
        ("motor_speed", json!(354)),
        ("filter_rfid_product_id", json!("0:0:41:30")),
        ("filter_rfid_tag", json!("10:20:30:40:50:60:7")),
    ]
}

fn device() -> AirPurifierMiot<FakeTransport> {
    AirPurifierMiot::new(FakeTransport::new(&initial_state()))
}

fn status(dev: &mut AirPurifierMiot<FakeTransport>) -> StatusSnapshot {
    dev.status().expect("status")
}

#[test]
fn test_on_off() {
    let mut dev = device();
    dev.off().unwrap();
    assert!(!status(&mut dev).is_on());
    assert_eq!(status(&mut dev).power(), "off");

    dev.on().unwrap();
    assert!(status(&mut dev).is_on());
}

#[test]
fn test_status() {
    let mut dev = device();
    let s = status(&mut dev);
    assert!(s.is_on());
    assert_eq!(s.aqi(), 10);
    assert_eq!(s.average_aqi(), 8);
    assert_eq!(s.humidity(), 62);
    assert_eq!(s.temperature(), Some(18.6));
    assert_eq!(s.fan_level(), 2);
    assert_eq!(s.mode(), OperationMode::Auto);
    assert!(s.led());
    assert_eq!(s.led_brightness(), Some(LedBrightness::Dim));
    assert_eq!(s.buzzer(), Some(false));
    assert!(!s.child_lock());
    assert_eq!(s.favorite_level(), 10);
    assert_eq!(s.filter_life_remaining(), 80);
    assert_eq!(s.filter_hours_used(), 682);
    assert_eq!(s.use_time(), 2457000);
    assert_eq!(s.purify_volume(), 25262);
    assert_eq!(s.motor_speed(), 354);
    assert_eq!(s.filter_rfid_product_id(), Some("0:0:41:30"));
    assert_eq!(s.filter_type(), Some(FilterType::AntiBacterial));
    // Not part of the property table
    assert_eq!(s.button_pressed(), None);
    assert_eq!(s.app_extra(), None);
    assert_eq!(dev.transport().get_calls, 1);
}

#[test]
fn test_set_fan_level() {
    let mut dev = device();
    for level in 1..=3 {
        dev.set_fan_level(level).unwrap();
        assert_eq!(status(&mut dev).fan_level(), level);
    }

    let sets_before = dev.transport().set_calls;
    assert!(matches!(dev.set_fan_level(0), Err(PurifierError::InvalidArgument(_))));
    assert!(matches!(dev.set_fan_level(4), Err(PurifierError::InvalidArgument(_))));
    assert_eq!(dev.transport().set_calls, sets_before);
    assert_eq!(status(&mut dev).fan_level(), 3);
}

#[test]
fn test_set_mode() {
    let mut dev = device();
    for mode in [OperationMode::Auto, OperationMode::Silent, OperationMode::Favorite, OperationMode::Fan] {
        dev.set_mode(mode).unwrap();
        assert_eq!(status(&mut dev).mode(), mode);
    }
}

#[test]
fn test_set_favorite_level() {
    let mut dev = device();
    for level in [0, 6, 14] {
        dev.set_favorite_level(level).unwrap();
        assert_eq!(status(&mut dev).favorite_level(), level);
    }

    assert!(matches!(dev.set_favorite_level(-1), Err(PurifierError::InvalidArgument(_))));
    assert!(matches!(dev.set_favorite_level(15), Err(PurifierError::InvalidArgument(_))));
    assert_eq!(status(&mut dev).favorite_level(), 14);
}

#[test]
fn test_set_led_brightness() {
    let mut dev = device();
    for brightness in [LedBrightness::Bright, LedBrightness::Dim, LedBrightness::Off] {
        dev.set_led_brightness(brightness).unwrap();
        assert_eq!(status(&mut dev).led_brightness(), Some(brightness));
    }
}

#[test]
fn test_set_led_buzzer_child_lock() {
    let mut dev = device();

    dev.set_led(true).unwrap();
    assert!(status(&mut dev).led());
    dev.set_led(false).unwrap();
    assert!(!status(&mut dev).led());

    dev.set_buzzer(true).unwrap();
    assert_eq!(status(&mut dev).buzzer(), Some(true));
    dev.set_buzzer(false).unwrap();
    assert_eq!(status(&mut dev).buzzer(), Some(false));

    dev.set_child_lock(true).unwrap();
    assert!(status(&mut dev).child_lock());
    dev.set_child_lock(false).unwrap();
    assert!(!status(&mut dev).child_lock());
}

#[test]
fn test_setter_returns_transport_reply() {
    let mut dev = device();
    let reply = dev.set_child_lock(true).unwrap();
    assert_eq!(reply, json!([{ "siid": 7, "piid": 1, "code": 0 }]));
}

#[test]
fn test_unrecognized_led_brightness_reads_as_absent() {
    let mut state = initial_state();
    state.retain(|(n, _)| *n != "led_brightness");
    state.push(("led_brightness", json!(5)));
    let mut dev = AirPurifierMiot::new(FakeTransport::new(&state));

    let s = status(&mut dev);
    assert_eq!(s.led_brightness(), None);
    assert_eq!(s.led_brightness_raw(), Some(&json!(5)));
}

#[test]
fn test_unreported_optional_fields() {
    let state: Vec<_> = initial_state()
        .into_iter()
        .filter(|(n, _)| !matches!(*n, "temperature" | "buzzer" | "led_brightness" | "filter_rfid_tag"))
        .collect();
    let mut dev = AirPurifierMiot::new(FakeTransport::new(&state));

    let s = status(&mut dev);
    assert_eq!(s.temperature(), None);
    assert_eq!(s.buzzer(), None);
    assert_eq!(s.led_brightness(), None);
    assert_eq!(s.led_brightness_raw(), None);
    assert_eq!(s.filter_type(), None);
}

#[test]
fn test_invalid_mode_fails_status() {
    let mut state = initial_state();
    state.retain(|(n, _)| *n != "mode");
    state.push(("mode", json!(4)));
    let mut dev = AirPurifierMiot::new(FakeTransport::new(&state));
    assert!(matches!(dev.status(), Err(PurifierError::Decode(_))));
}

#[test]
fn test_filter_classification_shared_across_snapshots() {
    let classifier = Arc::new(FilterTypeClassifier::new());
    let mut dev = device().with_classifier(Arc::clone(&classifier));

    for _ in 0..3 {
        assert_eq!(status(&mut dev).filter_type(), Some(FilterType::AntiBacterial));
    }
    assert_eq!(classifier.rule_evaluations(), 1);

    dev.set_property("filter_rfid_tag", json!("0:0:0:0:0:0:0")).unwrap();
    assert_eq!(status(&mut dev).filter_type(), Some(FilterType::Unknown));
}

#[test]
#[serial]
fn test_config_file_drives_batched_reads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let cfg = PurifierConfig {
        host: Some("192.168.1.42".to_string()),
        token: Some("ffffffffffffffffffffffffffffffff".to_string()),
        max_properties_per_request: Some(15),
        log_path: None,
    };
    save_config(&path, &cfg).unwrap();

    let loaded = load_config_from(&path).unwrap();
    let mut dev = AirPurifierMiot::with_config(FakeTransport::new(&initial_state()), &loaded).unwrap();
    let s = status(&mut dev);
    assert_eq!(s.motor_speed(), 354);
    // 20 properties in chunks of 15
    assert_eq!(dev.transport().get_calls, 2);
}

#[test]
fn test_summary_output() {
    let mut dev = device();
    let text = status(&mut dev).to_string();
    assert!(text.contains("Power: on"));
    assert!(text.contains("Average AQI: 8 μg/m³"));
    assert!(text.contains("Humidity: 62 %"));
    assert!(text.contains("Filter life remaining: 80 %"));
    assert!(text.contains("Use time: 2457000 s"));
    assert!(text.contains("Filter type: anti-bacterial"));
}
