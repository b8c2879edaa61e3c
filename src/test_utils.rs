/*
 * Test utilities and mock helpers for miot-purifier
 *
 * This module provides common fixtures (a representative raw status report
 * and its wire form) that can be used across different test modules.
 */

#[cfg(test)]
pub mod test_utils {
    use crate::address::AddressTable;
    use crate::status::RawStatus;
    use crate::transport::PropertyValue;
    use serde_json::json;

    /// Raw status as reported by a purifier in auto mode with an
    /// anti-bacterial filter installed.
    pub fn create_mock_raw_status() -> RawStatus {
        let mut raw = RawStatus::new();
        raw.insert("power".to_string(), json!(true));
        raw.insert("aqi".to_string(), json!(10));
        raw.insert("average_aqi".to_string(), json!(8));
        raw.insert("humidity".to_string(), json!(62));
        raw.insert("temperature".to_string(), json!(18.6));
        raw.insert("fan_level".to_string(), json!(2));
        raw.insert("mode".to_string(), json!(0));
        raw.insert("led".to_string(), json!(true));
        raw.insert("led_brightness".to_string(), json!(1));
        raw.insert("buzzer".to_string(), json!(false));
        raw.insert("child_lock".to_string(), json!(false));
        raw.insert("favorite_level".to_string(), json!(10));
        raw.insert("filter_life_remaining".to_string(), json!(80));
        raw.insert("filter_hours_used".to_string(), json!(682));
        raw.insert("use_time".to_string(), json!(2457000));
        raw.insert("purify_volume".to_string(), json!(25262));
        raw.insert("motor_speed".to_string(), json!(354));
        raw.insert("filter_rfid_product_id".to_string(), json!("0:0:41:30"));
        raw.insert("filter_rfid_tag".to_string(), json!("10:20:30:40:50:60:7"));
        raw.insert("button_pressed".to_string(), json!("power"));
        raw
    }

    /// Wire form of a raw status: one entry per name with a table address.
    pub fn mock_property_values(raw: &RawStatus) -> Vec<PropertyValue> {
        AddressTable::new()
            .iter()
            .filter_map(|(name, addr)| raw.get(name).map(|v| PropertyValue::new(addr, v.clone())))
            .collect()
    }
}
