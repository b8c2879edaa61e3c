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

//! Filter cartridge classification from the RFID product id.
//!
//! Product ids look like `"<n>:<n>:<code>:<subcode>"`. Rules are tried in
//! order and the first match wins; anything unmatched is a regular filter.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Tag reported when the reader sees a cartridge without a readable chip.
pub const EMPTY_RFID_TAG: &str = "0:0:0:0:0:0:0";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterType {
    Regular,
    AntiBacterial,
    AntiFormaldehyde,
    Unknown,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Regular => "regular",
            FilterType::AntiBacterial => "anti-bacterial",
            FilterType::AntiFormaldehyde => "anti-formaldehyde",
            FilterType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// A single trailing newline still matches.
const FILTER_TYPE_RULES: &[(&str, FilterType)] = &[
    (r"^\d+:\d+:41:30\n?$", FilterType::AntiBacterial),
    (r"^\d+:\d+:(30|0|00):31\n?$", FilterType::AntiFormaldehyde),
    (r".*", FilterType::Regular),
];

lazy_static! {
    static ref SHARED_CLASSIFIER: Arc<FilterTypeClassifier> = Arc::new(FilterTypeClassifier::new());
}

/// Process-wide classifier used when a device is not handed its own.
pub fn shared_classifier() -> Arc<FilterTypeClassifier> {
    Arc::clone(&SHARED_CLASSIFIER)
}

#[derive(Debug)]
pub struct FilterTypeClassifier {
    rules: Vec<(Regex, FilterType)>,
    cache: Mutex<HashMap<String, FilterType>>,
    // Number of times the rule list was walked (cache misses)
    evaluations: AtomicUsize,
}

impl Default for FilterTypeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterTypeClassifier {
    pub fn new() -> Self {
        let rules = FILTER_TYPE_RULES
            .iter()
            .filter_map(|(pattern, ft)| Regex::new(pattern).ok().map(|re| (re, *ft)))
            .collect();
        Self {
            rules,
            cache: Mutex::new(HashMap::new()),
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Determine the filter type for a product id such as `"0:0:30:33"`.
    ///
    /// Results are memoized per exact product id string. Two threads racing on
    /// the same uncached id both evaluate the rules and store the same value.
    pub fn classify(&self, product_id: &str) -> FilterType {
        if let Some(ft) = self.lock_cache().get(product_id) {
            return *ft;
        }

        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let ft = self
            .rules
            .iter()
            .find(|(re, _)| re.is_match(product_id))
            .map(|(_, ft)| *ft)
            .unwrap_or(FilterType::Regular);

        self.lock_cache().insert(product_id.to_string(), ft);
        ft
    }

    pub fn rule_evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, FilterType>> {
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Filter type from the two RFID fields of a status report.
///
/// No tag means nothing is known; the all-zero tag means an unreadable
/// cartridge; a tag without a product id is treated as a regular filter.
pub fn determine_filter_type(
    classifier: &FilterTypeClassifier,
    rfid_tag: Option<&str>,
    product_id: Option<&str>,
) -> Option<FilterType> {
    let tag = rfid_tag?;
    if tag == EMPTY_RFID_TAG {
        return Some(FilterType::Unknown);
    }
    match product_id {
        None => Some(FilterType::Regular),
        Some(pid) => Some(classifier.classify(pid)),
    }
}
