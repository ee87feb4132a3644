//! Fixed advisory rules: temperature comfort and air-quality levels.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdvisoryError {
    #[error("unexpected air quality index {0} (expected 1 to 5)")]
    UnexpectedIndex(i64),
}

/// Comfort advice for a temperature in °C. Both thresholds are strict.
pub fn comfort_text(temp_c: f64) -> &'static str {
    if temp_c > 30.0 {
        "hot. Stay hydrated."
    } else if temp_c < 10.0 {
        "cold. Wear warm clothes."
    } else {
        "pleasant."
    }
}

/// One row of the air-quality table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiLevel {
    pub index: u8,
    pub label: &'static str,
    pub color: &'static str,
    pub advice: &'static str,
}

impl AqiLevel {
    /// Width of the AQI fill bar, in percent.
    pub fn bar_width_percent(&self) -> u8 {
        self.index * 20
    }
}

const AQI_LEVELS: [AqiLevel; 5] = [
    AqiLevel {
        index: 1,
        label: "Good 😊",
        color: "#2ecc71",
        advice: "Enjoy outdoor activities",
    },
    AqiLevel {
        index: 2,
        label: "Fair 🙂",
        color: "#27ae60",
        advice: "Sensitive people be cautious",
    },
    AqiLevel {
        index: 3,
        label: "Moderate 😐",
        color: "#f1c40f",
        advice: "Reduce outdoor exposure",
    },
    AqiLevel {
        index: 4,
        label: "Poor 😷",
        color: "#e67e22",
        advice: "Avoid outdoor activities",
    },
    AqiLevel {
        index: 5,
        label: "Very Poor ☠️",
        color: "#e74c3c",
        advice: "Stay indoors",
    },
];

/// Look up the level for an index in 1..=5.
pub fn aqi_descriptor(index: i64) -> Result<&'static AqiLevel, AdvisoryError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| AQI_LEVELS.get(i))
        .ok_or(AdvisoryError::UnexpectedIndex(index))
}
