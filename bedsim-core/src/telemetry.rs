//! Telemetry record and payload serialization
//!
//! One [`TelemetrySample`] is built per publish tick, serialized and
//! dropped; no history is retained. The wire payload is 4-space-indented
//! JSON whose key order follows the field declaration order here:
//! deviceId, timestamp, heartRate, spo2, inclination, bedState.

use crate::incline::{BedState, SimulatorState};
use crate::vitals::Vitals;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Timestamp layout: local time with UTC offset, second precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// One published telemetry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    pub device_id: String,
    pub timestamp: String,
    pub heart_rate: f64,
    pub spo2: f64,
    pub inclination: f64,
    pub bed_state: BedState,
}

impl TelemetrySample {
    pub fn new(
        device_id: &str,
        at: DateTime<FixedOffset>,
        vitals: Vitals,
        state: &SimulatorState,
    ) -> Self {
        Self {
            device_id: device_id.to_string(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            heart_rate: vitals.heart_rate,
            spo2: vitals.spo2,
            inclination: state.inclination_degrees(),
            bed_state: state.bed_state(),
        }
    }

    /// Serialize to the wire payload: pretty JSON with 4-space indentation.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8(buf).expect("serde_json emits valid UTF-8"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use chrono::TimeZone;

    fn sample() -> TelemetrySample {
        TelemetrySample {
            device_id: "PatientBed1".to_string(),
            timestamp: "2025-06-02T08:05:00+05:30".to_string(),
            heart_rate: 72.5,
            spo2: 97.25,
            inclination: 60.0,
            bed_state: BedState::Inclined,
        }
    }

    #[test]
    fn payload_round_trips() {
        let original = sample();
        let json = original.to_json().unwrap();
        let parsed: TelemetrySample = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn payload_uses_stable_key_order() {
        let json = sample().to_json().unwrap();
        let positions: Vec<usize> = [
            "\"deviceId\"",
            "\"timestamp\"",
            "\"heartRate\"",
            "\"spo2\"",
            "\"inclination\"",
            "\"bedState\"",
        ]
        .iter()
        .map(|key| json.find(key).unwrap_or_else(|| panic!("missing {key}")))
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn payload_is_indented_with_four_spaces() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\n    \"deviceId\""));
        assert!(!json.contains("\n  \""));
    }

    #[test]
    fn bed_state_serializes_as_label() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"bedState\": \"INCLINED\""));

        let flat = TelemetrySample {
            bed_state: BedState::Flat,
            ..sample()
        };
        assert!(flat.to_json().unwrap().contains("\"bedState\": \"FLAT\""));
    }

    #[test]
    fn timestamp_formats_with_offset_and_second_precision() {
        let at = FixedOffset::east_opt(5 * 3600 + 30 * 60)
            .unwrap()
            .with_ymd_and_hms(2025, 6, 2, 8, 5, 0)
            .unwrap();
        assert_eq!(
            at.format(TIMESTAMP_FORMAT).to_string(),
            "2025-06-02T08:05:00+05:30"
        );
    }
}
