//! Compiled-in simulator configuration
//!
//! The simulator models exactly one bed with hardcoded timing constants;
//! nothing here is environment-driven. Device-specific values (client id,
//! topic, credential paths) are derived from the instance number passed on
//! the command line.

use std::ops::Range;
use std::path::PathBuf;
use std::time::Duration;

/// AWS IoT broker endpoint host
pub const SERVER_HOST: &str = "a22bv8r2s2kek2-ats.iot.eu-north-1.amazonaws.com";

/// AWS IoT broker TLS port
pub const SERVER_PORT: u16 = 8883;

const CLIENT_ID_PREFIX: &str = "PatientBed";
const TOPIC_PREFIX: &str = "PatientBed/";

/// Trust anchor for the broker's server certificate
pub const CA_CERT_PATH: &str = "./certs/AmazonRootCA1.pem";

const CLIENT_CERT_DIR: &str = "./certs";

/// Period of the telemetry publish loop
pub const PUBLISH_INTERVAL: Duration = Duration::from_secs(5);

/// MQTT keep-alive interval
pub const KEEP_ALIVE: Duration = Duration::from_secs(60);

/// Upper bound on the initial broker handshake
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Meal start times as (hour, minute) in local time
pub const MEAL_START_TIMES: [(u32, u32); 3] = [(8, 0), (12, 0), (18, 0)];

/// Length of each meal window in minutes
pub const MEAL_INCLINE_DURATION_MINUTES: u32 = 30;

/// Inclination held for the whole meal window
pub const MEAL_INCLINE_DEGREES: f64 = 60.0;

/// Inclination of a minor (non-meal) incline
pub const MINOR_INCLINE_DEGREES: f64 = 30.0;

/// Minor incline dwell: base minutes plus a random addon below the bound
pub const MINOR_DWELL_BASE_MINUTES: u64 = 10;
pub const MINOR_DWELL_RAND_ADD_MINUTES: u64 = 5;

/// Flat dwell: base minutes plus a random addon below the bound
pub const FLAT_DWELL_BASE_MINUTES: u64 = 45;
pub const FLAT_DWELL_RAND_ADD_MINUTES: u64 = 15;

/// Chance of a minor incline when a flat dwell expires
pub const MINOR_INCLINE_PROBABILITY: f64 = 0.20;

/// Heart rate sampling range in beats per minute
pub const HEART_RATE_RANGE: Range<f64> = 55.0..85.0;

/// SpO2 sampling range in percent
pub const SPO2_RANGE: Range<f64> = 95.0..99.5;

/// Identity of one simulated bed, derived from its instance number.
///
/// Instance `"1"` yields client id `PatientBed1`, topic `PatientBed/1/data`
/// and the per-device credential files under `./certs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub instance: String,
    pub client_id: String,
    pub topic: String,
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl DeviceIdentity {
    pub fn new(instance: &str) -> Self {
        Self {
            instance: instance.to_string(),
            client_id: format!("{CLIENT_ID_PREFIX}{instance}"),
            topic: format!("{TOPIC_PREFIX}{instance}/data"),
            cert_path: PathBuf::from(format!("{CLIENT_CERT_DIR}/device_{instance}.pem.crt")),
            key_path: PathBuf::from(format!("{CLIENT_CERT_DIR}/device_{instance}.private.key")),
        }
    }
}
