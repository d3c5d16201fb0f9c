//! Simulation core for the patient bed telemetry simulator
//!
//! Everything in this crate is pure: the inclination state machine advances
//! as a value transition over an injected clock snapshot and random source,
//! vital signs are plain uniform draws, and the telemetry record is a value
//! object serialized once per tick. Transport, logging and scheduling live
//! in the `bedsim-mqtt-connector` and `bedsim-simulator` crates.

pub mod clock;
pub mod config;
pub mod incline;
pub mod telemetry;
pub mod vitals;

pub use clock::{Clock, SystemClock, TickInstant};
pub use config::DeviceIdentity;
pub use incline::{BedState, InclineRegime, SimulatorState, Transition};
pub use telemetry::TelemetrySample;
pub use vitals::Vitals;
