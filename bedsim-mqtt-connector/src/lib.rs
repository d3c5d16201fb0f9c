//! MQTT transport for the patient bed simulator
//!
//! A thin wrapper over `rumqttc` exposing exactly the operations the
//! simulation loop needs (`connect`, `publish`, `is_connected`,
//! `disconnect`) with mutual TLS against AWS IoT. The wrapped event loop
//! runs in a background task and owns keep-alive, QoS 1 delivery and
//! automatic reconnect; the simulator only sequences synchronous calls
//! against the handle.

pub mod error;
pub mod tokio_client;

pub use error::{ConnectorError, ConnectorResult};
pub use tokio_client::{BedMqttClient, MqttSettings};

// Callers pick the delivery assurance level without importing rumqttc.
pub use rumqttc::QoS;
