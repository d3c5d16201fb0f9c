//! Tokio MQTT client wrapping `rumqttc`
//!
//! The simulator talks to the broker through four operations: connect,
//! publish, is_connected, disconnect. Everything else (TLS session,
//! keep-alive pings, QoS 1 acknowledgments, reconnects) is driven by the
//! `rumqttc` event loop running in a background task spawned at connect
//! time. The simulation loop never coordinates with that task beyond the
//! client handle and a shared connection flag.

use crate::error::{ConnectorError, ConnectorResult};
use rumqttc::{
    AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS, TlsConfiguration, Transport,
};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Delay before the event loop re-polls after a connection error
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Bound on waiting for the event loop to wind down after a disconnect
const DISCONNECT_GRACE: Duration = Duration::from_secs(5);

/// Broker connection settings for one device.
#[derive(Debug, Clone)]
pub struct MqttSettings {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub ca_path: PathBuf,
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub keep_alive: Duration,
    pub clean_session: bool,
    pub connect_timeout: Duration,
}

impl MqttSettings {
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn base_options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(self.client_id.clone(), self.host.clone(), self.port);
        options.set_keep_alive(self.keep_alive);
        options.set_clean_session(self.clean_session);
        options
    }

    /// Build the full client options, reading the trust anchor and the
    /// device credentials from disk.
    fn to_mqtt_options(&self) -> ConnectorResult<MqttOptions> {
        let ca = fs::read(&self.ca_path)?;
        let client_cert = fs::read(&self.cert_path)?;
        let client_key = fs::read(&self.key_path)?;

        let mut options = self.base_options();
        options.set_transport(Transport::Tls(TlsConfiguration::Simple {
            ca,
            alpn: None,
            client_auth: Some((client_cert, client_key)),
        }));
        Ok(options)
    }
}

/// Handle to a connected broker session.
///
/// Dropping the handle without calling [`BedMqttClient::disconnect`] leaves
/// the DISCONNECT unsent; the broker will time the session out via
/// keep-alive instead.
pub struct BedMqttClient {
    client: AsyncClient,
    connected: Arc<AtomicBool>,
    closing: Arc<AtomicBool>,
    event_loop_task: JoinHandle<()>,
    endpoint: String,
}

impl BedMqttClient {
    /// Connect to the broker and wait for its acknowledgment.
    ///
    /// Spawns the event-loop task, then blocks up to the configured connect
    /// timeout for the first ConnAck. Any failure here is fatal to the
    /// caller; after a successful return, reconnects are handled by the
    /// event loop on its own.
    pub async fn connect(settings: MqttSettings) -> ConnectorResult<Self> {
        let endpoint = settings.endpoint();
        let options = settings.to_mqtt_options()?;

        let (client, event_loop) = AsyncClient::new(options, 10);
        let connected = Arc::new(AtomicBool::new(false));
        let closing = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = oneshot::channel();

        let event_loop_task = tokio::spawn(run_event_loop(
            event_loop,
            Arc::clone(&connected),
            Arc::clone(&closing),
            ready_tx,
            endpoint.clone(),
        ));

        match tokio::time::timeout(settings.connect_timeout, ready_rx).await {
            Ok(Ok(Ok(()))) => Ok(Self {
                client,
                connected,
                closing,
                event_loop_task,
                endpoint,
            }),
            Ok(Ok(Err(reason))) => {
                event_loop_task.abort();
                Err(ConnectorError::ConnectionFailed { endpoint, reason })
            }
            Ok(Err(_recv)) => {
                event_loop_task.abort();
                Err(ConnectorError::ConnectionFailed {
                    endpoint,
                    reason: "event loop terminated before the broker acknowledged".to_string(),
                })
            }
            Err(_elapsed) => {
                event_loop_task.abort();
                Err(ConnectorError::ConnectionFailed {
                    endpoint,
                    reason: format!(
                        "no acknowledgment within {}s",
                        settings.connect_timeout.as_secs()
                    ),
                })
            }
        }
    }

    /// Hand a message to the transport. QoS 1 delivery acknowledgment is
    /// driven by the background event loop.
    pub async fn publish(&self, topic: &str, payload: &str, qos: QoS) -> ConnectorResult<()> {
        self.client
            .publish(topic, qos, false, payload.as_bytes().to_vec())
            .await
            .map_err(|e| ConnectorError::PublishFailed {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }

    /// Last connection state observed by the event loop.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Send DISCONNECT and wait for the event loop to wind down.
    pub async fn disconnect(self) -> ConnectorResult<()> {
        self.closing.store(true, Ordering::SeqCst);
        self.client
            .disconnect()
            .await
            .map_err(|e| ConnectorError::ConnectionFailed {
                endpoint: self.endpoint.clone(),
                reason: format!("disconnect request failed: {e}"),
            })?;
        if tokio::time::timeout(DISCONNECT_GRACE, self.event_loop_task)
            .await
            .is_err()
        {
            warn!(endpoint = %self.endpoint, "event loop did not stop within grace period");
        }
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Drive the `rumqttc` event loop until a clean shutdown.
///
/// ConnAck marks the connection up (the first one also resolves the
/// caller's connect), errors mark it down. Outside of shutdown an error is
/// followed by a short pause and another poll, which re-dials the broker;
/// that is the automatic reconnect.
async fn run_event_loop(
    mut event_loop: EventLoop,
    connected: Arc<AtomicBool>,
    closing: Arc<AtomicBool>,
    ready: oneshot::Sender<Result<(), String>>,
    endpoint: String,
) {
    let mut ready = Some(ready);
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                connected.store(true, Ordering::SeqCst);
                if let Some(tx) = ready.take() {
                    let _ = tx.send(Ok(()));
                    info!(%endpoint, "connected to broker");
                } else {
                    info!(%endpoint, "reconnected to broker");
                }
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                connected.store(false, Ordering::SeqCst);
                debug!(%endpoint, "disconnect sent");
            }
            Ok(_) => {}
            Err(e) => {
                let was_connected = connected.swap(false, Ordering::SeqCst);
                if closing.load(Ordering::SeqCst) {
                    debug!(%endpoint, "event loop stopped: {e}");
                    break;
                }
                if let Some(tx) = ready.take() {
                    // Initial connect failed; the caller decides what to do.
                    let _ = tx.send(Err(e.to_string()));
                } else if was_connected {
                    warn!(%endpoint, error = %e, "connection lost, transport will retry");
                } else {
                    debug!(%endpoint, error = %e, "reconnect attempt failed");
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn settings_with_certs(dir: &Path) -> MqttSettings {
        MqttSettings {
            host: "broker.example".to_string(),
            port: 8883,
            client_id: "PatientBed1".to_string(),
            ca_path: dir.join("AmazonRootCA1.pem"),
            cert_path: dir.join("device_1.pem.crt"),
            key_path: dir.join("device_1.private.key"),
            keep_alive: Duration::from_secs(60),
            clean_session: true,
            connect_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn endpoint_joins_host_and_port() {
        let settings = settings_with_certs(Path::new("./certs"));
        assert_eq!(settings.endpoint(), "broker.example:8883");
    }

    #[test]
    fn base_options_carry_session_settings() {
        let settings = settings_with_certs(Path::new("./certs"));
        let options = settings.base_options();
        assert_eq!(options.client_id(), "PatientBed1");
        assert_eq!(
            options.broker_address(),
            ("broker.example".to_string(), 8883)
        );
        assert_eq!(options.keep_alive(), Duration::from_secs(60));
        assert!(options.clean_session());
    }

    #[test]
    fn missing_credentials_surface_as_certificate_error() {
        let settings = settings_with_certs(Path::new("./no-such-dir"));
        let err = settings.to_mqtt_options().unwrap_err();
        assert!(matches!(err, ConnectorError::Certificate(_)));
    }

    #[test]
    fn options_select_tls_transport_when_credentials_exist() {
        let dir = std::env::temp_dir().join(format!("bedsim-certs-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for name in ["AmazonRootCA1.pem", "device_1.pem.crt", "device_1.private.key"] {
            fs::write(dir.join(name), b"-----BEGIN TEST-----\n").unwrap();
        }

        let settings = settings_with_certs(&dir);
        let options = settings.to_mqtt_options().unwrap();
        assert!(matches!(options.transport(), Transport::Tls(_)));

        fs::remove_dir_all(&dir).unwrap();
    }
}
