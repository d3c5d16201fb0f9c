//! Telemetry publisher loop
//!
//! Fixed five-second cadence: sample vitals, advance the inclination state
//! machine, build and serialize the telemetry record, publish at QoS 1,
//! sleep. The sleep follows the publish attempt, so the effective period is
//! the interval plus publish latency. A publish failure is logged and the
//! loop carries on; only the initial connect is fatal. Ctrl-C breaks the
//! loop and runs the clean disconnect.

use bedsim_core::config::{
    CA_CERT_PATH, CONNECT_TIMEOUT, KEEP_ALIVE, PUBLISH_INTERVAL, SERVER_HOST, SERVER_PORT,
};
use bedsim_core::{Clock, DeviceIdentity, SimulatorState, SystemClock, TelemetrySample, Vitals};
use bedsim_mqtt_connector::{BedMqttClient, ConnectorResult, MqttSettings, QoS};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

pub async fn run(instance: &str) -> ConnectorResult<()> {
    let identity = DeviceIdentity::new(instance);
    info!(
        client_id = %identity.client_id,
        topic = %identity.topic,
        "starting patient bed simulator"
    );

    let settings = MqttSettings {
        host: SERVER_HOST.to_string(),
        port: SERVER_PORT,
        client_id: identity.client_id.clone(),
        ca_path: CA_CERT_PATH.into(),
        cert_path: identity.cert_path.clone(),
        key_path: identity.key_path.clone(),
        keep_alive: KEEP_ALIVE,
        clean_session: true,
        connect_timeout: CONNECT_TIMEOUT,
    };

    info!(endpoint = %settings.endpoint(), "connecting to MQTT broker");
    let client = BedMqttClient::connect(settings).await?;

    let clock = SystemClock::new();
    let mut rng = StdRng::from_entropy();
    let mut state = SimulatorState::new(&clock.now(), &mut rng);

    let mut shutdown = std::pin::pin!(tokio::signal::ctrl_c());
    loop {
        let vitals = Vitals::sample(&mut rng);
        let now = clock.now();
        let (next, transition) = state.advance(&now, &mut rng);
        state = next;
        if let Some(transition) = transition {
            info!(bed = %identity.instance, "bed {transition}");
        }

        let sample = TelemetrySample::new(&identity.client_id, now.wall, vitals, &state);
        match sample.to_json() {
            Ok(payload) => {
                if !client.is_connected() {
                    warn!("client not connected, relying on transport reconnect");
                }
                if let Err(e) = client.publish(&identity.topic, &payload, QoS::AtLeastOnce).await {
                    error!(error = %e, "publish failed");
                }
            }
            Err(e) => error!(error = %e, "telemetry serialization failed"),
        }

        tokio::select! {
            _ = tokio::time::sleep(PUBLISH_INTERVAL) => {}
            _ = &mut shutdown => {
                info!("shutdown signal received, disconnecting");
                break;
            }
        }
    }

    client.disconnect().await?;
    info!("disconnected");
    Ok(())
}
