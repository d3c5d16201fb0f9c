//! Patient bed simulator
//!
//! Simulates one hospital bed: vital signs plus an inclination state
//! machine, published every five seconds to AWS IoT over mutual TLS.
//! The device instance number on the command line selects the client id,
//! the topic and the credential files.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod simulator;

#[derive(Debug, Parser)]
#[command(name = "bedsim")]
#[command(about = "Simulate one patient bed and publish its telemetry over MQTT")]
struct Cli {
    /// Device instance number (e.g. 1 or 2)
    instance: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        let _ = err.print();
        std::process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bedsim=info,bedsim_mqtt_connector=info,rumqttc=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = simulator::run(&cli.instance).await {
        tracing::error!(error = %e, "simulator failed");
        std::process::exit(1);
    }
}
