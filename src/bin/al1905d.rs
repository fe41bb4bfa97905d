//! Process entry point (§6): loads configuration, opens the raw socket on the
//! configured interface, and runs the event loop until killed.

use al1905d::config::{Cli, Config};
use al1905d::dispatcher::socket::AfPacketSocket;
use al1905d::AlEntity;
use clap::Parser;
use std::process::ExitCode;
use std::time::{Duration, Instant};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("al1905d: {e}");
            return ExitCode::from(1);
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_level))
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("al1905d: a tracing subscriber was already installed");
    }

    run(config).map(|()| ExitCode::SUCCESS).unwrap_or_else(|e| {
        tracing::error!(error = %e, "al1905d exiting");
        ExitCode::from(e.exit_code() as u8)
    })
}

fn run(config: Config) -> al1905d::Result<()> {
    let local_mac = config
        .al_mac_address
        .ok_or_else(|| al1905d::Error::Config(al1905d::config::ConfigError::InvalidMacAddress(
            "no --al-mac-address given and automatic interface MAC lookup is not wired up".into(),
        )))?;

    let socket = AfPacketSocket::bind(&config.interface, local_mac)?;
    let mut entity = AlEntity::new(socket);

    if config.registrar {
        let (Some(ssid), Some(passphrase)) = (config.backhaul_ssid.clone(), config.backhaul_passphrase.clone())
        else {
            unreachable!("Config::load already validated registrar credentials are present");
        };
        entity.network.registrar = Some(al1905d::model::Registrar::new(local_mac, ssid, passphrase));
        tracing::info!("acting as Multi-AP registrar");
    }

    tracing::info!(interface = %config.interface, al_mac = ?local_mac, "al1905d starting");

    let started_at = Instant::now();
    loop {
        let now = started_at.elapsed();
        match entity.poll(now) {
            Ok(outcome) if outcome.idle => std::thread::sleep(Duration::from_millis(50)),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "dropping this poll iteration"),
        }
    }
}
