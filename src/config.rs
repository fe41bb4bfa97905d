//! Process configuration (§6): a `clap`-derived CLI surface with an optional
//! TOML config file merged underneath it, so deployments can ship a static
//! config while still allowing ad-hoc overrides on the command line.

use crate::codec::macaddr::MacAddr;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--al-mac-address {0} is not a valid MAC address (expected xx:xx:xx:xx:xx:xx)")]
    InvalidMacAddress(String),
    #[error("config file {0}: {1}")]
    File(PathBuf, std::io::Error),
    #[error("config file {0}: {1}")]
    Toml(PathBuf, String),
    #[error("--registrar requires --backhaul-ssid and --backhaul-passphrase")]
    RegistrarWithoutCredentials,
}

#[derive(Debug, Parser)]
#[command(name = "al1905d", about = "IEEE 1905.1/1a Abstraction-Layer entity with Multi-AP provisioning")]
pub struct Cli {
    /// Interface to bind the raw 1905 socket to.
    #[arg(long)]
    pub interface: String,

    /// This device's AL MAC address, as xx:xx:xx:xx:xx:xx. Defaults to the
    /// interface's own hardware address when omitted.
    #[arg(long, value_parser = parse_mac)]
    pub al_mac_address: Option<MacAddr>,

    /// Act as the Multi-AP registrar/controller for this segment.
    #[arg(long)]
    pub registrar: bool,

    #[arg(long, requires = "registrar")]
    pub backhaul_ssid: Option<String>,

    #[arg(long, requires = "registrar")]
    pub backhaul_passphrase: Option<String>,

    /// Optional TOML file merged underneath the flags above (flags win).
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn parse_mac(s: &str) -> Result<MacAddr, String> {
    let mut mac = [0u8; 6];
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 6 {
        return Err(format!("expected 6 colon-separated hex octets, got {}", parts.len()));
    }
    for (i, part) in parts.iter().enumerate() {
        mac[i] = u8::from_str_radix(part, 16).map_err(|e| e.to_string())?;
    }
    Ok(mac)
}

#[derive(Debug, Default, serde::Deserialize)]
struct FileConfig {
    al_mac_address: Option<String>,
    registrar: Option<bool>,
    backhaul_ssid: Option<String>,
    backhaul_passphrase: Option<String>,
    log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub interface: String,
    pub al_mac_address: Option<MacAddr>,
    pub registrar: bool,
    pub backhaul_ssid: Option<String>,
    pub backhaul_passphrase: Option<String>,
    pub log_level: String,
}

impl Config {
    pub fn load(cli: Cli) -> Result<Config, ConfigError> {
        let file = match &cli.config_file {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| ConfigError::File(path.clone(), e))?;
                toml::from_str::<FileConfig>(&text).map_err(|e| ConfigError::Toml(path.clone(), e.to_string()))?
            }
            None => FileConfig::default(),
        };

        let al_mac_address = match cli.al_mac_address {
            Some(mac) => Some(mac),
            None => file
                .al_mac_address
                .as_deref()
                .map(parse_mac)
                .transpose()
                .map_err(ConfigError::InvalidMacAddress)?,
        };

        let registrar = cli.registrar || file.registrar.unwrap_or(false);
        let backhaul_ssid = cli.backhaul_ssid.or(file.backhaul_ssid);
        let backhaul_passphrase = cli.backhaul_passphrase.or(file.backhaul_passphrase);

        if registrar && (backhaul_ssid.is_none() || backhaul_passphrase.is_none()) {
            return Err(ConfigError::RegistrarWithoutCredentials);
        }

        Ok(Config {
            interface: cli.interface,
            al_mac_address,
            registrar,
            backhaul_ssid,
            backhaul_passphrase,
            log_level: if cli.log_level == "info" {
                file.log_level.unwrap_or(cli.log_level)
            } else {
                cli.log_level
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registrar_without_credentials_is_rejected() {
        let cli = Cli {
            interface: "eth0".into(),
            al_mac_address: None,
            registrar: true,
            backhaul_ssid: None,
            backhaul_passphrase: None,
            config_file: None,
            log_level: "info".into(),
        };
        assert!(matches!(Config::load(cli), Err(ConfigError::RegistrarWithoutCredentials)));
    }

    #[test]
    fn parses_a_well_formed_mac() {
        assert_eq!(parse_mac("01:02:03:04:05:06").unwrap(), [1, 2, 3, 4, 5, 6]);
        assert!(parse_mac("not-a-mac").is_err());
    }
}
