use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_CONFIG_DIR: &str = "config";
const DEFAULT_PORT: u16 = 7860;

/// Process configuration, read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Root holding `instruments/`, `safety.yaml` and `crosswalk.yaml`.
    pub config_dir: PathBuf,
    pub addr: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let config_dir = lookup("MINDSCREEN_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));

        let addr = match lookup("MINDSCREEN_ADDR") {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|e| eyre::eyre!("invalid MINDSCREEN_ADDR '{raw}': {e}"))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| eyre::eyre!("invalid PORT '{raw}': {e}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            config_dir,
            addr,
            port,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr, self.port)
    }
}
