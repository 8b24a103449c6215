use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use mindscreen_api::config::ServerConfig;

fn from(pairs: &[(&str, &str)]) -> eyre::Result<ServerConfig> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ServerConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_when_unset() {
    let config = from(&[]).unwrap();
    assert_eq!(config.config_dir, PathBuf::from("config"));
    assert_eq!(config.addr, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    assert_eq!(config.port, 7860);
    assert_eq!(config.socket_addr().to_string(), "0.0.0.0:7860");
}

#[test]
fn reads_overrides() {
    let config = from(&[
        ("MINDSCREEN_CONFIG_DIR", "/etc/mindscreen"),
        ("MINDSCREEN_ADDR", "127.0.0.1"),
        ("PORT", "8080"),
    ])
    .unwrap();
    assert_eq!(config.config_dir, PathBuf::from("/etc/mindscreen"));
    assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
}

#[test]
fn rejects_bad_port() {
    let err = from(&[("PORT", "eighty")]).unwrap_err();
    assert!(err.to_string().contains("invalid PORT"));
}
