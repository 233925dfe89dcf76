use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::storage::StoreLayout;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_DATA_DIR: &str = ".studydesk";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StudyDeskConfig {
    /// Directory holding one database file per store
    pub data_dir: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Directory of a built web client to serve for non-API paths
    pub static_dir: Option<String>,
}

/// Fully resolved server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub layout: StoreLayout,
    pub static_dir: Option<PathBuf>,
}

impl StudyDeskConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    pub fn layout(&self) -> StoreLayout {
        StoreLayout::new(self.data_dir())
    }

    /// Resolve the listen address and store layout, falling back to defaults
    pub fn resolve(&self) -> anyhow::Result<ServerSettings> {
        let ip: IpAddr = match self.host.as_deref() {
            Some(host) => host
                .parse::<IpAddr>()
                .map_err(|e| anyhow::anyhow!("invalid host '{}': {}", host, e))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = self.port.unwrap_or(DEFAULT_PORT);

        Ok(ServerSettings {
            addr: SocketAddr::new(ip, port),
            layout: self.layout(),
            static_dir: self.static_dir.as_deref().map(PathBuf::from),
        })
    }

    /// Overlay values given on the command line
    pub fn merge(mut self, data_dir: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = Some(dir.to_string_lossy().to_string());
        }
        if host.is_some() {
            self.host = host;
        }
        if port.is_some() {
            self.port = port;
        }
        self
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("studydesk.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<StudyDeskConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: StudyDeskConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &StudyDeskConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = StudyDeskConfig::default().resolve().unwrap();
        assert_eq!(settings.addr.port(), 5001);
        assert!(settings.addr.ip().is_unspecified());
        assert_eq!(settings.layout.data_dir(), Path::new(".studydesk"));
        assert!(settings.static_dir.is_none());
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let config = StudyDeskConfig {
            data_dir: Some("/srv/desk".into()),
            host: Some("127.0.0.1".into()),
            port: Some(8080),
            static_dir: None,
        }
        .merge(None, None, Some(9000));

        let settings = config.resolve().unwrap();
        assert_eq!(settings.addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(settings.layout.data_dir(), Path::new("/srv/desk"));
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let config = StudyDeskConfig {
            host: Some("not-an-ip".into()),
            ..Default::default()
        };
        assert!(config.resolve().is_err());
    }

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("studydesk.toml");
        let config = StudyDeskConfig {
            data_dir: Some("data".into()),
            port: Some(7000),
            ..Default::default()
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.port, Some(7000));
        assert_eq!(loaded.data_dir.as_deref(), Some("data"));

        assert!(load_config(Some(&dir.path().join("missing.toml"))).unwrap().is_none());
    }
}
