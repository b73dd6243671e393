use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_port")]
    pub port: u16,
    #[serde(default = "Config::default_cache_size")]
    pub cache_size: usize,
    #[serde(default = "Config::default_dns_server_ipaddr")]
    pub dns_server_ipaddr: Ipv4Addr,
    #[serde(default = "Config::default_filename")]
    pub filename: PathBuf,
    #[serde(default)]
    pub debug_level: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: Self::default_port(),
            cache_size: Self::default_cache_size(),
            dns_server_ipaddr: Self::default_dns_server_ipaddr(),
            filename: Self::default_filename(),
            debug_level: 0,
        }
    }
}

impl Config {
    fn default_port() -> u16 {
        53
    }

    fn default_cache_size() -> usize {
        1000
    }

    fn default_dns_server_ipaddr() -> Ipv4Addr {
        Ipv4Addr::new(1, 1, 1, 1)
    }

    fn default_filename() -> PathBuf {
        PathBuf::from("/etc/hosts")
    }
}

impl Config {
    pub fn load(path: &Path) -> Self {
        let conf = ::config::Config::builder()
            .add_source(::config::File::from(path).required(true))
            .add_source(::config::Environment::default().separator("_"))
            .build()
            .expect("unable to locate configuration file");
        conf.try_deserialize()
            .expect("configuration format invalid")
    }

    pub fn address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
