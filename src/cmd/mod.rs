use clap::Parser;
use std::path::PathBuf;

/// DNS server that filters domain names according to blocklists
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        default_value = "/etc/donos/donos.toml",
        env = "CONFIG_PATH"
    )]
    config_path: PathBuf,
}

impl Args {
    pub fn config_path(&self) -> &std::path::Path {
        &self.config_path
    }
}
