// CLI module for promptgate
// Author: kelexine (https://github.com/kelexine)

use crate::config::AppConfig;
use clap::Parser;

/// promptgate - Cache-aside prompt gateway
#[derive(Parser, Debug, Default)]
#[command(name = "promptgate", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.promptgate/config.toml)
    #[arg(short, long, env = "PROMPTGATE_CONFIG")]
    pub config: Option<String>,

    /// Address to bind, overrides `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overrides `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Disable the response cache for this run
    #[arg(long)]
    pub no_cache: bool,
}

impl Args {
    /// Apply command-line overrides, the highest-precedence layer.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
    }
}
