use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::{net::IpAddr, path::Path, path::PathBuf};
use weather_core::Config;

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather record HTTP service")]
pub struct Cli {
    /// Config file to use instead of the one in the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        /// Address to bind, overriding the config file.
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to bind, overriding the config file.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Store the WeatherStack access key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let mut config = Config::load_from(&path)?;

        match self.command {
            Command::Serve { host, port } => {
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                server::serve(config).await
            }
            Command::Configure => configure(config, &path),
        }
    }
}

fn configure(mut config: Config, path: &Path) -> anyhow::Result<()> {
    let api_key = Password::new("WeatherStack API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save_to(path)?;

    println!("Saved WeatherStack API key to {}", path.display());
    Ok(())
}
