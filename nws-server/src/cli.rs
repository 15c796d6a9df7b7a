use anyhow::Context;
use clap::{Parser, Subcommand};
use nws_core::{Config, registry_from_config};
use serde_json::json;

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "nws-server", version, about = "NWS weather tool server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the registered tools over stdio (line-delimited JSON-RPC).
    Serve,

    /// Print the registered tools and their parameter schemas as JSON.
    Tools,

    /// Fetch the forecast for a coordinate and print it.
    Forecast {
        /// Latitude in degrees, e.g. 47.6062.
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        /// Longitude in degrees, e.g. -122.3321.
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },

    /// Fetch active alerts for a US state and print them.
    Alerts {
        /// Two-letter state code, e.g. "WA".
        state: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        let registry = registry_from_config(&config)?;

        match self.command {
            Command::Serve => server::serve(registry).await,
            Command::Tools => {
                let listing = serde_json::to_string_pretty(&registry.specs())
                    .context("Failed to serialize tool listing")?;
                println!("{listing}");
                Ok(())
            }
            Command::Forecast { latitude, longitude } => {
                let text = registry
                    .dispatch(
                        "get_forecast",
                        json!({ "latitude": latitude, "longitude": longitude }),
                    )
                    .await?;
                println!("{text}");
                Ok(())
            }
            Command::Alerts { state } => {
                let text = registry.dispatch("get_alerts", json!({ "state": state })).await?;
                println!("{text}");
                Ok(())
            }
        }
    }
}
