use anyhow::Result;
use clap::Args;

use crate::api::{ApiClient, RosterApi};
use crate::config::Config;

#[derive(Args)]
pub struct LocationsCommand {}

impl LocationsCommand {
    pub async fn execute(self) -> Result<()> {
        let config = Config::load()?;
        let client = ApiClient::new(&config)?;

        let locations = client.locations().await?;

        if locations.is_empty() {
            println!("No locations available.");
            return Ok(());
        }

        println!("Locations");
        println!("────────────────────────────────");
        for location in &locations {
            println!("  #{:<4} {}", location.id, location.name);
        }

        Ok(())
    }
}
