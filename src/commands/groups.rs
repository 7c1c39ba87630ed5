use anyhow::Result;
use clap::Args;

use crate::api::{ApiClient, RosterApi};
use crate::config::Config;

#[derive(Args)]
pub struct GroupsCommand {}

impl GroupsCommand {
    pub async fn execute(self) -> Result<()> {
        let config = Config::load()?;
        let client = ApiClient::new(&config)?;

        let groups = client.groups().await?;

        if groups.is_empty() {
            println!("No groups available.");
            return Ok(());
        }

        println!("Groups");
        println!("────────────────────────────────");
        for group in &groups {
            println!(
                "  #{:<4} {:<20} {} members, {} coaches",
                group.id,
                group.name,
                group.members.len(),
                group.coaches.len()
            );
        }

        Ok(())
    }
}
