mod config_cmd;
mod groups;
mod locations;
mod training;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use groups::GroupsCommand;
pub use locations::LocationsCommand;
pub use training::{EditTrainingCommand, ListTrainingsCommand, NewTrainingCommand};

#[derive(Parser)]
#[command(name = "rinkplan")]
#[command(about = "Training scheduling for the skating club roster", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage trainings
    #[command(subcommand)]
    Training(TrainingSubcommands),

    /// List training locations
    Locations(LocationsCommand),

    /// List skater groups
    Groups(GroupsCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum TrainingSubcommands {
    /// Schedule a new training
    New(NewTrainingCommand),

    /// Edit an existing training
    Edit(EditTrainingCommand),

    /// List scheduled trainings
    List(ListTrainingsCommand),
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Edit configuration file
    Edit,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }

        match self.command {
            Commands::Training(subcmd) => match subcmd {
                TrainingSubcommands::New(cmd) => cmd.execute().await,
                TrainingSubcommands::Edit(cmd) => cmd.execute().await,
                TrainingSubcommands::List(cmd) => cmd.execute().await,
            },
            Commands::Locations(cmd) => cmd.execute().await,
            Commands::Groups(cmd) => cmd.execute().await,
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config().await,
                ConfigSubcommands::Edit => config_cmd::edit_config().await,
                ConfigSubcommands::Init { force } => config_cmd::init_config(force).await,
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
