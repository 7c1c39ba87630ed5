use anyhow::{bail, Result};
use chrono::{Local, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, MultiSelect, Select};
use indicatif::ProgressBar;
use std::str::FromStr;
use std::time::Duration;

use crate::api::{ApiClient, RosterApi};
use crate::config::Config;
use crate::form::{FormClose, FormError, TrainingForm};
use crate::models::{Training, TrainingFilter, TrainingType};
use crate::timefmt;

#[derive(Args)]
pub struct NewTrainingCommand {
    /// Location id (prompted if omitted)
    #[arg(short, long)]
    location: Option<i64>,

    /// Training date (YYYY-MM-DD)
    #[arg(short, long)]
    date: Option<String>,

    /// Start time (HH:MM)
    #[arg(short, long)]
    start: Option<String>,

    /// End time (HH:MM)
    #[arg(short, long)]
    end: Option<String>,

    /// Training type: "Off Ice", "Ice" or "Ballet"
    #[arg(short = 't', long = "type")]
    kind: Option<String>,

    /// Group id to associate (repeatable)
    #[arg(short, long = "group")]
    groups: Vec<i64>,
}

impl NewTrainingCommand {
    pub async fn execute(self) -> Result<()> {
        let fields = FieldFlags::parse(
            self.location,
            self.date.as_deref(),
            self.start.as_deref(),
            self.end.as_deref(),
            self.kind.as_deref(),
        )?;

        let config = Config::load()?;
        let client = ApiClient::new(&config)?;

        let mut form = TrainingForm::new_training(Local::now().naive_local());

        let spinner = spinner("Loading locations and groups...");
        form.load_reference_data(&client).await?;
        spinner.finish_and_clear();

        fields.apply(&mut form);

        if form.selected_location_id().is_none() {
            let location_id = prompt_location(&form)?;
            form.select_location(location_id);
        }
        if self.date.is_none() {
            let default = form.date().unwrap_or_else(|| Local::now().date_naive());
            form.set_date(prompt_date(default)?);
        }
        if self.start.is_none() {
            form.set_start_hour(prompt_hour("Start time", form.start_hour())?);
        }
        if self.end.is_none() {
            form.set_end_hour(prompt_hour("End time", form.end_hour())?);
        }
        if form.selected_type().is_none() {
            form.select_type(prompt_type()?);
        }

        if self.groups.is_empty() {
            for group_id in prompt_groups(&form)? {
                form.select_group(group_id);
            }
        } else {
            for group_id in self.groups {
                form.select_group(group_id);
            }
        }

        save_and_report(&form, &client).await
    }
}

#[derive(Args)]
pub struct EditTrainingCommand {
    /// Training id
    id: i64,

    /// New location id
    #[arg(short, long)]
    location: Option<i64>,

    /// New training date (YYYY-MM-DD)
    #[arg(short, long)]
    date: Option<String>,

    /// New start time (HH:MM)
    #[arg(short, long)]
    start: Option<String>,

    /// New end time (HH:MM)
    #[arg(short, long)]
    end: Option<String>,

    /// New training type: "Off Ice", "Ice" or "Ballet"
    #[arg(short = 't', long = "type")]
    kind: Option<String>,

    /// Additional group id to associate (repeatable)
    #[arg(short, long = "group")]
    groups: Vec<i64>,
}

impl EditTrainingCommand {
    pub async fn execute(self) -> Result<()> {
        let fields = FieldFlags::parse(
            self.location,
            self.date.as_deref(),
            self.start.as_deref(),
            self.end.as_deref(),
            self.kind.as_deref(),
        )?;

        let config = Config::load()?;
        let client = ApiClient::new(&config)?;

        let spinner = spinner("Loading training...");
        let trainings = client.trainings().await?;
        spinner.finish_and_clear();

        let Some(training) = trainings.iter().find(|t| t.id == self.id) else {
            bail!("Training {} not found", self.id);
        };

        let mut form = TrainingForm::edit(training);
        fields.apply(&mut form);

        for group_id in self.groups {
            form.select_group(group_id);
        }

        save_and_report(&form, &client).await
    }
}

#[derive(Args)]
pub struct ListTrainingsCommand {
    /// Only trainings at this location id
    #[arg(short, long)]
    location: Option<i64>,

    /// Only trainings for this group id
    #[arg(short, long)]
    group: Option<i64>,

    /// Only trainings on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Only trainings on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,
}

impl ListTrainingsCommand {
    pub async fn execute(self) -> Result<()> {
        let config = Config::load()?;
        let client = ApiClient::new(&config)?;

        let filter = TrainingFilter {
            location_id: self.location,
            group_id: self.group,
            from: self
                .from
                .as_deref()
                .map(day_start)
                .transpose()?,
            to: self.to.as_deref().map(day_end).transpose()?,
        };

        let mut trainings = client.trainings().await?;
        trainings.retain(|t| filter.matches(t));
        trainings.sort_by_key(|t| t.start_time);

        if trainings.is_empty() {
            println!("No trainings scheduled.");
            return Ok(());
        }

        println!("Scheduled Trainings");
        println!("────────────────────────────────");
        for training in &trainings {
            print_training(training, &config);
        }

        Ok(())
    }
}

fn print_training(training: &Training, config: &Config) {
    let groups = if training.groups.is_empty() {
        "-".to_string()
    } else {
        training
            .groups
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!(
        "  #{:<4} {} {}-{}  {:<8} {:<16} {}",
        training.id,
        training.start_time.format(&config.display.date_format),
        training.start_time.format(&config.display.time_format),
        training.end_time.format(&config.display.time_format),
        training.kind.to_string(),
        training.location.name,
        groups
    );
}

/// Field flags shared by `training new` and `training edit`, parsed
/// before any network traffic so input errors surface immediately.
struct FieldFlags {
    location: Option<i64>,
    date: Option<NaiveDate>,
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
    kind: Option<TrainingType>,
}

impl FieldFlags {
    fn parse(
        location: Option<i64>,
        date: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
        kind: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            location,
            date: date.map(timefmt::parse_date).transpose()?,
            start: start.map(timefmt::parse_hour).transpose()?,
            end: end.map(timefmt::parse_hour).transpose()?,
            kind: kind.map(TrainingType::from_str).transpose()?,
        })
    }

    fn apply(&self, form: &mut TrainingForm) {
        if let Some(location_id) = self.location {
            form.select_location(location_id);
        }
        if let Some(date) = self.date {
            form.set_date(date);
        }
        if let Some(start) = self.start {
            form.set_start_hour(start);
        }
        if let Some(end) = self.end {
            form.set_end_hour(end);
        }
        if let Some(kind) = self.kind {
            form.select_type(kind);
        }
    }
}

async fn save_and_report(form: &TrainingForm, client: &ApiClient) -> Result<()> {
    let spinner = spinner("Saving training...");
    let result = form.save(client).await;
    spinner.finish_and_clear();

    match result {
        Ok(FormClose::Saved { training_id }) => {
            println!("{} Training #{} saved", "✓".green(), training_id);
            if !form.selected_groups().is_empty() {
                println!("  Groups associated: {:?}", form.selected_groups());
            }
            Ok(())
        }
        Ok(FormClose::Cancelled) => Ok(()),
        Err(err) => {
            match &err {
                FormError::PartialAssociation {
                    training_id,
                    remaining,
                    ..
                } => {
                    println!(
                        "{} Training #{} saved, but groups {:?} could not be associated",
                        "✗".red(),
                        training_id,
                        remaining
                    );
                    println!(
                        "  Re-run: rinkplan training edit {}{}",
                        training_id,
                        remaining
                            .iter()
                            .map(|id| format!(" --group {}", id))
                            .collect::<String>()
                    );
                }
                _ => println!("{} Failed to save training: {}", "✗".red(), err),
            }
            Err(err.into())
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn prompt_location(form: &TrainingForm) -> Result<i64> {
    let locations = form.locations();
    if locations.is_empty() {
        bail!("No locations available; create one on the server first");
    }

    let labels: Vec<&str> = locations.iter().map(|l| l.name.as_str()).collect();
    let index = Select::new()
        .with_prompt("Location")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(locations[index].id)
}

fn prompt_type() -> Result<TrainingType> {
    let labels: Vec<String> = TrainingType::ALL.iter().map(|t| t.to_string()).collect();
    let index = Select::new()
        .with_prompt("Training type")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(TrainingType::ALL[index])
}

fn prompt_groups(form: &TrainingForm) -> Result<Vec<i64>> {
    let groups = form.groups();
    if groups.is_empty() {
        return Ok(Vec::new());
    }

    let labels: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    let chosen = MultiSelect::new()
        .with_prompt("Groups (space to select)")
        .items(&labels)
        .interact()?;

    Ok(chosen.into_iter().map(|index| groups[index].id).collect())
}

fn prompt_date(default: NaiveDate) -> Result<NaiveDate> {
    let input: String = Input::new()
        .with_prompt("Date (YYYY-MM-DD)")
        .default(timefmt::format_full_date(default))
        .interact_text()?;

    timefmt::parse_date(&input)
}

fn prompt_hour(label: &str, default: Option<NaiveTime>) -> Result<NaiveTime> {
    let mut prompt = Input::new().with_prompt(format!("{} (HH:MM)", label));
    if let Some(default) = default {
        prompt = prompt.default(timefmt::format_hour(default));
    }
    let input: String = prompt.interact_text()?;

    timefmt::parse_hour(&input)
}

fn day_start(date: &str) -> Result<chrono::DateTime<Utc>> {
    let date = timefmt::parse_date(date)?;
    Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

fn day_end(date: &str) -> Result<chrono::DateTime<Utc>> {
    let date = timefmt::parse_date(date)?;
    Ok(Utc.from_utc_datetime(&date.and_hms_opt(23, 59, 59).unwrap()))
}
