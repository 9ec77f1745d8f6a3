//! Batch campaign runs.
//!
//! A campaign plan is a TOML file describing a set of application forms
//! (and optionally calendar events) to publish. Running the plan
//! reconciles every entry and appends one record per form to the JSONL
//! records file. `--fresh` truncates the records file first; this is the
//! only place the file is ever reset.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use clap::Subcommand;
use serde::Deserialize;

use formsync_core::store::jsonl;
use formsync_core::{
    CalendarClient, CampaignRecord, Config, EventDefinition, EventReconciler, FormDefinition,
    FormReconciler, FormsClient,
};

#[derive(Subcommand)]
pub enum CampaignAction {
    /// Reconcile every entry of a campaign plan
    Run {
        /// Path to the campaign plan (TOML)
        plan: PathBuf,
        /// Truncate the records file before the run
        #[arg(long)]
        fresh: bool,
    },
}

/// Campaign plan file contents.
///
/// Dates are RFC 3339 strings (quoted in TOML) carrying their offset.
#[derive(Debug, Deserialize)]
struct CampaignPlan {
    #[serde(default)]
    entries: Vec<CampaignEntry>,
}

#[derive(Debug, Deserialize)]
struct CampaignEntry {
    /// Stem of the identifier files for this entry.
    key: String,
    /// Description carried into the record.
    description: String,
    /// Application window.
    start_date: DateTime<FixedOffset>,
    end_date: DateTime<FixedOffset>,
    form: FormDefinition,
    #[serde(default)]
    event: Option<EventDefinition>,
}

pub async fn run(action: CampaignAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CampaignAction::Run { plan, fresh } => run_plan(&plan, fresh).await,
    }
}

async fn run_plan(plan_path: &PathBuf, fresh: bool) -> Result<(), Box<dyn std::error::Error>> {
    let plan: CampaignPlan = toml::from_str(&std::fs::read_to_string(plan_path)?)?;
    if plan.entries.is_empty() {
        println!("Plan has no entries.");
        return Ok(());
    }

    let config = Config::load_or_default();
    let records_path = config.records_file()?;
    if fresh {
        jsonl::reset(&records_path)?;
        log::info!("records file reset: {}", records_path.display());
    }

    let token = super::google_token(&config).await?;
    let forms = FormsClient::new(token.clone());
    let calendar = CalendarClient::new(token);
    let state_dir = config.state_dir()?;
    let calendar_id = config.calendar_id();

    for entry in &plan.entries {
        let form_id_path = state_dir.join(format!("form_id_{}.txt", entry.key));
        let reconciler = FormReconciler::new(&forms, &form_id_path);
        let url = reconciler.reconcile(&entry.form).await?;
        println!("{}: {url}", entry.key);

        if let Some(event) = &entry.event {
            let event_id_path = state_dir.join(format!("event_id_{}.txt", entry.key));
            let reconciler = EventReconciler::new(&calendar, calendar_id.clone(), &event_id_path);
            let event_id = reconciler.reconcile(event).await?;
            println!("{}: event {event_id}", entry.key);
        }

        let record = CampaignRecord {
            url,
            title: entry.form.title.clone(),
            description: entry.description.clone(),
            start_date: entry.start_date,
            end_date: entry.end_date,
        };
        jsonl::append(&record, &records_path)?;
    }

    println!(
        "{} entries reconciled, records in {}",
        plan.entries.len(),
        records_path.display()
    );
    Ok(())
}
