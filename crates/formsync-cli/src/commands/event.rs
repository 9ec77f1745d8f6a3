use std::path::PathBuf;

use clap::Subcommand;
use formsync_core::integrations::calendar::CalendarApi;
use formsync_core::{CalendarClient, Config, EventDefinition, EventReconciler};

#[derive(Subcommand)]
pub enum EventAction {
    /// Create or update a calendar event from a TOML definition
    Sync {
        /// Path to the event definition (TOML)
        file: PathBuf,
        /// Identifier file caching the remote event id
        #[arg(long)]
        id_file: PathBuf,
    },
    /// List upcoming events on the configured calendar
    List {
        /// Maximum number of events
        #[arg(long, default_value_t = 10)]
        max: u32,
    },
}

pub async fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    match action {
        EventAction::Sync { file, id_file } => {
            let definition: EventDefinition = toml::from_str(&std::fs::read_to_string(&file)?)?;

            let token = super::google_token(&config).await?;
            let client = CalendarClient::new(token);
            let reconciler = EventReconciler::new(&client, config.calendar_id(), &id_file);
            let event_id = reconciler.reconcile(&definition).await?;

            println!("{event_id}");
        }
        EventAction::List { max } => {
            let token = super::google_token(&config).await?;
            let client = CalendarClient::new(token);
            let events = client.list_upcoming(&config.calendar_id(), max).await?;

            if events.is_empty() {
                println!("No upcoming events found.");
                return Ok(());
            }
            for event in events {
                let start = event
                    .start
                    .as_ref()
                    .and_then(|s| {
                        s.date_time
                            .map(|dt| dt.to_rfc3339())
                            .or_else(|| s.date.clone())
                    })
                    .unwrap_or_else(|| "(no start)".to_string());
                println!("{start}  {}", event.summary.as_deref().unwrap_or("(No title)"));
            }
        }
    }
    Ok(())
}
