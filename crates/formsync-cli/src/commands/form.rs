use std::path::PathBuf;

use clap::Subcommand;
use formsync_core::{Config, FormDefinition, FormReconciler, FormsClient};

#[derive(Subcommand)]
pub enum FormAction {
    /// Create or update a form from a TOML definition
    Sync {
        /// Path to the form definition (TOML)
        file: PathBuf,
        /// Identifier file caching the remote form id
        #[arg(long)]
        id_file: PathBuf,
    },
}

pub async fn run(action: FormAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FormAction::Sync { file, id_file } => {
            let config = Config::load_or_default();
            let definition: FormDefinition = toml::from_str(&std::fs::read_to_string(&file)?)?;

            let token = super::google_token(&config).await?;
            let client = FormsClient::new(token);
            let reconciler = FormReconciler::new(&client, &id_file);
            let url = reconciler.reconcile(&definition).await?;

            println!("{url}");
        }
    }
    Ok(())
}
