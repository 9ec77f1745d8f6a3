use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "formsync-cli", version, about = "Formsync CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authentication management for Google and Gemini
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Form reconciliation
    Form {
        #[command(subcommand)]
        action: commands::form::FormAction,
    },
    /// Calendar event reconciliation and listing
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Batch campaign runs
    Campaign {
        #[command(subcommand)]
        action: commands::campaign::CampaignAction,
    },
    /// JSONL records management
    Records {
        #[command(subcommand)]
        action: commands::records::RecordsAction,
    },
    /// One-shot text generation
    Gen {
        /// Prompt to send to the model
        prompt: String,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(action).await,
        Commands::Form { action } => commands::form::run(action).await,
        Commands::Event { action } => commands::event::run(action).await,
        Commands::Campaign { action } => commands::campaign::run(action).await,
        Commands::Records { action } => commands::records::run(action),
        Commands::Gen { prompt } => commands::gen::run(&prompt).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
