use clap::Subcommand;
use formsync_core::integrations::{genai, keyring_store};
use formsync_core::{Config, GoogleAuth};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Google: login / logout / status
    Google {
        #[command(subcommand)]
        action: GoogleOp,
    },
    /// Gemini: set-key / clear / status
    Genai {
        #[command(subcommand)]
        action: GenAiOp,
    },
}

#[derive(Subcommand)]
pub enum GoogleOp {
    /// Run the OAuth flow in the browser
    Login {
        /// OAuth client ID
        #[arg(long)]
        client_id: Option<String>,
        /// OAuth client secret
        #[arg(long)]
        client_secret: Option<String>,
    },
    /// Remove stored tokens
    Logout,
    /// Check authentication status
    Status,
}

#[derive(Subcommand)]
pub enum GenAiOp {
    /// Store the Gemini API key in the OS keyring
    SetKey {
        /// API key
        key: String,
    },
    /// Remove the stored API key
    Clear,
    /// Check whether an API key is available
    Status,
}

pub async fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Google { action } => handle_google(action).await,
        AuthAction::Genai { action } => handle_genai(action),
    }
}

async fn handle_google(op: GoogleOp) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    match op {
        GoogleOp::Login {
            client_id,
            client_secret,
        } => {
            if let (Some(cid), Some(csec)) = (client_id, client_secret) {
                GoogleAuth::set_credentials(&cid, &csec)?;
            }
            let auth = GoogleAuth::new(config.google.scopes.clone());
            auth.authenticate().await?;
            println!("Google authenticated");
        }
        GoogleOp::Logout => {
            let auth = GoogleAuth::new(config.google.scopes.clone());
            auth.disconnect()?;
            println!("Google disconnected");
        }
        GoogleOp::Status => {
            let auth = GoogleAuth::new(config.google.scopes.clone());
            println!(
                "{}",
                if auth.is_authenticated() {
                    "authenticated"
                } else {
                    "not authenticated"
                }
            );
        }
    }
    Ok(())
}

fn handle_genai(op: GenAiOp) -> Result<(), Box<dyn std::error::Error>> {
    match op {
        GenAiOp::SetKey { key } => {
            keyring_store::set(genai::API_KEY_ENTRY, &key)?;
            println!("Gemini API key stored");
        }
        GenAiOp::Clear => {
            keyring_store::delete(genai::API_KEY_ENTRY)?;
            println!("Gemini API key removed");
        }
        GenAiOp::Status => {
            let from_env = std::env::var("GEMINI_API_KEY").is_ok();
            let from_keyring = keyring_store::get(genai::API_KEY_ENTRY)
                .ok()
                .flatten()
                .is_some();
            println!(
                "{}",
                match (from_env, from_keyring) {
                    (true, _) => "configured (environment)",
                    (false, true) => "configured (keyring)",
                    (false, false) => "not configured",
                }
            );
        }
    }
    Ok(())
}
