use formsync_core::{Config, GenAiClient};

pub async fn run(prompt: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let client = GenAiClient::new(&config.genai.model)?;
    let text = client.generate(prompt).await?;
    println!("{text}");
    Ok(())
}
