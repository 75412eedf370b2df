//! Utility to check that the prediction service is reachable and print its model metadata.

use course_load_evaluator::api_client::RiskApiClient;
use course_load_evaluator::config::Config;

/// Main entry point for the backend check.
///
/// Calls `/health` and `/meta` once each and exits non-zero if either fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let client = RiskApiClient::from_config(&config)?;

    println!("Backend: {}", client.base_url());

    match client.health().await {
        Ok(body) => println!("Health: {}", body),
        Err(e) => anyhow::bail!("health check failed: {}", e),
    }

    let meta = client.get_meta().await?;
    println!("Model: {}", meta.model_tag);
    println!("Features ({}):", meta.feature_names().len());
    for name in meta.feature_names() {
        println!("  - {}", name);
    }
    if !meta.meta.is_empty() {
        println!("Meta:");
        println!("{}", serde_json::to_string_pretty(&meta.meta)?);
    }

    Ok(())
}
