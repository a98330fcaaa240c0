use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let url = std::env::args().nth(1).unwrap_or_default();
    let outcome = match scholar::run_scholar(&url).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(err) = e.downcast_ref::<common::ScholarError>() {
                anyhow::bail!(scholar::user_message(err));
            }
            return Err(e);
        }
    };

    if let Some(path) = &outcome.saved_to {
        info!("Saved profile to {}", path.display());
    }
    println!("{}", serde_json::to_string_pretty(&outcome.profile)?);
    Ok(())
}
