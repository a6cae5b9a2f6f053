#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    if let Err(err) = itemlist::cli::commands::run().await {
        if err.is_identity_rejection() {
            tracing::debug!("itemlist command rejected by identity provider");
        } else {
            tracing::debug!(error = ?err, "itemlist command failed");
        }
        std::process::exit(1);
    }
}
