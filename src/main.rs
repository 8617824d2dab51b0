use anyhow::Context;
use tokio::net::TcpListener;

use zodiac_newsletter::configuration::get_configuration;
use zodiac_newsletter::startup::{get_app_state, run};
use zodiac_newsletter::telemetry::{get_subscriber, initialize_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        "zodiac-newsletter".to_string(),
        "info".to_string(),
        std::io::stdout,
    );
    initialize_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration")?;
    let app_state =
        get_app_state(&configuration).context("Failed to build the reading service client")?;

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Listening on {}", address);

    run(listener, app_state)
        .await
        .context("Failed to start up the application")
}
