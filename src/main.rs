use anyhow::Context;
use mysql_health::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("mysql-health", "info", std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration")?;

    let application = Application::build(configuration).context("Failed to bind the listener")?;
    tracing::info!(address = %application.address(), "listening");

    application.run().await.context("Server error")
}
