use enrollment_service::config::EnrollmentConfig;
use enrollment_service::Application;
use iam_core::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_tracing("enrollment-service", "info");

    let config = EnrollmentConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
