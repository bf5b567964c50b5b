#[tokio::main]
async fn main() -> supportgpt::error::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("supportgpt=info"))
        .init();
    log::info!("Starting supportgpt Slack relay");

    match supportgpt::run().await {
        Ok(()) => {
            log::info!("Relay shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Relay encountered an error: {}", e);
            Err(e)
        }
    }
}
