use anyhow::Result;
use dobbs_assistant::{infrastructure::logger, Launcher};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logger::init();

    info!("dobbs-assistant {}", dobbs_assistant::VERSION);
    Launcher::from_env()?.launch().await
}
