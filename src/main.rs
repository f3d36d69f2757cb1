use clap::Parser;

use devops_agent::cli::{self, Cli};
use devops_agent::core::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG and credentials are visible below
    dotenv::dotenv().ok();
    logging::init_tracing();

    let cli: Cli = Cli::parse();
    cli::run(cli).await
}
