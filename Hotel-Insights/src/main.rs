use clap::Parser;
use hotel_insights::{app, cli::Cli, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();
    app::run(cli).await
}
