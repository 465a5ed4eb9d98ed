use anyhow::Result;
use clap::Parser;

use filmweb_agent::{logger, Agent, Args, Config};

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let args = Args::parse();
    let config = Config::from_args(args);

    Agent::initialize(config).await?.run().await?;

    Ok(())
}
