//! Binary: `book-bot run`, `book-bot search <query>`, `book-bot fetch <url>`, `book-bot channel-login`.

use anyhow::Result;
use book_bot::{load_config, run_bot, run_channel_login, run_fetch, run_search, Cli, Commands};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::Search { query } => run_search(&query).await,
        Commands::Fetch { url, title } => run_fetch(&url, &title).await,
        Commands::ChannelLogin => run_channel_login().await,
    }
}
