//! CLI parser, config loading and the offline `search` / `fetch` / `channel-login` commands.

use crate::components::{build_search_service, http_clients};
use crate::config::{AppExtensions, BookExtensions, BotConfig};
use anyhow::{Context, Result};
use book_search::{Downloader, GrammersIndex, LinkResolver};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "book-bot")]
#[command(about = "Telegram bot that finds books and sends them as files", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Search with the configured providers and print the results.
    Search { query: String },
    /// Resolve a book page, download the file and print where it was saved.
    Fetch {
        url: String,
        #[arg(short, long, default_value = "book")]
        title: String,
    },
    /// Log the channel-search user account in and save its session file.
    ChannelLogin,
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}

/// Search and fetch need no Telegram token.
fn load_extensions() -> Result<BookExtensions> {
    let extensions = BookExtensions::from_env()?;
    extensions.validate()?;
    Ok(extensions)
}

pub async fn run_search(query: &str) -> Result<()> {
    let extensions = load_extensions()?;
    let (http, _) = http_clients(extensions.download())?;
    let service = build_search_service(&extensions, &http)?;

    let candidates = service.search(query).await?;
    if candidates.is_empty() {
        println!("No results for \"{}\"", query);
        return Ok(());
    }
    for (i, c) in candidates.iter().enumerate() {
        println!("{}. {} [{} / {:?}]", i + 1, c.title, c.source, c.kind);
        println!("   {}", c.url);
        if let Some(snippet) = &c.snippet {
            println!("   {}", snippet);
        }
    }
    Ok(())
}

/// The file is kept on disk.
pub async fn run_fetch(url: &str, title: &str) -> Result<()> {
    let extensions = load_extensions()?;
    let download = extensions.download();
    let (page_http, file_http) = http_clients(download)?;

    let link = LinkResolver::new(page_http, download.resolve_max_hops)
        .resolve(url)
        .await?;
    println!("Direct link: {} ({:?})", link.url, link.kind);

    let file = Downloader::new(file_http, download.dir.clone(), download.max_bytes)
        .download(&link, title)
        .await?;
    let (file_name, size) = (file.file_name.clone(), file.size);
    let path = file.keep()?;
    println!("Saved {} ({} bytes) to {}", file_name, size, path.display());
    Ok(())
}

fn prompt(question: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(question.as_bytes())?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

/// Interactive: asks for phone, code and 2FA password on the terminal.
pub async fn run_channel_login() -> Result<()> {
    let extensions = load_extensions()?;
    let settings = extensions
        .search()
        .channel_settings()?
        .context("channel login needs API_ID, API_HASH and TARGET_CHANNEL_ID")?;
    let session_file = settings.session_file.clone();

    let name = GrammersIndex::new(settings).login(prompt).await?;
    println!("Signed in as {}; session saved to {}", name, session_file.display());
    Ok(())
}
