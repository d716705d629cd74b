use clap::Parser;
use page_semantics::{Analyzer, FetchMode};
use serde::Serialize;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match args.fetch.to_config() {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    if config.fetch_mode == FetchMode::Browser {
        eprintln!("Note: browser mode requires a WebDriver server (e.g., ChromeDriver).");
        eprintln!(
            "Set WEBDRIVER_URL if not using the default {}, or pass --mode plain",
            config.webdriver_url
        );
    }

    let analyzer = match Analyzer::new(config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            ::log::error!("Failed to start analyzer: {}", e);
            std::process::exit(2);
        }
    };

    // Ctrl-C stops the crawl and still prints what was gathered
    let cancel = analyzer.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ::log::warn!("Interrupted, stopping crawl");
            cancel.cancel();
        }
    });

    let outcome = match args.command {
        Command::Analyze { url } => analyzer.analyze(&url).await.and_then(|a| print_json(&a)),
        Command::Crawl {
            url,
            max_depth,
            max_pages,
        } => {
            let max_depth = max_depth.unwrap_or(analyzer.config().max_depth);
            let max_pages = max_pages.unwrap_or(analyzer.config().max_pages);
            analyzer
                .crawl_with_limits(&url, max_depth, max_pages)
                .await
                .and_then(|report| print_json(&report))
        }
    };

    analyzer.shutdown().await;

    if let Err(e) = outcome {
        ::log::error!("{}", e);
        std::process::exit(1);
    }
}

fn print_json<T: Serialize>(value: &T) -> page_semantics::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
