use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use page_semantics::{AnalyzerConfig, FetchMode};

#[derive(Parser, Debug)]
#[command(name = "page-semantics")]
#[command(about = "Semantic page analysis and bounded site crawling")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a single page and print its actions, structure and tasks
    Analyze {
        /// Page URL
        url: String,
    },
    /// Crawl a site from a start URL and print the page tree
    Crawl {
        /// Start URL; its host bounds the crawl
        url: String,

        /// Maximum crawl depth (1 = only the start page)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Maximum number of pages to visit
        #[arg(long)]
        max_pages: Option<usize>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct FetchArgs {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Fetch mode (browser, plain)
    #[arg(short, long, value_enum, global = true)]
    pub mode: Option<FetchModeArg>,

    /// Page-load timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Minimum milliseconds between requests to one domain
    #[arg(long, global = true)]
    pub rate_limit_ms: Option<u64>,

    /// Extra fetch attempts after a failure
    #[arg(long, global = true)]
    pub retries: Option<u32>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FetchModeArg {
    Browser,
    Plain,
}

impl From<FetchModeArg> for FetchMode {
    fn from(arg: FetchModeArg) -> Self {
        match arg {
            FetchModeArg::Browser => FetchMode::Browser,
            FetchModeArg::Plain => FetchMode::Plain,
        }
    }
}

impl FetchArgs {
    /// Load the configuration file (if any) and apply command-line overrides
    pub fn to_config(&self) -> page_semantics::Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_file(path)?,
            None => {
                let mut config = AnalyzerConfig::default();
                config.apply_env();
                config
            }
        };

        if let Some(mode) = self.mode {
            config.fetch_mode = mode.into();
        }
        if let Some(timeout) = self.timeout {
            config.fetch_timeout_secs = timeout;
        }
        if let Some(rate_limit_ms) = self.rate_limit_ms {
            config.rate_limit_ms = rate_limit_ms;
        }
        if let Some(retries) = self.retries {
            config.fetch_retries = retries;
        }
        Ok(config)
    }
}
