use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use absoluter::core::{scrap_url, ScrapeOptions, ScrapeOutcome};
use absoluter::env::EnvConfig;
use absoluter::parsers::html::{Html5everNormalizer, Normalizer};
use absoluter::parsers::link_rewriter::rewrite_relative_urls;
use absoluter::utils::url::{is_url_and_has_protocol, parse_base_url};

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Rewrites every relative URL of a web page into an absolute one
#[derive(Parser, Debug)]
#[command(name = "absoluter", version, about)]
struct Cli {
    /// URL to fetch, or a file path ("-" for stdin) when --base-url is given
    target: String,

    /// Rewrite local markup against this URL instead of fetching TARGET
    #[arg(short = 'b', long, value_name = "URL")]
    base_url: Option<String>,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Request timeout in seconds, 0 disables it
    #[arg(short, long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// User-Agent header for the request
    #[arg(short, long)]
    user_agent: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Response header that must be present for the page to be rewritten
    #[arg(long, value_name = "NAME", conflicts_with = "no_header_gate")]
    required_header: Option<String>,

    /// Rewrite the page whatever headers the response carries
    #[arg(long)]
    no_header_gate: bool,

    /// Parse and re-serialize local markup before rewriting it
    #[arg(long, requires = "base_url")]
    normalize: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn scrape_options(&self, config: &EnvConfig) -> ScrapeOptions {
        let mut options = ScrapeOptions::from_env_config(config);

        options.silent = self.quiet;
        options.insecure |= self.insecure;
        if let Some(timeout) = self.timeout {
            options.timeout = timeout;
        }
        if let Some(user_agent) = &self.user_agent {
            options.user_agent = Some(user_agent.clone());
        }
        if self.no_header_gate {
            options.required_header = None;
        } else if let Some(header) = &self.required_header {
            options.required_header = Some(header.trim().to_lowercase());
        }

        options
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
            print_error_message(&e.to_string(), use_color(no_color));
            process::exit(1);
        }
    };
    let colored = use_color(config.no_color);
    init_tracing(&config, cli.quiet, colored);

    let result = match &cli.base_url {
        Some(base_url) => rewrite_local(&cli, base_url),
        None => fetch_and_rewrite(&cli, &config).await,
    };

    let markup = match result {
        Ok(markup) => markup,
        Err(message) => {
            print_error_message(&message, colored);
            process::exit(1);
        }
    };

    if let Err(e) = write_output(cli.output.as_ref(), &markup) {
        print_error_message(&format!("Error: could not write output: {e}"), colored);
        process::exit(1);
    }
}

async fn fetch_and_rewrite(cli: &Cli, config: &EnvConfig) -> Result<String, String> {
    if !is_url_and_has_protocol(&cli.target) {
        return Err(format!(
            "Error: '{}' is not a URL, use --base-url to rewrite local markup",
            cli.target
        ));
    }
    let options = cli.scrape_options(config);

    match scrap_url(&cli.target, &options).await {
        Ok(ScrapeOutcome::Rewritten(markup)) => Ok(markup),
        Ok(ScrapeOutcome::Skipped) => {
            if !options.silent {
                print_info_message(&format!(
                    "Skipped {}: response has no {} header",
                    cli.target,
                    options.required_header.as_deref().unwrap_or_default()
                ));
            }
            Ok(String::new())
        }
        Err(e) => Err(format!("Error: {e}")),
    }
}

fn rewrite_local(cli: &Cli, base_url: &str) -> Result<String, String> {
    let base = parse_base_url(base_url)
        .ok_or_else(|| format!("Error: base URL '{base_url}' is not an absolute URL"))?;

    let data = read_input(&cli.target)
        .map_err(|e| format!("Error: could not read {}: {e}", cli.target))?;

    let markup = if cli.normalize {
        Html5everNormalizer
            .normalize(&data, None)
            .map_err(|e| format!("Error: {e}"))?
    } else {
        String::from_utf8_lossy(&data).into_owned()
    };

    Ok(rewrite_relative_urls(&base, &markup))
}

fn read_input(target: &str) -> io::Result<Vec<u8>> {
    if target == "-" {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        Ok(data)
    } else {
        fs::read(target)
    }
}

fn write_output(path: Option<&PathBuf>, markup: &str) -> io::Result<()> {
    match path {
        Some(path) => fs::write(path, markup),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(markup.as_bytes())?;
            stdout.flush()
        }
    }
}

fn init_tracing(config: &EnvConfig, quiet: bool, colored: bool) {
    let level = if quiet { "error" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("absoluter={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(colored)
        .init();
}

fn use_color(no_color: bool) -> bool {
    !no_color && atty::is(atty::Stream::Stderr)
}

/// Prints an error message to stderr, red when `colored`
fn print_error_message(msg: &str, colored: bool) {
    if colored {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    } else {
        eprintln!("{msg}");
    }
}

/// Prints an info message to stderr, keeping stdout for the markup
fn print_info_message(msg: &str) {
    eprintln!("{msg}");
}
