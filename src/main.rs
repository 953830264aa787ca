//! site-mirror main entry point
//!
//! This is the command-line interface for mirroring an authenticated website
//! to disk.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use site_mirror::config::{load_config_or_default, validate, MirrorConfig};
use site_mirror::crawler::{ConsoleStatus, Coordinator, Fetcher, HttpFetcher};
use site_mirror::output::{load_status, print_status, HtmlSaver};
use site_mirror::session::Session;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// site-mirror: an offline mirror for authenticated websites
///
/// site-mirror reuses a logged-in browser session to crawl a site
/// breadth-first, saves every page as HTML and rewrites links so the copy
/// can be browsed from disk. Interrupted crawls can be resumed.
#[derive(Parser, Debug)]
#[command(name = "site-mirror")]
#[command(version)]
#[command(about = "Mirror an authenticated website to disk", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save a session from browser cookies
    Login(LoginArgs),

    /// Crawl the site and save pages as HTML
    Crawl(CrawlArgs),

    /// Show the session, saved pages and pending checkpoint
    Status(StatusArgs),
}

#[derive(Args, Debug)]
struct LoginArgs {
    /// URL of a page that requires the login
    #[arg(long)]
    start_url: String,

    /// Cookie header copied from a logged-in browser (repeatable)
    #[arg(long = "cookie", value_name = "HEADER")]
    cookies: Vec<String>,

    /// Storage-state JSON exported from a browser to import
    #[arg(long = "import", value_name = "FILE")]
    import: Option<PathBuf>,

    /// Where to save the session
    #[arg(long)]
    auth_file: Option<PathBuf>,

    /// Timeout for the verification request (milliseconds)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Save without fetching the start URL first
    #[arg(long)]
    no_verify: bool,
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Start URL for the crawl
    #[arg(long)]
    start_url: String,

    /// Directory to write pages to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Maximum number of URLs to visit
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_pages: Option<u64>,

    /// Only follow links on the start URL's host
    #[arg(long)]
    domain_only: bool,

    /// Follow links to other hosts even if the config file enables domain-only
    #[arg(long, conflicts_with = "domain_only")]
    no_domain_only: bool,

    /// Skip URLs whose path starts with this prefix (repeatable)
    #[arg(long = "skip-path", value_name = "PREFIX")]
    skip_paths: Vec<String>,

    /// Only crawl URLs starting with this prefix (repeatable)
    #[arg(long = "url-prefix", value_name = "PREFIX")]
    url_prefixes: Vec<String>,

    /// Skip URLs whose output file already exists
    #[arg(long)]
    skip_existing: bool,

    /// Re-fetch URLs whose output file already exists
    #[arg(long, conflicts_with = "skip_existing")]
    no_skip_existing: bool,

    /// Resume from, and keep writing, a checkpoint
    #[arg(long)]
    resume: bool,

    /// Ignore any checkpoint and do not write one
    #[arg(long, conflicts_with = "resume")]
    no_resume: bool,

    /// Checkpoint path (default: <output-dir>/.crawl_state.json)
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Print a status line for every processed URL
    #[arg(long)]
    show_crawl_status: bool,

    /// Pause after each fetched page (milliseconds)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Per-page fetch timeout (milliseconds)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Session file to authenticate with
    #[arg(long)]
    auth_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct StatusArgs {
    /// Mirror directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Checkpoint path (default: <output-dir>/.crawl_state.json)
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Session file
    #[arg(long)]
    auth_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_config_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    match cli.command {
        Command::Login(args) => handle_login(config, args).await,
        Command::Crawl(args) => handle_crawl(config, args).await,
        Command::Status(args) => handle_status(config, args),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mirror=info,warn"),
            1 => EnvFilter::new("site_mirror=debug,info"),
            2 => EnvFilter::new("site_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the login command: builds, verifies and saves a session
async fn handle_login(mut config: MirrorConfig, args: LoginArgs) -> Result<()> {
    if let Some(auth_file) = args.auth_file {
        config.session.auth_file = auth_file;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.crawl.timeout_ms = timeout_ms;
    }
    validate(&config)?;

    let mut session = Session::default();

    if let Some(import) = &args.import {
        let imported = Session::load(import)
            .with_context(|| format!("Failed to import session from {}", import.display()))?;
        tracing::info!("Imported {} cookies from {}", imported.cookies.len(), import.display());
        session.merge(imported);
    }

    let mut headers = args.cookies;
    if headers.is_empty() && args.import.is_none() {
        headers.push(prompt_cookie_header()?);
    }
    for header in &headers {
        session.merge(Session::from_cookie_header(header, &args.start_url)?);
    }

    if session.is_empty() {
        bail!("No cookies to save");
    }

    if args.no_verify {
        tracing::info!("Skipping session verification");
    } else {
        let fetcher = HttpFetcher::new(&session, &config.session.user_agent)?;
        let timeout = Duration::from_millis(config.crawl.timeout_ms);
        fetcher
            .fetch(&args.start_url, timeout)
            .await
            .context("Session verification failed")?;
        tracing::info!("Session verified against {}", args.start_url);
    }

    session.save(&config.session.auth_file)?;
    println!(
        "Session with {} cookies saved to {}",
        session.cookies.len(),
        config.session.auth_file.display()
    );

    Ok(())
}

/// Reads one Cookie header line from stdin
fn prompt_cookie_header() -> Result<String> {
    print!("Paste the Cookie header from a logged-in browser tab: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let line = line.trim();
    if line.is_empty() {
        bail!("No cookie header entered");
    }
    Ok(line.to_string())
}

/// Handles the crawl command
async fn handle_crawl(mut config: MirrorConfig, args: CrawlArgs) -> Result<()> {
    apply_crawl_overrides(&mut config, &args);
    validate(&config)?;

    let auth_file = config.session.auth_file.clone();
    if !Session::exists(&auth_file) {
        bail!(
            "Missing session file {}. Run `site-mirror login` first.",
            auth_file.display()
        );
    }

    let session = Session::load(&auth_file)?;
    let fetcher = HttpFetcher::new(&session, &config.session.user_agent)?;
    let crawl_config = config.crawl_config(&args.start_url)?;
    let options = config.crawl_options();

    tracing::info!(
        "Starting crawl: start_url={}, output_dir={}, max_pages={}, domain_only={}, skip_paths={:?}, url_prefixes={:?}, resume={}, state_file={}",
        crawl_config.start_url,
        options.output_dir.display(),
        options.max_pages,
        crawl_config.domain_only,
        crawl_config.skipped_paths,
        crawl_config.url_prefixes,
        options.resume,
        options.state_file.display()
    );

    let mut coordinator = Coordinator::new(crawl_config, options, fetcher, HtmlSaver);
    if args.show_crawl_status {
        coordinator = coordinator.with_status(ConsoleStatus);
    }

    let result = coordinator.run().await.context("Crawl failed")?;

    println!("=== Crawl Complete ===");
    println!("Saved: {}", result.saved_pages);
    println!("Visited: {}", result.visited_pages);
    println!("Failed: {}", result.failed_pages);

    Ok(())
}

/// Applies command-line flags on top of the file configuration
fn apply_crawl_overrides(config: &mut MirrorConfig, args: &CrawlArgs) {
    if let Some(output_dir) = &args.output_dir {
        config.output.output_dir = output_dir.clone();
    }
    if let Some(state_file) = &args.state_file {
        config.output.state_file = Some(state_file.clone());
    }
    if let Some(auth_file) = &args.auth_file {
        config.session.auth_file = auth_file.clone();
    }
    if let Some(max_pages) = args.max_pages {
        config.crawl.max_pages = usize::try_from(max_pages).unwrap_or(usize::MAX);
    }
    if let Some(delay_ms) = args.delay_ms {
        config.crawl.delay_ms = delay_ms;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.crawl.timeout_ms = timeout_ms;
    }
    if !args.skip_paths.is_empty() {
        config.crawl.skip_paths = args.skip_paths.clone();
    }
    if !args.url_prefixes.is_empty() {
        config.crawl.url_prefixes = args.url_prefixes.clone();
    }

    if let Some(domain_only) = flag_override(args.domain_only, args.no_domain_only) {
        config.crawl.domain_only = domain_only;
    }
    if let Some(skip_existing) = flag_override(args.skip_existing, args.no_skip_existing) {
        config.crawl.skip_existing = skip_existing;
    }
    if let Some(resume) = flag_override(args.resume, args.no_resume) {
        config.crawl.resume = resume;
    }
}

/// Maps a `--flag` / `--no-flag` pair to an override; neither keeps the file value
fn flag_override(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Handles the status command
fn handle_status(mut config: MirrorConfig, args: StatusArgs) -> Result<()> {
    if let Some(output_dir) = args.output_dir {
        config.output.output_dir = output_dir;
    }
    if let Some(state_file) = args.state_file {
        config.output.state_file = Some(state_file);
    }
    if let Some(auth_file) = args.auth_file {
        config.session.auth_file = auth_file;
    }

    let status = load_status(
        Path::new(&config.output.output_dir),
        &config.state_file(),
        &config.session.auth_file,
    )?;
    print_status(&status);

    Ok(())
}
