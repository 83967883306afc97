use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "eproc-scraper")]
#[command(about = "Extract judicial process records from the eproc consultation portal")]
#[command(version)]
struct Cli {
    /// Config file to run
    config: PathBuf,

    /// Run in headless mode (overrides config)
    #[arg(long)]
    headless: bool,

    /// Query this name instead of the config's list (can be used multiple times)
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    names: Vec<String>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Validate config without running
    #[arg(long)]
    check: bool,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> eproc_scraper::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    // Load and validate config
    let mut config = eproc_scraper::Config::load(&cli.config)?;

    // Override the query list if names were given on the command line
    if !cli.names.is_empty() {
        config.names = cli.names.clone();
        config.validate()?;
    }

    if cli.check {
        println!("Config valid");
        println!("  Portal: {}", config.portal.url);
        println!("  Names: {}", config.names.len());
        for name in &config.names {
            println!("    - {}", name);
        }
        println!("  Element timeout: {}ms", config.timeouts.element_ms);
        println!("  Query pause: {}ms", config.timeouts.query_pause_ms);
        println!("  Output dir: {}", config.output.dir);
        return Ok(());
    }

    // Override headless if specified
    if cli.headless {
        config.browser.headless = true;
    }

    println!(
        "Querying {} name(s) at {}",
        config.names.len(),
        config.portal.url
    );

    let mut scraper = eproc_scraper::Scraper::launch(&config).await?;

    // On interrupt: tear the browser down and persist nothing.
    let outcome = {
        tokio::select! {
            summary = scraper.run() => Some(summary),
            _ = tokio::signal::ctrl_c() => None,
        }
    };

    let Some(summary) = outcome else {
        eprintln!("\nInterrupted, closing browser");
        if let Err(e) = scraper.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        std::process::exit(130);
    };
    let summary = summary?;
    let snapshot = scraper.snapshot();

    // Print result
    println!();
    if summary.failed_queries == 0 && summary.failed_cases == 0 {
        println!("✓ Success");
    } else {
        println!("✗ Completed with failures");
    }
    for (name, records) in &snapshot.records {
        println!("  {}: {} record(s)", name, records.len());
    }
    println!("  Total: {} record(s)", summary.records);
    println!("  Duration: {}ms", summary.duration_ms);
    if summary.failed_queries > 0 {
        println!("  Failed queries: {}", summary.failed_queries);
    }
    if summary.failed_cases > 0 {
        println!("  Skipped cases: {}", summary.failed_cases);
    }

    // Persist before teardown; close the browser even if persistence failed.
    let saved = eproc_scraper::output::write_snapshot(&config.output, &snapshot);
    if let Err(e) = scraper.close().await {
        tracing::warn!("Failed to close browser: {}", e);
    }
    let path = saved?;
    println!("  Saved: {}", path.display());

    if summary.failed_queries > 0 || summary.failed_cases > 0 {
        std::process::exit(1);
    }

    Ok(())
}
