//! Application startup and the top-level run sequence
//!
//! Configuration errors stop the run before any network call. Collection
//! problems never stop it; only a failure to persist the report does.

use clap::{CommandFactory, FromArgMatches};
use std::io::IsTerminal;
use std::sync::Arc;

use crate::app::cli::{AppConfig, Args};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{configure_logging, effective_level, init_logging};
use crate::core::styles::palette_to_clap;
use crate::core::time::{Clock, SystemClock};
use crate::core::version;
use crate::provider::{GitHubClient, OwnerResolver, ProviderClient};
use crate::report::display::print_summary;
use crate::report::{sink_for_output, Report, ReportAssembler, ReportResult, RiskAggregator};
use crate::scanner::ScanOrchestrator;

/// Process exit codes
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const CONFIGURATION: i32 = 1;
    pub const PERSISTENCE: i32 = 2;
    pub const INTERRUPTED: i32 = 130;
}

/// Parse the command line with help output styled for the terminal
fn parse_args() -> Args {
    let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let matches = Args::command().styles(palette_to_clap(color)).get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

/// Parse the command line and run; returns the process exit code
pub async fn startup() -> i32 {
    let args = parse_args();

    // Stage 1: logging from the command line alone, so configuration
    // loading is already logged
    let initial_level = effective_level(args.log_level.as_deref(), args.verbosity());
    let log_color = args
        .color_override()
        .unwrap_or_else(|| std::io::stderr().is_terminal());
    if let Err(e) = init_logging(
        initial_level,
        args.log_format.as_deref(),
        args.log_file.as_deref(),
        log_color,
    ) {
        eprintln!("Warning: failed to initialise logging: {}", e);
    }

    let config = match AppConfig::load(args).await {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Loading configuration");
            return exit_code::CONFIGURATION;
        }
    };

    // Stage 2: the configuration file may set the level
    let level = effective_level(config.log_level.as_deref(), config.verbosity);
    if level != initial_level {
        if let Err(e) = configure_logging(level) {
            log::warn!("Could not change log level to {}: {}", level, e);
        }
    }

    log::info!(
        "repoaudit {} ({} built {})",
        version::version(),
        version::git_hash(),
        version::build_time()
    );
    if config.token.is_none() {
        log::warn!("No API token configured; requests are unauthenticated and heavily rate limited");
    }

    let client = match GitHubClient::new(&config.api_url, config.token.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            log::error!("FATAL: {}", e);
            return exit_code::CONFIGURATION;
        }
    };

    let run = execute(&config, client, Arc::new(SystemClock));
    let report = tokio::select! {
        result = run => result,
        _ = tokio::signal::ctrl_c() => {
            log::warn!("Interrupted; no report written");
            return exit_code::INTERRUPTED;
        }
    };

    match report {
        Ok(report) => {
            if config.show_summary {
                print_summary(&report, config.use_color());
            }
            exit_code::SUCCESS
        }
        Err(e) => {
            log_error_with_context(&e, "Writing compliance report");
            exit_code::PERSISTENCE
        }
    }
}

/// Scan, assemble and persist one report
pub async fn execute(
    config: &AppConfig,
    client: Arc<dyn ProviderClient>,
    clock: Arc<dyn Clock>,
) -> ReportResult<Report> {
    let resolver = Arc::new(OwnerResolver::new(
        client.clone(),
        config.organization.clone(),
    ));
    let orchestrator = ScanOrchestrator::new(client, resolver, clock.clone(), config.scan_options());

    let outcome = orchestrator.scan(&config.repositories).await;
    if outcome.events.is_empty() {
        log::info!("No events collected; the report will be empty");
    }

    let aggregator = RiskAggregator::new().with_top_contributors(config.top_contributors);
    let report = ReportAssembler::new(clock, config.lookback_days)
        .with_aggregator(aggregator)
        .assemble(&outcome.events);

    let sink = sink_for_output(&config.output);
    sink.write(&report).await?;
    log::info!("Compliance report written to {}", sink.destination());

    Ok(report)
}
