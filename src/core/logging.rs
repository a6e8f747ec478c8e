//! Logging setup on top of flexi_logger
//!
//! Library code only uses the `log` macros; the binary calls [`init_logging`]
//! once at startup to install the backend with one of the supported formats,
//! then [`configure_logging`] once the configuration file has been merged.

use std::sync::{Mutex, OnceLock};

// Handle must outlive main or buffered file output is dropped
static LOGGER_HANDLE: OnceLock<Mutex<flexi_logger::LoggerHandle>> = OnceLock::new();

/// Ordered from least to most verbose, used to apply -v/-q adjustments
const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Resolve the effective level string from a base level and a verbosity delta.
///
/// Each `-v` moves one step towards `trace`, each `-q` one step towards `off`.
/// Unknown base levels are treated as `info`.
pub fn effective_level(base: Option<&str>, verbosity: i8) -> &'static str {
    let base = base.unwrap_or("info").to_lowercase();
    let index = LEVELS.iter().position(|l| *l == base).unwrap_or(3) as i32;
    let adjusted = (index + verbosity as i32).clamp(0, LEVELS.len() as i32 - 1);
    LEVELS[adjusted as usize]
}

/// Install the global logger.
///
/// `log_format` is one of `text` (default), `ext` or `json`. When `log_file`
/// is given, output goes to that file instead of stderr.
pub fn init_logging(
    log_level: &str,
    log_format: Option<&str>,
    log_file: Option<&str>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    use flexi_logger::{FileSpec, Logger};

    let mut logger = Logger::try_with_str(log_level)?;

    logger = match log_format.unwrap_or("text") {
        "json" => logger.format(json_format),
        "ext" if color_enabled => logger.format(extended_color_format),
        "ext" => logger.format(extended_format),
        _ if color_enabled => logger.format(simple_color_format),
        _ => logger.format(simple_format),
    };

    if let Some(file_path) = log_file.filter(|p| *p != "none") {
        let file_spec = FileSpec::try_from(std::path::Path::new(file_path))?;
        logger = logger.log_to_file(file_spec);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(Mutex::new(handle));

    Ok(())
}

/// Change the level of the installed logger
///
/// Only the level can change at runtime; format and destination stay as
/// [`init_logging`] set them.
pub fn configure_logging(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let handle_mutex = LOGGER_HANDLE
        .get()
        .ok_or("Logger handle not initialised. Call init_logging first.")?;
    let mut handle = handle_mutex
        .lock()
        .map_err(|_| "Could not acquire logger handle lock")?;
    handle.parse_and_push_temp_spec(log_level)?;
    Ok(())
}

fn level_abbr(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

fn level_colored(level: log::Level) -> colored::ColoredString {
    use colored::Colorize;

    match level {
        log::Level::Error => "ERR".red().bold(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Info => "INF".green(),
        log::Level::Debug => "DBG".blue(),
        log::Level::Trace => "TRC".magenta(),
    }
}

// "YYYY-MM-DD HH:mm:ss.fff INF message (scanner/manager.rs:42)"
fn simple_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line())
    )
}

fn simple_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args()
    )
}

fn extended_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} [{}] {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        std::thread::current().name().unwrap_or("-"),
        record.args(),
        format_target_as_path(record.target(), record.line())
    )
}

fn extended_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line()).dimmed()
    )
}

// One compact object per line: timestamp, level, message, target
fn json_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    let json_obj = serde_json::json!({
        "timestamp": now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "level": level_abbr(record.level()),
        "message": record.args().to_string(),
        "target": format_target_as_path(record.target(), record.line())
    });

    match serde_json::to_string(&json_obj) {
        Ok(json_string) => w.write_all(json_string.as_bytes()),
        Err(_) => w.write_all(b"{\"error\":\"Failed to serialize log message\"}"),
    }
}

// repoaudit::scanner::manager -> scanner/manager.rs:<line>
fn format_target_as_path(target: &str, line: Option<u32>) -> String {
    let path_like = match target.strip_prefix("repoaudit::") {
        Some(without_prefix) => without_prefix.replace("::", "/") + ".rs",
        None => target.replace("::", "/"),
    };

    match line {
        Some(line_num) => format!("{}:{}", path_like, line_num),
        None => path_like,
    }
}
