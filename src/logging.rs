//! Logging configuration
//!
//! Uses log4rs with appenders:
//! 1. ConsoleAppender - stdout output
//! 2. RollingFileAppender - log files with rotation (desktop only, when a
//!    log directory is given)

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
#[cfg(not(target_os = "android"))]
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
#[cfg(not(target_os = "android"))]
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
#[cfg(not(target_os = "android"))]
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
#[cfg(not(target_os = "android"))]
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::PathBuf;

/// Max size of one log file before it is rolled
pub const LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Number of rolled files kept
pub const LOG_FILE_COUNT: u32 = 5;

const CONSOLE_PATTERN: &str = "{d(%H:%M:%S)} [{l}] {t} - {m}{n}";

/// Build the log4rs config
///
/// # Log File Configuration (desktop only)
/// - File: `{log_dir}/background-mode.1.log`
/// - Max size: 10 MB per file
/// - Max count: 5 files (rotation)
/// - Pattern: `{timestamp} [{level}] {target} - {message}`
pub fn build_config(log_dir: Option<PathBuf>, level: LevelFilter) -> anyhow::Result<Config> {
    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();

    let mut builder =
        Config::builder().appender(Appender::builder().build("console", Box::new(console)));
    let mut root = Root::builder().appender("console");

    #[cfg(target_os = "android")]
    let _ = log_dir;

    #[cfg(not(target_os = "android"))]
    {
        if let Some(log_dir) = log_dir {
            std::fs::create_dir_all(&log_dir)?;

            let log_file = log_dir.join("background-mode.1.log");
            let log_pattern = log_dir.join("background-mode.{}.log");
            let log_pattern = log_pattern
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("log directory is not valid UTF-8"))?;

            let roller = FixedWindowRoller::builder()
                .base(1)
                .build(log_pattern, LOG_FILE_COUNT)?;
            let trigger = SizeTrigger::new(LOG_FILE_SIZE);
            let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

            let logfile = RollingFileAppender::builder()
                .encoder(Box::new(PatternEncoder::new(
                    "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
                )))
                .build(log_file, Box::new(policy))?;

            builder = builder.appender(Appender::builder().build("logfile", Box::new(logfile)));
            root = root.appender("logfile");
        }
    }

    Ok(builder.build(root.build(level))?)
}

/// Initialize log4rs with a console appender and, on desktop, a rolling
/// file appender under `log_dir`
pub fn init_logger(log_dir: Option<PathBuf>, level: LevelFilter) -> anyhow::Result<log4rs::Handle> {
    let config = build_config(log_dir, level)?;
    Ok(log4rs::init_config(config)?)
}
