use std::str::FromStr;

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::config::BoolLogConfig;
use crate::error::{Error, Result};

static CONSOLE_PATTERN: &str = "{h([{l}])} {m}{n}";
static FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}";

pub fn parse_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level).map_err(|_| Error::Config(format!("unknown log level {}", level)))
}

/// Logs to stderr, and additionally to `log_config.file` when set.
///
/// `level_override` takes precedence over the configured level.
pub fn init_logging(log_config: &BoolLogConfig, level_override: Option<LevelFilter>) -> Result<()> {
    let level = match level_override {
        Some(level) => level,
        None => parse_level(&log_config.level)?,
    };

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();

    let mut config_builder = Config::builder().appender(Appender::builder().build("stderr", Box::new(stderr)));
    let mut root_builder = Root::builder().appender("stderr");

    if let Some(log_file_path) = &log_config.file {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
            .build(log_file_path)
            .map_err(|e| Error::io(log_file_path, e))?;

        config_builder = config_builder.appender(Appender::builder().build("file", Box::new(file)));
        root_builder = root_builder.appender("file");
    }

    let config = config_builder
        .build(root_builder.build(level))
        .map_err(|e| Error::Config(format!("invalid logging configuration: {}", e)))?;

    log4rs::init_config(config).map_err(|e| Error::Config(format!("logger already initialized: {}", e)))?;

    Ok(())
}
