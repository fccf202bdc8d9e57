use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

/// Logs go to stderr so stdout carries only rendered output (JSON included).
const LOG_STREAM: TerminalMode = TerminalMode::Stderr;

/// Level for the number of `-v` flags given.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

pub fn init(verbosity: u8) {
    let _ = TermLogger::init(level_for(verbosity), Config::default(), LOG_STREAM, ColorChoice::Auto);
}
