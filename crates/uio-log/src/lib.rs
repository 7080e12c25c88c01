//! Leveled logging on `tracing`, with flags to choose the level.
//!
//! Commands register a level flag (`-level=debug`) or a boolean verbosity
//! flag (`-v`) on their [`FlagSet`], then call [`init`] with the level the
//! flags resolved to. `RUST_LOG`, when set, takes precedence.
//!
//! ```no_run
//! use uio_flag::FlagSet;
//!
//! let mut flags = FlagSet::new("make");
//! let debug = uio_log::register_debug_flag(&mut flags, "v");
//! flags.try_parse(&["-v"]).unwrap();
//!
//! uio_log::init(debug.level());
//! tracing::debug!("visible");
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;
use uio_flag::Flag;
use uio_flag::FlagSet;

/// A `tracing` level usable as a flag value.
///
/// Parses level names case-insensitively, or a number on the `slog` scale
/// (-4 debug, 0 info, 4 warn, 8 error, anything below -4 trace), and
/// defaults to `INFO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(Level);

impl LogLevel {
    pub const fn new(level: Level) -> Self {
        Self(level)
    }

    pub const fn level(self) -> Level {
        self.0
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self(Level::INFO)
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        Self(level)
    }
}

impl FromStr for LogLevel {
    type Err = <Level as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i64>() {
            Ok(n) => Ok(Self(slog_level(n))),
            Err(_) => s.parse().map(Self),
        }
    }
}

fn slog_level(n: i64) -> Level {
    match n {
        i64::MIN..=-5 => Level::TRACE,
        -4..=-1 => Level::DEBUG,
        0..=3 => Level::INFO,
        4..=7 => Level::WARN,
        _ => Level::ERROR,
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.as_str().to_ascii_lowercase())
    }
}

/// Registers `-<name>=<level>` on `flags`.
pub fn register_level_flag(flags: &mut FlagSet, name: &str) -> Flag<LogLevel> {
    flags.value(
        name,
        LogLevel::default(),
        "log `level` (trace, debug, info, warn, error)",
    )
}

/// A boolean flag raising the log level when given.
///
/// Once any occurrence sets it, later `=false` occurrences leave it raised.
#[derive(Debug, Clone)]
pub struct VerboseFlag {
    enabled: Flag<bool>,
    level: Level,
}

impl VerboseFlag {
    /// The verbose level if the flag was given, `INFO` otherwise.
    pub fn level(&self) -> Level {
        if self.enabled.get() {
            self.level
        } else {
            Level::INFO
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}

/// Registers a boolean `-<name>` that selects `level`.
pub fn register_verbose_flag(flags: &mut FlagSet, name: &str, level: Level) -> VerboseFlag {
    let usage = format!("log at {} level", LogLevel(level));
    let enabled = Flag::new(false);
    flags.bool_func(name, &usage, {
        let enabled = enabled.clone();
        move |on| {
            if on {
                enabled.replace(true);
            }
        }
    });
    VerboseFlag { enabled, level }
}

/// Registers a boolean `-<name>` that selects `DEBUG`.
pub fn register_debug_flag(flags: &mut FlagSet, name: &str) -> VerboseFlag {
    register_verbose_flag(flags, name, Level::DEBUG)
}

/// `RUST_LOG` if set and valid, otherwise `level`.
pub fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Exactly `level`, ignoring the environment.
pub fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy("")
}

/// The plain-text subscriber used by [`init`], writing to `writer`.
///
/// Lines carry the level and the message; no timestamps, targets or colors.
pub fn subscriber<W>(
    filter: EnvFilter,
    writer: W,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .finish()
}

/// Installs the global subscriber, logging to standard error.
///
/// Does nothing if a global subscriber is already installed.
pub fn init(level: Level) {
    let subscriber = subscriber(env_filter(level), std::io::stderr);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global subscriber already installed");
    }
}

/// Routes this thread's events through the test harness's captured output
/// until the guard is dropped.
pub fn test(level: Level) -> DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(level_filter(level))
        .with_test_writer()
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_default(subscriber)
}
