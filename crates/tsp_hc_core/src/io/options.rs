use std::{env, fmt, iter::Peekable, path::Path};

use log::LevelFilter;

use crate::{Error, Result, constants::DEFAULT_MAX_CLONES};

/// Runtime options for the circuit search and the binary around it.
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Upper bound on forked states admitted to the search frontier.
    pub max_clones: usize,
    /// Cheapest edges kept per vertex when candidates are seeded. Zero keeps all.
    pub candidate_limit: usize,
    /// Drop points that coincide with an earlier point before solving.
    pub dedupe: bool,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    pub log_output: String,
    /// Optional input file path for points. Empty means stdin.
    pub input: String,
    /// Optional output file path for the ordered tour. Empty means stdout.
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "off" => Ok(Self::Off),
            _ => Err(invalid_value(
                "log-level",
                raw,
                "error|warn|info|debug|trace|off",
            )),
        }
    }

    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Off => "off",
        };
        write!(f, "{value}")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(invalid_value("log-format", raw, "compact|pretty")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Pretty => write!(f, "pretty"),
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_clones: DEFAULT_MAX_CLONES,
            candidate_limit: 0,
            dedupe: true,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl fmt::Display for SearchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n\tmax_clones      = {}\n\tcandidate_limit = {}\n\tdedupe          = {}\n\tlog_level       = {}\n\tlog_format      = {}\n\tlog_timestamp   = {}\n\tlog_output      = {}\n\tinput           = {}\n\toutput          = {}",
            self.max_clones,
            self.candidate_limit,
            self.dedupe,
            self.log_level,
            self.log_format,
            self.log_timestamp,
            self.log_output,
            self.input,
            self.output
        )
    }
}

impl SearchOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    pub fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = split_arg(raw_name, &mut args);

            match name.as_str() {
                "max-clones" => {
                    options.max_clones = parse_usize(&name, require_value(&name, value)?)?;
                }
                "candidate-limit" => {
                    options.candidate_limit = parse_usize(&name, require_value(&name, value)?)?;
                }
                "log-level" => {
                    options.log_level = LogLevel::parse(&require_value(&name, value)?)?;
                }
                "log-format" => {
                    options.log_format = LogFormat::parse(&require_value(&name, value)?)?;
                }
                "log-output" => options.log_output = require_value(&name, value)?,
                "input" => options.input = require_value(&name, value)?,
                "output" => options.output = require_value(&name, value)?,
                "dedupe" => options.dedupe = parse_flag(&name, value)?,
                "no-dedupe" => {
                    reject_value(&name, value)?;
                    options.dedupe = false;
                }
                "log-timestamp" => options.log_timestamp = parse_flag(&name, value)?,
                "no-log-timestamp" => {
                    reject_value(&name, value)?;
                    options.log_timestamp = false;
                }
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-hc [options] [--input points.txt]\n",
            "  tsp-hc [options] < points.txt\n\n",
            "Options:\n",
            "  --max-clones <usize>\n",
            "  --candidate-limit <usize>   (0 keeps every candidate)\n",
            "  --dedupe[=<bool>]\n",
            "  --no-dedupe\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --help\n",
            "\n",
            "Points are whitespace separated `x,y` or `x,y,z` tokens.\n",
            "\n",
            "Examples:\n",
            "  tsp-hc --input points.txt --output tour.txt\n",
            "  tsp-hc --max-clones 200 --log-level=info < points.txt\n",
            "  tsp-hc --candidate-limit=8 --log-level=debug --log-format=pretty < points.txt\n",
        )
    }

    /// `None` when every candidate is kept.
    pub fn candidate_limit(&self) -> Option<usize> {
        (self.candidate_limit > 0).then_some(self.candidate_limit)
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        optional_path(&self.log_output)
    }

    pub fn output_path(&self) -> Option<&Path> {
        optional_path(&self.output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        optional_path(&self.input)
    }
}

fn optional_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}

/// Splits `name=value`, or takes the next argument as the value when it is not
/// itself an option.
fn split_arg(
    raw_name: &str,
    args: &mut Peekable<impl Iterator<Item = String>>,
) -> (String, Option<String>) {
    if let Some((name, value)) = raw_name.split_once('=') {
        return (name.to_string(), Some(value.to_string()));
    }

    let value = match args.peek() {
        Some(next) if !next.starts_with("--") => args.next(),
        _ => None,
    };

    (raw_name.to_string(), value)
}

fn require_value(name: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| Error::invalid_input(format!("Missing value for --{name}")))
}

fn reject_value(name: &str, value: Option<String>) -> Result<()> {
    match value {
        Some(_) => Err(Error::invalid_input(format!(
            "Flag --{name} does not take a value"
        ))),
        None => Ok(()),
    }
}

fn parse_flag(name: &str, value: Option<String>) -> Result<bool> {
    match value {
        Some(v) => parse_bool(name, &v),
        None => Ok(true),
    }
}

fn parse_usize(name: &str, raw: String) -> Result<usize> {
    raw.trim()
        .parse()
        .map_err(|_| invalid_value(name, &raw, "a non-negative integer"))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}

fn invalid_value(name: &str, raw: &str, expected: &str) -> Error {
    Error::invalid_input(format!(
        "Invalid value for --{name}: {raw} (expected {expected})"
    ))
}
