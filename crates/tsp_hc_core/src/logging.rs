use std::{
    fmt::Display,
    fs::File,
    io::{self, Write},
};

use env_logger::{Builder, Target, WriteStyle};
use log::Record;

use crate::{
    Error, Result,
    io::options::{LogFormat, SearchOptions},
};

/// How one log line is laid out.
#[derive(Clone, Copy, Debug)]
struct LineLayout {
    format: LogFormat,
    timestamp: bool,
}

impl LineLayout {
    fn from_options(options: &SearchOptions) -> Self {
        Self {
            format: options.log_format,
            timestamp: options.log_timestamp,
        }
    }

    fn write(
        &self,
        out: &mut impl Write,
        stamp: Option<impl Display>,
        record: &Record<'_>,
    ) -> io::Result<()> {
        if let Some(stamp) = stamp.filter(|_| self.timestamp) {
            write!(out, "{stamp} ")?;
        }
        let level = record.level().as_str();
        match self.format {
            LogFormat::Compact => writeln!(out, "{level} {}", record.args()),
            LogFormat::Pretty => writeln!(
                out,
                "{level} [{}] {}",
                short_target(record.target()),
                record.args()
            ),
        }
    }
}

/// Installs the global logger described by `options`. Fails if a logger is
/// already set or the log file cannot be created.
pub fn init_logger(options: &SearchOptions) -> Result<()> {
    let layout = LineLayout::from_options(options);

    Builder::new()
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .target(log_target(options)?)
        .format(move |buf, record| {
            let stamp = layout.timestamp.then(|| buf.timestamp_millis());
            layout.write(buf, stamp, record)
        })
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

fn log_target(options: &SearchOptions) -> Result<Target> {
    let Some(path) = options.log_output_path() else {
        return Ok(Target::Stderr);
    };
    let file = File::create(path).map_err(|e| {
        Error::other(format!(
            "failed to create log output file {}: {e}",
            path.display()
        ))
    })?;
    Ok(Target::Pipe(Box::new(file)))
}

/// Module path relative to this crate, e.g. `algo::search`.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix(concat!(env!("CARGO_CRATE_NAME"), "::"))
        .unwrap_or(target)
}
