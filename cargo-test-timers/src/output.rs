// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::{
    Args, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use owo_colors::{OwoColorize, Style, style};
use std::{fmt, io::BufWriter};
use test_timers::write_str::WriteStr;
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
};
use tracing_subscriber::{
    Layer,
    filter::Targets,
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Log messages with this target are printed without a level heading.
pub(crate) const NO_HEADING_TARGET: &str = "cargo_test_timers::no_heading";

/// The environment variable used to configure log filtering.
pub(crate) const LOG_ENV: &str = "TEST_TIMERS_LOG";

/// Help output styles, matching Cargo's.
pub(crate) fn clap_styles() -> Styles {
    let bold_green = AnsiColor::Green.on_default().effects(Effects::BOLD);
    let bold_cyan = AnsiColor::Cyan.on_default().effects(Effects::BOLD);
    Styles::styled()
        .header(bold_green)
        .usage(bold_green)
        .literal(bold_cyan)
        .placeholder(AnsiColor::Cyan.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(bold_cyan)
        .invalid(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
}

#[derive(Copy, Clone, Debug, Args)]
#[must_use]
pub(crate) struct OutputOpts {
    /// Verbose output
    #[arg(long, short, global = true, env = "TEST_TIMERS_VERBOSE")]
    pub(crate) verbose: bool,

    /// Produce color output: auto, always, never
    #[arg(
        long,
        value_enum,
        default_value_t,
        hide_possible_values = true,
        global = true,
        value_name = "WHEN",
        env = "CARGO_TERM_COLOR"
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    pub(crate) fn init(self) -> OutputContext {
        let OutputOpts { verbose, color } = self;

        color.init(verbose);

        OutputContext { verbose, color }
    }
}

#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct OutputContext {
    pub(crate) verbose: bool,
    pub(crate) color: Color,
}

impl OutputContext {
    /// Returns the style used to highlight paths in error messages.
    pub fn bold_style(&self) -> Style {
        if self.color.should_colorize(supports_color::Stream::Stderr) {
            style().bold()
        } else {
            Style::new()
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[must_use]
pub enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

static INIT_LOGGER: std::sync::Once = std::sync::Once::new();

struct SimpleFormatter {
    colorize: bool,
}

impl<S, N> FormatEvent<S, N> for SimpleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        if metadata.target() != NO_HEADING_TARGET {
            let (heading, heading_style) = match *metadata.level() {
                Level::ERROR => ("error", style().red().bold()),
                Level::WARN => ("warning", style().yellow().bold()),
                Level::INFO => ("info", style().bold()),
                Level::DEBUG => ("debug", style().bold()),
                Level::TRACE => ("trace", style().dimmed()),
            };
            if self.colorize {
                write!(writer, "{}: ", heading.style(heading_style))?;
            } else {
                write!(writer, "{heading}: ")?;
            }
        }

        let mut visitor = MessageVisitor {
            writer: &mut writer,
            error: None,
        };

        event.record(&mut visitor);

        if let Some(error) = visitor.error {
            return Err(error);
        }

        writeln!(writer)
    }
}

static MESSAGE_FIELD: &str = "message";

/// Writes the message, followed by any other fields as `name=value`.
struct MessageVisitor<'writer, 'a> {
    writer: &'a mut format::Writer<'writer>,
    error: Option<fmt::Error>,
}

impl Visit for MessageVisitor<'_, '_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let res = if field.name() == MESSAGE_FIELD {
            write!(self.writer, "{value:?}")
        } else {
            write!(self.writer, " {}={value:?}", field.name())
        };
        if let Err(error) = res {
            self.error = Some(error);
        }
    }
}

impl Color {
    pub(crate) fn init(self, verbose: bool) {
        let colorize = self.should_colorize(supports_color::Stream::Stderr);

        INIT_LOGGER.call_once(|| {
            let default_level = if verbose {
                LevelFilter::DEBUG
            } else {
                LevelFilter::INFO
            };
            let level_str = std::env::var(LOG_ENV).unwrap_or_default();

            // If the level string is empty or invalid, use the standard level filter instead.
            let mut invalid_filter = None;
            let targets = if level_str.is_empty() {
                Targets::new().with_default(default_level)
            } else {
                level_str.parse().unwrap_or_else(|err| {
                    invalid_filter = Some(err);
                    Targets::new().with_default(default_level)
                })
            };

            let layer = tracing_subscriber::fmt::layer()
                .event_format(SimpleFormatter { colorize })
                .with_writer(std::io::stderr)
                .with_filter(targets);

            tracing_subscriber::registry().with(layer).init();

            if let Some(err) = invalid_filter {
                tracing::warn!("ignoring invalid {LOG_ENV} value `{level_str}`: {err}");
            }
        });
    }

    pub(crate) fn should_colorize(self, stream: supports_color::Stream) -> bool {
        match self {
            Color::Auto => supports_color::on_cached(stream).is_some(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

/// Where the report goes when no output file is specified.
#[derive(Default)]
pub enum OutputWriter {
    /// Write to stdout.
    #[default]
    Normal,
    /// Capture output in memory.
    #[cfg(test)]
    Test {
        /// Captured stdout.
        stdout: Vec<u8>,
    },
}

impl OutputWriter {
    pub(crate) fn stdout_writer(&mut self) -> Box<dyn WriteStr + '_> {
        match self {
            Self::Normal => Box::new(BufWriter::new(std::io::stdout())),
            #[cfg(test)]
            Self::Test { stdout } => Box::new(stdout),
        }
    }
}
