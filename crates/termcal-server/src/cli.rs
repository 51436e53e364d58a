//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use termcal_core::{RenderRequest, TracingOutputFormat};

/// termcal - your calendar agenda as terminal text
#[derive(Debug, Parser)]
#[command(name = "termcal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "TERMCAL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log format: compact, pretty or json
    #[arg(long, default_value_t = TracingOutputFormat::Compact, global = true)]
    pub log_format: TracingOutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Render one agenda to stdout
    Render(RenderArgs),

    /// Manage stored credentials
    Credentials {
        #[command(subcommand)]
        action: CredentialsAction,
    },
}

/// Options for a single render, mirroring the HTTP query options.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// User id whose credential is used
    pub id: String,

    /// IANA timezone name
    #[arg(long)]
    pub tz: Option<String>,

    /// Maximum number of events to fetch
    #[arg(long)]
    pub limit: Option<i64>,

    /// Wrap column for titles
    #[arg(long)]
    pub width: Option<i64>,

    /// Disable ANSI colors
    #[arg(long)]
    pub no_color: bool,

    /// Skip all-day events
    #[arg(long)]
    pub no_all_day: bool,

    /// Comma-separated title patterns to hide
    #[arg(long)]
    pub exclude: Option<String>,

    /// Comma-separated `pattern,color` pairs
    #[arg(long)]
    pub highlights: Option<String>,
}

impl RenderArgs {
    pub fn to_request(&self) -> RenderRequest {
        let mut request = RenderRequest::new(&self.id)
            .with_color(!self.no_color)
            .with_all_day(!self.no_all_day);
        if let Some(ref tz) = self.tz {
            request = request.with_time_zone(tz);
        }
        if let Some(limit) = self.limit {
            request = request.with_max_results(limit);
        }
        if let Some(width) = self.width {
            request = request.with_max_width(width);
        }
        if let Some(ref exclude) = self.exclude {
            request = request.with_exclude(exclude);
        }
        if let Some(ref highlights) = self.highlights {
            request = request.with_highlights(highlights);
        }
        request
    }
}

/// Credential actions.
#[derive(Debug, Subcommand)]
pub enum CredentialsAction {
    /// Store a credential record read from a JSON file
    Import {
        /// JSON file holding `{"id": ..., "token": {...}}`
        file: PathBuf,
    },
}
