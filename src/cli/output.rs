//! Shared output options
//!
//! Every command that prints a result accepts the same format flags.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::url::UrlFormatter;
use crate::format::{available_formats, get_formatter, Report};
use clap::Args;

/// Output arguments
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format (text, json, url)
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Map provider for the url format
    #[arg(long)]
    pub provider: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

impl OutputArgs {
    /// Print the format list if asked; true when the command should stop
    pub fn handled_listing(&self) -> bool {
        if self.list_formats {
            list_formats();
        }
        self.list_formats
    }

    /// Format and write a report
    pub fn emit(&self, report: Report<'_>, config: &Config) -> Result<()> {
        let output = if self.format.eq_ignore_ascii_case("url") {
            UrlFormatter.format_with_provider(report, config, self.provider.as_deref())?
        } else {
            let formatter = get_formatter(&self.format)
                .ok_or_else(|| Error::Config(format!("Unknown format: {}", self.format)))?;
            formatter.format(report, config)?
        };

        if let Some(path) = &self.output {
            std::fs::write(path, &output)?;
            eprintln!("Output written to {}", path);
        } else {
            println!("{}", output.trim_end());
        }
        Ok(())
    }
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:5} - {}", format.name, format.description);
    }
}
