//! URL output formatter

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{OutputFormatter, Report};

/// URL formatter - outputs a map URL for the place a result is about
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URL with optional provider override
    pub fn format_with_provider(
        &self,
        report: Report<'_>,
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        let coordinate = report
            .focus()
            .ok_or_else(|| Error::Config("This result has no coordinate to link to".to_string()))?;
        config.format_url(provider, coordinate.lat(), coordinate.lng())
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for the place shown"
    }

    fn format(&self, report: Report<'_>, config: &Config) -> Result<String> {
        self.format_with_provider(report, config, None)
    }
}
