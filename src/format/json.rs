//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::{OutputFormatter, Report};

/// JSON formatter - outputs the full result as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON result"
    }

    fn format(&self, report: Report<'_>, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::samples;

    #[test]
    fn test_explore_json() {
        let outcome = samples::explore();
        let output = JsonFormatter
            .format(Report::Explore(&outcome), &Config::default())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["query"], "Paris");
        assert_eq!(parsed["places"]["kind"], "cards");
        assert_eq!(parsed["places"]["value"].as_array().unwrap().len(), 5);
        assert_eq!(parsed["location"]["coordinate"]["lat"], 48.8566);
    }

    #[test]
    fn test_directions_json() {
        let outcome = samples::directions();
        let output = JsonFormatter
            .format(Report::Directions(&outcome), &Config::default())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["times"]["car"], 133);
        assert_eq!(parsed["destination"]["name"], "One East");
    }
}
