//! Human-readable text output formatter
//!
//! The explore report doubles as the printable list of popular places.

use crate::config::Config;
use crate::controller::{DirectionsOutcome, ExploreOutcome, LocateView, PlacesPanel};
use crate::destination::Destination;
use crate::error::Result;
use crate::format::{OutputFormatter, Report};
use crate::travel::format_minutes;
use chrono::{Local, NaiveDate};
use std::fmt::Write;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: Report<'_>, _config: &Config) -> Result<String> {
        Ok(match report {
            Report::Explore(outcome) => explore_report(outcome, Local::now().date_naive()),
            Report::Located(view) => located_report(view),
            Report::Directions(outcome) => directions_report(outcome),
            Report::Destination(destination) => destination_report(destination),
        })
    }
}

/// Printable list of popular places
pub fn explore_report(outcome: &ExploreOutcome, generated_on: NaiveDate) -> String {
    let mut output = String::new();

    // Header
    let _ = writeln!(output, "Popular Tourist Spots in {}", outcome.query);
    let _ = writeln!(output, "Generated on {}", generated_on.format("%B %-d, %Y"));
    output.push('\n');

    let _ = writeln!(output, "{}", outcome.location.display_name);
    let _ = writeln!(output, "{}", outcome.location.coordinate);
    output.push('\n');

    match &outcome.places {
        PlacesPanel::Cards(cards) => {
            for (i, card) in cards.iter().enumerate() {
                let _ = writeln!(
                    output,
                    "{}. {}  [{}, {} visitors/month]",
                    i + 1,
                    card.place.name,
                    card.synthetic.tier.label(),
                    card.synthetic.monthly_visitors
                );
                if !card.place.description.is_empty() {
                    let _ = writeln!(output, "   {}", card.place.description);
                }
            }
        }
        PlacesPanel::Error(message) => {
            let _ = writeln!(output, "{}", message);
        }
    }

    output
}

fn located_report(view: &LocateView) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", view.location.display_name);
    let _ = writeln!(
        output,
        "{} ±{:.0}m{}",
        view.location.coordinate,
        view.reading.accuracy_m,
        if view.precise { "" } else { " (low accuracy)" }
    );
    output
}

fn directions_report(outcome: &DirectionsOutcome) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Directions to {}", outcome.destination.name);
    let _ = writeln!(output, "From: {}", outcome.from.display_name);
    let _ = writeln!(output, "To:   {}", outcome.to.display_name);
    let _ = writeln!(output, "Distance: {:.1} km (straight line)", outcome.distance_km);
    output.push('\n');

    for (mode, minutes) in outcome.times.iter() {
        let _ = writeln!(output, "  {:<9} {}", mode.label(), format_minutes(minutes));
    }
    output
}

fn destination_report(destination: &Destination) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", destination.name);
    if let Some(description) = &destination.description {
        let _ = writeln!(output, "{}", description);
    }
    if let Some(saved_at) = destination.saved_at {
        let _ = writeln!(output, "Selected {}", saved_at.format("%Y-%m-%d %H:%M UTC"));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::samples;

    #[test]
    fn test_printable_report() {
        let outcome = samples::explore();
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let output = explore_report(&outcome, date);

        assert!(output.starts_with("Popular Tourist Spots in Paris\nGenerated on March 9, 2024\n"));
        assert!(output.contains("1. Louvre  [Most Visited, 4321 visitors/month]"));
        assert!(output.contains("   Why Louvre is worth it"));
        assert!(output.contains("5. Orsay"));
    }

    #[test]
    fn test_report_with_error_panel() {
        let mut outcome = samples::explore();
        outcome.places = PlacesPanel::Error("Unable to load popular places at this time.".into());
        let output = explore_report(&outcome, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(output.ends_with("Unable to load popular places at this time.\n"));
    }

    #[test]
    fn test_directions_text() {
        let outcome = samples::directions();
        let output = TextFormatter
            .format(Report::Directions(&outcome), &Config::default())
            .unwrap();

        assert!(output.contains("Directions to One East"));
        assert!(output.contains("Distance: 111.2 km"));
        assert!(output.contains("By Car    2 hr 13 min"));
        assert!(output.contains("On Foot   22 hr 14 min"));
    }

    #[test]
    fn test_located_text() {
        let view = samples::located();
        let output = TextFormatter
            .format(Report::Located(&view), &Config::default())
            .unwrap();
        assert!(output.contains("±1500m (low accuracy)"));
    }

    #[test]
    fn test_destination_text() {
        let destination = Destination::new("Louvre").with_description("Art museum");
        let output = TextFormatter
            .format(Report::Destination(&destination), &Config::default())
            .unwrap();
        assert_eq!(output, "Louvre\nArt museum\n");
    }

    #[test]
    fn test_text_formatter_info() {
        let formatter = TextFormatter;
        assert_eq!(formatter.name(), "text");
        assert!(!formatter.description().is_empty());
    }
}
