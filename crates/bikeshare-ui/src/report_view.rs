//! Sectioned text rendering of an [`ExplorationReport`].

use bikeshare_core::error::StatError;
use bikeshare_core::formatting::{format_count, format_duration, format_number, percentage};
use bikeshare_core::time_utils::{month_name, weekday_name};
use bikeshare_data::aggregator::{DurationStats, StationStats, TimeStats, UserStats};
use bikeshare_data::analysis::ExplorationReport;

use crate::table_view::pad_right;

/// Rule printed after each section.
const RULE_WIDTH: usize = 40;

/// Render the full report: a summary line followed by the four sections.
pub fn render_report(report: &ExplorationReport) -> String {
    let t = &report.timings;
    let sections = [
        render_summary(report),
        section(
            "Calculating The Most Frequent Times of Travel...",
            outcome_lines(&report.time, time_lines),
            t.time_seconds,
        ),
        section(
            "Calculating The Most Popular Stations and Trip...",
            outcome_lines(&report.stations, station_lines),
            t.station_seconds,
        ),
        section(
            "Calculating Trip Duration...",
            outcome_lines(&report.durations, duration_lines),
            t.duration_seconds,
        ),
        section(
            "Calculating User Stats...",
            outcome_lines(&report.users, user_lines),
            t.user_seconds,
        ),
    ];
    sections.join("\n")
}

fn render_summary(report: &ExplorationReport) -> String {
    format!(
        "{} trips for month: {}, day: {}, {} of {} trips match (loaded in {:.3} seconds).\n{}",
        report.city,
        report.selection.month_label(),
        report.selection.day_label(),
        format_count(report.view_records),
        format_count(report.dataset_records),
        report.timings.load_seconds,
        "-".repeat(RULE_WIDTH),
    )
}

fn section(title: &str, body: Vec<String>, seconds: f64) -> String {
    let mut lines = vec![String::new(), title.to_string(), String::new()];
    lines.extend(body);
    lines.push(String::new());
    lines.push(format!("This took {seconds:.6} seconds."));
    lines.push("-".repeat(RULE_WIDTH));
    lines.join("\n")
}

/// Body lines for a statistic group, or its informational message.
fn outcome_lines<T>(
    outcome: &Result<T, StatError>,
    render: impl FnOnce(&T) -> Vec<String>,
) -> Vec<String> {
    match outcome {
        Ok(value) => render(value),
        Err(e) => vec![e.to_string()],
    }
}

fn time_lines(t: &TimeStats) -> Vec<String> {
    let month = month_name(t.month.value).unwrap_or("Unknown");
    vec![
        format!(
            "Most popular month of travel: {} (count: {})",
            month,
            format_count(t.month.count)
        ),
        format!(
            "Most popular day of week for travel: {} (count: {})",
            weekday_name(t.weekday.value),
            format_count(t.weekday.count)
        ),
        format!(
            "Most popular hour travelled: {:02}:00 (count: {})",
            t.hour.value,
            format_count(t.hour.count)
        ),
    ]
}

fn station_lines(s: &StationStats) -> Vec<String> {
    vec![
        format!(
            "Most popular start station used: {} (count: {})",
            s.start_station.value,
            format_count(s.start_station.count)
        ),
        format!(
            "Most popular end station used: {} (count: {})",
            s.end_station.value,
            format_count(s.end_station.count)
        ),
        format!(
            "Most frequent combination of start station and end station trip: {} (count: {})",
            s.trip.value,
            format_count(s.trip.count)
        ),
    ]
}

fn duration_lines(d: &DurationStats) -> Vec<String> {
    vec![
        format!(
            "Total travel time: {} ({} seconds over {} trips)",
            format_duration(d.total_seconds),
            format_number(d.total_seconds, 0),
            format_count(d.trips)
        ),
        format!(
            "Average travel time: {} ({} seconds)",
            format_duration(d.mean_seconds),
            format_number(d.mean_seconds, 2)
        ),
        format!(
            "Shortest trip: {}, longest trip: {}",
            format_duration(d.shortest_seconds),
            format_duration(d.longest_seconds)
        ),
    ]
}

fn user_lines(u: &UserStats) -> Vec<String> {
    let mut lines = vec!["Type of users:".to_string()];
    lines.extend(table_lines(&u.user_types));
    lines.push(String::new());

    match &u.gender {
        Ok(table) => {
            lines.push("Types of users by gender:".to_string());
            lines.extend(table_lines(table));
        }
        Err(e) => lines.push(e.to_string()),
    }
    lines.push(String::new());

    match &u.birth_year {
        Ok(b) => {
            lines.push(format!(
                "Oldest person to use our services was born in the year: {}",
                b.earliest
            ));
            lines.push(format!(
                "Youngest person to use our services was born in the year: {}",
                b.most_recent
            ));
            lines.push(format!(
                "Most common year of birth among our users: {} (count: {})",
                b.most_common.value,
                format_count(b.most_common.count)
            ));
        }
        Err(e) => lines.push(e.to_string()),
    }
    lines
}

/// Indented `label  count  (share%)` rows with aligned columns.
fn table_lines(table: &[(String, usize)]) -> Vec<String> {
    let total: usize = table.iter().map(|(_, n)| n).sum();
    let label_width = table
        .iter()
        .map(|(label, _)| unicode_width::UnicodeWidthStr::width(label.as_str()))
        .max()
        .unwrap_or(0);
    let count_width = table
        .iter()
        .map(|(_, n)| format_count(*n).len())
        .max()
        .unwrap_or(0);

    table
        .iter()
        .map(|(label, n)| {
            format!(
                "  {}  {:>cw$}  ({:.1}%)",
                pad_right(label, label_width),
                format_count(*n),
                percentage(*n as f64, total as f64, 1),
                cw = count_width,
            )
        })
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::{City, Month, OptionalField, Selection, Selector, TripRecord};
    use bikeshare_data::analysis::Exploration;
    use bikeshare_data::reader::CityDataset;
    use chrono::NaiveDate;

    fn exploration(fields: &[OptionalField], month: Selector<Month>) -> Exploration {
        let at = |d: u32, h: u32| {
            NaiveDate::from_ymd_opt(2017, 3, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        };
        let records = vec![
            TripRecord::new(at(3, 8))
                .with_duration(60.0)
                .with_stations("Canal St", "State St")
                .with_user_type("Subscriber")
                .with_gender(Some("Male".to_string()))
                .with_birth_year(Some(1980)),
            TripRecord::new(at(3, 8))
                .with_duration(120.0)
                .with_stations("Canal St", "State St")
                .with_user_type("Subscriber")
                .with_gender(Some("Female".to_string()))
                .with_birth_year(Some(1999)),
            TripRecord::new(at(4, 9))
                .with_duration(180.0)
                .with_stations("Lake St", "Clark St")
                .with_user_type("Customer")
                .with_birth_year(Some(1980)),
        ];
        let ds = CityDataset::new(City::Chicago, records, fields);
        Exploration::new(ds, Selection::new(month, Selector::All))
    }

    #[test]
    fn test_render_report_sections() {
        let ex = exploration(
            &[OptionalField::Gender, OptionalField::BirthYear],
            Selector::All,
        );
        let view = ex.view();
        let text = render_report(&ex.report(&view));

        assert!(text.starts_with("Chicago trips for month: all, day: all"));
        assert!(text.contains("Most popular month of travel: March (count: 3)"));
        assert!(text.contains("Most popular day of week for travel: Friday (count: 2)"));
        assert!(text.contains("Most popular hour travelled: 08:00 (count: 2)"));
        assert!(text.contains("Most popular start station used: Canal St (count: 2)"));
        assert!(text.contains("Canal St -> State St (count: 2)"));
        assert!(text.contains("Total travel time: 6m (360 seconds over 3 trips)"));
        assert!(text.contains("Average travel time: 2m (120.00 seconds)"));
        assert!(text.contains("Oldest person to use our services was born in the year: 1980"));
        assert!(text.contains("Youngest person to use our services was born in the year: 1999"));
        assert_eq!(text.matches("This took").count(), 4);
    }

    #[test]
    fn test_render_report_missing_demographics() {
        let ex = exploration(&[], Selector::All);
        let view = ex.view();
        let text = render_report(&ex.report(&view));
        assert!(text.contains("No user gender information available for this city"));
        assert!(text.contains("No user year of birth information available for this city"));
    }

    #[test]
    fn test_render_report_empty_view() {
        let ex = exploration(&[], Selector::Only(Month::June));
        let view = ex.view();
        let text = render_report(&ex.report(&view));
        assert_eq!(text.matches("No data for this selection").count(), 4);
        assert!(!text.contains("Average travel time"));
    }

    #[test]
    fn test_table_lines_alignment_and_share() {
        let lines = table_lines(&[
            ("Subscriber".to_string(), 1_500),
            ("Customer".to_string(), 500),
        ]);
        assert_eq!(lines[0], "  Subscriber  1,500  (75.0%)");
        assert_eq!(lines[1], "  Customer      500  (25.0%)");
    }
}
