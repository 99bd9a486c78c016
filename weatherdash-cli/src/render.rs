use std::fmt::Write;

use weatherdash_core::{
    DisplaySeries, OrchestrationState, WeatherSnapshot,
    units::speed_label,
};

const BAR_WIDTH: i64 = 30;

pub fn state(state: &OrchestrationState) -> String {
    match state {
        OrchestrationState::Idle => "Search for a city to see the weather.".to_string(),
        OrchestrationState::Loading => "Loading...".to_string(),
        OrchestrationState::Error(message) => format!("Error: {message}"),
        OrchestrationState::Loaded { snapshot: s, history } => {
            let mut out = snapshot(s);
            if let Some(series) = history {
                out.push('\n');
                out.push_str(&history_table(series));
            }
            out
        }
    }
}

pub fn snapshot(s: &WeatherSnapshot) -> String {
    let unit = s.observed_at_unit_system;
    let symbol = unit.temperature_symbol();

    let mut out = String::new();
    let _ = writeln!(out, "Weather in {}", s.location_name);
    let _ = writeln!(out, "  {}  {:.0}{symbol}", s.condition_label, s.temperature);
    let _ = writeln!(out, "  Feels like  {:.0}{symbol}", s.feels_like);
    let _ = writeln!(out, "  Humidity    {}%", s.humidity_pct);
    let _ = writeln!(out, "  Winds       {:.0} {}", s.wind_speed, speed_label(unit));
    let _ = writeln!(out, "  Observed    {}", s.observed_at.format("%Y-%m-%d %H:%M UTC"));
    out
}

/// One row per sample with a bar scaled between the series' min and max.
pub fn history_table(series: &DisplaySeries) -> String {
    let mut out = String::from("Past weather\n");
    if series.is_empty() {
        out.push_str("  (no samples)\n");
        return out;
    }

    // Widened so extreme values cannot overflow the scaling.
    let min = i128::from(series.values.iter().copied().min().unwrap_or(0));
    let max = i128::from(series.values.iter().copied().max().unwrap_or(0));
    let span = (max - min).max(1);
    let symbol = series.unit.temperature_symbol();

    for (label, value) in series.points() {
        let bar = 1 + (i128::from(value) - min) * i128::from(BAR_WIDTH - 1) / span;
        let _ = writeln!(out, "  {label}  {value:>4}{symbol}  {}", "█".repeat(bar as usize));
    }
    out
}

pub fn recent(entries: &[String]) -> String {
    if entries.is_empty() {
        return "Recent searches: (none)\n".to_string();
    }

    let mut out = String::from("Recent searches:\n");
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "  {}. {entry}", i + 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use weatherdash_core::{Coordinates, UnitSystem};

    fn paris(unit: UnitSystem, temperature: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: "Paris".into(),
            coordinates: Coordinates { latitude: 48.85, longitude: 2.35 },
            condition_code: 800,
            condition_label: "Clear".into(),
            temperature,
            feels_like: temperature - 1.0,
            humidity_pct: 62,
            wind_speed: 4.1,
            observed_at_unit_system: unit,
            observed_at: DateTime::from_timestamp(1_704_110_400, 0).unwrap(),
        }
    }

    #[test]
    fn snapshot_uses_its_unit_labels() {
        let metric = snapshot(&paris(UnitSystem::Metric, 17.0));
        assert!(metric.contains("Weather in Paris"));
        assert!(metric.contains("17°C"));
        assert!(metric.contains("4 m/s"));
        assert!(metric.contains("62%"));

        let imperial = snapshot(&paris(UnitSystem::Imperial, 62.6));
        assert!(imperial.contains("63°F"));
        assert!(imperial.contains("MPH"));
    }

    #[test]
    fn history_table_rows() {
        let series = DisplaySeries {
            labels: vec!["12:00".into(), "13:00".into()],
            values: vec![17, 20],
            unit: UnitSystem::Metric,
        };
        let table = history_table(&series);
        let rows: Vec<_> = table.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("  12:00    17°C  █"));
        assert!(rows[1].ends_with(&"█".repeat(BAR_WIDTH as usize)));
    }

    #[test]
    fn history_table_handles_extreme_values() {
        let series = DisplaySeries {
            labels: vec!["12:00".into(), "13:00".into(), "14:00".into()],
            values: vec![i64::MIN, -10, i64::MAX],
            unit: UnitSystem::Metric,
        };
        let table = history_table(&series);
        let rows: Vec<_> = table.lines().skip(1).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].ends_with("°C  █"));
        assert!(rows[2].ends_with(&"█".repeat(BAR_WIDTH as usize)));
    }

    #[test]
    fn empty_history_table() {
        let table = history_table(&DisplaySeries::default());
        assert!(table.contains("(no samples)"));
    }

    #[test]
    fn state_messages() {
        assert_eq!(
            state(&OrchestrationState::Error("location not found".into())),
            "Error: location not found"
        );
        assert!(state(&OrchestrationState::Idle).contains("Search"));

        let loaded = OrchestrationState::Loaded {
            snapshot: paris(UnitSystem::Metric, 17.0),
            history: Some(DisplaySeries::default()),
        };
        let out = state(&loaded);
        assert!(out.contains("Weather in Paris"));
        assert!(out.contains("Past weather"));
    }

    #[test]
    fn recent_list() {
        assert!(recent(&[]).contains("(none)"));
        let out = recent(&["London".into(), "Paris".into()]);
        assert!(out.contains("1. London"));
        assert!(out.contains("2. Paris"));
    }
}
