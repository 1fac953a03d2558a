/// CSV rendering of flood risk reports.
///
/// Produces the same column layout as the downloadable spreadsheet: one
/// header row, one row per station, report date and generation time
/// repeated on every row so the file is self-describing when detached
/// from its filename.

use chrono::{DateTime, Utc};

use crate::report::StationReport;

const HEADER: &[&str] = &[
    "Date",
    "Time",
    "Time Zone",
    "Station Line",
    "Stop Name",
    "Borough",
    "Daytime Routes",
    "Structure",
    "Latitude",
    "Longitude",
    "Precip Rate (in/hr)",
    "1hr Accumulation (in)",
    "6hr Accumulation (in)",
    "Tide Level (ft)",
    "Central Park Daily (in)",
    "JFK Daily (in)",
    "LaGuardia Daily (in)",
    "Forecast 6hr (in)",
    "Forecast 24hr (in)",
    "Predicted Risk 6hr",
    "Predicted Risk 24hr",
    "Risk Level",
    "Risk Reason",
    "Source",
];

/// Renders station rows to a CSV document.
pub fn generate_csv_report(
    stations: &[StationReport],
    report_date: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str(&HEADER.join(","));
    out.push('\n');

    let time = generated_at.format("%H:%M:%S").to_string();

    for station in stations {
        let fields = [
            report_date.to_string(),
            time.clone(),
            "UTC".to_string(),
            station.line.clone().unwrap_or_default(),
            station.station_name.clone(),
            station.borough.clone(),
            station.daytime_routes.clone().unwrap_or_default(),
            station.structure.clone(),
            format!("{:.4}", station.latitude),
            format!("{:.4}", station.longitude),
            format_in(station.precip_rate_in_hr),
            format_in(station.accum_1hr_in),
            format_in(station.accum_6hr_in),
            station
                .tide_level_ft
                .map(|v| format!("{:.2}", v))
                .unwrap_or_default(),
            format_in(station.central_park_daily_in),
            format_in(station.jfk_daily_in),
            format_in(station.lga_daily_in),
            format_in(station.forecast_6hr_in),
            format_in(station.forecast_24hr_in),
            station
                .predicted_risk_6hr
                .map(|l| l.label().to_string())
                .unwrap_or_default(),
            station
                .predicted_risk_24hr
                .map(|l| l.label().to_string())
                .unwrap_or_default(),
            station.risk_level.label().to_string(),
            station.risk_reason.clone(),
            station.source.clone(),
        ];

        let escaped: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }

    out
}

fn format_in(value: Option<f64>) -> String {
    value.map(|v| format!("{:.3}", v)).unwrap_or_default()
}

/// Quotes a field when it contains a delimiter, quote, or newline;
/// embedded quotes are doubled per RFC 4180.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
