/// HTTP endpoint for flood risk reports.
///
/// Provides a simple REST API for dashboards and external tools to query
/// current and predicted station risk.
///
/// Endpoints:
/// - GET /api/report?borough=&risk_only=&format=json|csv - Full station report
/// - GET /api/current - Quick snapshot of stations under watch or warning
/// - GET /api/station/{name} - Single-station detail (URL-encoded name)
/// - GET /api/tides - Current tide readings
/// - GET /api/health - Service health check

use std::collections::HashMap;

use chrono::Utc;

use crate::config::RiskThresholds;
use crate::ingest::tides;
use crate::model::{RiskLevel, TideContext};
use crate::report::{self, csv::generate_csv_report, ReportOptions};
use crate::risk::classify;
use crate::stations::{self, StationConfig, VALID_BOROUGHS};

type HttpResponse = tiny_http::Response<std::io::Cursor<Vec<u8>>>;

/// Shared state for request handling: the loaded registry, the threshold
/// table, one HTTP client for upstream calls, and the optional CDO token.
pub struct EndpointContext {
    pub stations: Vec<StationConfig>,
    pub thresholds: RiskThresholds,
    pub client: reqwest::blocking::Client,
    pub cdo_token: Option<String>,
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port
pub fn start_endpoint_server(port: u16, context: EndpointContext) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("📡 HTTP endpoint listening on http://0.0.0.0:{}", port);
    println!("   GET /api/report - Full station report (borough, risk_only, format params)");
    println!("   GET /api/current - Stations under watch or warning");
    println!("   GET /api/station/{{name}} - Single-station detail");
    println!("   GET /api/tides - Current tide readings");
    println!("   GET /api/health - Service health check\n");

    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let (path, query) = split_query(&url);

        // Route requests
        let response = if path == "/api/health" {
            handle_health(&context)
        } else if path == "/api/report" {
            handle_report(&context, &query)
        } else if path == "/api/current" {
            handle_current(&context)
        } else if path == "/api/tides" {
            handle_tides(&context)
        } else if let Some(raw_name) = path.strip_prefix("/api/station/") {
            handle_station_detail(&context, raw_name)
        } else {
            create_response(
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": [
                        "/api/health",
                        "/api/report",
                        "/api/current",
                        "/api/station/{name}",
                        "/api/tides"
                    ]
                }),
            )
        };

        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Handle /api/health endpoint
fn handle_health(context: &EndpointContext) -> HttpResponse {
    create_response(
        200,
        serde_json::json!({
            "status": "ok",
            "service": "transitflood_service",
            "version": "0.1.0",
            "stations_loaded": context.stations.len(),
            "cdo_token_configured": context.cdo_token.is_some(),
            "timestamp": Utc::now().to_rfc3339(),
        }),
    )
}

/// Handle /api/report endpoint
fn handle_report(context: &EndpointContext, query: &HashMap<String, String>) -> HttpResponse {
    let borough = query.get("borough").cloned();
    if let Some(b) = &borough {
        if !VALID_BOROUGHS.contains(&b.as_str()) {
            return create_response(
                400,
                serde_json::json!({
                    "error": format!("Invalid borough. Must be one of: {}", VALID_BOROUGHS.join(", ")),
                }),
            );
        }
    }

    let options = ReportOptions {
        borough,
        risk_only: query.get("risk_only").map(|v| v == "true").unwrap_or(false),
        include_forecast: true,
    };

    let report = match report::generate_report(
        &context.client,
        &context.stations,
        &context.thresholds,
        context.cdo_token.as_deref(),
        &options,
        Utc::now(),
    ) {
        Ok(report) => report,
        Err(e) => {
            return create_response(
                503,
                serde_json::json!({ "error": format!("Report data unavailable: {}", e) }),
            );
        }
    };

    match query.get("format").map(String::as_str) {
        Some("csv") => {
            let body = generate_csv_report(&report.stations, &report.report_date, report.generated_at);
            csv_response(body, &format!("flood_report_{}.csv", report.report_date))
        }
        _ => match serde_json::to_value(&report) {
            Ok(json) => create_response(200, json),
            Err(e) => create_response(
                500,
                serde_json::json!({ "error": format!("Serialization failed: {}", e) }),
            ),
        },
    }
}

/// Handle /api/current endpoint: observed risk only, no forecast fetches.
fn handle_current(context: &EndpointContext) -> HttpResponse {
    let now = Utc::now();
    let observations =
        match report::collect_observations(&context.client, &context.stations, false, now) {
            Ok(obs) => obs,
            Err(e) => {
                return create_response(
                    503,
                    serde_json::json!({ "error": format!("Precipitation data unavailable: {}", e) }),
                );
            }
        };

    let tide_readings = tides::fetch_all_readings(&context.client);
    let tide_level = tides::current_tide_level(&tide_readings);

    let mut high_risk = Vec::new();
    let mut at_risk = Vec::new();

    for station in &context.stations {
        let sample = observations
            .get(&station.station_id)
            .map(|o| o.sample)
            .unwrap_or_default();
        let tide = if station.is_coastal {
            TideContext::coastal(tide_level)
        } else {
            TideContext::inland()
        };
        let assessment = classify(&station.structure, &sample, &tide, &context.thresholds);
        match assessment.level {
            RiskLevel::High => high_risk.push(station.name.clone()),
            RiskLevel::AtRisk => at_risk.push(station.name.clone()),
            RiskLevel::Low => {}
        }
    }

    create_response(
        200,
        serde_json::json!({
            "timestamp": now.to_rfc3339(),
            "high_risk_stations": high_risk,
            "at_risk_stations": at_risk,
            "high_risk_count": high_risk.len(),
            "at_risk_count": at_risk.len(),
        }),
    )
}

/// Handle /api/station/{name} endpoint
fn handle_station_detail(context: &EndpointContext, raw_name: &str) -> HttpResponse {
    let name = match urlencoding::decode(raw_name) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw_name.to_string(),
    };

    let Some(station) = stations::find_station_by_name(&context.stations, &name) else {
        return create_response(
            404,
            serde_json::json!({ "error": format!("Station '{}' not found", name) }),
        );
    };

    let now = Utc::now();
    let selected = vec![station.clone()];
    let observations =
        match report::collect_observations(&context.client, &selected, true, now) {
            Ok(obs) => obs,
            Err(e) => {
                return create_response(
                    503,
                    serde_json::json!({ "error": format!("Precipitation data unavailable: {}", e) }),
                );
            }
        };

    let tide_readings = tides::fetch_all_readings(&context.client);
    let tide_level = tides::current_tide_level(&tide_readings);
    let report_date = now.format("%Y-%m-%d").to_string();
    let daily = crate::ingest::cdo::fetch_daily_totals(
        &context.client,
        context.cdo_token.as_deref(),
        &report_date,
    );

    let obs = observations
        .get(&station.station_id)
        .cloned()
        .unwrap_or_default();
    let row = report::build_station_report(station, &obs, tide_level, &daily, &context.thresholds);

    match serde_json::to_value(&row) {
        Ok(mut json) => {
            if let Some(map) = json.as_object_mut() {
                map.insert("last_updated".to_string(), serde_json::json!(now.to_rfc3339()));
            }
            create_response(200, json)
        }
        Err(e) => create_response(
            500,
            serde_json::json!({ "error": format!("Serialization failed: {}", e) }),
        ),
    }
}

/// Handle /api/tides endpoint
fn handle_tides(context: &EndpointContext) -> HttpResponse {
    let readings = tides::fetch_all_readings(&context.client);
    if readings.is_empty() {
        return create_response(
            503,
            serde_json::json!({ "error": "Tide data unavailable from NOAA" }),
        );
    }

    match serde_json::to_value(&readings) {
        Ok(json) => create_response(
            200,
            serde_json::json!({
                "timestamp": Utc::now().to_rfc3339(),
                "readings": json,
            }),
        ),
        Err(e) => create_response(
            500,
            serde_json::json!({ "error": format!("Serialization failed: {}", e) }),
        ),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Splits a request URL into its path and decoded query parameters.
fn split_query(url: &str) -> (&str, HashMap<String, String>) {
    let (path, query_str) = match url.split_once('?') {
        Some((p, q)) => (p, q),
        None => (url, ""),
    };

    let mut params = HashMap::new();
    for pair in query_str.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(value)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| value.to_string());
        params.insert(key.to_string(), value);
    }

    (path, params)
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: serde_json::Value) -> HttpResponse {
    let body = serde_json::to_string_pretty(&json).unwrap();
    let bytes = body.into_bytes();

    tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
        )
}

/// Create HTTP response with a CSV attachment body
fn csv_response(body: String, filename: &str) -> HttpResponse {
    let disposition = format!("attachment; filename={}", filename);
    tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(200))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/csv"[..]).unwrap(),
        )
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Disposition"[..], disposition.as_bytes())
                .unwrap(),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_query_without_params() {
        let (path, params) = split_query("/api/current");
        assert_eq!(path, "/api/current");
        assert!(params.is_empty());
    }

    #[test]
    fn test_split_query_parses_params() {
        let (path, params) = split_query("/api/report?borough=Bk&risk_only=true&format=csv");
        assert_eq!(path, "/api/report");
        assert_eq!(params.get("borough").map(String::as_str), Some("Bk"));
        assert_eq!(params.get("risk_only").map(String::as_str), Some("true"));
        assert_eq!(params.get("format").map(String::as_str), Some("csv"));
    }

    #[test]
    fn test_split_query_decodes_values() {
        let (_, params) = split_query("/api/report?note=two%20words");
        assert_eq!(params.get("note").map(String::as_str), Some("two words"));
    }

    #[test]
    fn test_split_query_tolerates_valueless_keys() {
        let (_, params) = split_query("/api/report?risk_only");
        assert_eq!(params.get("risk_only").map(String::as_str), Some(""));
    }
}
