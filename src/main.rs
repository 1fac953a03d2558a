//! Transit Flood Risk Monitoring Service
//!
//! Evaluates flood risk for transit stations from precipitation, tide,
//! and forecast signals:
//! 1. Samples MRMS precipitation at each station location
//! 2. Reads harbor tide levels for coastal stations
//! 3. Aggregates NWS gridpoint forecasts into 6h/24h totals
//! 4. Classifies observed and predicted risk per station
//! 5. Serves reports as JSON/CSV over HTTP, or prints a one-shot summary
//!
//! Usage:
//!   cargo run --release                        # One-shot report summary
//!   cargo run --release -- --csv               # One-shot report as CSV on stdout
//!   cargo run --release -- --borough Bk        # Restrict to one borough
//!   cargo run --release -- --endpoint 8080     # Serve the HTTP API on port 8080
//!
//! Environment:
//!   CDO_TOKEN - NCEI Climate Data Online API token (optional; daily
//!               climate columns stay empty without it)

use std::env;
use std::time::Duration;

use chrono::Utc;

use transitflood_service::config::load_thresholds;
use transitflood_service::endpoint::{start_endpoint_server, EndpointContext};
use transitflood_service::model::RiskLevel;
use transitflood_service::report::{self, csv::generate_csv_report, ReportOptions};
use transitflood_service::stations::{load_stations, VALID_BOROUGHS};

fn main() {
    println!("🌧️ Transit Flood Risk Monitoring Service");
    println!("=========================================\n");

    dotenv::dotenv().ok();

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut endpoint_port: Option<u16> = None;
    let mut borough: Option<String> = None;
    let mut risk_only = false;
    let mut csv_output = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--endpoint" => {
                if i + 1 < args.len() {
                    endpoint_port = args[i + 1].parse().ok();
                    i += 2;
                } else {
                    eprintln!("Error: --endpoint requires a port number");
                    std::process::exit(1);
                }
            }
            "--borough" => {
                if i + 1 < args.len() {
                    borough = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --borough requires an abbreviation ({})", VALID_BOROUGHS.join(", "));
                    std::process::exit(1);
                }
            }
            "--risk-only" => {
                risk_only = true;
                i += 1;
            }
            "--csv" => {
                csv_output = true;
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!(
                    "Usage: {} [--endpoint PORT] [--borough B] [--risk-only] [--csv]",
                    args[0]
                );
                std::process::exit(1);
            }
        }
    }

    if let Some(b) = &borough {
        if !VALID_BOROUGHS.contains(&b.as_str()) {
            eprintln!("Error: unknown borough '{}'. Must be one of: {}", b, VALID_BOROUGHS.join(", "));
            std::process::exit(1);
        }
    }

    // Load configuration
    println!("📊 Loading station registry and thresholds...");
    let stations = load_stations();
    let thresholds = load_thresholds();
    println!("✓ {} stations loaded\n", stations.len());

    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let cdo_token = env::var("CDO_TOKEN").ok();
    if cdo_token.is_none() {
        println!("   CDO_TOKEN not set, daily climate columns will be empty\n");
    }

    // Serve the HTTP API if requested
    if let Some(port) = endpoint_port {
        println!("🚀 Starting HTTP endpoint server...");
        let context = EndpointContext { stations, thresholds, client, cdo_token };
        if let Err(e) = start_endpoint_server(port, context) {
            eprintln!("❌ Endpoint server error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // One-shot report mode
    println!("🔄 Generating report...");
    let options = ReportOptions { borough, risk_only, include_forecast: true };
    let report = match report::generate_report(
        &client,
        &stations,
        &thresholds,
        cdo_token.as_deref(),
        &options,
        Utc::now(),
    ) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("\n❌ Report generation failed: {}\n", e);
            std::process::exit(1);
        }
    };

    if csv_output {
        print!(
            "{}",
            generate_csv_report(&report.stations, &report.report_date, report.generated_at)
        );
        return;
    }

    println!("\n📋 Flood Risk Report for {}", report.report_date);
    println!(
        "   {} stations | {} FLOOD WARNING | {} FLOOD WATCH\n",
        report.station_count, report.high_risk_count, report.at_risk_count
    );

    for station in &report.stations {
        let marker = match station.risk_level {
            RiskLevel::High => "✗",
            RiskLevel::AtRisk => "!",
            RiskLevel::Low => "✓",
        };
        println!(
            "   {} {:<28} {:<13} {} | {}",
            marker,
            station.station_name,
            station.borough,
            station.risk_level.label(),
            station.risk_reason
        );
        if let (Some(p6), Some(p24)) = (station.predicted_risk_6hr, station.predicted_risk_24hr) {
            if p6 > RiskLevel::Low || p24 > RiskLevel::Low {
                println!("       predicted: 6hr {} / 24hr {}", p6.label(), p24.label());
            }
        }
    }
    println!();
}
