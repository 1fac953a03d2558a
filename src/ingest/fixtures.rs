/// Test fixtures: representative JSON payloads from the upstream APIs.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parsers. Timestamps are pinned around
/// 2026-03-14T12:00:00Z so the forecast fixtures line up with the
/// aggregation tests' reference instant.

/// MRMS point sample during heavy rain: 15.24 mm/hr rate (0.60 in/hr),
/// 12.7 mm 1-hour QPE (0.50 in), 38.1 mm 6-hour QPE (1.50 in).
pub(crate) fn fixture_mrms_heavy_rain_json() -> &'static str {
    r#"{
      "point": { "lat": 40.7013, "lon": -74.0135 },
      "products": [
        { "name": "PrecipRate", "value": 15.24, "units": "mm/hr" },
        { "name": "MultiSensor_QPE_01H_Pass2", "value": 12.7, "units": "mm" },
        { "name": "MultiSensor_QPE_06H_Pass2", "value": 38.1, "units": "mm" }
      ]
    }"#
}

/// MRMS point sample on a dry day: every product reads zero.
pub(crate) fn fixture_mrms_dry_json() -> &'static str {
    r#"{
      "point": { "lat": 40.7518, "lon": -73.9767 },
      "products": [
        { "name": "PrecipRate", "value": 0.0, "units": "mm/hr" },
        { "name": "MultiSensor_QPE_01H_Pass2", "value": 0.0, "units": "mm" },
        { "name": "MultiSensor_QPE_06H_Pass2", "value": 0.0, "units": "mm" }
      ]
    }"#
}

/// MRMS point outside mosaic coverage: -3 sentinels and a null. None of
/// these may be read as rainfall.
pub(crate) fn fixture_mrms_no_coverage_json() -> &'static str {
    r#"{
      "point": { "lat": 40.6088, "lon": -73.8158 },
      "products": [
        { "name": "PrecipRate", "value": -3.0, "units": "mm/hr" },
        { "name": "MultiSensor_QPE_01H_Pass2", "value": -3.0, "units": "mm" },
        { "name": "MultiSensor_QPE_06H_Pass2", "value": null, "units": "mm" }
      ]
    }"#
}

/// CO-OPS water level at The Battery: 4.51 ft MLLW, above the 4.0 ft tide
/// gate in the default threshold table.
pub(crate) fn fixture_tides_battery_json() -> &'static str {
    r#"{
      "metadata": { "id": "8518750", "name": "The Battery", "lat": "40.7006", "lon": "-74.0142" },
      "data": [
        { "t": "2026-03-14 11:54", "v": "4.51", "s": "0.003", "f": "0,0,0,0", "q": "p" }
      ]
    }"#
}

/// CO-OPS water level at Kings Point: 5.09 ft MLLW.
pub(crate) fn fixture_tides_kings_point_json() -> &'static str {
    r#"{
      "metadata": { "id": "8516945", "name": "Kings Point", "lat": "40.8103", "lon": "-73.7649" },
      "data": [
        { "t": "2026-03-14 11:54", "v": "5.09", "s": "0.005", "f": "0,0,0,0", "q": "p" }
      ]
    }"#
}

/// CO-OPS response with no readings (station outage).
pub(crate) fn fixture_tides_empty_json() -> &'static str {
    r#"{
      "metadata": { "id": "8518750", "name": "The Battery", "lat": "40.7006", "lon": "-74.0142" },
      "data": []
    }"#
}

/// NWS points metadata resolving a coordinate to its forecast grid.
pub(crate) fn fixture_nws_points_json() -> &'static str {
    r#"{
      "properties": {
        "gridId": "OKX",
        "gridX": 33,
        "gridY": 35,
        "forecastGridData": "https://api.weather.gov/gridpoints/OKX/33,35"
      }
    }"#
}

/// NWS gridpoint quantitativePrecipitation series:
///   - 12 mm over [12:00, 18:00) — fully inside the 6h window at 12:00Z
///   - 36 mm over [18:00, 12:00+1d) — the remainder of the 24h window
///   - one entry with a null value (dropped)
///   - one entry with an unparsable duration (kept at zero hours, counted)
pub(crate) fn fixture_nws_qpf_json() -> &'static str {
    r#"{
      "properties": {
        "updateTime": "2026-03-14T11:45:00+00:00",
        "quantitativePrecipitation": {
          "uom": "wmoUnit:mm",
          "values": [
            { "validTime": "2026-03-14T12:00:00+00:00/PT6H", "value": 12.0 },
            { "validTime": "2026-03-14T18:00:00+00:00/PT18H", "value": 36.0 },
            { "validTime": "2026-03-15T12:00:00+00:00/PT6H", "value": null },
            { "validTime": "2026-03-15T18:00:00+00:00/about6h", "value": 4.0 }
          ]
        }
      }
    }"#
}

/// CDO GHCN-Daily PRCP observation in standard units: 0.55 in.
pub(crate) fn fixture_cdo_daily_json() -> &'static str {
    r#"{
      "metadata": { "resultset": { "offset": 1, "count": 1, "limit": 1000 } },
      "results": [
        {
          "date": "2026-03-14T00:00:00",
          "datatype": "PRCP",
          "station": "GHCND:USW00094728",
          "attributes": ",,W,2400",
          "value": 0.55
        }
      ]
    }"#
}

/// CDO response before the day's observation is published.
pub(crate) fn fixture_cdo_empty_json() -> &'static str {
    r#"{
      "metadata": { "resultset": { "offset": 0, "count": 0, "limit": 1000 } }
    }"#
}
