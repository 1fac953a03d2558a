/// MRMS (Multi-Radar Multi-Sensor) precipitation point client.
///
/// Samples the MRMS mosaic at a station's coordinates for the
/// instantaneous precipitation rate and the 1-hour / 6-hour multi-sensor
/// QPE accumulations. MRMS grids are native millimeters; conversion to
/// inches happens here, at the ingest boundary, so the rest of the
/// service works in report units.

use serde::Deserialize;

use crate::model::{FetchError, PrecipitationSample};

const MRMS_BASE_URL: &str = "https://mrms.ncep.noaa.gov/data/point";

/// MRMS product identifiers sampled for each station.
pub const PRODUCT_PRECIP_RATE: &str = "PrecipRate";
pub const PRODUCT_QPE_1H: &str = "MultiSensor_QPE_01H_Pass2";
pub const PRODUCT_QPE_6H: &str = "MultiSensor_QPE_06H_Pass2";

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PointResponse {
    products: Vec<ProductValue>,
}

#[derive(Deserialize)]
struct ProductValue {
    name: String,
    /// Grid value in native units (mm/hr for rate, mm for accumulations).
    /// MRMS encodes out-of-coverage cells as negative sentinels.
    value: Option<f64>,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds a point-sample URL for all three precipitation products at the
/// given coordinates.
pub fn build_point_url(latitude: f64, longitude: f64) -> String {
    format!(
        "{}?lat={:.4}&lon={:.4}&products={},{},{}",
        MRMS_BASE_URL,
        latitude,
        longitude,
        PRODUCT_PRECIP_RATE,
        PRODUCT_QPE_1H,
        PRODUCT_QPE_6H,
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses an MRMS point response into a `PrecipitationSample` in inches.
///
/// A product that is absent, null, or a negative out-of-coverage sentinel
/// leaves its field `None`; the classifier treats those as zero. The
/// response as a whole only fails on malformed JSON.
pub fn parse_point_response(json: &str) -> Result<PrecipitationSample, FetchError> {
    let response: PointResponse = serde_json::from_str(json)
        .map_err(|e| FetchError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let mut sample = PrecipitationSample::default();

    for product in response.products {
        // Negative values are MRMS no-coverage sentinels, not rainfall.
        let value_mm = match product.value {
            Some(v) if v >= 0.0 => v,
            _ => continue,
        };
        let value_in = value_mm / 25.4;

        match product.name.as_str() {
            PRODUCT_PRECIP_RATE => sample.rate_in_hr = Some(value_in),
            PRODUCT_QPE_1H => sample.accum_1hr_in = Some(value_in),
            PRODUCT_QPE_6H => sample.accum_6hr_in = Some(value_in),
            _ => {}
        }
    }

    Ok(sample)
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Fetches the current precipitation sample for a station location.
pub fn fetch_sample(
    client: &reqwest::blocking::Client,
    latitude: f64,
    longitude: f64,
) -> Result<PrecipitationSample, Box<dyn std::error::Error>> {
    let url = build_point_url(latitude, longitude);

    let response = client.get(&url).send()?;
    if !response.status().is_success() {
        return Err(Box::new(FetchError::HttpError(response.status().as_u16())));
    }

    let body = response.text()?;
    Ok(parse_point_response(&body)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
