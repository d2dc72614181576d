//! Decoder for the encoded polyline geometry ORS returns.
//!
//! Decoding happens here at the provider boundary; the rest of the system
//! only ever sees plain coordinate sequences.

use fuelroute_core::{Coordinate, RouteGeometry};

const PRECISION: f64 = 1e-5;

#[derive(Debug, thiserror::Error)]
#[error("invalid polyline: {0}")]
pub struct PolylineError(String);

/// Decode a precision-5 encoded polyline into a route geometry.
pub fn decode_polyline(encoded: &str) -> Result<RouteGeometry, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut idx = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while idx < bytes.len() {
        let (dlat, next) = decode_value(bytes, idx)?;
        let (dlon, next) = decode_value(bytes, next)?;
        lat += dlat;
        lon += dlon;
        idx = next;
        points.push(Coordinate::new(lat as f64 * PRECISION, lon as f64 * PRECISION));
    }

    Ok(RouteGeometry::new(points))
}

fn decode_value(bytes: &[u8], mut idx: usize) -> Result<(i64, usize), PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;
    loop {
        let Some(&byte) = bytes.get(idx) else {
            return Err(PolylineError("truncated chunk".to_string()));
        };
        idx += 1;
        let chunk = i64::from(byte) - 63;
        if !(0..64).contains(&chunk) {
            return Err(PolylineError(format!("byte {byte:#x} out of range")));
        }
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk & 0x20 == 0 {
            break;
        }
    }
    let value = if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok((value, idx))
}
