use super::constants::{
    Field, AIR_SPEED, ALTITUDE, FIELD_COUNT, FIELD_DELIMITER, GROUND_SPEED, ICAO_TYPE, LATITUDE,
    LONGITUDE, PROTOCOL_VERSION, REGISTRATION, TERMINATOR, TRACK, VERSION, VERTICAL_SPEED,
};
use crate::types::{AircraftKey, PositionReport};
use crate::units;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("unsupported protocol version '{0}'")]
    UnsupportedVersion(String),

    #[error("{field} component has invalid numeric value '{value}'")]
    NumericParseFailure { field: &'static str, value: String },
}

/// A decoded payload. The aircraft is still an unresolved key.
#[derive(Debug, PartialEq, Clone)]
pub struct DecodedPosition {
    pub aircraft: AircraftKey,
    pub report: PositionReport,
}

pub fn decode(raw: &[u8]) -> Result<DecodedPosition, DecodeError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| DecodeError::MalformedPayload(format!("payload is not UTF-8: {e}")))?;
    decode_str(text)
}

pub fn decode_str(text: &str) -> Result<DecodedPosition, DecodeError> {
    let pieces: Vec<&str> = text.split(FIELD_DELIMITER).collect();

    check_field_count(&pieces)?;
    check_version(&pieces)?;
    check_terminator(&pieces)?;

    let latitude = parse_field(&pieces, LATITUDE)?;
    let longitude = parse_field(&pieces, LONGITUDE)?;
    let altitude = parse_field(&pieces, ALTITUDE)?;
    let track = parse_field(&pieces, TRACK)?;
    let ground_speed = parse_field(&pieces, GROUND_SPEED)?;
    let air_speed = parse_field(&pieces, AIR_SPEED)?;
    let vertical_speed = parse_field(&pieces, VERTICAL_SPEED)?;

    Ok(DecodedPosition {
        aircraft: AircraftKey::new(pieces[ICAO_TYPE.index], pieces[REGISTRATION.index]),
        report: PositionReport {
            latitude,
            longitude,
            altitude: units::meters_to_feet(altitude),
            track: units::truncate(track),
            ground_speed: units::meters_per_second_to_knots(ground_speed),
            air_speed: units::meters_per_second_to_knots(air_speed),
            vertical_speed: units::meters_per_second_to_feet_per_minute(vertical_speed),
        },
    })
}

fn check_field_count(pieces: &[&str]) -> Result<(), DecodeError> {
    if pieces.len() == FIELD_COUNT {
        Ok(())
    } else {
        Err(DecodeError::MalformedPayload(format!(
            "expected {FIELD_COUNT} fields, got {}",
            pieces.len()
        )))
    }
}

fn check_version(pieces: &[&str]) -> Result<(), DecodeError> {
    let version = pieces[VERSION.index];
    if version == PROTOCOL_VERSION {
        Ok(())
    } else {
        Err(DecodeError::UnsupportedVersion(version.to_string()))
    }
}

fn check_terminator(pieces: &[&str]) -> Result<(), DecodeError> {
    if pieces[TERMINATOR.index].is_empty() {
        Ok(())
    } else {
        Err(DecodeError::MalformedPayload(String::from(
            "payload is missing its trailing newline",
        )))
    }
}

fn parse_field(pieces: &[&str], field: Field) -> Result<f64, DecodeError> {
    let raw = pieces[field.index];
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DecodeError::NumericParseFailure {
            field: field.name,
            value: raw.to_string(),
        })
}
