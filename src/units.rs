pub const FEET_PER_METER: f64 = 3.28084;
pub const KNOTS_PER_METER_PER_SECOND: f64 = 1.94384;
pub const FEET_PER_MINUTE_PER_METER_PER_SECOND: f64 = 196.85;

// All conversions truncate toward zero, they do not round.

#[must_use]
pub fn meters_to_feet(meters: f64) -> i32 {
    truncate(meters * FEET_PER_METER)
}

#[must_use]
pub fn meters_per_second_to_knots(meters_per_second: f64) -> i32 {
    truncate(meters_per_second * KNOTS_PER_METER_PER_SECOND)
}

#[must_use]
pub fn meters_per_second_to_feet_per_minute(meters_per_second: f64) -> i32 {
    truncate(meters_per_second * FEET_PER_MINUTE_PER_METER_PER_SECOND)
}

/// Drops the fractional part, saturating at the `i32` bounds.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn truncate(value: f64) -> i32 {
    value as i32
}
