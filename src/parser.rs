//! Decoder for the line based position protocol posted by the simulator logging client.
//!
//! A payload is ten newline terminated lines:
//!
//! ```text
//! 1            protocol version
//! C172         ICAO aircraft type
//! N12345       registration
//! 37.6213      latitude, degrees
//! -122.3790    longitude, degrees
//! 1000         altitude, meters
//! 270          track, degrees
//! 50           ground speed, m/s
//! 52           air speed, m/s
//! 0            vertical speed, m/s
//! ```
//!
//! Splitting on `\n` therefore yields eleven pieces, the last one empty.
pub mod constants;
pub mod decoder;

pub use constants::CONTENT_TYPE;
pub use decoder::{decode, decode_str, DecodeError, DecodedPosition};
