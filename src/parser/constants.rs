pub const CONTENT_TYPE: &str = "application/vnd.xplogd.serialized";
pub const PROTOCOL_VERSION: &str = "1";
pub const FIELD_DELIMITER: char = '\n';
pub const FIELD_COUNT: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub index: usize,
    pub name: &'static str,
}

pub const VERSION: Field = Field { index: 0, name: "version" };
pub const ICAO_TYPE: Field = Field { index: 1, name: "icao_type" };
pub const REGISTRATION: Field = Field { index: 2, name: "registration" };
pub const LATITUDE: Field = Field { index: 3, name: "latitude" };
pub const LONGITUDE: Field = Field { index: 4, name: "longitude" };
pub const ALTITUDE: Field = Field { index: 5, name: "altitude" };
pub const TRACK: Field = Field { index: 6, name: "track" };
pub const GROUND_SPEED: Field = Field { index: 7, name: "ground_speed" };
pub const AIR_SPEED: Field = Field { index: 8, name: "air_speed" };
pub const VERTICAL_SPEED: Field = Field { index: 9, name: "vertical_speed" };
pub const TERMINATOR: Field = Field { index: 10, name: "terminator" };
