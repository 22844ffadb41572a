#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct AircraftId(i64);

impl AircraftId {
    #[must_use]
    pub fn new(value: i64) -> Self {
        AircraftId(value)
    }

    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AircraftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct PositionId(i64);

impl PositionId {
    #[must_use]
    pub fn new(value: i64) -> Self {
        PositionId(value)
    }

    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PositionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an airframe as reported by the logging client.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct AircraftKey {
    pub icao_type: String,
    pub registration: String,
}

impl AircraftKey {
    #[must_use]
    pub fn new(icao_type: impl Into<String>, registration: impl Into<String>) -> Self {
        AircraftKey {
            icao_type: icao_type.into(),
            registration: registration.into(),
        }
    }
}

impl std::fmt::Display for AircraftKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.registration, self.icao_type)
    }
}

/// A registered aircraft. Created once per key, never changed afterwards.
#[derive(Debug, PartialEq, Eq, Clone, serde::Serialize)]
pub struct Aircraft {
    #[serde(skip)]
    pub id: AircraftId,
    pub icao_type: String,
    pub registration: String,
}

impl Aircraft {
    #[must_use]
    pub fn new(id: AircraftId, key: AircraftKey) -> Self {
        Aircraft {
            id,
            icao_type: key.icao_type,
            registration: key.registration,
        }
    }

    #[must_use]
    pub fn key(&self) -> AircraftKey {
        AircraftKey::new(self.icao_type.as_str(), self.registration.as_str())
    }
}

impl std::fmt::Display for Aircraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.registration, self.icao_type)
    }
}

/// Position and vector of an aircraft in aviation units.
#[derive(Debug, PartialEq, Clone, serde::Serialize)]
pub struct PositionReport {
    pub latitude: f64,
    pub longitude: f64,
    /// feet
    pub altitude: i32,
    /// degrees
    pub track: i32,
    /// knots
    pub ground_speed: i32,
    /// knots
    pub air_speed: i32,
    /// feet per minute
    pub vertical_speed: i32,
}

/// A position waiting to be appended. The store fills in `time` if it is unset.
#[derive(Debug, PartialEq, Clone)]
pub struct NewPosition {
    pub time: Option<chrono::DateTime<chrono::Utc>>,
    pub aircraft: Aircraft,
    pub report: PositionReport,
}

#[derive(Debug, PartialEq, Clone, serde::Serialize)]
pub struct PositionRecord {
    #[serde(skip)]
    pub id: PositionId,
    #[serde(skip)]
    pub time: chrono::DateTime<chrono::Utc>,
    pub aircraft: Aircraft,
    #[serde(flatten)]
    pub report: PositionReport,
}

impl std::fmt::Display for PositionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lat={:.6}; lon={:.6}; alt={}",
            self.aircraft, self.report.latitude, self.report.longitude, self.report.altitude
        )
    }
}
