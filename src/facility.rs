//! Syslog facility names and their numeric codes.

use std::fmt;
use thiserror::Error;

/// A syslog facility code, already shifted into the priority bits the way
/// `openlog(3)` expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Facility(i32);

impl Facility {
    pub const KERN: Facility = Facility(0);
    pub const USER: Facility = Facility(1 << 3);
    pub const MAIL: Facility = Facility(2 << 3);
    pub const DAEMON: Facility = Facility(3 << 3);
    pub const AUTH: Facility = Facility(4 << 3);
    pub const LOCAL0: Facility = Facility(16 << 3);
    pub const LOCAL1: Facility = Facility(17 << 3);
    pub const LOCAL2: Facility = Facility(18 << 3);
    pub const LOCAL3: Facility = Facility(19 << 3);
    pub const LOCAL4: Facility = Facility(20 << 3);
    pub const LOCAL5: Facility = Facility(21 << 3);
    pub const LOCAL6: Facility = Facility(22 << 3);
    pub const LOCAL7: Facility = Facility(23 << 3);

    pub fn code(self) -> i32 {
        self.0
    }

    /// The table name for this facility, if it has one.
    pub fn name(self) -> Option<&'static str> {
        FACILITY_TABLE
            .iter()
            .find(|(_, facility)| *facility == self)
            .map(|(name, _)| *name)
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "facility({})", self.0),
        }
    }
}

/// Facilities accepted in configuration, in lookup order.
pub const FACILITY_TABLE: &[(&str, Facility)] = &[
    ("auth", Facility::AUTH),
    ("mail", Facility::MAIL),
    ("daemon", Facility::DAEMON),
    ("kern", Facility::KERN),
    ("user", Facility::USER),
    ("local0", Facility::LOCAL0),
    ("local1", Facility::LOCAL1),
    ("local2", Facility::LOCAL2),
    ("local3", Facility::LOCAL3),
    ("local4", Facility::LOCAL4),
    ("local5", Facility::LOCAL5),
    ("local6", Facility::LOCAL6),
    ("local7", Facility::LOCAL7),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacilityError {
    #[error("unknown syslog facility '{0}'")]
    NotFound(String),
}

/// Resolves a facility name. Matching is exact and case-sensitive.
pub fn parse_log_facility(name: &str) -> Result<Facility, FacilityError> {
    FACILITY_TABLE
        .iter()
        .find(|(entry, _)| *entry == name)
        .map(|(_, facility)| *facility)
        .ok_or_else(|| FacilityError::NotFound(name.to_string()))
}
