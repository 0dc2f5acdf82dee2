// src/models/subject.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Course taught on the platform. Doubles as the storage partition key
/// for tests, grades and lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Geo,
    Phi,
    Info,
    Math,
}

impl Subject {
    pub const ALL: [Subject; 4] = [Subject::Geo, Subject::Phi, Subject::Info, Subject::Math];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Geo => "Geo",
            Subject::Phi => "Phi",
            Subject::Info => "Info",
            Subject::Math => "Math",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSubject(pub String);

impl fmt::Display for UnknownSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown course '{}'", self.0)
    }
}

impl FromStr for Subject {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}
