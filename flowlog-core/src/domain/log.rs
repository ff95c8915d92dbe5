//! Log domain types

use serde::{Deserialize, Serialize};

/// A stored log entry
///
/// The `serviceID` and `runID` are assigned by the server from the request
/// path, so every entry read back carries both even when the write supplied
/// them only through the URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "serviceID")]
    pub service_id: String,
    #[serde(rename = "runID")]
    pub run_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub direction: Direction,
    pub storage: String,
}

/// Direction of traffic relative to the named storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The service read from the storage
    In,
    /// The service wrote to the storage
    Out,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            other => Err(format!("invalid direction '{}', expected 'in' or 'out'", other)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_with_wire_names() {
        let entry = LogEntry {
            service_id: "svcA".to_string(),
            run_id: "run1".to_string(),
            user_id: "u1".to_string(),
            timestamp: 1000,
            direction: Direction::In,
            storage: "s1".to_string(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "serviceID": "svcA",
                "runID": "run1",
                "userID": "u1",
                "timestamp": 1000,
                "direction": "in",
                "storage": "s1",
            })
        );
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::In.opposite(), Direction::Out);
        assert_eq!(Direction::Out.opposite(), Direction::In);
        assert_eq!(Direction::Out.to_string(), "out");
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("in".parse::<Direction>(), Ok(Direction::In));
        assert_eq!("out".parse::<Direction>(), Ok(Direction::Out));
        assert!("IN".parse::<Direction>().is_err());
    }
}
