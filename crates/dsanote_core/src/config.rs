//! Organizer configuration.

use serde::{Deserialize, Serialize};

/// Where the virtual "unorganized" folder lands in the print sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnorganizedPosition {
    First,
    #[default]
    Last,
}

/// Tunables for one organizer session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerConfig {
    pub unorganized_position: UnorganizedPosition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: OrganizerConfig = serde_json::from_str("{}").expect("empty config parses");
        assert_eq!(config.unorganized_position, UnorganizedPosition::Last);

        let config: OrganizerConfig =
            serde_json::from_str(r#"{"unorganized_position":"first"}"#).expect("config parses");
        assert_eq!(config.unorganized_position, UnorganizedPosition::First);
    }
}
