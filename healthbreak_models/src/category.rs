use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed set of health breaks. Declaration order is the delivery order
/// for triggers that elapse within the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderCategory {
    Eyes,
    Water,
    Standup,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown reminder category '{0}', expected one of: eyes, water, standup")]
pub struct CategoryParseError(pub String);

impl ReminderCategory {
    pub const ALL: [ReminderCategory; 3] = [
        ReminderCategory::Eyes,
        ReminderCategory::Water,
        ReminderCategory::Standup,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ReminderCategory::Eyes => "eyes",
            ReminderCategory::Water => "water",
            ReminderCategory::Standup => "standup",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReminderCategory::Eyes => "Eyes",
            ReminderCategory::Water => "Water",
            ReminderCategory::Standup => "Stand Up",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReminderCategory::Eyes => "Time to Rest Your Eyes",
            ReminderCategory::Water => "Time to Drink Water",
            ReminderCategory::Standup => "Time to Stand Up",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            ReminderCategory::Eyes => "Look at something 20 feet away",
            ReminderCategory::Water => "Stay hydrated for better health",
            ReminderCategory::Standup => "Stretch and move around",
        }
    }

    pub fn helper(&self) -> &'static str {
        match self {
            ReminderCategory::Eyes => "Give your eyes a break",
            ReminderCategory::Water => "Keep your body hydrated",
            ReminderCategory::Standup => "Improve your circulation",
        }
    }

    pub fn default_interval_minutes(&self) -> u32 {
        match self {
            ReminderCategory::Eyes => 20,
            ReminderCategory::Water => 30,
            ReminderCategory::Standup => 45,
        }
    }
}

impl fmt::Display for ReminderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ReminderCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ReminderCategory::ALL
            .into_iter()
            .find(|category| category.key() == normalized)
            .ok_or_else(|| CategoryParseError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_ordered_by_declaration() {
        let mut shuffled = vec![
            ReminderCategory::Standup,
            ReminderCategory::Eyes,
            ReminderCategory::Water,
        ];
        shuffled.sort();

        assert_eq!(shuffled, ReminderCategory::ALL.to_vec());
    }

    #[test]
    fn parses_keys_case_insensitively() {
        assert_eq!("Water".parse(), Ok(ReminderCategory::Water));
        assert_eq!(" standup ".parse(), Ok(ReminderCategory::Standup));
        assert_eq!(
            "coffee".parse::<ReminderCategory>(),
            Err(CategoryParseError("coffee".to_owned()))
        );
    }

    #[test]
    fn serializes_as_lowercase_key() {
        let json = serde_json::to_string(&ReminderCategory::Standup).unwrap();
        assert_eq!(json, "\"standup\"");
    }
}
