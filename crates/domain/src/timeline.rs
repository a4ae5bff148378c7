//! Timeline event types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// An episode or season event on the user's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Event id.
    pub id: String,
    /// Show id.
    pub show_id: String,
    /// Show title.
    pub show_title: String,
    /// `new_episode`, `season_premiere`, `status_change`, ...
    pub event_type: String,
    /// Headline.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Event date.
    pub event_date: String,
    /// Season number, for episode and season events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_number: Option<u32>,
    /// Episode number, for episode events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<u32>,
    /// Free-form extra data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,
}

/// Predefined timeline windows served by `GET /timeline/{window}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineWindow {
    /// Events happening today.
    Today,
    /// Events in the current week.
    Week,
    /// Upcoming events.
    Upcoming,
}

impl TimelineWindow {
    /// Returns the path segment for this window.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for TimelineWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimelineWindow {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "upcoming" => Ok(Self::Upcoming),
            other => Err(DomainError::UnknownTimelineWindow(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_window_round_trip() {
        assert_eq!("Week".parse::<TimelineWindow>().unwrap(), TimelineWindow::Week);
        assert_eq!(TimelineWindow::Upcoming.to_string(), "upcoming");
        assert!("month".parse::<TimelineWindow>().is_err());
    }
}
