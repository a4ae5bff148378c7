//! Watchlist types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::show::Show;

/// How urgently the user wants to watch a show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchlistPriority {
    /// Next up.
    High,
    /// The backend default.
    #[default]
    Medium,
    /// Some day.
    Low,
}

impl FromStr for WatchlistPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(DomainError::InvalidBody(format!(
                "priority must be high, medium or low, got {other}"
            ))),
        }
    }
}

/// A show queued on the user's watchlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistItem {
    /// Item id.
    pub id: String,
    /// Owner.
    pub user_id: String,
    /// Queued show.
    pub show_id: String,
    /// Priority.
    #[serde(default)]
    pub priority: WatchlistPriority,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// When the show was queued.
    pub added_at: String,
    /// The show itself.
    #[serde(default)]
    pub show: Option<Show>,
}

/// `POST /watchlist` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToWatchlistRequest {
    /// Show to queue.
    pub show_id: String,
    /// Priority, `medium` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<WatchlistPriority>,
    /// Notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AddToWatchlistRequest {
    /// Queues a show with the default priority and no notes.
    #[must_use]
    pub fn new(show_id: impl Into<String>) -> Self {
        Self {
            show_id: show_id.into(),
            priority: None,
            notes: None,
        }
    }
}

/// `PATCH /watchlist/{show_id}` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateWatchlistRequest {
    /// New priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<WatchlistPriority>,
    /// New notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_item_with_null_notes_and_default_priority() {
        let item: WatchlistItem = serde_json::from_value(json!({
            "id": "w1",
            "user_id": "u1",
            "show_id": "s1",
            "notes": null,
            "added_at": "2024-06-01T12:00:00Z",
            "show": {"id": "s1", "title": "Severance", "media_type": "tv"}
        }))
        .unwrap();

        assert_eq!(item.priority, WatchlistPriority::Medium);
        assert_eq!(item.notes, None);
        assert_eq!(item.show.map(|show| show.title).as_deref(), Some("Severance"));
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("HIGH".parse::<WatchlistPriority>().unwrap(), WatchlistPriority::High);
        assert!("urgent".parse::<WatchlistPriority>().is_err());
    }

    #[test]
    fn test_add_request_omits_unset_fields() {
        let request = AddToWatchlistRequest {
            priority: Some(WatchlistPriority::High),
            ..AddToWatchlistRequest::new("s1")
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"show_id": "s1", "priority": "high"})
        );
    }
}
