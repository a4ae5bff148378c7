//! Notification types.

use serde::{Deserialize, Serialize};

/// Delivery state of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// Queued, not delivered yet.
    Pending,
    /// Delivered.
    Sent,
    /// Delivery failed.
    Failed,
    /// Read by the user.
    Read,
}

/// A notification addressed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification id.
    pub id: String,
    /// Title line.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Delivery state.
    pub status: NotificationStatus,
    /// Creation timestamp.
    pub created_at: String,
    /// When it was read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<String>,
}

impl Notification {
    /// Returns true once the user has read it.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.status == NotificationStatus::Read || self.read_at.is_some()
    }
}

/// Notification page. The backend wraps this again in `{ "data": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedNotifications {
    /// Notifications on this page.
    pub data: Vec<Notification>,
    /// Total matching notifications.
    pub total: u64,
    /// Current page.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

/// Query filters for `GET /notifications`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationFilters {
    /// Status filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Notification type filter.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Lower date bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Upper date bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Page number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// `GET /notifications/unread-count` response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    /// Number of unread notifications.
    pub count: u64,
}
