//! User profile and device types.

use serde::{Deserialize, Serialize};

/// A push-notification device registered for a user.
///
/// The backend serializes this type without field renames, so the wire
/// names are PascalCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserDevice {
    /// Device id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Owning user id.
    #[serde(rename = "UserID")]
    pub user_id: String,
    /// Push token.
    pub device_token: String,
    /// Platform name (`web`, `ios`, `android`).
    pub platform: String,
    /// Whether the device still receives pushes.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// `GET /me` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id.
    pub id: String,
    /// Account email.
    pub email: String,
    /// Public username.
    pub username: String,
    /// IANA timezone used for timeline dates.
    pub timezone: String,
    /// Registered devices.
    #[serde(default)]
    pub devices: Vec<UserDevice>,
}

/// `PATCH /me` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// New username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New timezone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// `POST /me/devices` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDeviceRequest {
    /// Push token.
    pub device_token: String,
    /// Platform name.
    pub platform: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_device_pascal_case_fields() {
        let profile: UserProfile = serde_json::from_str(
            r#"{
                "id": "u1", "email": "a@b.c", "username": "ana", "timezone": "UTC",
                "devices": [{
                    "ID": "d1", "UserID": "u1", "DeviceToken": "tok", "Platform": "web",
                    "IsActive": true, "CreatedAt": "2024-01-01T00:00:00Z",
                    "UpdatedAt": "2024-01-01T00:00:00Z"
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(profile.devices[0].device_token, "tok");
        assert!(profile.devices[0].is_active);
    }

    #[test]
    fn test_update_profile_omits_unset_fields() {
        let body = UpdateProfileRequest {
            timezone: Some("Europe/Paris".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"timezone":"Europe/Paris"}"#
        );
    }
}
