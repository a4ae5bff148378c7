//! Streaming availability types.

use serde::{Deserialize, Deserializer, Serialize};

/// Region used when the caller does not pick one.
pub const DEFAULT_REGION: &str = "IN";

/// A service offering a show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchProvider {
    /// Provider id.
    pub provider_id: i64,
    /// Display name.
    pub provider_name: String,
    /// Logo path on the image CDN.
    #[serde(default)]
    pub logo_path: String,
    /// Sort order among providers.
    #[serde(default)]
    pub display_priority: i64,
}

/// `GET /streaming/{show_id}?region=` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingOptions {
    /// Show id.
    pub show_id: String,
    /// ISO 3166-1 region code.
    pub region: String,
    /// Landing page listing every option.
    #[serde(default)]
    pub link: String,
    /// Included in a subscription.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub flatrate: Vec<WatchProvider>,
    /// Available to rent.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rent: Vec<WatchProvider>,
    /// Available to buy.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub buy: Vec<WatchProvider>,
}

impl StreamingOptions {
    /// True when no provider offers the show in this region.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.flatrate.is_empty() && self.rent.is_empty() && self.buy.is_empty()
    }
}

/// Lists sent as `null` read as empty.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_missing_and_null_provider_lists() {
        let options: StreamingOptions = serde_json::from_value(json!({
            "show_id": "s1",
            "region": "IN",
            "link": "",
            "flatrate": [{"provider_id": 8, "provider_name": "Netflix", "logo_path": "/n.jpg", "display_priority": 1}],
            "rent": null
        }))
        .unwrap();

        assert_eq!(options.flatrate[0].provider_name, "Netflix");
        assert!(options.rent.is_empty());
        assert!(options.buy.is_empty());
        assert!(!options.is_unavailable());
    }
}
