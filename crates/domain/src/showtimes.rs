//! Cinema showtime types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::streaming::null_as_empty;

/// A point on the map, sent to the backend as `lat;lng`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geolocation {
    lat: f64,
    lng: f64,
}

impl Geolocation {
    /// Creates a location from decimal degrees.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidQuery`] if either coordinate is out of
    /// range or not finite.
    pub fn new(lat: f64, lng: f64) -> DomainResult<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::InvalidQuery(format!(
                "coordinates out of range: {lat};{lng}"
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }
}

impl fmt::Display for Geolocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.lat, self.lng)
    }
}

/// Parses `lat;lng` or `lat,lng`.
impl FromStr for Geolocation {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let invalid = || DomainError::InvalidQuery(format!("expected `lat;lng`, got {s:?}"));
        let (lat, lng) = s
            .split_once(';')
            .or_else(|| s.split_once(','))
            .ok_or_else(invalid)?;
        let lat = lat.trim().parse().map_err(|_| invalid())?;
        let lng = lng.trim().parse().map_err(|_| invalid())?;
        Self::new(lat, lng)
    }
}

/// Show times at one cinema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CinemaShowtime {
    /// Cinema id.
    pub cinema_id: String,
    /// Cinema name.
    pub cinema_name: String,
    /// Start times, `HH:MM`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub times: Vec<String>,
}

/// A film and where it plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmShowtime {
    /// Listing provider's film id.
    pub film_id: String,
    /// Film name.
    pub film_name: String,
    /// Cinemas showing it.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub showtimes: Vec<CinemaShowtime>,
}

/// `GET /showtimes/{show_id}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowtimesResponse {
    /// Show id.
    pub show_id: String,
    /// IMDb id used for the lookup.
    pub imdb_id: String,
    /// Day, `YYYY-MM-DD`.
    pub date: String,
    /// Matching films.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub films: Vec<FilmShowtime>,
}

/// A cinema near a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cinema {
    /// Cinema id.
    pub cinema_id: String,
    /// Cinema name.
    pub cinema_name: String,
    /// Distance as formatted by the listing provider.
    #[serde(default)]
    pub distance: String,
}

/// `GET /cinemas/nearby` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CinemasNearby {
    /// Cinemas, nearest first.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cinemas: Vec<Cinema>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_geolocation_wire_format() {
        let location = Geolocation::new(19.076, 72.8777).unwrap();
        assert_eq!(location.to_string(), "19.076;72.8777");

        let parsed: Geolocation = "-33.86, 151.2".parse().unwrap();
        assert_eq!(parsed.to_string(), "-33.86;151.2");
    }

    #[test]
    fn test_geolocation_rejects_bad_input() {
        assert!(Geolocation::new(91.0, 0.0).is_err());
        assert!(Geolocation::new(0.0, f64::NAN).is_err());
        assert!("19.0".parse::<Geolocation>().is_err());
        assert!("north;south".parse::<Geolocation>().is_err());
    }

    #[test]
    fn test_null_film_list_reads_as_empty() {
        let response: ShowtimesResponse = serde_json::from_str(
            r#"{"show_id":"m1","imdb_id":"tt0111161","date":"2024-06-01","films":null}"#,
        )
        .unwrap();
        assert!(response.films.is_empty());
    }
}
