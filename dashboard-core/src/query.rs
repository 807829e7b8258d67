//! Turns device coordinates or a free-text search term into provider request parameters.

use crate::model::{Coordinates, UnitSystem};

/// What the user asked weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    Coordinates(Coordinates),
    Search(String),
}

/// Location selector sent to the provider; exactly one per request.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates(Coordinates),
    PostalCode(String),
    City(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    pub api_key: String,
    pub location: LocationQuery,
    pub units: UnitSystem,
}

impl RequestParams {
    /// Query-string pairs in provider naming.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("key", self.api_key.clone())];

        match &self.location {
            LocationQuery::Coordinates(coords) => {
                pairs.push(("lat", coords.latitude.to_string()));
                pairs.push(("lon", coords.longitude.to_string()));
            }
            LocationQuery::PostalCode(code) => pairs.push(("postal_code", code.clone())),
            LocationQuery::City(city) => pairs.push(("city", city.clone())),
        }

        pairs.push(("units", self.units.api_code().to_string()));
        pairs
    }
}

/// Purely syntactic: an all-digit trimmed term is a postal code, anything else a city.
pub fn classify_search(term: &str) -> LocationQuery {
    let trimmed = term.trim();

    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        LocationQuery::PostalCode(trimmed.to_string())
    } else {
        LocationQuery::City(trimmed.to_string())
    }
}

/// Callers guard against empty search terms; an empty one yields an empty `city`.
pub fn build_query(input: &LocationInput, units: UnitSystem, api_key: &str) -> RequestParams {
    let location = match input {
        LocationInput::Coordinates(coords) => LocationQuery::Coordinates(*coords),
        LocationInput::Search(term) => classify_search(term),
    };

    RequestParams { api_key: api_key.to_string(), location, units }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(params: &RequestParams) -> Vec<&'static str> {
        params.query_pairs().into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn digit_only_terms_are_postal_codes() {
        for term in ["10001", " 75008 ", "0", "123456789"] {
            assert_eq!(
                classify_search(term),
                LocationQuery::PostalCode(term.trim().to_string()),
                "term {term:?}"
            );
        }
    }

    #[test]
    fn other_terms_are_city_names() {
        for term in ["Paris", "New York", "10001a", "SW1A 1AA", "-123", "12 34"] {
            assert_eq!(classify_search(term), LocationQuery::City(term.trim().to_string()));
        }
    }

    #[test]
    fn non_ascii_digits_are_not_postal_codes() {
        assert_eq!(classify_search("١٢٣"), LocationQuery::City("١٢٣".to_string()));
    }

    #[test]
    fn units_is_imperial_iff_fahrenheit() {
        let input = LocationInput::Search("Paris".into());

        let f = build_query(&input, UnitSystem::Fahrenheit, "KEY");
        let c = build_query(&input, UnitSystem::Celsius, "KEY");

        assert!(f.query_pairs().contains(&("units", "I".to_string())));
        assert!(c.query_pairs().contains(&("units", "M".to_string())));
    }

    #[test]
    fn coordinates_produce_lat_lon_and_key() {
        let coords = Coordinates { latitude: 48.85, longitude: 2.35 };
        let params = build_query(&LocationInput::Coordinates(coords), UnitSystem::Celsius, "SECRET");

        assert_eq!(keys(&params), vec!["key", "lat", "lon", "units"]);
        assert_eq!(params.query_pairs()[0], ("key", "SECRET".to_string()));
        assert_eq!(params.query_pairs()[1], ("lat", "48.85".to_string()));
    }

    #[test]
    fn search_carries_exactly_one_location_selector() {
        let postal = build_query(&LocationInput::Search("10001".into()), UnitSystem::Celsius, "K");
        let city = build_query(&LocationInput::Search("Paris".into()), UnitSystem::Celsius, "K");

        assert_eq!(keys(&postal), vec!["key", "postal_code", "units"]);
        assert_eq!(keys(&city), vec!["key", "city", "units"]);
    }
}
