//! Decoding of the `/data/2.5/weather` response body.

use serde::Deserialize;
use serde::de::Error as _;

use crate::{WeatherError, WeatherModel};

#[derive(Debug, Deserialize)]
struct WeatherData {
    name: String,
    main: Main,
    weather: Vec<Weather>,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Weather {
    #[allow(dead_code)]
    description: String,
    id: i32,
}

/// Decode a response body into a [`WeatherModel`].
///
/// Any body that fails to decode is reported as [`WeatherError::NotFound`]. The
/// provider answers unknown cities with a JSON error object, so the collapse is
/// usually right, but auth and rate-limit replies end up here too.
pub fn parse(body: &[u8]) -> Result<WeatherModel, WeatherError> {
    let data: WeatherData = match serde_json::from_slice(body) {
        Ok(data) => data,
        Err(err) => return Err(WeatherError::NotFound(err)),
    };

    let Some(first) = data.weather.first() else {
        let empty = serde_json::Error::custom("`weather` list is empty");
        return Err(WeatherError::NotFound(empty));
    };

    Ok(WeatherModel::new(first.id, data.name, data.main.temp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn parses_valid_body() {
        let london = body(json!({
            "name": "London",
            "main": { "temp": 14.26 },
            "weather": [{ "description": "clear", "id": 800 }]
        }));

        let model = parse(&london).expect("valid body");
        assert_eq!(model, WeatherModel::new(800, "London", 14.26));
    }

    #[test]
    fn only_first_condition_is_used() {
        let oslo = body(json!({
            "name": "Oslo",
            "main": { "temp": -2.5 },
            "weather": [
                { "description": "snow", "id": 601 },
                { "description": "mist", "id": 701 }
            ]
        }));

        let model = parse(&oslo).unwrap();
        assert_eq!(model.condition_id(), 601);
    }

    #[test]
    fn ignores_extra_fields() {
        let full = body(json!({
            "coord": { "lon": -0.13, "lat": 51.51 },
            "name": "London",
            "cod": 200,
            "main": { "temp": 9.1, "humidity": 81 },
            "weather": [{
                "id": 500,
                "main": "Rain",
                "description": "light rain",
                "icon": "10d"
            }]
        }));

        let model = parse(&full).unwrap();
        assert_eq!(model.city_name(), "London");
        assert_eq!(model.condition_id(), 500);
    }

    #[test]
    fn malformed_and_empty_bodies_are_not_found() {
        let garbage = parse(b"{not json");
        assert!(matches!(garbage, Err(WeatherError::NotFound(_))));
        assert!(matches!(parse(b""), Err(WeatherError::NotFound(_))));
    }

    #[test]
    fn provider_error_object_is_not_found() {
        let reply = br#"{"cod":"404","message":"city not found"}"#;
        let err = parse(reply).unwrap_err();

        assert!(matches!(err, WeatherError::NotFound(_)));
        assert_eq!(err.to_string(), "City not found, please try again");
    }

    #[test]
    fn empty_condition_list_is_not_found() {
        let nowhere = body(json!({
            "name": "Nowhere",
            "main": { "temp": 1.0 },
            "weather": []
        }));

        assert!(matches!(parse(&nowhere), Err(WeatherError::NotFound(_))));
    }
}
