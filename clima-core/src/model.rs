use std::fmt;

/// Current weather for one place, as shown on the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherModel {
    condition_id: i32,
    city_name: String,
    temperature: f64,
}

impl WeatherModel {
    pub fn new(condition_id: i32, city_name: impl Into<String>, temperature: f64) -> Self {
        Self {
            condition_id,
            city_name: city_name.into(),
            temperature,
        }
    }

    pub fn condition_id(&self) -> i32 {
        self.condition_id
    }

    pub fn city_name(&self) -> &str {
        &self.city_name
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Temperature with exactly one decimal digit, e.g. `"14.3°"`.
    pub fn temperature_string(&self) -> String {
        format!("{:.1}°", self.temperature)
    }

    pub fn condition(&self) -> Condition {
        Condition::from_code(self.condition_id)
    }

    /// Symbolic icon name for the current condition.
    pub fn condition_name(&self) -> &'static str {
        self.condition().icon_name()
    }
}

/// Weather condition buckets following OpenWeather's condition-code groups.
/// See: https://openweathermap.org/weather-conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Condition {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    #[default]
    Clear,
    Clouds,
}

impl Condition {
    pub fn from_code(code: i32) -> Self {
        match code {
            200..=232 => Self::Thunderstorm,
            300..=321 => Self::Drizzle,
            500..=531 => Self::Rain,
            600..=622 => Self::Snow,
            701..=781 => Self::Atmosphere,
            800 => Self::Clear,
            801..=804 => Self::Clouds,
            _ => Self::default(),
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "cloud.bolt",
            Self::Drizzle => "cloud.drizzle",
            Self::Rain => "cloud.rain",
            Self::Snow => "cloud.snow",
            Self::Atmosphere => "cloud.fog",
            Self::Clear => "sun.max",
            Self::Clouds => "cloud",
        }
    }

    /// Single-glyph rendering for terminals.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "⛈",
            Self::Drizzle => "🌦",
            Self::Rain => "🌧",
            Self::Snow => "🌨",
            Self::Atmosphere => "🌫",
            Self::Clear => "☀",
            Self::Clouds => "☁",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "Thunderstorm",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Atmosphere => "Mist",
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// What a single fetch asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates(Coordinates),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::City(name) => f.write_str(name),
            Query::Coordinates(coords) => write!(f, "({coords})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_string_has_one_decimal_digit() {
        let text = |temp| WeatherModel::new(800, "X", temp).temperature_string();

        assert_eq!(text(14.0), "14.0°");
        assert_eq!(text(14.26), "14.3°");
        assert_eq!(text(-3.04), "-3.0°");
        assert_eq!(text(21.0), "21.0°");
    }

    #[test]
    fn group_boundaries() {
        let cases = [
            (200, Condition::Thunderstorm),
            (232, Condition::Thunderstorm),
            (300, Condition::Drizzle),
            (321, Condition::Drizzle),
            (500, Condition::Rain),
            (531, Condition::Rain),
            (600, Condition::Snow),
            (622, Condition::Snow),
            (701, Condition::Atmosphere),
            (781, Condition::Atmosphere),
            (800, Condition::Clear),
            (801, Condition::Clouds),
            (804, Condition::Clouds),
        ];
        for (code, expected) in cases {
            assert_eq!(Condition::from_code(code), expected, "code {code}");
        }
    }

    #[test]
    fn documented_codes_below_800_never_use_the_default_icon() {
        let documented = (200..=232)
            .chain(300..=321)
            .chain(500..=531)
            .chain(600..=622)
            .chain(701..=781);
        for code in documented {
            let icon = Condition::from_code(code).icon_name();
            assert_ne!(icon, "sun.max", "code {code}");
        }
    }

    #[test]
    fn unknown_codes_fall_back_to_clear() {
        for code in [-1, 0, 199, 250, 450, 799, 805, 999] {
            assert_eq!(Condition::from_code(code), Condition::Clear, "code {code}");
        }
        let unknown = WeatherModel::new(999, "X", 0.0);
        assert_eq!(unknown.condition_name(), "sun.max");
    }

    #[test]
    fn every_condition_has_a_distinct_icon() {
        let all = [
            Condition::Thunderstorm,
            Condition::Drizzle,
            Condition::Rain,
            Condition::Snow,
            Condition::Atmosphere,
            Condition::Clear,
            Condition::Clouds,
        ];
        let icons: std::collections::HashSet<_> = all.iter().map(Condition::icon_name).collect();
        assert_eq!(icons.len(), all.len());
    }

    #[test]
    fn query_display() {
        let here = Query::Coordinates(Coordinates::new(51.5, -0.12));

        assert_eq!(Query::City("Paris".into()).to_string(), "Paris");
        assert_eq!(here.to_string(), "(51.5, -0.12)");
    }
}
