/// Condition families the dashboard has artwork for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    ClearSky,
    FewClouds,
    ScatteredClouds,
    BrokenClouds,
    ShowerRain,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
    Unknown,
}

const DEFAULT_ICON: &str = "https://cdn-icons-png.flaticon.com/128/1779/1779940.png";

impl ConditionKind {
    /// Case-insensitive lookup of a provider condition description.
    pub fn from_description(description: &str) -> Self {
        match description.trim().to_lowercase().as_str() {
            "clear sky" => Self::ClearSky,
            "few clouds" => Self::FewClouds,
            "scattered clouds" => Self::ScatteredClouds,
            "broken clouds" => Self::BrokenClouds,
            "shower rain" => Self::ShowerRain,
            "rain" => Self::Rain,
            "thunderstorm" => Self::Thunderstorm,
            "snow" => Self::Snow,
            "mist" => Self::Mist,
            _ => Self::Unknown,
        }
    }

    pub fn icon_url(self) -> &'static str {
        match self {
            Self::ClearSky => "https://cdn-icons-png.flaticon.com/128/6974/6974833.png",
            Self::FewClouds => "https://cdn-icons-png.flaticon.com/128/414/414927.png",
            Self::ScatteredClouds => "https://cdn-icons-png.flaticon.com/512/3222/3222808.png",
            Self::BrokenClouds => "https://cdn-icons-png.flaticon.com/128/414/414825.png",
            Self::ShowerRain => "https://cdn-icons-png.flaticon.com/128/1163/1163657.png",
            Self::Rain => "https://cdn-icons-png.flaticon.com/128/4834/4834677.png",
            Self::Thunderstorm => "https://cdn-icons-png.flaticon.com/128/9755/9755354.png",
            Self::Snow => "https://cdn-icons-png.flaticon.com/128/2942/2942909.png",
            Self::Mist => "https://cdn-icons-png.flaticon.com/512/1458/1458966.png",
            Self::Unknown => DEFAULT_ICON,
        }
    }
}

pub fn icon_for(description: &str) -> &'static str {
    ConditionKind::from_description(description).icon_url()
}
