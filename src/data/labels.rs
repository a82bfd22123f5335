use std::fmt;

use serde::Serialize;

use super::error::DataError;

// ---------------------------------------------------------------------------
// Category – a fixed, integer-coded label set
// ---------------------------------------------------------------------------

/// A categorical dimension stored as an integer code 1..=4 and displayed as a
/// fixed label. Ordering of the implementing type follows the code.
pub trait Category: Copy + Ord + Sized + 'static {
    /// Name of the dimension, used in error messages.
    const KIND: &'static str;
    /// Every variant, in code order.
    const ALL: [Self; 4];

    fn code(self) -> u8;
    fn label(self) -> &'static str;

    /// Decode an integer code into the category.
    fn from_code(code: i64) -> Result<Self, DataError> {
        Self::ALL
            .into_iter()
            .find(|c| i64::from(c.code()) == code)
            .ok_or(DataError::UnknownCode {
                kind: Self::KIND,
                code,
            })
    }

    /// Encode a display label back into the category. Matching is exact.
    fn from_label(label: &str) -> Result<Self, DataError> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .ok_or_else(|| DataError::UnknownLabel {
                kind: Self::KIND,
                label: label.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Winter = 1,
    Spring = 2,
    Summer = 3,
    Fall = 4,
}

impl Category for Season {
    const KIND: &'static str = "season";
    const ALL: [Self; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    fn code(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weather {
    Clear = 1,
    #[serde(rename = "Mist + Cloudy")]
    MistCloudy = 2,
    #[serde(rename = "Light Snow/Rain")]
    LightSnowRain = 3,
    #[serde(rename = "Heavy Rain/Snow")]
    HeavyRainSnow = 4,
}

impl Category for Weather {
    const KIND: &'static str = "weather";
    const ALL: [Self; 4] = [
        Weather::Clear,
        Weather::MistCloudy,
        Weather::LightSnowRain,
        Weather::HeavyRainSnow,
    ];

    fn code(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::MistCloudy => "Mist + Cloudy",
            Weather::LightSnowRain => "Light Snow/Rain",
            Weather::HeavyRainSnow => "Heavy Rain/Snow",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
