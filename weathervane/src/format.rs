//! Temperature and icon formatting
//!
//! Pure functions. Locale handling covers what a weather label needs: the
//! decimal separator, whether the unit is separated by a no-break space,
//! and whether the region reads Fahrenheit.

use std::fmt;

use tracing::debug;

/// No-break space between number and unit.
const NBSP: char = '\u{00a0}';

/// Languages that write `15,1` and separate the unit: `15,1 °C`.
const COMMA_LANGUAGES: &[&str] = &[
    "bg", "cs", "da", "de", "el", "es", "et", "fi", "fr", "hr", "hu", "id", "it", "lt", "lv",
    "nb", "nl", "nn", "no", "pl", "pt", "ro", "ru", "sk", "sl", "sr", "sv", "tr", "uk", "vi",
];

/// Regions whose everyday temperature unit is Fahrenheit.
const FAHRENHEIT_REGIONS: &[&str] = &["US", "LR", "MM", "BS", "BZ", "KY", "PW"];

/// Language plus optional region, e.g. `cs` or `en_US`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Parse a locale identifier, falling back to the default on garbage.
    ///
    /// Accepts `cs`, `en_US`, `de-DE` and POSIX forms like `en_US.UTF-8`.
    pub fn parse(identifier: &str) -> Self {
        Self::try_parse(identifier).unwrap_or_else(|| {
            debug!(identifier, "Unrecognized locale, using default format");
            Self::default()
        })
    }

    pub fn try_parse(identifier: &str) -> Option<Self> {
        // Drop encoding and modifier: en_US.UTF-8@euro
        let base = identifier
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim();

        let mut parts = base.split(['_', '-']);
        let language = parts.next()?;
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return None;
        }

        let region = match parts.next() {
            None => None,
            Some(region)
                if region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()) =>
            {
                Some(region.to_ascii_uppercase())
            }
            Some(region) if region.len() == 3 && region.chars().all(|c| c.is_ascii_digit()) => {
                Some(region.to_string())
            }
            Some(_) => return None,
        };
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            language: language.to_ascii_lowercase(),
            region,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    fn decimal_separator(&self) -> char {
        if COMMA_LANGUAGES.contains(&self.language.as_str()) {
            ','
        } else {
            '.'
        }
    }

    fn spaced_unit(&self) -> bool {
        COMMA_LANGUAGES.contains(&self.language.as_str())
    }

    fn uses_fahrenheit(&self) -> bool {
        self.region
            .as_deref()
            .is_some_and(|region| FAHRENHEIT_REGIONS.contains(&region))
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "en".into(),
            region: None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}_{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

/// Format a Celsius reading for display, at most one fraction digit.
///
/// `3.72` → `3.7°C` (en), `15.123456` → `15,1 °C` (cs, no-break space),
/// `15.0` → `59°F` (en_US).
pub fn format_temperature(celsius: f64, locale: &Locale) -> String {
    let (value, unit) = if locale.uses_fahrenheit() {
        (celsius * 9.0 / 5.0 + 32.0, "°F")
    } else {
        (celsius, "°C")
    };

    let tenths = (value * 10.0).round() as i64;
    let sign = if tenths < 0 { "-" } else { "" };
    let whole = tenths.abs() / 10;
    let fraction = tenths.abs() % 10;

    let mut out = format!("{sign}{whole}");
    if fraction != 0 {
        out.push(locale.decimal_separator());
        out.push_str(&fraction.to_string());
    }
    if locale.spaced_unit() {
        out.push(NBSP);
    }
    out.push_str(unit);
    out
}

/// Emoji for an OpenWeatherMap icon code such as `04d`.
///
/// Only the two-digit prefix matters; unknown prefixes get the clear-sky sun.
pub fn weather_emoji(icon_code: &str) -> &'static str {
    match icon_code.get(..2) {
        Some("02") => "🌤",
        Some("03") => "🌥",
        Some("04") => "☁️",
        Some("09") => "🌧",
        Some("10") => "🌦",
        Some("11") => "⛈",
        Some("13") => "🌨",
        Some("50") => "🌫",
        _ => "☀️",
    }
}
