//! Dark/light theme.

use serde::{Deserialize, Serialize};

/// UI theme. Dark is the first-launch default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Flash accent for a hue in degrees. Dark backgrounds get a lighter,
    /// less saturated tone than light backgrounds.
    pub fn flash_color(self, hue: f64) -> String {
        match self {
            Self::Dark => format!("oklch(0.78 0.12 {hue:.0})"),
            Self::Light => format!("oklch(0.55 0.15 {hue:.0})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn toggle_and_parse() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
        assert_eq!(Theme::parse(" light "), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
    }

    #[test]
    fn flash_color_depends_on_theme() {
        assert_eq!(Theme::Dark.flash_color(85.0), "oklch(0.78 0.12 85)");
        assert_eq!(Theme::Light.flash_color(85.0), "oklch(0.55 0.15 85)");
    }
}
