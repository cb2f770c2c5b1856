//! Terminal color themes.

use colored::Colorize;

/// Color theme for chat output. The preference persists across runs via the
/// theme store; unknown stored values fall back to dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Prefix printed before an assistant response starts streaming.
    pub fn assistant_prefix(&self) -> String {
        match self {
            Theme::Dark => "assistant> ".bright_green().bold().to_string(),
            Theme::Light => "assistant> ".green().bold().to_string(),
        }
    }

    pub fn status(&self, text: &str) -> String {
        match self {
            Theme::Dark => text.bright_black().to_string(),
            Theme::Light => text.dimmed().to_string(),
        }
    }

    pub fn error(&self, text: &str) -> String {
        text.red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_dark() {
        assert_eq!(Theme::from_name("light"), Theme::Light);
        assert_eq!(Theme::from_name("dark"), Theme::Dark);
        assert_eq!(Theme::from_name("solarized"), Theme::Dark);
        assert_eq!(Theme::from_name(""), Theme::Dark);
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().name(), "dark");
    }
}
