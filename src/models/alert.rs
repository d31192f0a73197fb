use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    HeavyRain,
    Heatwave,
    Frost,
    HighWind,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::HeavyRain => "Heavy Rain",
            AlertKind::Heatwave => "Heatwave",
            AlertKind::Frost => "Frost",
            AlertKind::HighWind => "High Wind",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            AlertKind::HeavyRain => Color::Blue,
            AlertKind::Heatwave => Color::Red,
            AlertKind::Frost => Color::LightBlue,
            AlertKind::HighWind => Color::Yellow,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AlertKind::HeavyRain => "🌧",
            AlertKind::Heatwave => "🔥",
            AlertKind::Frost => "❄",
            AlertKind::HighWind => "💨",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A triggered alert. `message` is the plain text shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
