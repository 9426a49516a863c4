use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual/audio theme of a focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Kpop,
    Anime,
    Car,
    Music,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Kpop, Theme::Anime, Theme::Car, Theme::Music];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Kpop => "kpop",
            Theme::Anime => "anime",
            Theme::Car => "car",
            Theme::Music => "music",
        }
    }

    /// Session title shown while the timer runs.
    pub fn title(&self) -> &'static str {
        match self {
            Theme::Kpop => "K-Pop Flow",
            Theme::Anime => "Anime Power",
            Theme::Car => "Racing Mode",
            Theme::Music => "Music Vibes",
        }
    }

    /// Looping background track played during a session.
    pub fn ambient_track(&self) -> String {
        format!("sounds/{}-bg.mp3", self.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme '{s}' (expected kpop, anime, car or music)"))
    }
}
