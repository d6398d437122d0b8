//! Display colours for moods.

use std::collections::HashMap;

use crate::constants::mood::NEUTRAL;

const DEFAULT_COLORS: &[(&str, &str)] = &[
    ("happy", "#FFD700"),
    ("sad", "#4169E1"),
    ("romantic", "#FF69B4"),
    ("energetic", "#FF4500"),
    ("calm", "#32CD32"),
    ("angry", "#DC143C"),
    (NEUTRAL, NEUTRAL_COLOR),
];

const NEUTRAL_COLOR: &str = "#808080";

/// Mood → hex colour table. Unknown moods get the neutral grey.
#[derive(Debug, Clone)]
pub struct MoodPalette {
    colors: HashMap<String, String>,
}

impl MoodPalette {
    /// Colour for a mood label.
    pub fn color_for(&self, mood: &str) -> &str {
        self.colors
            .get(&mood.to_lowercase())
            .map_or(NEUTRAL_COLOR, String::as_str)
    }

    /// Override or add the colour for a mood.
    pub fn set(&mut self, mood: impl Into<String>, color: impl Into<String>) {
        self.colors.insert(mood.into().to_lowercase(), color.into());
    }
}

impl Default for MoodPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS
                .iter()
                .map(|(m, c)| ((*m).to_string(), (*c).to_string()))
                .collect(),
        }
    }
}
