use anyhow::{Context, Result};
use directories::ProjectDirs;
use ratatui::style::Color;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub icons: Icons,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    #[serde(deserialize_with = "hex_to_color")]
    pub background: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub foreground: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub accent: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub running: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub paused: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub dim: Color,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Icons {
    pub play: String,
    pub pause: String,
    pub done: String,
    pub input_cursor: String,
    pub header_left: String,
    pub header_right: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(16, 18, 24),
            foreground: Color::Rgb(205, 209, 214),
            accent: Color::Rgb(129, 161, 193),
            running: Color::Rgb(136, 172, 120),
            paused: Color::Rgb(222, 184, 112),
            dim: Color::Rgb(110, 115, 124),
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            play: "▶".to_string(),
            pause: "⏸".to_string(),
            done: "☑".to_string(),
            input_cursor: "▊".to_string(),
            header_left: "⟪ ".to_string(),
            header_right: " ⟫".to_string(),
        }
    }
}

fn hex_to_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    if !s.starts_with('#') || s.len() != 7 {
        return Err(serde::de::Error::custom("invalid hex color format"));
    }
    let r = u8::from_str_radix(&s[1..3], 16).map_err(serde::de::Error::custom)?;
    let g = u8::from_str_radix(&s[3..5], 16).map_err(serde::de::Error::custom)?;
    let b = u8::from_str_radix(&s[5..7], 16).map_err(serde::de::Error::custom)?;
    Ok(Color::Rgb(r, g, b))
}

pub fn load_config() -> Result<Config> {
    match ProjectDirs::from("com", "pabloagn", "tempo") {
        Some(proj_dirs) => {
            let path = proj_dirs.config_dir().join("tempo.toml");
            if path.exists() {
                let config_str = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file at {:?}", path))?;
                toml::from_str(&config_str)
                    .with_context(|| format!("Failed to parse config file at {:?}", path))
            } else {
                Ok(Config::default())
            }
        }
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_colors_parse_from_hex() {
        let config: Config = toml::from_str(
            r##"
            [theme]
            accent = "#ff8800"
            "##,
        )
        .unwrap();
        assert_eq!(config.theme.accent, Color::Rgb(0xff, 0x88, 0x00));
        // untouched fields keep their defaults
        assert_eq!(config.theme.dim, Theme::default().dim);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r##"
            [theme]
            accent = "ff8800"
            "##,
        );
        assert!(result.is_err());
    }
}
