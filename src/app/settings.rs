use crate::model::{GridDimensions, Rgb};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub(super) struct AppSettings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub columns: u32,
    pub rows: u32,
    pub max_grid: u32,
    pub background: Rgb,
    pub export_size: u32,
    pub export_file_name: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 800,
            columns: 6,
            rows: 6,
            max_grid: 20,
            background: Rgb::DEFAULT_BACKGROUND,
            export_size: 1080,
            export_file_name: "myComposition.png".to_string(),
        }
    }
}

impl AppSettings {
    /// Clamp values the UI cannot represent.
    pub(super) fn sanitized(mut self) -> Self {
        self.canvas_width = self.canvas_width.max(1);
        self.canvas_height = self.canvas_height.max(1);
        self.export_size = self.export_size.max(1);
        self.max_grid = self.max_grid.max(1);
        self.columns = self.columns.clamp(1, self.max_grid);
        self.rows = self.rows.clamp(1, self.max_grid);
        if self.export_file_name.trim().is_empty() {
            self.export_file_name = Self::default().export_file_name;
        }
        self
    }

    pub(super) fn grid(&self) -> GridDimensions {
        GridDimensions::new(self.columns, self.rows)
    }
}

pub(super) fn config_path() -> Option<String> {
    if let Some(home) = std::env::var_os("HOME") {
        let path = std::path::PathBuf::from(home).join(".config").join("pangram.toml");
        if path.exists() {
            return Some(path.display().to_string());
        }
    }
    if std::path::Path::new("settings.toml").exists() {
        return Some("settings.toml".to_string());
    }
    None
}

pub(super) fn load_settings(path: &str) -> Option<AppSettings> {
    let s = std::fs::read_to_string(path).ok()?;
    let parsed = parse_settings(path, &s);
    if parsed.is_none() {
        log::warn!("could not parse settings from {path}, using defaults");
    }
    parsed
}

fn parse_settings(path: &str, s: &str) -> Option<AppSettings> {
    if path.ends_with(".toml") {
        toml::from_str::<AppSettings>(s)
            .ok()
            .or_else(|| serde_json::from_str::<AppSettings>(s).ok())
    } else {
        serde_json::from_str::<AppSettings>(s)
            .ok()
            .or_else(|| toml::from_str::<AppSettings>(s).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let settings = parse_settings("settings.toml", "").expect("parse");
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let src = r#"
            columns = 12
            export_file_name = "out.png"

            [background]
            r = 0
            g = 10
            b = 20
        "#;
        let settings = parse_settings("pangram.toml", src).expect("parse");
        assert_eq!(settings.columns, 12);
        assert_eq!(settings.rows, 6);
        assert_eq!(settings.export_file_name, "out.png");
        assert_eq!(settings.background, Rgb { r: 0, g: 10, b: 20 });
    }

    #[test]
    fn json_fallback() {
        let settings = parse_settings("settings.json", r#"{"rows": 3, "export_size": 2048}"#).expect("parse");
        assert_eq!(settings.rows, 3);
        assert_eq!(settings.export_size, 2048);
    }

    #[test]
    fn malformed_is_none() {
        assert!(parse_settings("settings.toml", "columns = [").is_none());
    }

    #[test]
    fn sanitize_clamps_grid() {
        let settings = AppSettings {
            columns: 0,
            rows: 99,
            export_file_name: "  ".to_string(),
            ..AppSettings::default()
        }
        .sanitized();
        assert_eq!(settings.grid(), GridDimensions::new(1, 20));
        assert_eq!(settings.export_file_name, "myComposition.png");
    }
}
