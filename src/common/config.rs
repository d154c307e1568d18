use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub metrics: SheetMetrics,
    pub animation: AnimationSettings,
    pub text: TextSettings,
}

/// Fixed dimensions used by section and sheet layout.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SheetMetrics {
    /// Height of a standard row and of the cancel/confirm band.
    pub row_height: f64,
    /// Inset between elements inside a section.
    pub section_inset: f64,
    pub divider_thickness: f64,
    /// Multiplier applied to the measured title line height.
    pub title_scale: f64,
    /// Spacing around the stacked sections. The gap between sections is twice this.
    pub outer_spacing: f64,
    /// Width of the fitted sheet on regular (tablet) containers.
    pub fixed_width: f64,
    /// Width of the section column; fitted sections never grow past it.
    pub content_width: f64,
    pub corner_radius: f64,
    pub pointer_base: f64,
    pub pointer_height: f64,
    pub backdrop_alpha: f64,
}

impl Default for SheetMetrics {
    fn default() -> Self {
        Self {
            row_height: 50.0,
            section_inset: 1.0,
            divider_thickness: 1.0,
            title_scale: 1.5,
            outer_spacing: 5.0,
            fixed_width: 365.0,
            content_width: 345.0,
            corner_radius: 3.0,
            pointer_base: 20.0,
            pointer_height: 9.0,
            backdrop_alpha: 0.3,
        }
    }
}

impl SheetMetrics {
    pub fn stack_gap(&self) -> f64 { 2.0 * self.outer_spacing }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationSettings {
    pub per_section_secs: f64,
    pub min_secs: f64,
    pub max_secs: f64,
    pub anchored_secs: f64,
    pub relayout_compact_secs: f64,
    pub relayout_regular_secs: f64,
    /// Control points of the custom cubic-bezier easing.
    pub easing: [f64; 4],
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            per_section_secs: 0.12,
            min_secs: 0.22,
            max_secs: 0.45,
            anchored_secs: 0.3,
            relayout_compact_secs: 0.3,
            relayout_regular_secs: 0.4,
            easing: [0.215, 0.61, 0.355, 1.0],
        }
    }
}

impl AnimationSettings {
    /// Fitted sheets scale their transition with content volume, bounded at both ends.
    pub fn fitted_duration(&self, section_count: usize) -> Duration {
        let secs = (section_count as f64 * self.per_section_secs).clamp(self.min_secs, self.max_secs);
        Duration::from_secs_f64(secs)
    }

    pub fn anchored_duration(&self) -> Duration { Duration::from_secs_f64(self.anchored_secs) }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TextSettings {
    pub title_font_size: f64,
    pub message_font_size: f64,
    pub line_height_ratio: f64,
    pub advance_ratio: f64,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            title_font_size: 25.0,
            message_font_size: 15.0,
            line_height_ratio: 1.2,
            advance_ratio: 0.5,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("multiselect-sheet").join("config.toml"))
    }

    pub fn parse(contents: &str) -> anyhow::Result<Config> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config =
            Self::parse(&contents).with_context(|| format!("parsing config {}", path.display()))?;
        for issue in config.validate() {
            warn!(path = %path.display(), "config issue: {issue}");
        }
        debug!(?config, "loaded config");
        Ok(config)
    }

    /// Returns human readable problems; an empty list means the config is usable as is.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let m = &self.metrics;
        for (name, value) in [
            ("metrics.row_height", m.row_height),
            ("metrics.fixed_width", m.fixed_width),
            ("metrics.content_width", m.content_width),
            ("metrics.pointer_base", m.pointer_base),
            ("metrics.pointer_height", m.pointer_height),
            ("text.title_font_size", self.text.title_font_size),
            ("text.message_font_size", self.text.message_font_size),
        ] {
            if !(value > 0.0) {
                issues.push(format!("{name} must be positive, got {value}"));
            }
        }
        for (name, value) in [
            ("metrics.section_inset", m.section_inset),
            ("metrics.divider_thickness", m.divider_thickness),
            ("metrics.outer_spacing", m.outer_spacing),
            ("metrics.corner_radius", m.corner_radius),
        ] {
            if value < 0.0 {
                issues.push(format!("{name} must not be negative, got {value}"));
            }
        }
        if !(0.0..=1.0).contains(&m.backdrop_alpha) {
            issues.push(format!("metrics.backdrop_alpha must be within 0..=1, got {}", m.backdrop_alpha));
        }
        if m.content_width > m.fixed_width {
            issues.push(format!(
                "metrics.content_width ({}) is wider than metrics.fixed_width ({})",
                m.content_width, m.fixed_width
            ));
        }
        let a = &self.animation;
        if a.min_secs > a.max_secs {
            issues.push(format!(
                "animation.min_secs ({}) exceeds animation.max_secs ({})",
                a.min_secs, a.max_secs
            ));
        }
        for (name, value) in [
            ("animation.per_section_secs", a.per_section_secs),
            ("animation.min_secs", a.min_secs),
            ("animation.anchored_secs", a.anchored_secs),
            ("animation.relayout_compact_secs", a.relayout_compact_secs),
            ("animation.relayout_regular_secs", a.relayout_regular_secs),
        ] {
            if value < 0.0 {
                issues.push(format!("{name} must not be negative, got {value}"));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn fitted_duration_is_bounded() {
        let settings = AnimationSettings::default();
        assert_eq!(settings.fitted_duration(1), Duration::from_secs_f64(0.22));
        assert_eq!(settings.fitted_duration(3), Duration::from_secs_f64(3.0 * 0.12));
        assert_eq!(settings.fitted_duration(10), Duration::from_secs_f64(0.45));
        assert_eq!(settings.anchored_duration(), Duration::from_secs_f64(0.3));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::parse(
            r#"
            [metrics]
            row_height = 44.0

            [animation]
            anchored_secs = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.metrics.row_height, 44.0);
        assert_eq!(config.metrics.fixed_width, 365.0);
        assert_eq!(config.animation.anchored_secs, 0.25);
        assert_eq!(config.text, TextSettings::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("[metrics]\nrow_hieght = 3.0\n").is_err());
    }

    #[test]
    fn read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[text]\ntitle_font_size = 30.0").unwrap();
        let config = Config::read(file.path()).unwrap();
        assert_eq!(config.text.title_font_size, 30.0);
    }

    #[test]
    fn read_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::read(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }

    #[test]
    fn validate_flags_inconsistent_values() {
        assert!(Config::default().validate().is_empty());

        let mut config = Config::default();
        config.metrics.row_height = 0.0;
        config.animation.min_secs = 1.0;
        config.metrics.backdrop_alpha = 2.0;
        let issues = config.validate();
        assert_eq!(issues.len(), 3, "{issues:?}");
        assert!(issues[0].contains("metrics.row_height"));
    }
}
