use crate::ident::{DEFAULT_ID_PREFIX, LabelNamespace};
use crate::scene::{Bounds, Layer, TextAlign};
use crate::theme::LabelTheme;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_MAX_LABELS: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Largest rows x cols a single plan may produce.
    pub max_labels: usize,
    /// Area covered when the scene has no items to measure.
    pub fallback_bounds: Bounds,
    pub id_prefix: String,
}

impl LayoutConfig {
    pub fn namespace(&self) -> LabelNamespace {
        LabelNamespace::new(self.id_prefix.clone())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_labels: DEFAULT_MAX_LABELS,
            fallback_bounds: Bounds::new(0.0, 0.0, 1000.0, 1000.0),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub padding: f64,
    pub background: String,
    pub grid_color: String,
    pub scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            padding: 16.0,
            background: "#2B2B2B".to_string(),
            grid_color: "#555555".to_string(),
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub theme: LabelTheme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelStyleFile {
    font_family: Option<String>,
    font_size: Option<f64>,
    color: Option<String>,
    bold: Option<bool>,
    align: Option<TextAlign>,
    layer: Option<Layer>,
    locked: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    padding: Option<f64>,
    background: Option<String>,
    grid_color: Option<String>,
    scale: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    label_style: Option<LabelStyleFile>,
    max_labels: Option<i64>,
    fallback_bounds: Option<Bounds>,
    id_prefix: Option<String>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON (or JSON5) config document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "highContrast" | "high-contrast" => config.theme = LabelTheme::high_contrast(),
            "default" | "owlbear" => config.theme = LabelTheme::owlbear_default(),
            other => anyhow::bail!("unknown theme {other:?}"),
        }
    }

    if let Some(style) = parsed.label_style {
        if let Some(v) = style.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = style.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = style.color {
            config.theme.color = v;
        }
        if let Some(v) = style.bold {
            config.theme.bold = v;
        }
        if let Some(v) = style.align {
            config.theme.align = v;
        }
        if let Some(v) = style.layer {
            config.theme.layer = v;
        }
        if let Some(v) = style.locked {
            config.theme.locked = v;
        }
    }

    if let Some(v) = parsed.max_labels {
        config.layout.max_labels = usize::try_from(v.max(1)).unwrap_or(usize::MAX);
    }
    if let Some(v) = parsed.fallback_bounds {
        config.layout.fallback_bounds = v;
    }
    if let Some(v) = parsed.id_prefix {
        if v.is_empty() {
            anyhow::bail!("idPrefix must not be empty");
        }
        config.layout.id_prefix = v;
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.padding {
            config.render.padding = v.max(0.0);
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
        if let Some(v) = render.grid_color {
            config.render.grid_color = v;
        }
        if let Some(v) = render.scale {
            config.render.scale = v.max(0.1);
        }
    }

    Ok(config)
}
