use crate::scene::{Layer, TextAlign, TextContent};
use serde::{Deserialize, Serialize};

/// How coordinate labels look and sit in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTheme {
    pub font_family: String,
    pub font_size: f64,
    pub color: String,
    pub bold: bool,
    pub align: TextAlign,
    pub layer: Layer,
    pub locked: bool,
}

impl LabelTheme {
    pub fn owlbear_default() -> Self {
        Self {
            font_family: "Roboto".to_string(),
            font_size: 16.0,
            color: "#888888".to_string(),
            bold: true,
            align: TextAlign::Center,
            layer: Layer::Map,
            locked: true,
        }
    }

    pub fn high_contrast() -> Self {
        Self {
            font_family: "Roboto".to_string(),
            font_size: 20.0,
            color: "#FFFFFF".to_string(),
            bold: true,
            align: TextAlign::Center,
            layer: Layer::Map,
            locked: true,
        }
    }

    pub fn text(&self, value: String) -> TextContent {
        TextContent {
            value,
            size: self.font_size,
            font: self.font_family.clone(),
            align: self.align,
            color: self.color.clone(),
            bold: self.bold,
        }
    }
}

impl Default for LabelTheme {
    fn default() -> Self {
        Self::owlbear_default()
    }
}
