use grid_labels::{Bounds, Config, GridGeometry, LabelTheme, cell_name, parse_config, plan_labels};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridLabelOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f64>,
    color: Option<String>,
    max_labels: Option<usize>,
    id_prefix: Option<String>,
}

fn build_config(options: GridLabelOptions) -> Config {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("highContrast") {
        config.theme = LabelTheme::high_contrast();
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    if let Some(color) = options.color {
        config.theme.color = color;
    }
    if let Some(max_labels) = options.max_labels {
        config.layout.max_labels = max_labels.max(1);
    }
    if let Some(prefix) = options.id_prefix.filter(|prefix| !prefix.is_empty()) {
        config.layout.id_prefix = prefix;
    }
    config
}

fn js_error(error: impl ToString) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn plan_items_json(bounds_json: &str, grid_json: &str, config: &Config) -> Result<String, String> {
    let bounds: Bounds = serde_json::from_str(bounds_json).map_err(|err| err.to_string())?;
    let grid: GridGeometry = serde_json::from_str(grid_json).map_err(|err| err.to_string())?;
    let plan = plan_labels(&bounds, &grid, &config.theme, &config.layout).map_err(|err| err.to_string())?;
    serde_json::to_string(&plan.items).map_err(|err| err.to_string())
}

fn options_config(options_json: Option<&str>) -> Result<Config, String> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<GridLabelOptions>(raw).map_err(|err| err.to_string())?,
        None => GridLabelOptions::default(),
    };
    Ok(build_config(options))
}

/// Label items for `bounds` as a JSON array ready for `addItems`.
#[wasm_bindgen]
pub fn plan_grid_labels(
    bounds_json: &str,
    grid_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let config = options_config(options_json.as_deref()).map_err(js_error)?;
    plan_items_json(bounds_json, grid_json, &config).map_err(js_error)
}

/// Same as [`plan_grid_labels`] but configured from a full config document.
#[wasm_bindgen]
pub fn plan_grid_labels_with_config(
    bounds_json: &str,
    grid_json: &str,
    config_json: &str,
) -> Result<String, JsValue> {
    let config = parse_config(config_json).map_err(js_error)?;
    plan_items_json(bounds_json, grid_json, &config).map_err(js_error)
}

#[wasm_bindgen]
pub fn cell_label(row: usize, col: usize) -> String {
    cell_name(row, col)
}

#[wasm_bindgen]
pub fn is_grid_label_id(id: &str, prefix: Option<String>) -> bool {
    let config = build_config(GridLabelOptions {
        id_prefix: prefix,
        ..GridLabelOptions::default()
    });
    config.layout.namespace().classify(id).is_label()
}
