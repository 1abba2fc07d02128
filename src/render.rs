use crate::config::RenderConfig;
use crate::layout::LabelPlan;
use crate::scene::TextAlign;
use crate::theme::LabelTheme;
use anyhow::Result;
use std::path::Path;

/// Preview of a label plan: the covered cells outlined and each label drawn
/// at its cell centre.
pub fn render_svg(plan: &LabelPlan, theme: &LabelTheme, config: &RenderConfig) -> String {
    let pad = config.padding;
    let grid = &plan.grid;
    let cells_width = plan.cols as f64 * grid.cell_width;
    let cells_height = plan.rows as f64 * grid.cell_height;
    let width = (cells_width.max(plan.bounds.width) + pad * 2.0).max(1.0);
    let height = (cells_height.max(plan.bounds.height) + pad * 2.0).max(1.0);
    let origin_x = plan.bounds.x - pad;
    let origin_y = plan.bounds.y - pad;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{origin_x:.2} {origin_y:.2} {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect x=\"{origin_x:.2}\" y=\"{origin_y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"{}\"/>",
        config.background
    ));

    svg.push_str(&format!(
        "<g fill=\"none\" stroke=\"{}\" stroke-width=\"1\">",
        config.grid_color
    ));
    for col in 0..=plan.cols {
        let x = plan.bounds.x + col as f64 * grid.cell_width;
        svg.push_str(&format!(
            "<line x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\"/>",
            plan.bounds.y,
            plan.bounds.y + cells_height
        ));
    }
    for row in 0..=plan.rows {
        let y = plan.bounds.y + row as f64 * grid.cell_height;
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\"/>",
            plan.bounds.x,
            plan.bounds.x + cells_width
        ));
    }
    svg.push_str("</g>");

    let anchor = match theme.align {
        TextAlign::Left => "start",
        TextAlign::Center => "middle",
        TextAlign::Right => "end",
    };
    let weight = if theme.bold { "bold" } else { "normal" };
    svg.push_str(&format!(
        "<g font-family=\"{}\" font-size=\"{}\" font-weight=\"{weight}\" fill=\"{}\" text-anchor=\"{anchor}\" dominant-baseline=\"central\">",
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.color
    ));
    for item in &plan.items {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\">{}</text>",
            item.position.x,
            item.position.y,
            escape_xml(&item.text.value)
        ));
    }
    svg.push_str("</g></svg>");
    svg
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, config: &RenderConfig, theme: &LabelTheme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme.font_family.clone();
    std::sync::Arc::make_mut(&mut opt.fontdb).load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree
        .size()
        .to_int_size()
        .scale_by(config.scale)
        .ok_or_else(|| anyhow::anyhow!("Invalid output scale {}", config.scale))?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let transform = resvg::tiny_skia::Transform::from_scale(config.scale, config.scale);
    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, transform, &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, svg)?,
        None => println!("{svg}"),
    }
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::plan_labels;
    use crate::scene::{Bounds, GridGeometry};

    #[test]
    fn render_svg_basic() {
        let theme = LabelTheme::default();
        let plan = plan_labels(
            &Bounds::new(0.0, 0.0, 250.0, 150.0),
            &GridGeometry::new(100.0, 100.0),
            &theme,
            &LayoutConfig::default(),
        )
        .unwrap();
        let svg = render_svg(&plan, &theme, &RenderConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(">A1</text>"));
        assert!(svg.contains(">C2</text>"));
        assert!(svg.contains("x=\"250.00\" y=\"150.00\""));
        // 4 vertical + 3 horizontal grid lines
        assert_eq!(svg.matches("<line").count(), 7);
    }

    #[test]
    fn escapes_font_family() {
        let mut theme = LabelTheme::default();
        theme.font_family = "\"Fira Sans\", sans-serif".to_string();
        let plan = plan_labels(
            &Bounds::new(0.0, 0.0, 10.0, 10.0),
            &GridGeometry::new(10.0, 10.0),
            &theme,
            &LayoutConfig::default(),
        )
        .unwrap();
        let svg = render_svg(&plan, &theme, &RenderConfig::default());
        assert!(svg.contains("&quot;Fira Sans&quot;"));
    }

    #[test]
    fn wide_empty_strip_draws_only_the_outline() {
        let theme = LabelTheme::default();
        let plan = plan_labels(
            &Bounds::new(0.0, 0.0, 2e6, 0.0),
            &GridGeometry::new(1.0, 1.0),
            &theme,
            &LayoutConfig::default(),
        )
        .unwrap();
        let svg = render_svg(&plan, &theme, &RenderConfig::default());
        assert_eq!(svg.matches("<line").count(), 2);
        assert!(!svg.contains("<text"));
    }
}
