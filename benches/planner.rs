use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use futures::executor::block_on;
use grid_labels::config::{Config, LayoutConfig, RenderConfig};
use grid_labels::layout::plan_labels;
use grid_labels::render::render_svg;
use grid_labels::scene::{Bounds, GridGeometry, MemoryScene, SceneItem};
use grid_labels::theme::LabelTheme;
use grid_labels::toggle::LabelToggle;
use std::hint::black_box;

fn bench_plan(c: &mut Criterion) {
    let theme = LabelTheme::default();
    let config = LayoutConfig::default();
    let grid = GridGeometry::new(10.0, 10.0);
    let mut group = c.benchmark_group("plan_labels");
    for (rows, cols) in [(5, 5), (20, 20), (25, 40), (1, 1000)] {
        let bounds = Bounds::new(0.0, 0.0, cols as f64 * 10.0, rows as f64 * 10.0);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{cols}")),
            &bounds,
            |b, bounds| b.iter(|| plan_labels(black_box(bounds), &grid, &theme, &config)),
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let theme = LabelTheme::default();
    let plan = plan_labels(
        &Bounds::new(0.0, 0.0, 400.0, 250.0),
        &GridGeometry::new(10.0, 10.0),
        &theme,
        &LayoutConfig::default(),
    )
    .expect("plan at capacity");
    let render = RenderConfig::default();
    c.bench_function("render_svg/1000", |b| {
        b.iter(|| render_svg(black_box(&plan), &theme, &render))
    });
}

fn bench_toggle(c: &mut Criterion) {
    c.bench_function("toggle/add_remove_1000", |b| {
        b.iter(|| {
            let scene = MemoryScene::new(GridGeometry::new(10.0, 10.0));
            scene.insert(SceneItem::shape("map", Bounds::new(0.0, 0.0, 400.0, 250.0)));
            let toggle = LabelToggle::new(scene, Config::default());
            block_on(toggle.toggle()).expect("add");
            block_on(toggle.toggle()).expect("remove");
        })
    });
}

criterion_group!(benches, bench_plan, bench_render, bench_toggle);
criterion_main!(benches);
