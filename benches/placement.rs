use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use region_label_rs::config::Config;
use region_label_rs::ir::{Point, Shape};
use region_label_rs::parser::parse_svg_regions;
use region_label_rs::placement::{Overrides, place_map_labels, resolve_base_anchor};
use region_label_rs::render::render_labeled_svg;
use std::f32::consts::TAU;
use std::hint::black_box;

// Star-shaped outline; odd vertices are pulled in so the ring is concave.
fn jagged_ring(vertices: usize, radius: f32) -> Vec<Point> {
    (0..vertices)
        .map(|i| {
            let angle = TAU * i as f32 / vertices as f32;
            let r = if i % 2 == 0 { radius } else { radius * 0.6 };
            Point::new(500.0 + r * angle.cos(), 500.0 + r * angle.sin())
        })
        .collect()
}

fn grid_map_source(cols: usize, rows: usize) -> String {
    let mut out = String::from("<svg xmlns=\"http://www.w3.org/2000/svg\">\n");
    for row in 0..rows {
        for col in 0..cols {
            let (x, y) = (col as f32 * 40.0, row as f32 * 40.0);
            if (row + col) % 3 == 0 {
                out.push_str(&format!(
                    "  <path id=\"r{row}_{col}\" d=\"M{x} {y} C{} {} {} {} {} {y} L{} {} L{x} {} Z\"/>\n",
                    x + 10.0,
                    y - 10.0,
                    x + 30.0,
                    y - 10.0,
                    x + 40.0,
                    x + 40.0,
                    y + 40.0,
                    y + 40.0
                ));
            } else {
                out.push_str(&format!(
                    "  <polygon id=\"r{row}_{col}\" points=\"{x},{y} {},{y} {},{} {x},{}\"/>\n",
                    x + 40.0,
                    x + 40.0,
                    y + 40.0,
                    y + 40.0
                ));
            }
        }
    }
    out.push_str("</svg>\n");
    out
}

fn bench_resolve_anchor(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_anchor");
    for vertices in [16usize, 256, 4096] {
        let shape = Shape::polygon(jagged_ring(vertices, 400.0));
        group.bench_with_input(BenchmarkId::from_parameter(vertices), &shape, |b, shape| {
            b.iter(|| black_box(resolve_base_anchor(black_box(shape))));
        });
    }
    group.finish();
}

fn bench_label_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_map");
    let config = Config::default();
    let overrides = Overrides::default();
    for (cols, rows) in [(5usize, 5usize), (20, 20), (50, 40)] {
        let name = format!("grid_{cols}x{rows}");
        let input = grid_map_source(cols, rows);
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let map = parse_svg_regions(black_box(data));
                let labels = place_map_labels(&map, Some("bench"), &overrides, &config);
                let svg = render_labeled_svg(&map, &labels, None, &config.theme);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve_anchor, bench_label_map);
criterion_main!(benches);
