use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fusion_table::{
    compute_handles, render_table, value_to_string, Composition, Curve, KeyframeValue, Number,
    Table, Tool,
};
use serde::Serialize;

#[allow(non_snake_case)]
#[derive(Serialize, Clone)]
struct Transform {
    Size: f64,
    Angle: f64,
    Center: (f64, f64),
}

fn build_comp(tools: usize, keyframes: i64) -> Composition {
    let mut comp = Composition::new();
    for i in 0..tools {
        let name = format!("Blur{i}");
        comp.add_tool(Tool::new("Blur", name.as_str()).at(i as i64, 0));
        if let Ok(spline) = comp.animate(&name, "XBlurSize", Some(Curve::ease_in_and_out())) {
            spline.add_keyframes((0..keyframes).map(|f| (f * 12, f % 3)), None);
        }
    }
    comp
}

fn benchmark_render_simple(c: &mut Criterion) {
    let table = Table::new("Blur")
        .with("Inputs", Table::unnamed().with("XBlurSize", Table::new("Input").with("Value", 5)))
        .with("ViewInfo", Table::new("OperatorInfo").with("Pos", (110, 0)));

    c.bench_function("render_simple_tool", |b| {
        b.iter(|| render_table(black_box(&table)))
    });
}

fn benchmark_render_composition(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_composition");

    for size in [1, 10, 50, 100].iter() {
        let comp = build_comp(*size, 8);
        group.bench_with_input(BenchmarkId::from_parameter(size), &comp, |b, comp| {
            b.iter(|| black_box(comp).to_text())
        });
    }
    group.finish();
}

fn benchmark_compute_handles(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_handles");

    for size in [10, 100, 1000].iter() {
        let keyframes: Vec<(Number, KeyframeValue)> = (0..*size)
            .map(|i: i64| (Number::from(i * 2), KeyframeValue::from(i % 7)))
            .collect();
        let curves = vec![Curve::decelerate_in_and_out(); keyframes.len()];

        group.bench_with_input(BenchmarkId::from_parameter(size), &keyframes, |b, keyframes| {
            b.iter(|| compute_handles(black_box(keyframes), black_box(&curves)))
        });
    }
    group.finish();
}

fn benchmark_serde_bridge(c: &mut Criterion) {
    let xf = Transform {
        Size: 2.0,
        Angle: 45.0,
        Center: (0.5, 0.5),
    };

    c.bench_function("serde_struct_to_text", |b| {
        b.iter(|| value_to_string(black_box(&xf)))
    });
}

criterion_group!(
    benches,
    benchmark_render_simple,
    benchmark_render_composition,
    benchmark_compute_handles,
    benchmark_serde_bridge
);
criterion_main!(benches);
