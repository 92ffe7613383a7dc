use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flowdeck::{Config, IconMap, Registry, apply, merge_icons, parse_adjustments, parse_flowchart, place};
use std::hint::black_box;

fn dense_flowchart_source(nodes: usize, extra_edges: usize) -> String {
    let mut out = String::from("flowchart LR\n");
    if nodes == 0 {
        return out;
    }
    for i in 0..nodes {
        out.push_str(&format!("  N{}[Node {}]\n", i, i));
    }
    for i in 0..nodes.saturating_sub(1) {
        out.push_str(&format!("  N{} --> N{}\n", i, i + 1));
    }
    let mut count = 0usize;
    for i in 0..nodes {
        for j in (i + 2)..nodes {
            if count >= extra_edges {
                break;
            }
            out.push_str(&format!("  N{} --> N{}\n", i, j));
            count += 1;
        }
        if count >= extra_edges {
            break;
        }
    }
    out
}

fn dense_icons(nodes: usize) -> IconMap {
    const ICONS: [&str; 4] = ["🚀", "📊", "🧹", "✅"];
    (0..nodes)
        .map(|i| (format!("N{i}"), ICONS[i % ICONS.len()].to_string()))
        .collect()
}

fn fixture(name: &str) -> &'static str {
    match name {
        "flowchart_small" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/benches/fixtures/flowchart_small.mmd"
        )),
        "flowchart_annotated" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/benches/fixtures/flowchart_annotated.mmd"
        )),
        _ => panic!("unknown fixture {name}"),
    }
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for name in ["flowchart_small", "flowchart_annotated"] {
        let input = fixture(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, data| {
            b.iter(|| {
                let diagram = parse_flowchart(black_box(data));
                black_box(diagram.nodes.len());
            });
        });
    }
    for (nodes, extra) in [(50, 50), (200, 400)] {
        let input = dense_flowchart_source(nodes, extra);
        let name = format!("dense_{nodes}_{extra}");
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let diagram = parse_flowchart(black_box(data));
                black_box(diagram.edges.len());
            });
        });
    }
    group.finish();
}

fn bench_merge_icons(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_icons");
    for nodes in [20, 100] {
        let input = dense_flowchart_source(nodes, nodes);
        let icons = dense_icons(nodes);
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &input, |b, data| {
            b.iter(|| {
                let merged = merge_icons(black_box(data), &icons);
                black_box(merged.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let config = Config::default();
    let mut group = c.benchmark_group("layout");
    for nodes in [50, 500] {
        let diagram = parse_flowchart(&dense_flowchart_source(nodes, nodes));
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &diagram, |b, diagram| {
            b.iter(|| {
                let rects = place(black_box(diagram), &config.layout);
                black_box(rects.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let config = Config::default();
    let adjustments = parse_adjustments(
        r#"[
            {"type": "moveNode", "nodeId": "N1", "x": 4, "y": 5},
            {"type": "changeNodeStyle", "nodeId": "N2", "fill": "70AD47"},
            {"type": "addNode", "nodeId": "Extra", "text": "Extra", "x": 2, "y": 6},
            {"type": "addConnector", "fromId": "N0", "toId": "Extra"}
        ]"#,
    )
    .expect("adjustments parse");
    let mut group = c.benchmark_group("end_to_end");
    for nodes in [20, 100] {
        let input = dense_flowchart_source(nodes, nodes);
        let icons = dense_icons(nodes);
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &input, |b, data| {
            b.iter(|| {
                let diagram = parse_flowchart(black_box(data));
                let mut registry = Registry::new(config.theme.clone(), config.layout.clone());
                registry.build_from_diagram(&diagram, &icons);
                let report = apply(&mut registry, &adjustments).expect("apply failed");
                black_box((registry.len(), report.applied));
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_merge_icons, bench_layout, bench_end_to_end
);
criterion_main!(benches);
