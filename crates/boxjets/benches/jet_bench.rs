//! Criterion benchmarks for jet construction and payload assembly.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use boxjets::api::{draw_annotations, AnnotationCfg, BoxParams, Jet, Point, ReplayToken};

fn annotated_jet(n: usize, seed: u64) -> Jet {
    let bx = BoxParams::new(100.0, 200.0, 12.0, 60.0, 0.4);
    let start = Point::new(95.0, 230.0);
    let end = Point::new(110.0, 170.0);
    let cfg = AnnotationCfg {
        count: n,
        ..AnnotationCfg::default()
    };
    let anns = draw_annotations(start, end, bx, cfg, ReplayToken { seed, index: 0 });
    let cluster = anns.iter().map(|a| a.bx).collect();
    let mut jet = Jet::new(1, start, end, bx, cluster).expect("valid box");
    for a in &anns {
        jet.add_box_extract(a.bx.cx, a.bx.cy, a.bx.width, a.bx.height, a.bx.angle.to_degrees());
        jet.add_start_extract(a.start.x, a.start.y);
        jet.add_end_extract(a.end.x, a.end.y);
    }
    jet.set_sigma(1.0);
    jet
}

fn bench_jet(c: &mut Criterion) {
    let mut group = c.benchmark_group("jet");
    group.bench_function("construct", |b| {
        let bx = BoxParams::new(100.0, 200.0, 12.0, 60.0, 0.4);
        b.iter(|| Jet::new(1, Point::new(95.0, 230.0), Point::new(110.0, 170.0), bx, Vec::new()))
    });
    for &n in &[5usize, 20, 80] {
        group.bench_with_input(BenchmarkId::new("render_payload", n), &n, |b, &n| {
            b.iter_batched(
                || annotated_jet(n, 11),
                |jet| {
                    let _p = jet.render_payload(true);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_jet);
criterion_main!(benches);
