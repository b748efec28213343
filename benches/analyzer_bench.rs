use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use teapick::analyzer::PickingAnalyzer;
use teapick::landmarks::HandLandmarkSet;
use teapick::provider::{Frame, LandmarkProvider, SyntheticParams, SyntheticProvider};
use teapick::session::SharedAnalyzer;

fn recorded_hands() -> Vec<HandLandmarkSet> {
    let mut provider = SyntheticProvider::new(SyntheticParams {
        cycles: 20,
        ..Default::default()
    });
    std::iter::from_fn(|| provider.next_frame())
        .filter_map(|f: Frame| f.primary_hand().map(|h| h.landmarks))
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let hands = recorded_hands();

    c.bench_function("analyze_600_frames", |b| {
        b.iter(|| {
            let mut analyzer = PickingAnalyzer::new();
            for hand in &hands {
                black_box(analyzer.analyze(Some(black_box(hand)), None));
            }
            analyzer.get_statistics()
        })
    });

    c.bench_function("shared_analyze_600_frames", |b| {
        b.iter(|| {
            let session = SharedAnalyzer::new(PickingAnalyzer::new());
            for hand in &hands {
                black_box(session.analyze(Some(black_box(hand)), None));
            }
            session.get_statistics()
        })
    });
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
