use bridgekit_postprocessor::rewrite;
use bridgekit_settings::BridgeSettings;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_job(layers: usize, moves_per_layer: usize) -> Vec<String> {
    let mut e = 0.0;
    (0..layers)
        .map(|layer| {
            let mut lines = vec![format!(";LAYER:{}", layer), ";TYPE:WALL-OUTER".to_string()];
            for i in 0..moves_per_layer {
                if i % 10 == 0 {
                    lines.push(";BRIDGE".to_string());
                }
                if i % 10 == 5 {
                    lines.push(";MESH:part".to_string());
                }
                e += 0.05;
                lines.push(format!("G1 F1800 X{:.3} Y{:.3} E{:.5}", i as f64 * 0.4, layer as f64, e));
            }
            lines.push(";TIME_ELAPSED:1.0".to_string());
            lines.join("\n")
        })
        .collect()
}

fn bench_rewrite(c: &mut Criterion) {
    let job = synthetic_job(200, 500);
    let settings = BridgeSettings::default();

    c.bench_function("rewrite_200_layers", |b| {
        b.iter(|| rewrite(black_box(job.as_slice()), black_box(&settings)))
    });
}

criterion_group!(benches, bench_rewrite);
criterion_main!(benches);
