use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qari_audio::Waveform;
use qari_voiceprint::{
    DIMENSION, FeatureExtractor, Fingerprint, FingerprintDatabase, Matcher, MfccExtractor,
    ReciterRecord, cosine_distance,
};

fn make_tone(freq_hz: f64, seconds: f64, sample_rate: u32) -> Waveform {
    let n = (seconds * sample_rate as f64) as usize;
    let samples = (0..n)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (0.5 * (freq_hz * 2.0 * std::f64::consts::PI * t).sin()) as f32
        })
        .collect();
    Waveform::new(samples, sample_rate, 1)
}

fn pseudo_fingerprint(seed: usize) -> Fingerprint {
    let mut v = [0.0f32; DIMENSION];
    for (i, x) in v.iter_mut().enumerate() {
        *x = (((seed * 31 + i * 17) % 97) as f32 - 48.0) * 0.5;
    }
    Fingerprint::new(v)
}

fn bench_extract_1s(c: &mut Criterion) {
    let extractor = MfccExtractor::new();
    let wave = make_tone(220.0, 1.0, 22050);

    c.bench_function("voiceprint_mfcc_extract_1s_22k", |b| {
        b.iter(|| {
            let _ = black_box(extractor.extract(black_box(&wave)));
        });
    });
}

fn bench_extract_10s(c: &mut Criterion) {
    let extractor = MfccExtractor::new();
    let wave = make_tone(220.0, 10.0, 44100);

    c.bench_function("voiceprint_mfcc_extract_10s_44k", |b| {
        b.iter(|| {
            let _ = black_box(extractor.extract(black_box(&wave)));
        });
    });
}

fn bench_cosine(c: &mut Criterion) {
    let a = pseudo_fingerprint(1);
    let b = pseudo_fingerprint(2);

    c.bench_function("voiceprint_cosine_13d", |bench| {
        bench.iter(|| {
            let _ = black_box(cosine_distance(black_box(a.as_slice()), black_box(b.as_slice())));
        });
    });
}

fn bench_find_best_1000(c: &mut Criterion) {
    let mut db = FingerprintDatabase::default();
    for i in 0..1000 {
        db.push(
            ReciterRecord::new(format!("reciter-{i}"), "u", "s"),
            pseudo_fingerprint(i),
        );
    }
    let query = pseudo_fingerprint(4242);
    let matcher = Matcher::new();

    c.bench_function("voiceprint_find_best_1000", |b| {
        b.iter(|| {
            let _ = black_box(matcher.find_best(black_box(&query), &db));
        });
    });
}

criterion_group!(
    benches,
    bench_extract_1s,
    bench_extract_10s,
    bench_cosine,
    bench_find_best_1000,
);
criterion_main!(benches);
