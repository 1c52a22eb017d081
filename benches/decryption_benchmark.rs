use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use qrc_processor::{LyricNormalizer, QrcCodec};

const MAIN_QRC_HEX: &str = include_str!("../tests/test_data/main_qrc.hex");
const TRANS_LRC_HEX: &str = include_str!("../tests/test_data/trans_lrc.hex");

fn benchmark_decryption(c: &mut Criterion) {
    let mut group = c.benchmark_group("QRC Decryption");

    group.measurement_time(Duration::from_secs(10));

    group.bench_function("codec_setup", |b| {
        b.iter(|| black_box(QrcCodec::new()));
    });

    let main_qrc_hex = MAIN_QRC_HEX.trim();
    let trans_lrc_hex = TRANS_LRC_HEX.trim();

    let codec = QrcCodec::new();
    group.bench_function("decrypt_main_qrc", |b| {
        b.iter(|| {
            let text = codec
                .decrypt_lyrics(black_box(main_qrc_hex))
                .expect("样本解密失败");
            black_box(text);
        });
    });

    let normalizer = LyricNormalizer::new();
    group.bench_function("normalize_with_translation", |b| {
        b.iter(|| {
            let lrc = normalizer.normalize(black_box(main_qrc_hex), black_box(Some(trans_lrc_hex)));
            black_box(lrc);
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_decryption);

criterion_main!(benches);
