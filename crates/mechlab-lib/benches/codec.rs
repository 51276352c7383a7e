use criterion::{criterion_group, criterion_main, Criterion};
use mechlab_lib::{Database, Loadout, LoadoutCoderV3};
use once_cell::sync::Lazy;
use std::hint::black_box;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/catalog.json")
}

static DATABASE: Lazy<Database> =
    Lazy::new(|| Database::from_path(&fixture_path()).expect("fixture loads"));
static STANDARD: Lazy<Loadout> =
    Lazy::new(|| DATABASE.stock_loadout(2000).expect("stock hunchback"));
static OMNI: Lazy<Loadout> = Lazy::new(|| DATABASE.stock_loadout(2300).expect("stock timber wolf"));

fn benchmark_codec(c: &mut Criterion) {
    let coder = LoadoutCoderV3::with_embedded_table(&DATABASE).expect("coder builds");

    c.bench_function("encode_standard_stock", |b| {
        b.iter(|| black_box(coder.encode(&STANDARD).expect("encodes")));
    });

    c.bench_function("encode_omni_stock", |b| {
        b.iter(|| black_box(coder.encode(&OMNI).expect("encodes")));
    });

    let standard_bytes = coder.encode(&STANDARD).expect("encodes");
    c.bench_function("decode_standard_stock", |b| {
        b.iter(|| {
            let (loadout, errors) = coder.decode(&standard_bytes).expect("decodes");
            black_box((loadout.mass(), errors.len()))
        });
    });

    let omni_bytes = coder.encode(&OMNI).expect("encodes");
    c.bench_function("decode_omni_stock", |b| {
        b.iter(|| {
            let (loadout, errors) = coder.decode(&omni_bytes).expect("decodes");
            black_box((loadout.mass(), errors.len()))
        });
    });

    c.bench_function("build_embedded_code", |b| {
        b.iter(|| black_box(LoadoutCoderV3::with_embedded_table(&DATABASE).expect("coder builds")));
    });
}

criterion_group!(benches, benchmark_codec);
criterion_main!(benches);
