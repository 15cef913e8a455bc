use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use dxf_entity_codec::codec::{decode, decode_parallel, encode, DecoderConfiguration};
use dxf_entity_codec::io::dxf::SliceTokens;
use dxf_entity_codec::schema::{catalog, SchemaRegistry};
use dxf_entity_codec::{DxfVersion, Handle, Point3, Record, Token, Value};

fn spline_record(control_points: usize) -> Record {
    let schema = catalog::spline();
    let mut record = Record::new(&schema);
    record.set("handle", Handle::new(0x2F));
    record.set("layer", "CURVES");
    record.set("number_of_control_points", control_points as i64);
    let knots: Vec<Value> = (0..control_points + 4).map(|k| Value::Double(k as f64)).collect();
    record.set("knot_values", knots);
    let points: Vec<Point3> = (0..control_points)
        .map(|i| Point3::new(i as f64, (i * i) as f64 * 0.5, 0.0))
        .collect();
    record.set("control_points", points);
    record
}

fn face_stream(count: usize) -> Vec<Token> {
    let schema = catalog::face3d();
    let mut tokens = Vec::new();
    for i in 0..count {
        let mut record = Record::new(&schema);
        record.set("handle", Handle::new(i as u64 + 1));
        record.set("first_corner", Point3::new(i as f64, 0.0, 0.0));
        record.set("second_corner", Point3::new(i as f64 + 1.0, 0.0, 0.0));
        record.set("third_corner", Point3::new(i as f64 + 1.0, 1.0, 0.0));
        record.set("fourth_corner", Point3::new(i as f64, 1.0, 0.0));
        tokens.extend(encode(&record, &schema, DxfVersion::AC1032).unwrap());
    }
    tokens
}

fn bench_encode(c: &mut Criterion) {
    let schema = catalog::spline();
    let record = spline_record(64);
    c.bench_function("encode_spline_64", |b| {
        b.iter(|| encode(black_box(&record), &schema, DxfVersion::AC1032).unwrap())
    });
}

fn bench_decode(c: &mut Criterion) {
    let schema = catalog::spline();
    let tokens = encode(&spline_record(64), &schema, DxfVersion::AC1032).unwrap();
    let body = &tokens[1..];
    c.bench_function("decode_spline_64", |b| {
        b.iter_batched(
            || SliceTokens::new(body).terminated(),
            |mut source| decode(&mut source, &schema, DxfVersion::AC1032).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

fn bench_decode_parallel(c: &mut Criterion) {
    let tokens = face_stream(10_000);
    let registry = SchemaRegistry::builtin();
    let config = DecoderConfiguration::default();
    c.bench_function("decode_parallel_faces_10k", |b| {
        b.iter(|| decode_parallel(black_box(&tokens), registry, DxfVersion::AC1032, &config).unwrap())
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_decode_parallel);
criterion_main!(benches);
