//! Shared helpers for the integration tests.
//!
//! Token builders, sample records of the builtin types and an
//! encode-then-decode helper, imported by every test crate via `mod common;`.

#![allow(dead_code)]

use dxf_entity_codec::codec::{decode, encode, Decoded};
use dxf_entity_codec::io::dxf::SliceTokens;
use dxf_entity_codec::schema::{catalog, EntitySchema};
use dxf_entity_codec::{DxfVersion, Handle, Point3, Record, Token, Value};

// ===========================================================================
// Token builders
// ===========================================================================

/// Tokens from `(code, value)` pairs, numbered as they would be in a file
pub fn tokens(pairs: &[(i32, &str)]) -> Vec<Token> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, (code, value))| Token::at(*code, *value, 2 * i + 1))
        .collect()
}

/// `(code, value)` view of a token run, for exact-sequence assertions
pub fn pairs(tokens: &[Token]) -> Vec<(i32, &str)> {
    tokens.iter().map(|t| (t.code, t.value.as_str())).collect()
}

/// Codes of a token run
pub fn codes(tokens: &[Token]) -> Vec<i32> {
    tokens.iter().map(|t| t.code).collect()
}

/// Values written under `code`, in order
pub fn values_of(tokens: &[Token], code: i32) -> Vec<&str> {
    tokens
        .iter()
        .filter(|t| t.code == code)
        .map(|t| t.value.as_str())
        .collect()
}

// ===========================================================================
// Decode / encode helpers
// ===========================================================================

/// Decode one record body given as pairs
pub fn decode_pairs(schema: &EntitySchema, version: DxfVersion, body: &[(i32, &str)]) -> Decoded {
    let body = tokens(body);
    let mut source = SliceTokens::new(&body).terminated();
    decode(&mut source, schema, version).expect("record body should decode")
}

/// Decode the tokens of an encoded record, skipping its `0 TYPE` token
pub fn decode_encoded(schema: &EntitySchema, version: DxfVersion, encoded: &[Token]) -> Decoded {
    assert_eq!(encoded[0].code, 0, "encoded record must start with its type");
    assert_eq!(encoded[0].value, schema.name());
    let mut source = SliceTokens::new(&encoded[1..]).terminated();
    decode(&mut source, schema, version).expect("encoded record should decode")
}

/// Encode a record and decode the result
pub fn round_trip(record: &Record, schema: &EntitySchema, version: DxfVersion) -> Record {
    let encoded = encode(record, schema, version).expect("record should encode");
    decode_encoded(schema, version, &encoded).record
}

// ===========================================================================
// Sample records
// ===========================================================================

/// A 3DFACE with four distinct corners
pub fn sample_face(handle: u64) -> Record {
    let mut record = Record::new(&catalog::face3d());
    record.set("handle", Handle::new(handle));
    record.set("layer", "WALLS");
    record.set("first_corner", Point3::new(0.0, 0.0, 0.0));
    record.set("second_corner", Point3::new(10.0, 0.0, 0.0));
    record.set("third_corner", Point3::new(10.0, 5.0, 2.5));
    record.set("fourth_corner", Point3::new(0.0, 5.0, 2.5));
    record
}

/// A STYLE table entry named `name`
pub fn sample_style(name: &str) -> Record {
    let mut record = Record::new(&catalog::text_style());
    record.set("style_name", name);
    record
}

/// A SPLINE with `n` control points and a uniform knot vector
pub fn sample_spline(n: usize) -> Record {
    let mut record = Record::new(&catalog::spline());
    record.set("handle", Handle::new(0x40));
    record.set("number_of_knots", (n + 4) as i64);
    record.set("number_of_control_points", n as i64);
    record.set(
        "knot_values",
        (0..n + 4).map(|k| Value::Double(k as f64)).collect::<Vec<_>>(),
    );
    record.set(
        "control_points",
        (0..n).map(|i| Point3::new(i as f64, 1.5 * i as f64, 0.0)).collect::<Vec<_>>(),
    );
    record
}

/// A LAYER_INDEX naming `layers`
pub fn sample_layer_index(layers: &[&str]) -> Record {
    let mut record = Record::new(&catalog::layer_index());
    record.set("handle", Handle::new(0x80));
    record.set(
        "layer_names",
        layers.iter().map(|l| Value::from(*l)).collect::<Vec<_>>(),
    );
    record
}
