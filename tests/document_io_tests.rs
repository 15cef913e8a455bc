//! Integration tests for whole-file DXF reading and writing

mod common;

use common::*;
use dxf_entity_codec::codec::EncoderConfiguration;
use dxf_entity_codec::io::dxf::{DxfReader, DxfReaderConfiguration, DxfWriter, OutputProfile};
use dxf_entity_codec::{DxfDocument, DxfError, DxfVersion, Handle, NotificationType, Point3};
use std::io::Cursor;

fn read_bytes(bytes: Vec<u8>, config: DxfReaderConfiguration) -> dxf_entity_codec::Result<DxfDocument> {
    DxfReader::from_reader(Cursor::new(bytes))
        .with_configuration(config)
        .read()
}

fn sample_document(version: DxfVersion) -> DxfDocument {
    let mut doc = DxfDocument::new(version);
    doc.add(sample_style("Standard")).unwrap();
    doc.add(sample_face(0x20)).unwrap();
    doc.add(sample_spline(4)).unwrap();
    doc.add(sample_face(0x21)).unwrap();
    doc.add(sample_layer_index(&["0", "WALLS"])).unwrap();
    doc
}

/// Test that DxfReader cannot be created from a non-existent file
#[test]
fn test_dxf_reader_from_nonexistent_file() {
    let result = DxfReader::from_file("nonexistent.dxf");
    assert!(result.is_err(), "Should fail to open non-existent file");
}

#[test]
fn test_document_round_trip() {
    let doc = sample_document(DxfVersion::AC1032);
    let bytes = DxfWriter::new(doc.clone()).write_to_vec().unwrap();

    let read = read_bytes(bytes, DxfReaderConfiguration::default()).unwrap();
    assert_eq!(read.version, DxfVersion::AC1032);
    assert!(read.notifications.is_empty(), "{:?}", read.notifications);
    assert_eq!(read.tables, doc.tables);
    assert_eq!(read.entities, doc.entities);
    assert_eq!(read.objects, doc.objects);
    assert_eq!(read.record_count(), 5);
    assert_eq!(
        read.find_by_handle(Handle::new(0x21)).unwrap().get_point("second_corner"),
        Some(Point3::new(10.0, 0.0, 0.0))
    );
}

#[test]
fn test_written_layout() {
    let doc = sample_document(DxfVersion::AC1015);
    let text = String::from_utf8(DxfWriter::new(doc).write_to_vec().unwrap()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[..6], ["  0", "SECTION", "  2", "HEADER", "  9", "$ACADVER"]);
    assert_eq!(lines[7], "AC1015");
    assert!(text.contains("  0\nTABLE\n  2\nSTYLE\n 70\n1\n  0\nSTYLE\n"));
    assert!(text.contains("  0\nENDTAB\n  0\nENDSEC\n"));
    assert!(text.ends_with("  0\nEOF\n"));
    assert!(!text.contains('\r'));
}

#[test]
fn test_legacy_profile_reads_back() {
    let doc = sample_document(DxfVersion::AC1015);
    let config = EncoderConfiguration::default().with_format(OutputProfile::legacy());
    let bytes = DxfWriter::new(doc.clone())
        .with_configuration(config)
        .write_to_vec()
        .unwrap();
    assert!(bytes.windows(2).any(|w| w == b"\r\n"));

    let read = read_bytes(bytes, DxfReaderConfiguration::default()).unwrap();
    assert_eq!(read.entities, doc.entities);
}

#[test]
fn test_writer_profile_sets_double_precision() {
    let doc = sample_document(DxfVersion::AC1015);
    let config = EncoderConfiguration::default()
        .with_format(OutputProfile::default().with_double_precision(Some(3)));
    let text = String::from_utf8(
        DxfWriter::new(doc)
            .with_configuration(config)
            .write_to_vec()
            .unwrap(),
    )
    .unwrap();
    assert!(text.contains(" 11\n10.000\n 21\n0.000\n 31\n0.000\n"));
}

#[test]
fn test_line_break_in_text_is_refused() {
    let mut doc = DxfDocument::new(DxfVersion::AC1015);
    let mut style = sample_style("Standard");
    style.set("primary_font_file", "evil\n  0\nEOF");
    doc.add(style).unwrap();

    let err = DxfWriter::new(doc).write_to_vec().unwrap_err();
    assert!(matches!(err, DxfError::SchemaViolation { ref field, .. } if field == "primary_font_file"));
}

#[test]
fn test_write_older_version() {
    let mut doc = sample_document(DxfVersion::AC1032);
    doc.version = DxfVersion::AC1009;
    let text = String::from_utf8(DxfWriter::new(doc).write_to_vec().unwrap()).unwrap();
    assert!(text.contains("$ACADVER\n  1\nAC1009\n"));
    assert!(!text.contains("AcDbEntity"));
    assert!(!text.contains("{ACAD_"));

    let read = read_bytes(text.into_bytes(), DxfReaderConfiguration::default()).unwrap();
    assert_eq!(read.version, DxfVersion::AC1009);
    assert_eq!(read.entities.get("3DFACE").unwrap().len(), 2);
}

// ===========================================================================
// Hand-written streams
// ===========================================================================

const LINE_BETWEEN_FACES: &str = "  0
SECTION
  2
HEADER
  9
$ACADVER
  1
AC1018
  0
ENDSEC
  0
SECTION
  2
ENTITIES
  0
3DFACE
  5
A1
100
AcDbEntity
  8
0
100
AcDbFace
 10
0.0
 20
0.0
 30
0.0
  0
LINE
  5
A2
  8
0
 10
1.0
  0
3DFACE
  5
A3
  8
1
  0
ENDSEC
  0
EOF
";

#[test]
fn test_unsupported_record_skipped() {
    let doc = read_bytes(LINE_BETWEEN_FACES.as_bytes().to_vec(), DxfReaderConfiguration::default()).unwrap();
    assert_eq!(doc.version, DxfVersion::AC1018);
    let faces = doc.entities.get("3DFACE").unwrap();
    assert_eq!(faces.len(), 2);
    assert_eq!(faces.get(1).unwrap().get_text("layer"), Some("1"));
    assert!(doc.find_by_handle(Handle::new(0xA2)).is_none());

    let skipped = doc.notifications.of_type(NotificationType::NotImplemented);
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].message.contains("LINE"));
}

const MALFORMED: &str = "  0
SECTION
  2
ENTITIES
  0
3DFACE
  8
0
xyz
1
  0
ENDSEC
  0
EOF
";

#[test]
fn test_malformed_stream_strict_and_failsafe() {
    let err = read_bytes(MALFORMED.as_bytes().to_vec(), DxfReaderConfiguration::default()).unwrap_err();
    assert!(matches!(err, DxfError::MalformedToken { line: 9, .. }));

    let config = DxfReaderConfiguration::default().with_failsafe(true);
    let doc = read_bytes(MALFORMED.as_bytes().to_vec(), config).unwrap();
    assert!(doc.notifications.has_type(NotificationType::Warning));
}

#[test]
fn test_missing_version_uses_default() {
    let text = "  0\nSECTION\n  2\nENTITIES\n  0\n3DFACE\n  8\nX\n  0\nENDSEC\n  0\nEOF\n";
    let config = DxfReaderConfiguration::default().with_default_version(DxfVersion::AC1012);
    let doc = read_bytes(text.as_bytes().to_vec(), config).unwrap();
    assert_eq!(doc.version, DxfVersion::AC1012);
    assert_eq!(doc.entities.record_count(), 1);
}

#[test]
fn test_unknown_version_is_an_error() {
    let text = "  0\nSECTION\n  2\nHEADER\n  9\n$ACADVER\n  1\nAC9999\n  0\nENDSEC\n  0\nEOF\n";
    let err = read_bytes(text.as_bytes().to_vec(), DxfReaderConfiguration::default()).unwrap_err();
    assert!(matches!(err, DxfError::UnsupportedVersion(_)));
}

#[test]
fn test_code_page_decodes_legacy_text() {
    let mut bytes = b"  0\nSECTION\n  2\nHEADER\n  9\n$ACADVER\n  1\nAC1015\n  9\n$DWGCODEPAGE\n  3\nANSI_1251\n  0\nENDSEC\n  0\nSECTION\n  2\nENTITIES\n  0\n3DFACE\n  8\n".to_vec();
    // "Стены" in Windows-1251
    bytes.extend_from_slice(&[0xD1, 0xF2, 0xE5, 0xED, 0xFB]);
    bytes.extend_from_slice(b"\n  0\nENDSEC\n  0\nEOF\n");

    let doc = read_bytes(bytes, DxfReaderConfiguration::default()).unwrap();
    assert_eq!(doc.code_page.as_deref(), Some("ANSI_1251"));
    let face = doc.entities.get("3DFACE").unwrap().get(0).unwrap();
    assert_eq!(face.get_text("layer"), Some("Стены"));

    // The code page is written back
    let text = String::from_utf8(DxfWriter::new(doc).write_to_vec().unwrap()).unwrap();
    assert!(text.contains("$DWGCODEPAGE\n  3\nANSI_1251\n"));
}

#[test]
fn test_destroy_document() {
    let doc = sample_document(DxfVersion::AC1032);
    assert_eq!(doc.destroy(), 5);
}
