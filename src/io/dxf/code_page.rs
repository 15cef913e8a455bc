//! `$DWGCODEPAGE` to text encoding resolution.

use encoding_rs::Encoding;

use crate::types::DxfVersion;

/// Code page names (lower case) and the closest `encoding_rs` encoding
static CODE_PAGES: &[(&str, &Encoding)] = &[
    ("ansi_874", encoding_rs::WINDOWS_874),
    ("ansi_932", encoding_rs::SHIFT_JIS),
    ("ansi_936", encoding_rs::GBK),
    ("gb2312", encoding_rs::GBK),
    ("ansi_949", encoding_rs::EUC_KR),
    ("korean", encoding_rs::EUC_KR),
    ("ansi_950", encoding_rs::BIG5),
    ("big5", encoding_rs::BIG5),
    ("ansi_1250", encoding_rs::WINDOWS_1250),
    ("dos852", encoding_rs::WINDOWS_1250),
    ("ansi_1251", encoding_rs::WINDOWS_1251),
    ("dos866", encoding_rs::IBM866),
    ("ansi_1252", encoding_rs::WINDOWS_1252),
    ("dos850", encoding_rs::WINDOWS_1252),
    ("iso8859-1", encoding_rs::WINDOWS_1252),
    ("ansi_1253", encoding_rs::WINDOWS_1253),
    ("ansi_1254", encoding_rs::WINDOWS_1254),
    ("ansi_1255", encoding_rs::WINDOWS_1255),
    ("ansi_1256", encoding_rs::WINDOWS_1256),
    ("ansi_1257", encoding_rs::WINDOWS_1257),
    ("ansi_1258", encoding_rs::WINDOWS_1258),
    ("iso8859-2", encoding_rs::ISO_8859_2),
    ("iso8859-5", encoding_rs::ISO_8859_5),
    ("iso8859-7", encoding_rs::ISO_8859_7),
    ("koi8-r", encoding_rs::KOI8_R),
];

/// Fallback encoding for non-UTF-8 bytes in a stream of `version` whose
/// header names `code_page`.
///
/// Returns `None` when no transcoding applies: AC1021 and later are always
/// UTF-8, as are streams declaring an ASCII/UTF-8 code page. Unrecognized
/// names fall back to Windows-1252.
pub fn encoding_for(version: DxfVersion, code_page: &str) -> Option<&'static Encoding> {
    if version.is_unicode() {
        return None;
    }
    let name = code_page.trim().to_ascii_lowercase().replace("iso_", "iso");
    if matches!(name.as_str(), "ascii" | "utf-8" | "utf8" | "unicode") {
        return None;
    }
    CODE_PAGES
        .iter()
        .find(|(page, _)| *page == name)
        .map(|(_, enc)| *enc)
        .or(Some(encoding_rs::WINDOWS_1252))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pages() {
        assert_eq!(encoding_for(DxfVersion::AC1015, "ANSI_1251"), Some(encoding_rs::WINDOWS_1251));
        assert_eq!(encoding_for(DxfVersion::AC1015, "iso_8859-2"), Some(encoding_rs::ISO_8859_2));
        assert_eq!(encoding_for(DxfVersion::AC1009, "ANSI_932"), Some(encoding_rs::SHIFT_JIS));
    }

    #[test]
    fn test_unicode_versions_ignore_code_page() {
        assert_eq!(encoding_for(DxfVersion::AC1021, "ANSI_1251"), None);
    }

    #[test]
    fn test_ascii_and_unknown() {
        assert_eq!(encoding_for(DxfVersion::AC1015, "ASCII"), None);
        assert_eq!(encoding_for(DxfVersion::AC1015, "SOMETHING"), Some(encoding_rs::WINDOWS_1252));
    }
}
