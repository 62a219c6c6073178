//! Windows code page numbers and their `encoding_rs` decoders.
//!
//! Best-fit data names target bytes, not characters. Bytes missing from a
//! file's own MBTABLE are decoded with the code page's `encoding_rs`
//! decoder.

use encoding_rs::Encoding;

/// Code pages [`encoding_for_code_page`] knows, in ascending order.
pub const KNOWN_CODE_PAGES: &[u16] = &[
    866, 874, 932, 936, 949, 950, 1250, 1251, 1252, 1253, 1254, 1255, 1256, 1257, 1258, 10000,
    10007, 20866, 20932, 21866, 28591, 28592, 28593, 28594, 28595, 28596, 28597, 28598, 28600,
    28603, 28604, 28605, 28606, 38598, 54936,
];

/// Return the `encoding_rs` encoding for a Windows code page number.
///
/// Returns `None` for code pages with no single- or double-byte decoder in
/// `encoding_rs` (EBCDIC, UTF-7, UTF-8, ...).
pub fn encoding_for_code_page(code_page: u16) -> Option<&'static Encoding> {
    match code_page {
        866 => Some(encoding_rs::IBM866),
        874 => Some(encoding_rs::WINDOWS_874),

        // CJK double-byte
        932 => Some(encoding_rs::SHIFT_JIS),
        936 => Some(encoding_rs::GBK),
        949 => Some(encoding_rs::EUC_KR),
        950 => Some(encoding_rs::BIG5),
        20932 => Some(encoding_rs::EUC_JP),
        54936 => Some(encoding_rs::GB18030),

        1250 => Some(encoding_rs::WINDOWS_1250),
        1251 => Some(encoding_rs::WINDOWS_1251),
        // ISO-8859-1 decodes as windows-1252 in encoding_rs
        1252 | 28591 => Some(encoding_rs::WINDOWS_1252),
        1253 => Some(encoding_rs::WINDOWS_1253),
        1254 => Some(encoding_rs::WINDOWS_1254),
        1255 => Some(encoding_rs::WINDOWS_1255),
        1256 => Some(encoding_rs::WINDOWS_1256),
        1257 => Some(encoding_rs::WINDOWS_1257),
        1258 => Some(encoding_rs::WINDOWS_1258),

        10000 => Some(encoding_rs::MACINTOSH),
        10007 => Some(encoding_rs::X_MAC_CYRILLIC),
        20866 => Some(encoding_rs::KOI8_R),
        21866 => Some(encoding_rs::KOI8_U),

        28592 => Some(encoding_rs::ISO_8859_2),
        28593 => Some(encoding_rs::ISO_8859_3),
        28594 => Some(encoding_rs::ISO_8859_4),
        28595 => Some(encoding_rs::ISO_8859_5),
        28596 => Some(encoding_rs::ISO_8859_6),
        28597 => Some(encoding_rs::ISO_8859_7),
        28598 => Some(encoding_rs::ISO_8859_8),
        28600 => Some(encoding_rs::ISO_8859_10),
        28603 => Some(encoding_rs::ISO_8859_13),
        28604 => Some(encoding_rs::ISO_8859_14),
        28605 => Some(encoding_rs::ISO_8859_15),
        28606 => Some(encoding_rs::ISO_8859_16),
        38598 => Some(encoding_rs::ISO_8859_8_I),

        _ => None,
    }
}

/// Find the Windows code page for an encoding label such as `"latin2"` or
/// `"shift_jis"`.
///
/// Labels are resolved with [`Encoding::for_label`]. Several code pages can
/// share an encoding; the lowest number wins, so `"iso-8859-1"` gives 1252.
pub fn code_page_for_label(label: &str) -> Option<u16> {
    let encoding = Encoding::for_label(label.as_bytes())?;
    KNOWN_CODE_PAGES
        .iter()
        .copied()
        .find(|&cp| encoding_for_code_page(cp) == Some(encoding))
}

/// Decode one target byte sequence to a single character.
///
/// Values up to 0xFF are one byte; larger values are a lead byte followed by
/// a trail byte. Returns `None` if the bytes are invalid in `encoding` or do
/// not decode to exactly one character.
pub fn decode_target(bytes: u16, encoding: &'static Encoding) -> Option<char> {
    let raw = bytes.to_be_bytes();
    let sequence = if raw[0] == 0 { &raw[1..] } else { &raw[..] };
    let decoded = encoding.decode_without_bom_handling_and_without_replacement(sequence)?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}
