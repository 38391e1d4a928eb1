//! Numeric codepage identifiers and their byte encodings.
//!
//! Schemas name encodings by Windows codepage number. The flat side and
//! the XML side of a conversion may use different codepages; both are
//! fixed at schema load time.

/// Windows-1252 mappings for the 0x80–0x9F range.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// A byte encoding identified by its numeric codepage.
///
/// Decoding is lossy (undecodable bytes become the replacement
/// character) and encoding substitutes `?` for unrepresentable
/// characters, matching the converter this codec is modeled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codepage {
    /// Codepage 65001.
    Utf8,
    /// Codepage 20127 (US-ASCII).
    Ascii,
    /// Codepage 28591 (ISO 8859-1).
    Latin1,
    /// Codepage 1252 (Windows Western European).
    Windows1252,
}

impl Codepage {
    /// Resolves a numeric codepage identifier.
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            65001 => Some(Self::Utf8),
            20127 => Some(Self::Ascii),
            28591 => Some(Self::Latin1),
            1252 => Some(Self::Windows1252),
            _ => None,
        }
    }

    /// The numeric identifier of this codepage.
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            Self::Utf8 => 65001,
            Self::Ascii => 20127,
            Self::Latin1 => 28591,
            Self::Windows1252 => 1252,
        }
    }

    /// Decodes bytes into text, replacing undecodable input.
    #[must_use]
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Ascii => bytes
                .iter()
                .map(|&b| if b < 0x80 { b as char } else { '\u{FFFD}' })
                .collect(),
            Self::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            Self::Windows1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => WINDOWS_1252_HIGH[(b - 0x80) as usize],
                    _ => b as char,
                })
                .collect(),
        }
    }

    /// Encodes text into bytes, substituting `?` for unrepresentable chars.
    #[must_use]
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
            Self::Latin1 => text
                .chars()
                .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
                .collect(),
            Self::Windows1252 => text
                .chars()
                .map(|c| {
                    let cp = c as u32;
                    if cp < 0x80 || (0xA0..=0xFF).contains(&cp) {
                        cp as u8
                    } else if let Some(i) = WINDOWS_1252_HIGH.iter().position(|&t| t == c) {
                        0x80 + i as u8
                    } else {
                        b'?'
                    }
                })
                .collect(),
        }
    }
}

impl Default for Codepage {
    fn default() -> Self {
        Self::Utf8
    }
}
