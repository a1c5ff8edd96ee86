//! Keystream known-answer vector files.
//!
//! A file is a sequence of `name = value` lines. `#` starts a comment line.
//!
//! ```text
//! cipher = salsa20/20
//!
//! key = 80000000000000000000000000000000
//! IV = 0000000000000000
//! stream[0..63] = 4dfa5e48...
//! stream[448..511] = b3757037...
//! ```
//!
//! `cipher` applies to every following record. `key` opens a record; `IV`
//! and `stream[a..b]` (inclusive offsets, ascending) belong to the most
//! recent one.

use std::{fs, io, path::Path};

use streamlock_crypto::{BufferedCipher, CipherKind, KeyError};
use thiserror::Error;

/// Errors while reading or checking a vector file.
#[derive(Error, Debug)]
pub enum VectorError {
    /// Line is not of the form `name = value`
    #[error("line {line}: expected `name = value`")]
    MalformedLine {
        /// 1-based line number
        line: usize,
    },

    /// Field name is not recognised
    #[error("line {line}: unknown field `{field}`")]
    UnknownField {
        /// 1-based line number
        line: usize,
        /// Field name as written
        field: String,
    },

    /// `key` appears before any `cipher` line
    #[error("line {line}: record has no cipher")]
    MissingCipher {
        /// 1-based line number
        line: usize,
    },

    /// `IV` or `stream` appears before any `key` line
    #[error("line {line}: `{field}` outside a record")]
    OutsideRecord {
        /// 1-based line number
        line: usize,
        /// Field name
        field: String,
    },

    /// Cipher name not supported
    #[error("line {line}: {source}")]
    Cipher {
        /// 1-based line number
        line: usize,
        /// Parse failure
        source: KeyError,
    },

    /// Value is not valid hex
    #[error("line {line}: {source}")]
    Hex {
        /// 1-based line number
        line: usize,
        /// Decoding failure
        source: hex::FromHexError,
    },

    /// Range is malformed, empty, or before the previous range
    #[error("line {line}: bad stream range `{range}`")]
    BadRange {
        /// 1-based line number
        line: usize,
        /// Range as written
        range: String,
    },

    /// Hex length differs from the range length
    #[error("line {line}: range covers {expected} bytes, value has {actual}")]
    LengthMismatch {
        /// 1-based line number
        line: usize,
        /// Bytes covered by the range
        expected: u64,
        /// Bytes decoded
        actual: usize,
    },

    /// Key or IV rejected by the cipher
    #[error("invalid record: {0}")]
    Key(#[from] KeyError),

    /// Generated keystream differs from the file
    #[error("{cipher}: keystream mismatch in segment at offset {offset}")]
    Mismatch {
        /// Cipher under test
        cipher: CipherKind,
        /// First byte offset of the failing segment
        offset: u64,
    },

    /// File could not be read
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Expected keystream bytes starting at `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Stream offset of the first byte
    pub offset: u64,
    /// Expected bytes
    pub bytes: Vec<u8>,
}

/// One key/IV pair and its expected keystream segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorRecord {
    /// Cipher the record targets
    pub cipher: CipherKind,
    /// Key bytes
    pub key: Vec<u8>,
    /// IV bytes
    pub iv: Vec<u8>,
    /// Expected segments, in ascending offset order
    pub segments: Vec<Segment>,
}

impl VectorRecord {
    /// Generate the keystream through [`BufferedCipher`] and compare every
    /// segment. Gaps between segments are skipped, not extracted.
    ///
    /// # Errors
    ///
    /// - `VectorError::Key` if the cipher rejects the key or IV
    /// - `VectorError::Mismatch` for the first segment that differs
    pub fn verify(&self) -> Result<(), VectorError> {
        let mut cipher = BufferedCipher::new(self.cipher.session(&self.key, &self.iv)?);
        let mut position = 0u64;
        let mut actual = Vec::new();

        for segment in &self.segments {
            cipher.skip(segment.offset - position);
            actual.resize(segment.bytes.len(), 0);
            cipher.extract(&mut actual);
            position = segment.offset + segment.bytes.len() as u64;

            if actual != segment.bytes {
                tracing::warn!(cipher = %self.cipher, offset = segment.offset, "keystream mismatch");
                return Err(VectorError::Mismatch { cipher: self.cipher, offset: segment.offset });
            }
        }
        Ok(())
    }
}

/// Parse the text of a vector file.
///
/// # Errors
///
/// Any syntax problem, reported with its line number.
pub fn parse(text: &str) -> Result<Vec<VectorRecord>, VectorError> {
    let mut records: Vec<VectorRecord> = Vec::new();
    let mut cipher: Option<CipherKind> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        let Some((name, value)) = raw.split_once('=') else {
            return Err(VectorError::MalformedLine { line });
        };
        let (name, value) = (name.trim(), value.trim());

        match name {
            "cipher" => {
                let kind = value.parse::<CipherKind>().map_err(|source| VectorError::Cipher { line, source })?;
                cipher = Some(kind);
            },
            "key" => {
                let Some(kind) = cipher else {
                    return Err(VectorError::MissingCipher { line });
                };
                records.push(VectorRecord {
                    cipher: kind,
                    key: decode(line, value)?,
                    iv: Vec::new(),
                    segments: Vec::new(),
                });
            },
            "IV" | "iv" => {
                let record = current(&mut records, line, name)?;
                record.iv = decode(line, value)?;
            },
            _ if name.starts_with("stream[") && name.ends_with(']') => {
                let range = &name["stream[".len()..name.len() - 1];
                let bytes = decode(line, value)?;
                let record = current(&mut records, line, name)?;
                let next = segment(line, range, bytes, record.segments.last())?;
                record.segments.push(next);
            },
            _ => return Err(VectorError::UnknownField { line, field: name.to_string() }),
        }
    }

    tracing::debug!(records = records.len(), "parsed vector file");
    Ok(records)
}

/// Read and parse a vector file.
///
/// # Errors
///
/// `VectorError::Io` if the file cannot be read, otherwise as [`parse`].
pub fn load(path: impl AsRef<Path>) -> Result<Vec<VectorRecord>, VectorError> {
    parse(&fs::read_to_string(path)?)
}

fn current<'a>(
    records: &'a mut [VectorRecord],
    line: usize,
    field: &str,
) -> Result<&'a mut VectorRecord, VectorError> {
    records
        .last_mut()
        .ok_or_else(|| VectorError::OutsideRecord { line, field: field.to_string() })
}

fn decode(line: usize, value: &str) -> Result<Vec<u8>, VectorError> {
    hex::decode(value).map_err(|source| VectorError::Hex { line, source })
}

fn segment(
    line: usize,
    range: &str,
    bytes: Vec<u8>,
    previous: Option<&Segment>,
) -> Result<Segment, VectorError> {
    let bad = || VectorError::BadRange { line, range: range.to_string() };

    let (first, last) = range.split_once("..").ok_or_else(bad)?;
    let first: u64 = first.trim().parse().map_err(|_| bad())?;
    let last: u64 = last.trim().parse().map_err(|_| bad())?;
    if last < first {
        return Err(bad());
    }
    if previous.is_some_and(|p| first < p.offset + p.bytes.len() as u64) {
        return Err(bad());
    }

    let expected = (last - first).checked_add(1).ok_or_else(bad)?;
    if expected != bytes.len() as u64 {
        return Err(VectorError::LengthMismatch { line, expected, actual: bytes.len() });
    }
    Ok(Segment { offset: first, bytes })
}

#[cfg(test)]
mod tests {
    use streamlock_crypto::Salsa20Variant;

    use super::*;

    const SAMPLE: &str = "\
# comment
cipher = salsa20/20

key = 80000000000000000000000000000000
IV = 0000000000000000
stream[0..3] = 4dfa5e48
stream[448..451] = b3757037
";

    #[test]
    fn parses_records() {
        let records = parse(SAMPLE).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.cipher, CipherKind::Salsa20(Salsa20Variant::Salsa20_20));
        assert_eq!(record.key[0], 0x80);
        assert_eq!(record.iv, [0u8; 8]);
        assert_eq!(record.segments[1], Segment { offset: 448, bytes: vec![0xb3, 0x75, 0x70, 0x37] });
        record.verify().unwrap();
    }

    #[test]
    fn detects_wrong_keystream() {
        let text = SAMPLE.replace("b3757037", "b3757038");
        let err = parse(&text).unwrap().remove(0).verify().unwrap_err();
        assert!(matches!(err, VectorError::Mismatch { offset: 448, .. }));
    }

    #[test]
    fn reports_line_numbers() {
        let err = parse("cipher = rabbit\nkey = 00\nstream[0..1] = 00").unwrap_err();
        assert!(matches!(err, VectorError::LengthMismatch { line: 3, expected: 2, actual: 1 }));

        let err = parse("key = 00").unwrap_err();
        assert!(matches!(err, VectorError::MissingCipher { line: 1 }));

        let err = parse("cipher = rc4").unwrap_err();
        assert!(matches!(err, VectorError::Cipher { line: 1, .. }));

        let err = parse("cipher = rabbit\nIV = 00").unwrap_err();
        assert!(matches!(err, VectorError::OutsideRecord { line: 2, .. }));

        let err = parse("cipher = rabbit\nkey = zz").unwrap_err();
        assert!(matches!(err, VectorError::Hex { line: 2, .. }));

        let err = parse("cipher = rabbit\nnonsense").unwrap_err();
        assert!(matches!(err, VectorError::MalformedLine { line: 2 }));

        let err = parse("cipher = rabbit\nkey = 00\nmac = 00").unwrap_err();
        assert!(matches!(err, VectorError::UnknownField { line: 3, .. }));
    }

    #[test]
    fn rejects_overlapping_ranges() {
        let text = "cipher = rabbit\nkey = 00\nstream[4..5] = 0000\nstream[5..5] = 00";
        assert!(matches!(parse(text).unwrap_err(), VectorError::BadRange { line: 4, .. }));

        let text = "cipher = rabbit\nkey = 00\nstream[5..4] = 00";
        assert!(matches!(parse(text).unwrap_err(), VectorError::BadRange { line: 3, .. }));
    }

    #[test]
    fn bad_key_length_surfaces_on_verify() {
        let records = parse("cipher = hc-128\nkey = 00\nIV = 00").unwrap();
        assert!(matches!(records[0].verify().unwrap_err(), VectorError::Key(_)));
    }
}
