// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Codec capability interface.
//!
//! Each on-disk format plugs in through [`SwathCodec`]: decode bytes into a
//! canonical [`Record`], encode a record back into bytes, and report what it
//! can represent. The session layer never looks at a binary layout itself.
//!
//! Codec instances are created per session by a [`CodecFactory`] held in the
//! format registry, so a codec may keep per-file state (header fields, a
//! survey identifier) without any sharing between sessions.

pub mod cursor;
pub mod formats;

pub use cursor::ByteCursor;

use crate::core::{Record, RecordKind};

/// What a codec can represent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Record kinds the format can store.
    pub kinds: Vec<RecordKind>,
    /// Whether `decode(encode(r)) == r` holds for every supported kind.
    pub lossless: bool,
    /// Whether the format stores per-beam flags.
    pub beam_flagging: bool,
    /// Line-oriented text rather than binary.
    pub text: bool,
}

impl Capabilities {
    pub fn supports(&self, kind: RecordKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Failure to decode the bytes at the cursor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("truncated record: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    Checksum { stored: u32, computed: u32 },

    #[error("{0}")]
    Malformed(String),
}

/// Failure to encode a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("record kind {0} not supported")]
    UnsupportedKind(RecordKind),

    #[error("{0}")]
    Invalid(String),
}

/// Per-format decode/encode implementation.
pub trait SwathCodec: Send {
    /// What this codec can represent.
    fn capabilities(&self) -> &Capabilities;

    /// Decode the next record.
    ///
    /// Returns `Ok(None)` on clean end of input.
    fn decode(&mut self, cursor: &mut ByteCursor<'_>) -> Result<Option<Record>, DecodeError>;

    /// Append the encoding of `record` to `out`.
    fn encode(&mut self, record: &Record, out: &mut Vec<u8>) -> Result<(), EncodeError>;

    /// Advance past a record that failed to decode.
    ///
    /// The cursor is positioned at the start of the bad record. Text formats
    /// skip to the next line; binary formats skip one byte unless they
    /// override this with a sync search.
    fn resync(&mut self, cursor: &mut ByteCursor<'_>) {
        if self.capabilities().text {
            cursor.skip_line();
        } else {
            let _ = cursor.skip(1);
        }
    }

    /// Append any trailer bytes at close.
    fn finish(&mut self, _out: &mut Vec<u8>) -> Result<(), EncodeError> {
        Ok(())
    }
}

/// Factory for creating codec instances.
pub trait CodecFactory: Send + Sync {
    /// Create a fresh codec for one session.
    fn create(&self) -> Box<dyn SwathCodec>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LineCodec {
        caps: Capabilities,
    }

    impl SwathCodec for LineCodec {
        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        fn decode(&mut self, cursor: &mut ByteCursor<'_>) -> Result<Option<Record>, DecodeError> {
            Ok(cursor
                .read_line()
                .map(|line| Record::comment(String::from_utf8_lossy(line))))
        }

        fn encode(&mut self, record: &Record, out: &mut Vec<u8>) -> Result<(), EncodeError> {
            match record {
                Record::Comment { text } => {
                    out.extend_from_slice(text.as_bytes());
                    out.push(b'\n');
                    Ok(())
                }
                other => Err(EncodeError::UnsupportedKind(other.kind())),
            }
        }
    }

    fn line_codec() -> Box<dyn SwathCodec> {
        Box::new(LineCodec {
            caps: Capabilities {
                kinds: vec![RecordKind::Comment],
                lossless: true,
                beam_flagging: false,
                text: true,
            },
        })
    }

    struct LineFactory;

    impl CodecFactory for LineFactory {
        fn create(&self) -> Box<dyn SwathCodec> {
            line_codec()
        }
    }

    #[test]
    fn test_factory_creates_codec() {
        let factory: Box<dyn CodecFactory> = Box::new(LineFactory);
        let codec = factory.create();
        assert!(codec.capabilities().supports(RecordKind::Comment));
        assert!(!codec.capabilities().supports(RecordKind::Survey));
    }

    #[test]
    fn test_default_resync_skips_line() {
        let mut codec = line_codec();
        let data = b"bad line\ngood\n";
        let mut cursor = ByteCursor::new(data);
        codec.resync(&mut cursor);
        assert_eq!(
            codec.decode(&mut cursor).unwrap(),
            Some(Record::comment("good"))
        );
    }

    #[test]
    fn test_encode_rejects_unsupported_kind() {
        let mut codec = line_codec();
        let mut out = Vec::new();
        let err = codec
            .encode(&Record::Nav(Default::default()), &mut out)
            .unwrap_err();
        assert_eq!(err, EncodeError::UnsupportedKind(RecordKind::Nav));
        assert!(out.is_empty());
    }
}
