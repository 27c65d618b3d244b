//! Sanity checks on the first byte of codec artifacts.
//!
//! An encoded stream starts with `0011 E RRR`: the `0x3` nibble is a
//! signature, `E` is set for the simple variant and clear for the
//! contextual one, and `RRR` counts the unused bits of the final byte.
//! A coding table starts with one bit naming its variant (1 = contextual).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::compressor::CodingVariant;
use crate::error::Result;

const SIGNATURE_MASK: u8 = 0xF0;
const SIGNATURE: u8 = 0x30;
const SIMPLE_BIT: u8 = 1 << 3;
const REMAINDER_MASK: u8 = 0x07;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub variant: CodingVariant,
    /// Unused bits in the last byte of the stream.
    pub padding_bits: u8,
}

impl StreamHeader {
    /// Returns `None` when the signature nibble is missing.
    pub fn parse(byte: u8) -> Option<Self> {
        if byte & SIGNATURE_MASK != SIGNATURE {
            return None;
        }
        let variant = if byte & SIMPLE_BIT != 0 {
            CodingVariant::Simple
        } else {
            CodingVariant::Contextual
        };
        Some(StreamHeader {
            variant,
            padding_bits: byte & REMAINDER_MASK,
        })
    }

    /// Payload length in bits for a stream of `file_len` bytes.
    pub fn payload_bits(&self, file_len: u64) -> u64 {
        (file_len.saturating_sub(1) * 8).saturating_sub(u64::from(self.padding_bits))
    }
}

/// Variant a coding table was written for.
pub fn table_variant(first_byte: u8) -> CodingVariant {
    if first_byte & 0x80 != 0 {
        CodingVariant::Contextual
    } else {
        CodingVariant::Simple
    }
}

/// What the artifacts of one encode call say about themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inspection {
    pub stream: Option<StreamHeader>,
    pub table: Option<CodingVariant>,
}

impl Inspection {
    /// Number of artifacts whose header disagrees with `expected`.
    pub fn mismatches(&self, expected: CodingVariant) -> usize {
        let stream_bad = self.stream.map_or(true, |h| h.variant != expected);
        let table_bad = self.table.map_or(true, |v| v != expected);
        usize::from(stream_bad) + usize::from(table_bad)
    }
}

fn first_byte(path: &Path) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    let n = File::open(path)?.read(&mut buf)?;
    Ok((n == 1).then_some(buf[0]))
}

/// Reads the leading byte of an encoded stream and its coding table.
pub fn inspect(stream: &Path, table: &Path) -> Result<Inspection> {
    Ok(Inspection {
        stream: first_byte(stream)?.and_then(StreamHeader::parse),
        table: first_byte(table)?.map(table_variant),
    })
}
