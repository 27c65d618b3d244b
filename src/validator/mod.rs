use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Result;

const CHUNK_SIZE: usize = 32 * 1024;

/// Byte-for-byte comparison of an original input and its decoded artifact.
///
/// A mismatch is `Ok(false)`; only failing to read either file is an error.
pub fn verify<P: AsRef<Path>, Q: AsRef<Path>>(original: P, decoded: Q) -> Result<bool> {
    let original = File::open(original)?;
    let decoded = File::open(decoded)?;
    if original.metadata()?.len() != decoded.metadata()?.len() {
        return Ok(false);
    }
    same_content(BufReader::new(original), BufReader::new(decoded))
}

/// Compares two streams chunk by chunk until both are exhausted.
pub fn same_content<A: Read, B: Read>(mut a: A, mut b: B) -> Result<bool> {
    let mut buf_a = vec![0u8; CHUNK_SIZE];
    let mut buf_b = vec![0u8; CHUNK_SIZE];
    loop {
        let n = read_full(&mut a, &mut buf_a)?;
        let m = read_full(&mut b, &mut buf_b)?;
        if n != m || buf_a[..n] != buf_b[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

// Fills `buf` unless the reader hits EOF first.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
