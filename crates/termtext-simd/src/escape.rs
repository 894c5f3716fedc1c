//! Block-wise introducer search for UTF-8 and UTF-16 buffers.
//!
//! The introducers are ESC (`0x1B`) and the C1 controls CSI (`0x9B`), OSC
//! (`0x9D`), DCS (`0x90`), SOS (`0x98`), PM (`0x9E`) and APC (`0x9F`).
//!
//! In UTF-16 a C1 control is a single code unit. In UTF-8 it is the two-byte
//! sequence `C2 xx`, and the reported offset is the `C2` lead byte, so a bare
//! continuation byte in `0x80..=0x9F` never counts as an introducer.

/// Units examined per fast-path block.
pub const BLOCK_UNITS: usize = 16;

/// UTF-16 superset filter: `(unit & MASK) == PATTERN` matches `0x10..=0x1F`
/// and `0x90..=0x9F`, which covers every introducer.
const UTF16_MASK: u16 = !0b1000_1111;
const UTF16_PATTERN: u16 = 0b0001_0000;

/// UTF-8 lead byte shared by every two-byte C1 control.
const C1_LEAD: u8 = 0xC2;

const ESC: u8 = 0x1B;

/// Whether `cp` is an introducer scalar.
#[inline]
#[must_use]
pub const fn is_introducer(cp: u32) -> bool {
    matches!(cp, 0x1B | 0x9B | 0x9D | 0x90 | 0x98 | 0x9E | 0x9F)
}

/// Whether `byte` is the second byte of a UTF-8 encoded C1 introducer.
#[inline]
#[must_use]
pub const fn is_c1_introducer_byte(byte: u8) -> bool {
    matches!(byte, 0x9B | 0x9D | 0x90 | 0x98 | 0x9E | 0x9F)
}

#[inline]
fn introducer_at_utf8(bytes: &[u8], at: usize) -> bool {
    match bytes.get(at) {
        Some(&ESC) => true,
        Some(&C1_LEAD) => bytes.get(at + 1).is_some_and(|&b| is_c1_introducer_byte(b)),
        _ => false,
    }
}

/// Reference definition: first offset `>= start` that begins an introducer.
#[must_use]
pub fn find_introducer_utf8_scalar(bytes: &[u8], start: usize) -> Option<usize> {
    (start..bytes.len()).find(|&i| introducer_at_utf8(bytes, i))
}

/// Reference definition for UTF-16 buffers.
#[must_use]
pub fn find_introducer_utf16_scalar(units: &[u16], start: usize) -> Option<usize> {
    units
        .get(start..)?
        .iter()
        .position(|&u| is_introducer(u32::from(u)))
        .map(|offset| start + offset)
}

// Branch-free folds so the block test compiles to vector compares.
#[inline]
fn block_may_hold_utf8(block: &[u8]) -> bool {
    block
        .iter()
        .fold(false, |acc, &b| acc | (b == ESC) | (b == C1_LEAD))
}

#[inline]
fn block_may_hold_utf16(block: &[u16]) -> bool {
    block
        .iter()
        .fold(false, |acc, &u| acc | ((u & UTF16_MASK) == UTF16_PATTERN))
}

/// Find the first introducer at or after `start` in UTF-8 `bytes`.
///
/// Equivalent to [`find_introducer_utf8_scalar`] for every input.
#[must_use]
pub fn find_introducer_utf8(bytes: &[u8], start: usize) -> Option<usize> {
    let tail = bytes.get(start..)?;
    let mut offset = start;
    let mut blocks = tail.chunks_exact(BLOCK_UNITS);
    for block in &mut blocks {
        if block_may_hold_utf8(block) {
            // A C2 lead in the last slot peeks into the next block; the
            // check reads from `bytes`, so that works unchanged.
            if let Some(found) =
                (offset..offset + BLOCK_UNITS).find(|&i| introducer_at_utf8(bytes, i))
            {
                return Some(found);
            }
        }
        offset += BLOCK_UNITS;
    }
    find_introducer_utf8_scalar(bytes, offset)
}

/// Find the first introducer at or after `start` in UTF-16 `units`.
///
/// Equivalent to [`find_introducer_utf16_scalar`] for every input.
#[must_use]
pub fn find_introducer_utf16(units: &[u16], start: usize) -> Option<usize> {
    let tail = units.get(start..)?;
    let mut offset = start;
    let mut blocks = tail.chunks_exact(BLOCK_UNITS);
    for block in &mut blocks {
        if block_may_hold_utf16(block)
            && let Some(pos) = block.iter().position(|&u| is_introducer(u32::from(u)))
        {
            return Some(offset + pos);
        }
        offset += BLOCK_UNITS;
    }
    blocks
        .remainder()
        .iter()
        .position(|&u| is_introducer(u32::from(u)))
        .map(|pos| offset + pos)
}
