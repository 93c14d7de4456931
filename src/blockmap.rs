//! Block-map traversal engine.
//!
//! Walks a 60-byte ext2 block map through direct, single-indirect and double-indirect levels,
//! reading file data into a caller-provided destination buffer under a block budget. Triple
//! indirection is a non-goal: if it is needed, traversal stops and reports truncation instead of
//! reading further.

use crate::bytes::read_u32_le;
use crate::device::BlockDevice;
use crate::err::DeviceError;
use crate::inode::{BlockMap, DIRECT_COUNT, DOUBLE_INDIRECT, SINGLE_INDIRECT, TRIPLE_INDIRECT};
use crate::superblock::Superblock;

/// Result of a block-map traversal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReadOutcome {
    /// Number of blocks actually written into the destination buffer.
    pub blocks_read: u32,

    /// Set if a triple-indirect block was present but not followed (always true in that case,
    /// since triple indirection is a non-goal for this reader), or if the block budget ran out
    /// before the block map was exhausted.
    pub truncated: bool,

    /// Number of blocks the caller's budget could not accommodate: `max_block_count - blocks_read`
    /// at the point traversal stopped short, either because a triple-indirect block was present but
    /// unsupported, or because the budget ran out before the block map was exhausted. Zero unless
    /// `truncated` is set.
    pub blocks_dropped: u32,
}

fn block_bytes(sb: &Superblock) -> usize {
    sb.block_size.to_bytes().0 as usize
}

/// Reads a single filesystem block (`sb.block_size` sectors) at `block_num` into `dst`.
fn read_block(
    device: &mut impl BlockDevice,
    sb: &Superblock,
    block_num: u32,
    dst: &mut [u8],
) -> Result<(), DeviceError> {
    let lba = sb.part_offset + block_num * sb.block_size.0;
    device.read_sectors(lba, sb.block_size.0 as u16, dst)
}

/// Reads up to `count` blocks whose numbers are produced by `block_at(i)`, stopping (without
/// performing the read) at the first zero entry. Returns the number of blocks actually read.
fn read_block_list(
    device: &mut impl BlockDevice,
    sb: &Superblock,
    count: usize,
    block_at: impl Fn(usize) -> u32,
    dest: &mut [u8],
) -> Result<u32, DeviceError> {
    let bytes_per_block = block_bytes(sb);
    let mut read = 0u32;
    for i in 0..count {
        let block_num = block_at(i);
        if block_num == 0 {
            break;
        }
        let off = i * bytes_per_block;
        read_block(device, sb, block_num, &mut dest[off..off + bytes_per_block])?;
        read += 1;
    }
    Ok(read)
}

/// Reads through a single-indirect (`level == 1`) or double-indirect (`level == 2`) block.
///
/// `scratch` must hold at least `level` blocks; this function uses the slice
/// `scratch[(level-1)*block_bytes .. level*block_bytes]` for the block-number array it reads at
/// this level, leaving lower levels' slices free for their own recursive calls.
fn read_indirect(
    level: u8,
    device: &mut impl BlockDevice,
    sb: &Superblock,
    addr: u32,
    max_block_count: u32,
    scratch: &mut [u8],
    dest: &mut [u8],
) -> Result<u32, DeviceError> {
    if max_block_count == 0 {
        return Ok(0);
    }

    let bytes_per_block = block_bytes(sb);
    let level_off = (level as usize - 1) * bytes_per_block;
    read_block(device, sb, addr, &mut scratch[level_off..level_off + bytes_per_block])?;

    let max_entries = bytes_per_block / 4;

    if level == 1 {
        let count = core::cmp::min(max_entries as u32, max_block_count) as usize;
        read_block_list(
            device,
            sb,
            count,
            |i| read_u32_le(scratch, level_off + i * 4),
            dest,
        )
    } else {
        let mut blocks_read = 0u32;
        for i in 0..max_entries {
            if blocks_read >= max_block_count {
                break;
            }
            let child = read_u32_le(scratch, level_off + i * 4);
            if child == 0 {
                continue;
            }
            let remaining = max_block_count - blocks_read;
            let off = blocks_read as usize * bytes_per_block;
            let n = read_indirect(level - 1, device, sb, child, remaining, scratch, &mut dest[off..])?;
            blocks_read += n;
        }
        Ok(blocks_read)
    }
}

/// Reads at most `max_block_count` blocks of file data addressed by `block_map` into `dest`.
///
/// `indirect_scratch` must hold at least two blocks (`2 * sb.block_size * 512` bytes); it is used
/// only while resolving single- and double-indirect levels and must not alias `dest`.
pub fn read_contents(
    device: &mut impl BlockDevice,
    sb: &Superblock,
    block_map: &BlockMap,
    max_block_count: u32,
    indirect_scratch: &mut [u8],
    dest: &mut [u8],
) -> Result<ReadOutcome, DeviceError> {
    let bytes_per_block = block_bytes(sb);

    let direct_count = core::cmp::min(DIRECT_COUNT as u32, max_block_count) as usize;
    let mut blocks_read = read_block_list(device, sb, direct_count, |i| block_map[i], dest)?;

    let mut remaining = max_block_count.saturating_sub(blocks_read);
    if remaining == 0 || block_map[SINGLE_INDIRECT] == 0 {
        let truncated = remaining > 0 && block_map[SINGLE_INDIRECT] != 0;
        return Ok(ReadOutcome {
            blocks_read,
            truncated,
            blocks_dropped: if truncated { remaining } else { 0 },
        });
    }

    let off = blocks_read as usize * bytes_per_block;
    let n = read_indirect(
        1,
        device,
        sb,
        block_map[SINGLE_INDIRECT],
        remaining,
        indirect_scratch,
        &mut dest[off..],
    )?;
    blocks_read += n;

    remaining = max_block_count.saturating_sub(blocks_read);
    if remaining == 0 || block_map[DOUBLE_INDIRECT] == 0 {
        let truncated = remaining > 0 && block_map[DOUBLE_INDIRECT] != 0;
        return Ok(ReadOutcome {
            blocks_read,
            truncated,
            blocks_dropped: if truncated { remaining } else { 0 },
        });
    }

    let off = blocks_read as usize * bytes_per_block;
    let n = read_indirect(
        2,
        device,
        sb,
        block_map[DOUBLE_INDIRECT],
        remaining,
        indirect_scratch,
        &mut dest[off..],
    )?;
    blocks_read += n;

    remaining = max_block_count.saturating_sub(blocks_read);
    let truncated = remaining > 0 && block_map[TRIPLE_INDIRECT] != 0;

    Ok(ReadOutcome {
        blocks_read,
        truncated,
        blocks_dropped: if truncated { remaining } else { 0 },
    })
}
