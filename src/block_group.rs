//! Block-group descriptor access.
//!
//! Each block group has a 32-byte descriptor; this reader only ever needs one field from it
//! (`bg_inode_table`), since bitmaps, free counts and checksums are write-path or allocator
//! concerns that are out of scope for a read-only loader.

use crate::device::BlockDevice;
use crate::err::DeviceError;
use crate::superblock::Superblock;
use crate::units::SECTOR_SIZE;

/// Byte offset, within a 32-byte group descriptor, of the inode table's starting block number.
const BG_INODE_TABLE_OFFSET: usize = 0x8;

/// Size in bytes of one group descriptor.
pub const DESCRIPTOR_SIZE: usize = 32;

/// Block (not sector) at which the group descriptor table begins.
///
/// Fixed at block 2 for this build: with the 1024-byte block size this loader is restricted to
/// (see [`crate::superblock::MAX_BLOCK_SIZE_SECTORS`]), the superblock occupies block 1 and the
/// descriptor table starts at block 2. A build supporting larger block sizes would instead start
/// the table at block 1 (superblock and block 0 share the first block); that branch is not needed
/// here and is not implemented.
const GROUP_DESCRIPTOR_TABLE_START_BLOCK: u32 = 2;

/// Reads group descriptor number `group` and returns its `bg_inode_table` field (the block number
/// at which that group's inode table begins).
///
/// `sector_scratch` must be at least 512 bytes; only one sector is ever read, since a 32-byte
/// descriptor can cross at most one sector boundary is not possible here (32 divides 512) but the
/// read still needs the whole sector to locate the descriptor's offset within it.
pub fn read_inode_table_block(
    device: &mut impl BlockDevice,
    sb: &Superblock,
    group: u32,
    sector_scratch: &mut [u8],
) -> Result<u32, DeviceError> {
    debug_assert!(sector_scratch.len() >= 512);

    let off_absolute = SECTOR_SIZE
        * (sb.part_offset + GROUP_DESCRIPTOR_TABLE_START_BLOCK * sb.block_size.0)
        + (DESCRIPTOR_SIZE as u32) * group;
    let sector_number = off_absolute / SECTOR_SIZE;
    let off_into_sector = (off_absolute % SECTOR_SIZE) as usize;

    device.read_sectors(sector_number, 1, &mut sector_scratch[..512])?;

    Ok(crate::bytes::read_u32_le(
        sector_scratch,
        off_into_sector + BG_INODE_TABLE_OFFSET,
    ))
}
