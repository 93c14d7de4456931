//! Inode location.
//!
//! Resolves an inode number to its 60-byte block map and its file size, following the group
//! descriptor to find the group's inode table and then indexing into it.

use crate::block_group::read_inode_table_block;
use crate::bytes::read_u32_le;
use crate::device::BlockDevice;
use crate::err::DeviceError;
use crate::superblock::Superblock;
use crate::units::SECTOR_SIZE;

/// An inode's 60-byte block map: 12 direct entries, then single-, double- and triple-indirect.
pub type BlockMap = [u32; 15];

/// Index of the single-indirect entry in [`BlockMap`].
pub const SINGLE_INDIRECT: usize = 12;
/// Index of the double-indirect entry in [`BlockMap`].
pub const DOUBLE_INDIRECT: usize = 13;
/// Index of the triple-indirect entry in [`BlockMap`].
pub const TRIPLE_INDIRECT: usize = 14;
/// Number of direct block entries at the front of a [`BlockMap`].
pub const DIRECT_COUNT: usize = 12;

/// Byte offset, within an inode record, of `i_size`.
const I_SIZE_OFFSET: usize = 0x4;
/// Byte offset, within an inode record, of `i_block` (the 60-byte block map).
const I_BLOCK_OFFSET: usize = 0x28;
/// Size of the block map field, in bytes.
const I_BLOCK_LEN: usize = 60;

/// The decoded subset of an inode record this reader needs: its size and its block map.
#[derive(Clone, Copy, Debug)]
pub struct InodeInfo {
    pub size: u32,
    pub block_map: BlockMap,
}

/// Locates inode `inode_num` and reads back its size and block map.
///
/// `sector_scratch` must be at least 512 bytes. Asserts that the 0x28..0x28+60 block-map field
/// does not cross the sector boundary, which holds for every `inode_size` this build accepts
/// (128 or 256 bytes against a 512-byte sector admits at most two inode starts per sector, and
/// each one's first 0x28+60=88 bytes fit within a single inode-sized slot well inside 512 bytes).
pub fn locate(
    device: &mut impl BlockDevice,
    sb: &Superblock,
    inode_num: u32,
    sector_scratch: &mut [u8],
) -> Result<InodeInfo, DeviceError> {
    debug_assert!(inode_num >= 1);
    debug_assert!(sector_scratch.len() >= 512);

    let group = (inode_num - 1) / sb.inodes_per_group;
    let index_in_group = (inode_num - 1) % sb.inodes_per_group;

    let inode_table_block = read_inode_table_block(device, sb, group, sector_scratch)?;

    let off_into_table = u32::from(sb.inode_size) * index_in_group;
    let abs_inode = (sb.part_offset + inode_table_block * sb.block_size.0) * SECTOR_SIZE
        + off_into_table;
    let sector_nr = abs_inode / SECTOR_SIZE;
    let off_into_sector = (abs_inode % SECTOR_SIZE) as usize;

    debug_assert!(off_into_sector + I_BLOCK_OFFSET + I_BLOCK_LEN <= 512);

    device.read_sectors(sector_nr, 1, &mut sector_scratch[..512])?;

    let size = read_u32_le(sector_scratch, off_into_sector + I_SIZE_OFFSET);

    let mut block_map = [0u32; 15];
    let map_base = off_into_sector + I_BLOCK_OFFSET;
    for (i, entry) in block_map.iter_mut().enumerate() {
        *entry = read_u32_le(sector_scratch, map_base + i * 4);
    }

    Ok(InodeInfo { size, block_map })
}
