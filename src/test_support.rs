//! Host-side test fixtures: an in-memory [`BlockDevice`] over a `Vec<u8>`, and a builder for a
//! byte-for-byte synthetic ext2 image.
//!
//! The teacher (`fzboot`) carries no `#[cfg(test)]` suite of its own — it is a bare-metal kernel
//! with no host-testable harness for its filesystem code, and its sibling `maestro` repo in this
//! pack instead runs a custom `#[test_case]` in-kernel test runner unsuited to host-side iteration.
//! This module instead follows `other_examples/...GalHorowitz-ExploreOS__shared-ext2_parser...`'s
//! pattern of pulling `std`'s `Vec` into an otherwise `no_std` crate's test-only code, which is the
//! practical way to exercise a `no_std` traversal engine against synthetic images on the host.
//!
//! `std`-only; never compiled outside `#[cfg(test)]` (see the `extern crate std;` in `lib.rs`).

use std::vec;
use std::vec::Vec;

use crate::device::BlockDevice;
use crate::err::DeviceError;
use crate::units::SECTOR_SIZE;

/// A [`BlockDevice`] backed by a flat in-memory image. Reads past the end of the image fail with
/// [`DeviceError::Io`] rather than panicking, the same failure mode a real controller reports for
/// a read past the end of the card.
pub struct MemDevice {
    image: Vec<u8>,
}

impl MemDevice {
    pub fn new(image: Vec<u8>) -> Self {
        MemDevice { image }
    }
}

impl BlockDevice for MemDevice {
    fn read_sectors(&mut self, lba: u32, count: u16, dst: &mut [u8]) -> Result<(), DeviceError> {
        let start = lba as usize * SECTOR_SIZE as usize;
        let len = count as usize * SECTOR_SIZE as usize;
        let end = start
            .checked_add(len)
            .ok_or(DeviceError::Io { lba })?;
        if end > self.image.len() || dst.len() < len {
            return Err(DeviceError::Io { lba });
        }
        dst[..len].copy_from_slice(&self.image[start..end]);
        Ok(())
    }
}

/// Byte size of one filesystem block for every fixture this builder produces (1024 bytes, i.e.
/// `block_size == 2` sectors — the only block size this crate supports).
const BLOCK_BYTES: u32 = 1024;

/// Partition table slot and starting LBA used by every fixture, matching scenario 2 of
/// `SPEC_FULL.md` §8 (`part_offset=2048`).
const PART_OFFSET: u32 = 2048;

const INODES_PER_GROUP: u32 = 2048;
const BLOCKS_PER_GROUP: u32 = 8192;
const INODE_SIZE: u32 = 128;

/// Fixed block number of the group descriptor table (block 2) and the inode table (block 5),
/// mirroring the single-group layout `mke2fs` would produce for an image this small.
const GROUP_DESCRIPTOR_BLOCK: u32 = 2;
const INODE_TABLE_BLOCK: u32 = 5;

/// A synthetic disk image plus the partition LBA it was built at, ready to hand to [`MemDevice`].
pub struct Fixture {
    pub image: Vec<u8>,
    pub part_offset: u32,
}

fn ensure_len(buf: &mut Vec<u8>, len: usize) {
    if buf.len() < len {
        buf.resize(len, 0);
    }
}

fn put_u16(buf: &mut Vec<u8>, off: usize, v: u16) {
    ensure_len(buf, off + 2);
    buf[off..off + 2].copy_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, off: usize, v: u32) {
    ensure_len(buf, off + 4);
    buf[off..off + 4].copy_from_slice(&v.to_le_bytes());
}

/// Absolute byte offset of filesystem block `block` within `image`, given a partition starting at
/// `part_offset` sectors and the fixed 1024-byte (2-sector) block size.
fn abs_byte_off(part_offset: u32, block: u32) -> usize {
    part_offset as usize * SECTOR_SIZE as usize + block as usize * BLOCK_BYTES as usize
}

/// Writes an inode record for `inode_num` (assumed to live in group 0, which every fixture here
/// satisfies since `INODES_PER_GROUP` is far larger than any inode number a test uses) with the
/// given size and direct block list. `blocks` must be at most 12 entries; fixtures built by this
/// module never need single- or double-indirect levels.
fn write_inode(image: &mut Vec<u8>, part_offset: u32, inode_num: u32, size: u32, blocks: &[u32]) {
    assert!(blocks.len() <= 12, "fixture builder only places direct blocks");
    let index_in_group = inode_num - 1;
    let off = abs_byte_off(part_offset, INODE_TABLE_BLOCK) + (INODE_SIZE * index_in_group) as usize;
    ensure_len(image, off + 128);
    put_u32(image, off + 0x4, size);
    for (i, &b) in blocks.iter().enumerate() {
        put_u32(image, off + 0x28 + i * 4, b);
    }
}

/// Appends one directory entry record (inode, rec_len, name_len, name) to `dir`, rounding
/// `rec_len` up to a multiple of 4 the way `mke2fs` does (not required by the scanner, but keeps
/// fixtures looking like real ext2 directory blocks).
fn append_dir_entry(dir: &mut Vec<u8>, inode: u32, name: &[u8]) {
    let name_len = name.len() as u16;
    let rec_len = (((8 + name.len()) + 3) / 4 * 4) as u16;
    let start = dir.len();
    dir.resize(start + rec_len as usize, 0);
    dir[start..start + 4].copy_from_slice(&inode.to_le_bytes());
    dir[start + 4..start + 6].copy_from_slice(&rec_len.to_le_bytes());
    dir[start + 6..start + 8].copy_from_slice(&name_len.to_le_bytes());
    dir[start + 8..start + 8 + name.len()].copy_from_slice(name);
}

/// Builds a minimal but complete ext2 image: MBR with a single bootable partition at
/// `part_offset=2048`, a one-group superblock with 1024-byte blocks, a root directory (`.`, `..`,
/// then one entry per `files` item) and one inode plus data blocks per file.
///
/// Each file's contents must fit in 12 direct blocks (<= 12288 bytes); this builder never
/// allocates indirect blocks. Use [`crate::blockmap`]'s own test fixtures directly for exercising
/// single-/double-indirect traversal.
pub fn build_minimal_ext2_image(files: &[(&str, &[u8])]) -> Fixture {
    let mut image = vec![0u8; 512];

    image[446] = 0x80; // bootable
    image[446 + 8..446 + 12].copy_from_slice(&PART_OFFSET.to_le_bytes());
    image[510] = 0x55;
    image[511] = 0xAA;

    let n = files.len() as u32;
    let max_inode_num = if n == 0 { 2 } else { 11 + n };
    let inode_table_blocks = {
        let max_index = max_inode_num - 1;
        let end_byte = (max_index + 1) * INODE_SIZE;
        (end_byte + BLOCK_BYTES - 1) / BLOCK_BYTES
    };
    assert!(
        inode_table_blocks <= 64,
        "fixture has more inodes than this builder's fixed layout reserves room for"
    );

    let root_dir_block = INODE_TABLE_BLOCK + inode_table_blocks;
    let mut next_block = root_dir_block + 1;

    let mut file_blocks: Vec<(u32, u32)> = Vec::new();
    for (_, data) in files {
        let nblocks = core::cmp::max(1, (data.len() as u32 + BLOCK_BYTES - 1) / BLOCK_BYTES);
        assert!(nblocks <= 12, "fixture builder only places direct blocks");
        file_blocks.push((next_block, nblocks));
        next_block += nblocks;
    }
    let total_blocks = next_block;

    let sb_off = abs_byte_off(PART_OFFSET, 1);
    ensure_len(&mut image, sb_off + 1024);
    put_u32(&mut image, sb_off + 0x4, total_blocks);
    put_u32(&mut image, sb_off + 0x18, 0); // s_log_block_size == 0 => 1024-byte blocks
    put_u32(&mut image, sb_off + 0x20, BLOCKS_PER_GROUP);
    put_u32(&mut image, sb_off + 0x28, INODES_PER_GROUP);
    image[sb_off + 0x38] = 0x53;
    image[sb_off + 0x39] = 0xEF;
    put_u16(&mut image, sb_off + 0x58, INODE_SIZE as u16);
    put_u32(&mut image, sb_off + 0x60, 0);

    let bg_off = abs_byte_off(PART_OFFSET, GROUP_DESCRIPTOR_BLOCK);
    ensure_len(&mut image, bg_off + 32);
    put_u32(&mut image, bg_off + 0x8, INODE_TABLE_BLOCK);

    write_inode(&mut image, PART_OFFSET, 2, BLOCK_BYTES, &[root_dir_block]);

    for (i, (_, data)) in files.iter().enumerate() {
        let inode_num = 12 + i as u32;
        let (first_block, nblocks) = file_blocks[i];
        let blocks: Vec<u32> = (0..nblocks).map(|b| first_block + b).collect();
        write_inode(&mut image, PART_OFFSET, inode_num, data.len() as u32, &blocks);

        for (b_idx, &block_num) in blocks.iter().enumerate() {
            let off = abs_byte_off(PART_OFFSET, block_num);
            ensure_len(&mut image, off + BLOCK_BYTES as usize);
            let start = b_idx * BLOCK_BYTES as usize;
            let end = core::cmp::min(start + BLOCK_BYTES as usize, data.len());
            if start < data.len() {
                image[off..off + (end - start)].copy_from_slice(&data[start..end]);
            }
        }
    }

    let mut dir_buf = Vec::new();
    append_dir_entry(&mut dir_buf, 2, b".");
    append_dir_entry(&mut dir_buf, 2, b"..");
    for (i, (name, _)) in files.iter().enumerate() {
        append_dir_entry(&mut dir_buf, 12 + i as u32, name.as_bytes());
    }
    let dir_off = abs_byte_off(PART_OFFSET, root_dir_block);
    ensure_len(&mut image, dir_off + BLOCK_BYTES as usize);
    image[dir_off..dir_off + dir_buf.len()].copy_from_slice(&dir_buf);

    ensure_len(&mut image, abs_byte_off(PART_OFFSET, total_blocks));

    Fixture {
        image,
        part_offset: PART_OFFSET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dir;
    use crate::inode;
    use crate::superblock::Superblock;

    #[test]
    fn fixture_mounts_and_exposes_root_directory() {
        let fixture = build_minimal_ext2_image(&[("hello.txt", b"hi there")]);
        let mut device = MemDevice::new(fixture.image);

        let mut sb_scratch = [0u8; 1024];
        device
            .read_sectors(fixture.part_offset + 2, 2, &mut sb_scratch)
            .unwrap();
        let sb = Superblock::decode(fixture.part_offset, &sb_scratch).unwrap();
        assert_eq!(sb.part_offset, PART_OFFSET);
        assert_eq!(sb.block_size.0, 2);

        let mut scratch = [0u8; 512];
        let info = inode::locate(&mut device, &sb, 2, &mut scratch).unwrap();
        assert_eq!(info.size, BLOCK_BYTES);

        let mut dir_buf = [0u8; 1024];
        device
            .read_sectors(
                sb.part_offset + info.block_map[0] * sb.block_size.0,
                sb.block_size.0 as u16,
                &mut dir_buf,
            )
            .unwrap();

        assert_eq!(dir::lookup(&dir_buf, 1024, b"."), Some(2));
        assert_eq!(dir::lookup(&dir_buf, 1024, b".."), Some(2));
        assert_eq!(dir::lookup(&dir_buf, 1024, b"hello.txt"), Some(12));
    }
}
