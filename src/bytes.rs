//! Little-endian field readers.
//!
//! Every on-disk structure this crate parses (MBR, ext2 superblock, group descriptor, inode,
//! directory entry) is a packed, unaligned, little-endian byte layout. The reference loader reads
//! these with a pointer-cast macro (`INAT(type, ptr, offset)`), which is undefined behavior in Rust
//! terms (alignment is not guaranteed, and nothing stops the compiler from assuming no aliasing
//! through a typed reference). Every field read in this crate instead goes through one of these
//! helpers, which only ever touch the byte slice.

/// Reads a little-endian `u16` at byte offset `off` in `buf`.
#[inline]
pub fn read_u16_le(buf: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([buf[off], buf[off + 1]])
}

/// Reads a little-endian `u32` at byte offset `off` in `buf`.
#[inline]
pub fn read_u32_le(buf: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}
