//! Block device collaborator.
//!
//! The real SD-card bring-up (`sunxi_mmc_init`/`mmc_bread` in the reference loader, raw `int 0x13`
//! BIOS calls in this loader's own x86 disk driver) lives outside this crate's scope. What the core
//! ext2 reader needs is a single narrow seam: read some whole number of 512-byte sectors starting
//! at an absolute LBA. Expressing it as a trait, rather than a pair of free functions, means the
//! traversal engine can be exercised in tests against an in-memory fixture instead of real
//! hardware.

use crate::err::DeviceError;

/// A block device that serves whole 512-byte sector reads.
///
/// Implementations are expected to be synchronous and blocking: `read_sectors` must not return
/// until the bytes are in `dst`, matching `mmc_bread`'s semantics in the reference loader.
pub trait BlockDevice {
    /// Reads exactly `count` sectors starting at absolute sector `lba` into `dst`.
    ///
    /// `dst` must be at least `count * 512` bytes long.
    fn read_sectors(&mut self, lba: u32, count: u16, dst: &mut [u8]) -> Result<(), DeviceError>;
}
