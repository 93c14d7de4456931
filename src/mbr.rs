//! MBR (_Master Boot Record_) partition table handling.
//!
//! Legacy structure used to store partition information on hard drives, stored on the first
//! logical block of the device. Only the classic 4-entry layout is handled; GPT is out of scope
//! for this loader.

use crate::bytes::read_u32_le;
use crate::err::MbrError;

/// Byte offset of the first partition entry within the MBR sector.
const PARTITION_TABLE_OFFSET: usize = 446;

/// Size in bytes of a single partition table entry.
const ENTRY_SIZE: usize = 16;

/// Number of partition entries in a classic MBR.
const ENTRY_COUNT: usize = 4;

/// Offset of the boot signature's first byte; the second byte immediately follows.
const SIGNATURE_OFFSET: usize = 510;

/// A single entry of the MBR partition table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MbrPartitionEntry {
    /// Set from bit 7 of the entry's status byte.
    pub bootable: bool,

    /// Starting LBA of the partition, in 512-byte sectors.
    pub start_lba: u32,
}

impl MbrPartitionEntry {
    fn from_bytes(entry: &[u8]) -> Self {
        MbrPartitionEntry {
            bootable: entry[0] & 0x80 != 0,
            start_lba: read_u32_le(entry, 8),
        }
    }
}

/// A parsed MBR partition table: all four slots, in on-disk order.
#[derive(Clone, Copy, Debug)]
pub struct MbrPartitionTable {
    entries: [MbrPartitionEntry; ENTRY_COUNT],
}

impl MbrPartitionTable {
    /// Parses a 512-byte sector believed to be the device's first sector.
    ///
    /// Validates the 0x55, 0xAA boot signature; does not otherwise validate the entries (a
    /// partition with `bootable == false` or `start_lba == 0` is still returned, it is simply not
    /// selected by the mount driver).
    pub fn parse(sector0: &[u8]) -> Result<Self, MbrError> {
        if sector0.len() < 512 {
            return Err(MbrError::BadSignature);
        }
        if sector0[SIGNATURE_OFFSET] != 0x55 || sector0[SIGNATURE_OFFSET + 1] != 0xAA {
            return Err(MbrError::BadSignature);
        }

        let mut entries = [MbrPartitionEntry {
            bootable: false,
            start_lba: 0,
        }; ENTRY_COUNT];

        for (i, slot) in entries.iter_mut().enumerate() {
            let off = PARTITION_TABLE_OFFSET + i * ENTRY_SIZE;
            *slot = MbrPartitionEntry::from_bytes(&sector0[off..off + ENTRY_SIZE]);
        }

        Ok(MbrPartitionTable { entries })
    }

    /// Returns all four partition entries, in on-disk order.
    pub fn entries(&self) -> &[MbrPartitionEntry; ENTRY_COUNT] {
        &self.entries
    }

    /// Returns the first entry (by index) whose bootable flag is set.
    ///
    /// This is the simplified "pick the first bootable slot" selection described for the MBR
    /// selector in isolation. The load driver itself does not call this directly: it walks the
    /// entries one at a time so a bootable-but-corrupt partition doesn't abort the whole scan (see
    /// [`crate::load::load_ext2`]).
    pub fn first_bootable(&self) -> Result<(usize, MbrPartitionEntry), MbrError> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.bootable)
            .map(|(i, e)| (i, *e))
            .ok_or(MbrError::NoBootablePartition)
    }
}
