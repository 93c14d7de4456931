//! Type-tagged units for sizes that the reference loader expresses as bare `u32`/`u16` and mixes
//! freely between 512-byte sectors and bytes. Tagging the unit at the type level means a call site
//! can no longer silently pass a sector count where a byte count is expected.

/// A count of 512-byte device sectors.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct SectorCount(pub u32);

/// A count of bytes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Bytes(pub u32);

/// Native sector size of the block device, in bytes.
pub const SECTOR_SIZE: u32 = 512;

impl SectorCount {
    pub const fn to_bytes(self) -> Bytes {
        Bytes(self.0 * SECTOR_SIZE)
    }
}

impl Bytes {
    pub const fn to_sectors_ceil(self) -> SectorCount {
        SectorCount((self.0 + SECTOR_SIZE - 1) / SECTOR_SIZE)
    }
}

impl core::ops::Add for SectorCount {
    type Output = SectorCount;
    fn add(self, rhs: SectorCount) -> SectorCount {
        SectorCount(self.0 + rhs.0)
    }
}

impl core::ops::Mul<u32> for SectorCount {
    type Output = SectorCount;
    fn mul(self, rhs: u32) -> SectorCount {
        SectorCount(self.0 * rhs)
    }
}
