//! Error types for the ext2 reader.
//!
//! One enum per subsystem, following the convention used throughout the rest of the loader: each
//! failure domain gets its own small `Debug` enum rather than a single flat error type. There is no
//! `alloc`-backed `Exception(Box<dyn ...>)` escape hatch here, unlike the boxed errors used
//! elsewhere in the loader — this crate never links `alloc`, so every variant is a concrete,
//! stack-sized value.

/// Marker trait implemented by every error type in this crate, mirroring the loader-wide
/// `BaseError` convention (`Debug`-bounded, no behavior of its own beyond identifying a type as
/// part of the error taxonomy).
pub trait BaseError: core::fmt::Debug {}

/// Errors raised by the block device collaborator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeviceError {
    /// The device failed to come up (controller bring-up, clock configuration, ...).
    Init,

    /// A sector read starting at `lba` failed.
    Io { lba: u32 },
}

impl BaseError for DeviceError {}

/// Errors raised while parsing the MBR and selecting a partition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MbrError {
    /// Bytes 510/511 of the MBR were not 0x55, 0xAA.
    BadSignature,

    /// No partition entry examined had the bootable flag set and a valid ext2 superblock.
    NoBootablePartition,
}

impl BaseError for MbrError {}

/// Errors raised while decoding an ext2 superblock.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SuperblockError {
    /// `s_magic` did not read 0xEF53.
    BadMagic,

    /// `s_feature_incompat` was nonzero; the mask is preserved for diagnostics.
    UnsupportedFeature(u32),

    /// The decoded block size (in 512-byte sectors) exceeded the configured limit.
    BlockSizeTooLarge(u16),
}

impl BaseError for SuperblockError {}

/// Errors raised while resolving a name to an inode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DirError {
    /// No entry in the scanned directory matched the requested name.
    NotFound,
}

impl BaseError for DirError {}

/// Top-level error returned by [`crate::load::load_ext2`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadError {
    Device(DeviceError),
    Mbr(MbrError),
    Superblock(SuperblockError),

    /// None of the configured artifacts could be resolved and loaded.
    NoArtifactLoaded,
}

impl BaseError for LoadError {}

impl From<DeviceError> for LoadError {
    fn from(e: DeviceError) -> Self {
        LoadError::Device(e)
    }
}

impl From<MbrError> for LoadError {
    fn from(e: MbrError) -> Self {
        LoadError::Mbr(e)
    }
}

impl From<SuperblockError> for LoadError {
    fn from(e: SuperblockError) -> Self {
        LoadError::Superblock(e)
    }
}
