//! Read-only ext2 reader for a first-stage SD-card boot loader.
//!
//! Locates and loads a kernel image, a device tree blob and a supervisor binary out of an ext2
//! root directory into caller-supplied buffers, after parsing an MBR partition table and mounting
//! the first bootable partition holding a valid ext2 superblock. No writing, no journaling, no
//! extents, no block sizes above 1024 bytes — see `SPEC_FULL.md` for the full boundary.
//!
//! `#![no_std]`, no `alloc`: every buffer this crate touches is either caller-provided or a
//! fixed-size stack array, the way `flib`'s own `fs` module stays free of heap dependence.
#![no_std]

#[cfg(test)]
extern crate std;

pub mod block_group;
pub mod blockmap;
pub mod bytes;
pub mod config;
pub mod device;
pub mod diag;
pub mod dir;
pub mod err;
pub mod inode;
pub mod load;
pub mod mbr;
pub mod superblock;
pub mod units;

#[cfg(test)]
mod test_support;

pub use device::BlockDevice;
pub use diag::DiagnosticSink;
pub use err::LoadError;
pub use load::{load_ext2, LoadReport, LoadTargets};
