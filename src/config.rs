//! Compile-time configuration: the fixed artifact list the load driver resolves, and the tunable
//! resource limits the rest of the crate is built against.
//!
//! Declaring these as named constants rather than inlining them into [`crate::load::load_ext2`]
//! mirrors how the rest of the loader keeps feature tables and flag sets as named `const`s on
//! marker types instead of scattering literals through control flow.

/// One entry of the fixed set of files the load driver resolves from the root directory.
pub struct Artifact {
    /// ASCII, case-sensitive filename, as stored in the root directory. Length must be <= 255.
    pub name: &'static str,
}

/// Root-directory inode number, per the ext2 on-disk format.
pub const ROOT_INODE: u32 = 2;

/// Partition table slots the load driver probes, in order. The reference loader examines entries
/// 0, 1 and 2 only (not all four); see `SPEC_FULL.md` §9.
pub const PARTITION_PROBE_COUNT: usize = 3;

/// Upper bound on blocks read for the root directory itself.
pub const ROOT_DIR_MAX_BLOCKS: u32 = 1;

/// Per-artifact block budget used when loading `opensbi.bin`, `fdt` and `Image`.
///
/// The reference loader passes a generous fixed budget (`65535` blocks) to every file load rather
/// than sizing it from the caller's destination buffer; this build instead derives the budget from
/// the caller-supplied destination slice length for each artifact (see
/// [`crate::load::load_ext2`]), since destination buffers here are ordinary Rust slices with a
/// known length rather than raw pointers into an unbounded physical window.
pub const ARTIFACTS: [Artifact; 3] = [
    Artifact { name: "opensbi.bin" },
    Artifact { name: "fdt" },
    Artifact { name: "Image" },
];
