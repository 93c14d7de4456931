//! Top-level load driver.
//!
//! Sequential phases: read the MBR, pick a partition, decode its superblock, read the root
//! directory, then resolve and load each configured artifact. There is no state machine beyond
//! this fixed sequence; each phase transition and error is reported through a [`DiagnosticSink`].

use crate::blockmap::{self, ReadOutcome};
use crate::config::{ARTIFACTS, PARTITION_PROBE_COUNT, ROOT_DIR_MAX_BLOCKS, ROOT_INODE};
use crate::device::BlockDevice;
use crate::diag::DiagnosticSink;
use crate::dir;
use crate::err::{LoadError, MbrError};
use crate::inode::{self, BlockMap};
use crate::mbr::MbrPartitionTable;
use crate::superblock::Superblock;

/// Caller-supplied destination buffers for the three artifacts this build resolves.
///
/// Each buffer doubles as the scratch region used while locating the corresponding inode (see
/// [`read_inode_contents`]), so every buffer here must be at least 512 bytes long just to serve as
/// that scratch. Reading any actual file data requires a full filesystem block (1024 bytes) of
/// destination space, since [`budget_for`] floor-divides the buffer length by the block size — a
/// buffer between 512 and 1023 bytes locates the inode successfully but yields a zero-block budget
/// and loads nothing.
pub struct LoadTargets<'a> {
    /// Destination for the `Image` file — corresponds to `uboot_base` in the reference loader's
    /// entry point, which is used to carry the kernel image.
    pub kernel: &'a mut [u8],
    /// Destination for `opensbi.bin`.
    pub opensbi: &'a mut [u8],
    /// Destination for `fdt`.
    pub dtb: &'a mut [u8],
}

/// Result of a successful [`load_ext2`] call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LoadReport {
    pub kernel_len: usize,
    pub opensbi_len: usize,
    pub dtb_len: usize,

    /// Always 0: OP-TEE is not resolved by this build.
    pub optee_base: u32,
    /// Always 0: the secure monitor is not resolved by this build.
    pub monitor_base: u32,
    /// Always 0: no RTOS image is resolved by this build.
    pub rtos_base: u32,
    /// Always `None`: no command line is produced by this build.
    pub cmdline: Option<&'static str>,
}

/// Reads inode `inode_num`'s block map and contents, reusing `dest` itself as the scratch buffer
/// for the inode-table lookup before overwriting it with real file data.
///
/// Mirrors `ext2_read_inode_contents` in the reference loader, which passes its own destination
/// buffer in as the scratch for `ext2_read_inode_block_map`. `dest` must be at least 512 bytes.
fn read_inode_contents(
    device: &mut impl BlockDevice,
    sb: &Superblock,
    inode_num: u32,
    max_block_count: u32,
    indirect_scratch: &mut [u8],
    dest: &mut [u8],
) -> Result<(u32, ReadOutcome), LoadError> {
    debug_assert!(dest.len() >= 512);

    let info = inode::locate(device, sb, inode_num, dest).map_err(LoadError::Device)?;
    let outcome = blockmap::read_contents(device, sb, &info.block_map, max_block_count, indirect_scratch, dest)
        .map_err(LoadError::Device)?;

    Ok((info.size, outcome))
}

/// Block map of an inode already located, for callers that split locate/read themselves. Exposed
/// mainly so [`BlockMap`] stays a visible part of this module's public surface for doc purposes.
#[allow(dead_code)]
type _BlockMapAlias = BlockMap;

fn block_bytes(sb: &Superblock) -> usize {
    sb.block_size.to_bytes().0 as usize
}

/// Floor-divides `dest_len` by `bytes_per_block`: a partial block at the end of `dest` is never
/// counted, since `blockmap::read_contents` always writes whole blocks and a budget that rounded up
/// would let it write past the end of a destination shorter than a full block.
fn budget_for(dest_len: usize, bytes_per_block: usize) -> u32 {
    (dest_len / bytes_per_block) as u32
}

/// Resolves `name` in the root directory and loads it into `dest`.
///
/// Returns `None` (after reporting through `diag`) if the name can't be found, if `dest` is too
/// small to serve as inode-lookup scratch, or if any I/O along the way fails — per-file resolution
/// failures do not abort the overall load (see `SPEC_FULL.md` §7).
fn load_one(
    device: &mut impl BlockDevice,
    diag: &mut impl DiagnosticSink,
    sb: &Superblock,
    root_dir: &[u8],
    root_dir_size: usize,
    name: &str,
    dest: &mut [u8],
    indirect_scratch: &mut [u8],
) -> Option<usize> {
    diag.info(name);

    let inode_num = match dir::lookup(root_dir, root_dir_size, name.as_bytes()) {
        Some(n) => n,
        None => {
            diag.error("file not found");
            return None;
        }
    };

    if dest.len() < 512 {
        diag.error("destination buffer too small to serve as inode-lookup scratch");
        return None;
    }

    let bytes_per_block = block_bytes(sb);
    let max_blocks = budget_for(dest.len(), bytes_per_block);

    let (size, outcome) =
        match read_inode_contents(device, sb, inode_num, max_blocks, indirect_scratch, dest) {
            Ok(v) => v,
            Err(LoadError::Device(crate::err::DeviceError::Io { lba })) => {
                let mut line_buf = [0u8; 64];
                diag.error(crate::diag::line_with_hex(
                    &mut line_buf,
                    "device read failed while loading file at lba",
                    lba,
                ));
                return None;
            }
            Err(_) => {
                diag.error("read failed while loading file");
                return None;
            }
        };

    if outcome.truncated {
        let mut line_buf = [0u8; 96];
        diag.error(crate::diag::line_with_hex(
            &mut line_buf,
            "file truncated (triple-indirect unsupported or budget exceeded), blocks dropped",
            outcome.blocks_dropped,
        ));
    }

    let valid_bytes = outcome.blocks_read as usize * bytes_per_block;
    let len = core::cmp::min(size as usize, valid_bytes).min(dest.len());
    diag.info("file loaded");
    Some(len)
}

/// Top-level entry point.
///
/// Initializes the partition table, mounts the first bootable partition holding a valid ext2
/// superblock, reads the root directory, and resolves `opensbi.bin`, `fdt` and `Image` into the
/// caller's [`LoadTargets`].
///
/// Corresponds to the reference loader's
/// `load_ext2(out uboot_base, out optee_base, out monitor_base, out rtos_base, out opensbi_base,
/// out dtb_base, out cmdline) -> i32`, adapted to return a [`LoadReport`] instead of writing
/// through output pointers, and a `Result` instead of a negative status code.
pub fn load_ext2(
    device: &mut impl BlockDevice,
    diag: &mut impl DiagnosticSink,
    targets: LoadTargets,
) -> Result<LoadReport, LoadError> {
    diag.info("ext2 load: reading MBR");

    let mut mbr_sector = [0u8; 512];
    device
        .read_sectors(0, 1, &mut mbr_sector)
        .map_err(|e| {
            let mut line_buf = [0u8; 48];
            diag.error(crate::diag::line_with_hex(
                &mut line_buf,
                "failed to read MBR sector at lba",
                0,
            ));
            LoadError::Device(e)
        })?;

    let table = MbrPartitionTable::parse(&mbr_sector).map_err(|e| {
        diag.error("invalid MBR signature");
        LoadError::Mbr(e)
    })?;

    // Mirrors the reference loader's probing loop exactly: try partitions 0, 1, 2 in order, and
    // for each, both the bootable-flag check and a full superblock decode must succeed. A
    // bootable-but-corrupt partition does not abort the scan; the loop just moves on.
    let mut sb_scratch = [0u8; 1024];
    let mut mounted: Option<Superblock> = None;
    for entry in table.entries().iter().take(PARTITION_PROBE_COUNT) {
        if !entry.bootable {
            continue;
        }
        let sb_lba = entry.start_lba + 2;
        if device.read_sectors(sb_lba, 2, &mut sb_scratch).is_err() {
            let mut line_buf = [0u8; 64];
            diag.error(crate::diag::line_with_hex(
                &mut line_buf,
                "failed to read candidate superblock at lba",
                sb_lba,
            ));
            continue;
        }
        match Superblock::decode(entry.start_lba, &sb_scratch) {
            Ok(sb) => {
                mounted = Some(sb);
                break;
            }
            Err(e) => {
                let mut line_buf = [0u8; 72];
                let value = match e {
                    crate::err::SuperblockError::UnsupportedFeature(mask) => mask,
                    crate::err::SuperblockError::BlockSizeTooLarge(bs) => u32::from(bs),
                    crate::err::SuperblockError::BadMagic => 0,
                };
                diag.error(crate::diag::line_with_hex(
                    &mut line_buf,
                    "partition bootable, bad superblock, trying next, value",
                    value,
                ));
                continue;
            }
        }
    }
    let sb = mounted.ok_or_else(|| {
        diag.error("no suitable partition found");
        LoadError::Mbr(MbrError::NoBootablePartition)
    })?;
    diag.info("ext2 superblock decoded");

    let bytes_per_block = block_bytes(&sb);
    let mut indirect_scratch_buf = [0u8; 2 * 1024];
    let indirect_scratch = &mut indirect_scratch_buf[..2 * bytes_per_block];

    let mut root_dir = [0u8; 1024];
    let root_dir_buf = &mut root_dir[..bytes_per_block];
    let (root_size, root_outcome) = read_inode_contents(
        device,
        &sb,
        ROOT_INODE,
        ROOT_DIR_MAX_BLOCKS,
        indirect_scratch,
        root_dir_buf,
    )?;
    let root_dir_size = core::cmp::min(
        root_size as usize,
        root_outcome.blocks_read as usize * bytes_per_block,
    );
    diag.info("root directory read");

    debug_assert_eq!(ARTIFACTS[0].name, "opensbi.bin");
    debug_assert_eq!(ARTIFACTS[1].name, "fdt");
    debug_assert_eq!(ARTIFACTS[2].name, "Image");

    let mut targets = targets;
    let opensbi_len = load_one(
        device,
        diag,
        &sb,
        root_dir_buf,
        root_dir_size,
        ARTIFACTS[0].name,
        targets.opensbi,
        indirect_scratch,
    );
    let dtb_len = load_one(
        device,
        diag,
        &sb,
        root_dir_buf,
        root_dir_size,
        ARTIFACTS[1].name,
        targets.dtb,
        indirect_scratch,
    );
    let kernel_len = load_one(
        device,
        diag,
        &sb,
        root_dir_buf,
        root_dir_size,
        ARTIFACTS[2].name,
        targets.kernel,
        indirect_scratch,
    );

    if opensbi_len.is_none() && dtb_len.is_none() && kernel_len.is_none() {
        diag.error("no artifact could be loaded");
        return Err(LoadError::NoArtifactLoaded);
    }

    Ok(LoadReport {
        kernel_len: kernel_len.unwrap_or(0),
        opensbi_len: opensbi_len.unwrap_or(0),
        dtb_len: dtb_len.unwrap_or(0),
        optee_base: 0,
        monitor_base: 0,
        rtos_base: 0,
        cmdline: None,
    })
}
