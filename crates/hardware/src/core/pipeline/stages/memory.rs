//! Memory Access (MEM) Stage.
//!
//! This module implements the fourth stage of the pipeline. It performs the following:
//! 1. **Loads:** Reads the containing word through L1D and extracts the byte, half or word.
//! 2. **Stores:** Reads the containing word, merges the new byte or half into it, and
//!    writes the word back to the resident L1D block.
//! 3. **Miss Handling:** An L1D miss leaves the op in place; the stage retries every
//!    cycle until the block arrives.
//!
//! Both loads and stores allocate on miss. Sub-word lanes are little-endian: the byte
//! at `addr & 3 == 0` is bits 7-0 of the word.

use crate::common::constants::WORD_ALIGN_MASK;
use crate::common::error::Result;
use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::signals::{MemAccess, MemWidth, OpClass};
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::units::cache::hierarchy::{CacheKind, LoadStatus};

/// Executes the memory stage of the pipeline.
///
/// # Arguments
///
/// * `engine` - Mutable reference to the pipeline state
///
/// # Errors
///
/// `SimError::StoreNotResident` if the block a store just read left L1D before the
/// write, which the hierarchy never does within a cycle.
pub fn mem_stage(engine: &mut PipelineEngine) -> Result<()> {
    if !engine.wb_latch.is_empty() {
        return Ok(());
    }
    let Some(op) = engine.mem_latch.peek() else {
        return Ok(());
    };

    if let OpClass::Mem(access) = op.class {
        let (addr, value) = (op.mem_addr, op.mem_value);
        let word = match engine.memory.load(addr, CacheKind::Data) {
            LoadStatus::Ready(word) => word,
            LoadStatus::Pending => {
                engine.stats.stalls_mem += 1;
                return Ok(());
            }
        };

        if access.write {
            let merged = merge_store(word, addr, value, access.width);
            engine.memory.store(addr & WORD_ALIGN_MASK, merged)?;
            tracing::trace!(
                addr = format_args!("{addr:#010x}"),
                value = format_args!("{merged:#010x}"),
                "store"
            );
        } else if let Some(op) = engine.mem_latch.peek_mut() {
            op.dst_value = extract_load(word, addr, access);
            op.dst_ready = true;
        }
    }

    if let Some(op) = engine.mem_latch.take() {
        engine.wb_latch.put(op);
    }
    Ok(())
}

/// Bit offset of the lane holding `addr` within its word, for a lane of `width`.
const fn lane_shift(addr: u32, width: MemWidth) -> u32 {
    match width {
        MemWidth::Byte => (addr & 3) * 8,
        MemWidth::Half => (addr & 2) * 8,
        MemWidth::Word => 0,
    }
}

const fn lane_mask(width: MemWidth) -> u32 {
    match width {
        MemWidth::Byte => 0xFF,
        MemWidth::Half => 0xFFFF,
        MemWidth::Word => u32::MAX,
    }
}

/// Extracts the loaded value from the containing word.
///
/// # Arguments
///
/// * `word` - The aligned word containing `addr`.
/// * `addr` - Effective byte address.
/// * `access` - Width and signedness of the load.
///
/// # Examples
///
/// ```
/// use pipesim_core::core::pipeline::signals::{MemAccess, MemWidth};
/// use pipesim_core::core::pipeline::stages::memory::extract_load;
///
/// let lb = MemAccess { width: MemWidth::Byte, signed: true, write: false };
/// assert_eq!(extract_load(0x1234_8056, 0x101, lb), 0xFFFF_FF80);
/// let lhu = MemAccess { width: MemWidth::Half, signed: false, write: false };
/// assert_eq!(extract_load(0x1234_8056, 0x102, lhu), 0x1234);
/// ```
pub const fn extract_load(word: u32, addr: u32, access: MemAccess) -> u32 {
    let raw = (word >> lane_shift(addr, access.width)) & lane_mask(access.width);
    if !access.signed {
        return raw;
    }
    match access.width {
        MemWidth::Byte => raw as u8 as i8 as i32 as u32,
        MemWidth::Half => raw as u16 as i16 as i32 as u32,
        MemWidth::Word => raw,
    }
}

/// Merges a stored byte, half or word into the containing word.
///
/// # Arguments
///
/// * `word` - Current contents of the aligned word.
/// * `addr` - Effective byte address.
/// * `value` - Register value being stored; only the low lane is used.
/// * `width` - Store width.
pub const fn merge_store(word: u32, addr: u32, value: u32, width: MemWidth) -> u32 {
    let shift = lane_shift(addr, width);
    let mask = lane_mask(width) << shift;
    (word & !mask) | ((value << shift) & mask)
}
