use crate::error::{Result, SegdlError};

pub const MIB: u64 = 1024 * 1024;

/// Byte range `[offset, offset + length)` of one segment of a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentPlan {
    pub index: u32,
    pub total_segments: u32,
    pub offset: u64,
    pub length: u64,
}

impl SegmentPlan {
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }
}

/// Segment size hint in bytes for a megabyte override; zero or negative means "no hint".
pub fn hint_bytes(segment_size_mb: i32) -> u64 {
    if segment_size_mb <= 0 {
        0
    } else {
        segment_size_mb as u64 * MIB
    }
}

/// Computes the byte range of segment `index` out of `total`.
///
/// With `hint == 0` the file is split evenly and the last segment absorbs the
/// remainder. With a hint, every segment but the last is exactly `hint` bytes
/// and the last takes the tail, unless more segments are requested than the
/// hint can fill (`total > ceil(file_size / hint)`), in which case the hint is
/// ignored and the even split is used instead.
pub fn plan(file_size: u64, index: u32, total: u32, hint: u64) -> Result<SegmentPlan> {
    if index >= total {
        return Err(SegdlError::InvalidRange {
            index,
            total,
            file_size,
        });
    }
    if hint > 0 && u64::from(total) <= file_size.div_ceil(hint) {
        return fixed_partition(file_size, index, total, hint);
    }
    Ok(even_partition(file_size, index, total))
}

/// Plans every segment of a job, in index order.
pub fn plan_all(file_size: u64, total: u32, hint: u64) -> Result<Vec<SegmentPlan>> {
    (0..total)
        .map(|index| plan(file_size, index, total, hint))
        .collect()
}

fn even_partition(file_size: u64, index: u32, total: u32) -> SegmentPlan {
    let n = u64::from(total);
    let base = file_size / n;
    let remainder = file_size % n;
    let length = if index + 1 == total {
        base + remainder
    } else {
        base
    };
    SegmentPlan {
        index,
        total_segments: total,
        offset: u64::from(index) * base,
        length,
    }
}

fn fixed_partition(file_size: u64, index: u32, total: u32, hint: u64) -> Result<SegmentPlan> {
    let offset = u64::from(index)
        .checked_mul(hint)
        .filter(|off| *off < file_size)
        .ok_or(SegdlError::InvalidRange {
            index,
            total,
            file_size,
        })?;
    let length = if index + 1 == total {
        file_size - offset
    } else {
        hint
    };
    Ok(SegmentPlan {
        index,
        total_segments: total,
        offset,
        length,
    })
}

/// Advisory segment count for a file of `file_size` bytes.
pub fn recommended_segments(file_size: u64) -> u32 {
    match file_size {
        s if s < MIB => 1,
        s if s < 10 * MIB => 2,
        s if s < 50 * MIB => 4,
        s if s < 100 * MIB => 8,
        _ => 16,
    }
}
