/* src/cluster/layout.rs */

use std::ops::Range;

pub fn part_count(total_size: u64, chunk_size: usize) -> u32 {
    total_size.div_ceil(chunk_size as u64) as u32
}

pub fn part_range(index: u32, total_size: u64, chunk_size: usize) -> Range<usize> {
    let start = (index as u64 * chunk_size as u64).min(total_size);
    let end = (start + chunk_size as u64).min(total_size);
    start as usize..end as usize
}
