/// Share of the progress range covered by chunk transfers.
pub const CHUNK_PROGRESS_SHARE: u64 = 95;

/// End of the chunk starting at `start`, clipped to `total`.
pub fn chunk_end(start: u64, chunk_size: u64, total: u64) -> u64 { start.saturating_add(chunk_size).min(total) }

/// Number of chunk calls a fresh upload of `total` bytes needs.
pub fn chunk_count(total: u64, chunk_size: u64) -> u64 {
    if chunk_size == 0 {
        return 0;
    }
    total.div_ceil(chunk_size).max(1)
}

/// `Content-Range` value for bytes `[start, end)` of `total`.
///
/// # Examples
///
/// ```
/// use jsu_upload::core::content_range;
///
/// assert_eq!(content_range(0, 17, 17), "bytes 0-16/17");
/// ```
pub fn content_range(start: u64, end: u64, total: u64) -> String {
    format!("bytes {}-{}/{}", start, end as i128 - 1, total)
}

/// Progress value while a chunk is on the wire.
///
/// `loaded` of `loaded_total` body bytes of the chunk `[start, start + chunk_len)`
/// have been sent. The result is `floor(95 * done / total)`; the final 5% are
/// left for the completion call.
pub fn chunk_progress(start: u64, chunk_len: u64, loaded: u64, loaded_total: u64, total: u64) -> u8 {
    if total == 0 {
        return CHUNK_PROGRESS_SHARE as u8;
    }
    let (loaded, loaded_total) = if loaded_total == 0 {
        (1, 1)
    } else {
        (loaded.min(loaded_total), loaded_total)
    };
    let numerator = CHUNK_PROGRESS_SHARE as u128
        * (start as u128 * loaded_total as u128 + chunk_len as u128 * loaded as u128);
    let denominator = total as u128 * loaded_total as u128;
    (numerator / denominator).min(CHUNK_PROGRESS_SHARE as u128) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_end_is_clipped() {
        assert_eq!(chunk_end(0, 10, 17), 10);
        assert_eq!(chunk_end(10, 10, 17), 17);
        assert_eq!(chunk_end(0, 20_000_000, 17), 17);
        assert_eq!(chunk_end(u64::MAX - 1, 10, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(17, 10), 2);
        assert_eq!(chunk_count(20, 10), 2);
        assert_eq!(chunk_count(0, 10), 1);
    }

    #[test]
    fn test_content_range() {
        assert_eq!(content_range(10, 17, 17), "bytes 10-16/17");
        assert_eq!(content_range(0, 0, 0), "bytes 0--1/0");
    }

    #[test]
    fn test_chunk_progress_full_single_chunk() {
        assert_eq!(chunk_progress(0, 17, 17, 17, 17), 95);
    }

    #[test]
    fn test_chunk_progress_partial() {
        // Second of two chunks, half sent: (10 + 3.5) / 17 * 95 = 75.4
        assert_eq!(chunk_progress(10, 7, 50, 100, 17), 75);
        // First chunk complete: 10 / 17 * 95 = 55.8
        assert_eq!(chunk_progress(0, 10, 1, 1, 17), 55);
    }

    #[test]
    fn test_chunk_progress_empty_source() {
        assert_eq!(chunk_progress(0, 0, 0, 0, 0), 95);
    }
}
