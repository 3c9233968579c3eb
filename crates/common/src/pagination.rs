//! Offset/limit window used by every `list` operation.

/// Largest page any list operation returns.
pub const MAX_LIMIT: u64 = 100;

/// Offsets are bound as signed 64-bit integers by the store.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// rows to skip
    pub offset: u64,
    /// rows to return
    pub limit: u64,
}

impl Pagination {
    pub fn new(offset: u64, limit: u64) -> Self { Self { offset, limit } }

    /// Clamp the limit into `1..=MAX_LIMIT`, the offset to `MAX_OFFSET`,
    /// and return `(offset, limit)`
    pub fn normalize(self) -> (u64, u64) {
        (self.offset.min(MAX_OFFSET), self.limit.clamp(1, MAX_LIMIT))
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { offset: 0, limit: MAX_LIMIT } }
}
