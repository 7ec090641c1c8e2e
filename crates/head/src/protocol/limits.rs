/// Default upper bound on header lines, the start line included.
pub const DEFAULT_MAX_HEADER_LINES: usize = 100;

/// Per-block bound on how many header lines a peer may send.
///
/// The start line counts towards `max_header_lines` but is not stored as a
/// field, so a block accepts at most `max_header_lines - 1` distinct names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLimits {
    pub max_header_lines: usize,
    pub enabled: bool,
}

impl HeaderLimits {
    pub const fn new(max_header_lines: usize) -> Self {
        Self { max_header_lines, enabled: true }
    }

    /// Limits that never reject a block.
    pub const fn unlimited() -> Self {
        Self { max_header_lines: DEFAULT_MAX_HEADER_LINES, enabled: false }
    }

    /// Whether a block holding `field_count` distinct names is over the limit.
    pub fn exceeded_by(&self, field_count: usize) -> bool {
        self.enabled && field_count >= self.max_header_lines
    }
}

impl Default for HeaderLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEADER_LINES)
    }
}
