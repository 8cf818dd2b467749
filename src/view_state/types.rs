//! Core view-state newtypes

/// Viewport dimensions in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportDimensions {
    /// Width in terminal columns.
    pub width: u16,
    /// Height in terminal rows.
    pub height: u16,
}

impl ViewportDimensions {
    /// Create new viewport dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Content width in columns, never zero.
    pub fn content_width(&self) -> usize {
        usize::from(self.width).max(1)
    }

    /// Visible rows, never zero.
    ///
    /// A zero-height viewport would make every offset past the last line
    /// "valid", so it is treated as a single row.
    pub fn rows(&self) -> usize {
        usize::from(self.height).max(1)
    }
}

impl Default for ViewportDimensions {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Clamp `index` into `[0, len - 1]`; `0` for an empty sequence.
pub fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Apply a signed delta to an index, clamped into `[0, len - 1]`.
pub fn offset_index(index: usize, delta: isize, len: usize) -> usize {
    let moved = if delta.is_negative() {
        index.saturating_sub(delta.unsigned_abs())
    } else {
        index.saturating_add(delta.unsigned_abs())
    };
    clamp_index(moved, len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_are_floored_to_one() {
        let dims = ViewportDimensions::new(0, 0);
        assert_eq!(dims.content_width(), 1);
        assert_eq!(dims.rows(), 1);
    }

    #[test]
    fn clamp_index_handles_empty() {
        assert_eq!(clamp_index(5, 0), 0);
        assert_eq!(clamp_index(5, 3), 2);
        assert_eq!(clamp_index(1, 3), 1);
    }

    #[test]
    fn offset_index_saturates_both_ends() {
        assert_eq!(offset_index(0, -1, 5), 0);
        assert_eq!(offset_index(4, 1, 5), 4);
        assert_eq!(offset_index(2, -1, 5), 1);
        assert_eq!(offset_index(2, 10, 5), 4);
    }
}
