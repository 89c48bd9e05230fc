/// Observer threshold for section reveals. It only decides when the browser
/// reports; any intersecting entry latches.
pub const REVEAL_THRESHOLD: f64 = 0.2;

/// One-way visibility flag: once latched it stays on for the life of the section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealLatch {
    visible: bool,
}

impl RevealLatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn visible(self) -> bool {
        self.visible
    }

    /// Feeds one observer entry. Returns `true` only for the entry that flips
    /// the latch.
    pub fn observe(&mut self, is_intersecting: bool) -> bool {
        if self.visible || !is_intersecting {
            return false;
        }

        self.visible = true;
        true
    }
}
