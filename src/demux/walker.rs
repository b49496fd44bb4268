// Packet walker state
//
// AtPageBoundary: the next call must read a page header first. This is the
// initial state and the state after the last segment of a page is consumed.
// WithinPage: `cursor` indexes the next unread entry of the live segment table.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkerState {
    #[default]
    AtPageBoundary,
    WithinPage { cursor: u8 },
}

impl WalkerState {
    /// State after consuming segment `cursor` of a page with `segment_count` segments
    pub(crate) fn after(cursor: u8, segment_count: u8) -> Self {
        let next = cursor as usize + 1;
        if next >= segment_count as usize {
            WalkerState::AtPageBoundary
        } else {
            WalkerState::WithinPage { cursor: next as u8 }
        }
    }

    pub fn is_at_page_boundary(&self) -> bool {
        matches!(self, WalkerState::AtPageBoundary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_then_wraps_to_boundary() {
        assert_eq!(WalkerState::after(0, 3), WalkerState::WithinPage { cursor: 1 });
        assert_eq!(WalkerState::after(1, 3), WalkerState::WithinPage { cursor: 2 });
        assert_eq!(WalkerState::after(2, 3), WalkerState::AtPageBoundary);
        assert_eq!(WalkerState::after(0, 1), WalkerState::AtPageBoundary);
    }

    #[test]
    fn last_slot_of_full_page() {
        assert_eq!(WalkerState::after(253, 255), WalkerState::WithinPage { cursor: 254 });
        assert_eq!(WalkerState::after(254, 255), WalkerState::AtPageBoundary);
    }

    #[test]
    fn starts_at_boundary() {
        assert!(WalkerState::default().is_at_page_boundary());
    }
}
