use crate::errors::FlowError;
use std::fmt::{Debug, Display};

/// A strictly linear sequence of named statuses.
///
/// Implementors only list their states in order; every query about
/// adjacency and the forward-only guard is derived from `SEQUENCE`.
pub trait StatusFlow: Copy + Eq + Debug + Display + 'static {
    /// All states, first to last. No branches.
    const SEQUENCE: &'static [Self];

    fn initial() -> Self {
        Self::SEQUENCE[0]
    }

    fn position(self) -> usize {
        Self::SEQUENCE
            .iter()
            .position(|status| *status == self)
            .unwrap_or_default()
    }

    /// The only state this one may move to, if any.
    fn next(self) -> Option<Self> {
        Self::SEQUENCE.get(self.position() + 1).copied()
    }

    fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    fn can_advance_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Rejects anything but the adjacent next state.
    fn check_advance(self, target: Self) -> Result<(), FlowError> {
        if self.can_advance_to(target) {
            Ok(())
        } else {
            Err(FlowError::invalid_transition(self, target))
        }
    }
}
