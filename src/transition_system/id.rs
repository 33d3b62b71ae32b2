use std::fmt::Debug;

/// The integer type backing a [`StateId`].
pub type DefaultIdType = u32;

/// Stable handle of a state inside the arena of a [`super::TransitionSystem`]. Handles are
/// handed out in insertion order, starting at zero, and are only meaningful for the
/// transition system that created them.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) DefaultIdType);

impl StateId {
    pub(crate) fn from_usize(n: usize) -> Self {
        Self(DefaultIdType::try_from(n).expect("more states than DefaultIdType can index"))
    }

    /// Position of the state in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Debug for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl crate::Show for StateId {
    fn show(&self) -> String {
        format!("{self:?}")
    }
}
