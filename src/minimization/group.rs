use std::fmt::Debug;

use crate::prelude::*;

/// Handle of a [`Group`], groups are numbered in the order in which they are created.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    /// Position of the group in the list of all groups.
    pub fn index(self) -> usize {
        self.0
    }

    /// Human readable name, the first group is called `G1`.
    pub fn name(self) -> String {
        format!("G{}", self.0 + 1)
    }
}

impl Debug for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-symbol destination groups, in alphabet order.
pub type Signature = Vec<GroupId>;

/// A set of states that are believed to be equivalent so far. Members are kept in the
/// order in which they joined, the first one serves as representative.
#[derive(Clone, Debug)]
pub struct Group {
    id: GroupId,
    members: Vec<StateId>,
}

impl Group {
    pub(crate) fn new(id: GroupId, members: Vec<StateId>) -> Self {
        Self { id, members }
    }

    /// The handle of the group.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// The states in the group.
    pub fn members(&self) -> &[StateId] {
        &self.members
    }

    /// Returns any member of the group, `None` if it is empty.
    pub fn representative(&self) -> Option<StateId> {
        self.members.first().copied()
    }

    pub(crate) fn remove_all(&mut self, states: &[StateId]) {
        self.members.retain(|q| !states.contains(q))
    }

    /// The number of states in the group.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
