use itertools::Itertools;
use tracing::{debug, trace, warn};

use super::{
    group::{Group, GroupId, Signature},
    MinimizationError,
};
use crate::{math::Partition, prelude::*};

/// The stable outcome of Moore's partition refinement on a [`DFA`]. It holds the final
/// groups (including groups that stayed empty), the group of every state and the number
/// of rounds in which some group was split.
#[derive(Clone, Debug)]
pub struct Refinement {
    symbols: Vec<Symbol>,
    groups: Vec<Group>,
    group_of: Vec<GroupId>,
    signatures: Vec<Option<Signature>>,
    rounds: usize,
}

impl Refinement {
    /// All groups in creation order, empty ones included.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// The group that `state` ended up in.
    pub fn group_of(&self, state: StateId) -> Option<GroupId> {
        self.group_of.get(state.index()).copied()
    }

    /// The stable per-symbol destination groups of `group`, `None` for empty groups.
    pub fn signature(&self, group: GroupId) -> Option<&Signature> {
        self.signatures.get(group.index())?.as_ref()
    }

    /// Number of passes that split at least one group.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The equivalence classes, i.e. the non-empty groups.
    pub fn partition(&self) -> Partition<StateId> {
        Partition::new(
            self.groups
                .iter()
                .filter(|group| !group.is_empty())
                .map(|group| group.members().iter().copied()),
        )
    }

    /// Builds the quotient of `dfa` with one state per non-empty group. The state for the
    /// group with id `Gn` is named `Gn`. `dfa` has to be the automaton this refinement was
    /// computed for, a different number of states is reported as
    /// [`MinimizationError::SizeMismatch`].
    pub fn quotient(&self, dfa: &DFA) -> Result<DFA, MinimizationError> {
        if dfa.size() != self.group_of.len() {
            return Err(MinimizationError::SizeMismatch {
                expected: self.group_of.len(),
                found: dfa.size(),
            });
        }
        let mut ts = DTS::for_alphabet(dfa.alphabet().clone());
        let mut ids: Vec<Option<StateId>> = Vec::with_capacity(self.groups.len());
        let mut final_states = vec![];

        for group in &self.groups {
            if group.is_empty() {
                warn!("dropping empty group {:?}", group.id());
                ids.push(None);
                continue;
            }
            let finality = group
                .members()
                .iter()
                .map(|q| dfa.is_final(*q))
                .dedup()
                .collect_vec();
            if finality.len() > 1 {
                return Err(MinimizationError::MixedFinality {
                    group: group.id().name(),
                });
            }
            let id = ts.add_state(group.id().name())?;
            if finality[0] {
                final_states.push(id);
            }
            ids.push(Some(id));
        }

        for (group, source) in self.groups.iter().zip(&ids) {
            let (Some(source), Some(signature)) = (source, self.signature(group.id())) else {
                continue;
            };
            for (symbol, target) in self.symbols.iter().zip(signature) {
                let target =
                    ids[target.index()].expect("signatures only point to non-empty groups");
                ts.add_transition(*source, symbol.clone(), target)?;
            }
        }

        let initial = self
            .group_of(dfa.initial())
            .and_then(|group| ids[group.index()])
            .expect("the group of the initial state contains it");
        Ok(DFA::new(ts, initial, final_states)?)
    }
}

/// Computes the coarsest partition of the states of `dfa` into groups of states that
/// accept the same words. Starting from the split into non-final (`G1`) and final (`G2`)
/// states, every group whose members disagree on the groups their transitions lead to is
/// split until no group changes anymore.
///
/// Fails if `dfa` is not total, which is checked before refinement starts.
pub fn refine(dfa: &DFA) -> Result<Refinement, MinimizationError> {
    let symbols = dfa.alphabet().universe().cloned().collect_vec();

    let table = dfa
        .states()
        .map(|q| {
            symbols
                .iter()
                .map(|a| {
                    dfa.transition(q, a).ok_or_else(|| MinimizationError::NotTotal {
                        state: dfa.name(q),
                        symbol: a.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (finals, non_finals): (Vec<_>, Vec<_>) = dfa.states().partition(|q| dfa.is_final(*q));
    let mut group_of = dfa
        .states()
        .map(|q| GroupId(usize::from(dfa.is_final(q))))
        .collect_vec();
    let mut groups = vec![
        Group::new(GroupId(0), non_finals),
        Group::new(GroupId(1), finals),
    ];

    let mut rounds = 0;
    loop {
        let signature_of = |q: StateId| -> Signature {
            table[q.index()]
                .iter()
                .map(|p| group_of[p.index()])
                .collect()
        };

        let existing = groups.len();
        let mut created: Vec<Group> = vec![];
        for group in groups.iter_mut().filter(|group| group.len() > 1) {
            let Some(representative) = group.representative() else {
                continue;
            };
            let reference = signature_of(representative);

            let mut splits: Vec<(Signature, Vec<StateId>)> = vec![];
            for &q in group.members() {
                let signature = signature_of(q);
                if signature == reference {
                    continue;
                }
                match splits.iter_mut().find(|(s, _)| *s == signature) {
                    Some((_, members)) => members.push(q),
                    None => splits.push((signature, vec![q])),
                }
            }
            if splits.is_empty() {
                continue;
            }

            let moved = splits
                .iter()
                .flat_map(|(_, members)| members.iter().copied())
                .collect_vec();
            group.remove_all(&moved);
            for (_, members) in splits {
                let id = GroupId(existing + created.len());
                trace!(
                    "splitting {} off {:?} into {id:?}",
                    StateId::show_collection(&members),
                    group.id()
                );
                created.push(Group::new(id, members));
            }
        }

        if created.is_empty() {
            break;
        }
        rounds += 1;
        for new_group in created {
            for q in new_group.members() {
                group_of[q.index()] = new_group.id();
            }
            groups.push(new_group);
        }
        debug!("refinement round {rounds} produced {} groups", groups.len());
    }

    let signatures = groups
        .iter()
        .map(|group| {
            group.representative().map(|q| {
                table[q.index()]
                    .iter()
                    .map(|p| group_of[p.index()])
                    .collect()
            })
        })
        .collect();

    Ok(Refinement {
        symbols,
        groups,
        group_of,
        signatures,
        rounds,
    })
}
