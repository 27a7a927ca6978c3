//! Classification of source items against a target snapshot.

use std::collections::HashMap;
use std::fmt;

use super::key::{EntityKind, Key};

/// What happens to a source item whose key matches a target item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Nothing when the target is marked migrated or has equal content, Update otherwise.
    CompareContent,
    /// Always Update; the update reconciles child entities rather than the item itself.
    Descend,
    /// Always Nothing; the kind is never edited once it exists.
    Keep,
}

/// Per-kind identity and equality, dispatched statically at each call site.
pub trait Reconcilable {
    const KIND: EntityKind;
    const ON_MATCH: MatchPolicy = MatchPolicy::CompareContent;

    fn natural_id(&self) -> String;

    /// Compares the fields that decide between Nothing and Update.
    /// Only meaningful once keys already match.
    fn same_content(&self, other: &Self) -> bool;

    /// Set on target items that an earlier run already handled.
    fn already_migrated(&self) -> bool {
        false
    }

    fn key(&self) -> Key {
        Key::new(Self::KIND, self.natural_id())
    }
}

/// Deep equality over the fields relevant for `T`. Absent items are never equal.
pub fn equals<T: Reconcilable>(lhs: Option<&T>, rhs: Option<&T>) -> bool {
    match (lhs, rhs) {
        (Some(l), Some(r)) => Key::matches(Some(&l.key()), Some(&r.key())) && l.same_content(r),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Create,
    Update,
    Nothing,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Create => f.write_str("create"),
            OpKind::Update => f.write_str("update"),
            OpKind::Nothing => f.write_str("nothing"),
        }
    }
}

#[derive(Debug)]
pub struct Decision<'a, T> {
    pub kind: OpKind,
    /// The matched target item, if any.
    pub target: Option<&'a T>,
}

pub type Decisions<'a, T> = HashMap<Key, Decision<'a, T>>;

/// Classifies every source item as Create, Update or Nothing.
///
/// Returns `None` when both snapshots are empty. When a source key matches
/// several target items the last match wins; snapshots are expected to hold
/// unique keys, so this only matters for malformed input.
pub fn reconcile<'a, T: Reconcilable>(source: &'a [T], target: &'a [T]) -> Option<Decisions<'a, T>> {
    if source.is_empty() && target.is_empty() {
        return None;
    }

    let target_keys: Vec<(Key, &'a T)> = target.iter().map(|t| (t.key(), t)).collect();
    let mut decisions = HashMap::with_capacity(source.len());
    for src in source {
        let key = src.key();
        let mut decision = Decision {
            kind: OpKind::Create,
            target: None,
        };
        for (target_key, tgt) in &target_keys {
            if !Key::matches(Some(&key), Some(target_key)) {
                continue;
            }
            decision = Decision {
                kind: decide(src, *tgt),
                target: Some(*tgt),
            };
        }
        decisions.insert(key, decision);
    }
    Some(decisions)
}

fn decide<T: Reconcilable>(source: &T, target: &T) -> OpKind {
    match T::ON_MATCH {
        MatchPolicy::CompareContent => {
            if target.already_migrated() || equals(Some(source), Some(target)) {
                OpKind::Nothing
            } else {
                OpKind::Update
            }
        }
        MatchPolicy::Descend => OpKind::Update,
        MatchPolicy::Keep => OpKind::Nothing,
    }
}

/// A Create or Update decision for one source item.
#[derive(Debug)]
pub struct Op<'a, T> {
    pub kind: OpKind,
    pub source: &'a T,
    /// Populated on Update: the target item to edit or descend into.
    pub target: Option<&'a T>,
}

/// Reconciles and keeps only actionable decisions, in source order.
pub fn op_list<'a, T: Reconcilable>(source: &'a [T], target: &'a [T]) -> Vec<Op<'a, T>> {
    let Some(decisions) = reconcile(source, target) else {
        return Vec::new();
    };
    source
        .iter()
        .filter_map(|src| {
            let decision = decisions.get(&src.key())?;
            match decision.kind {
                OpKind::Nothing => None,
                kind => Some(Op {
                    kind,
                    source: src,
                    target: decision.target,
                }),
            }
        })
        .collect()
}
