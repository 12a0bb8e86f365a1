//! Listener ordering resolution.
//!
//! Listeners declare `before`/`after` constraints against each other's ids.
//! [`resolve_order`] turns the declarations into a single total order with
//! Kahn's algorithm. When several listeners are ready at once the one
//! registered first wins, so the result is deterministic for a given
//! registration sequence.
//!
//! Constraints naming an id that was never registered are ignored.

use palaver_core::{ChatListener, ListenerId, OrderingError};
use std::collections::{BTreeSet, HashMap};

/// The ordering-relevant part of a listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerDescriptor {
    /// Listener identity.
    pub id: ListenerId,
    /// Listeners that must run after this one.
    pub before: Vec<ListenerId>,
    /// Listeners that must run before this one.
    pub after: Vec<ListenerId>,
}

impl ListenerDescriptor {
    /// A descriptor without constraints.
    pub fn new(id: ListenerId) -> Self {
        Self {
            id,
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Add a `before` constraint.
    pub fn before(mut self, other: ListenerId) -> Self {
        self.before.push(other);
        self
    }

    /// Add an `after` constraint.
    pub fn after(mut self, other: ListenerId) -> Self {
        self.after.push(other);
        self
    }

    /// Capture the declarations of a listener.
    pub fn of<L: ChatListener + ?Sized>(listener: &L) -> Self {
        Self {
            id: listener.id(),
            before: listener.before().to_vec(),
            after: listener.after().to_vec(),
        }
    }
}

/// Resolve descriptors into an execution order.
///
/// Returns indices into `descriptors`. Fails if two descriptors share an id
/// or if the constraints contain a cycle.
pub fn resolve_order(descriptors: &[ListenerDescriptor]) -> Result<Vec<usize>, OrderingError> {
    let mut index: HashMap<ListenerId, usize> = HashMap::with_capacity(descriptors.len());
    for (i, d) in descriptors.iter().enumerate() {
        if index.insert(d.id, i).is_some() {
            return Err(OrderingError::DuplicateListener(d.id));
        }
    }

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); descriptors.len()];
    let mut in_degree: Vec<usize> = vec![0; descriptors.len()];

    for (i, d) in descriptors.iter().enumerate() {
        for other in &d.before {
            match index.get(other) {
                Some(&j) => {
                    successors[i].push(j);
                    in_degree[j] += 1;
                }
                None => {
                    tracing::debug!(listener = %d.id, before = %other, "ignoring constraint on unregistered listener");
                }
            }
        }
        for other in &d.after {
            match index.get(other) {
                Some(&j) => {
                    successors[j].push(i);
                    in_degree[i] += 1;
                }
                None => {
                    tracing::debug!(listener = %d.id, after = %other, "ignoring constraint on unregistered listener");
                }
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..descriptors.len())
        .filter(|&i| in_degree[i] == 0)
        .collect();
    let mut order = Vec::with_capacity(descriptors.len());

    while let Some(next) = ready.pop_first() {
        order.push(next);
        for &succ in &successors[next] {
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                ready.insert(succ);
            }
        }
    }

    if order.len() < descriptors.len() {
        let listeners: Vec<ListenerId> = (0..descriptors.len())
            .filter(|&i| in_degree[i] > 0)
            .map(|i| descriptors[i].id)
            .collect();
        tracing::error!(?listeners, "listener ordering contains a cycle");
        return Err(OrderingError::Cycle { listeners });
    }

    Ok(order)
}

/// Resolve descriptors and return their ids in execution order.
pub fn resolve_ids(descriptors: &[ListenerDescriptor]) -> Result<Vec<ListenerId>, OrderingError> {
    Ok(resolve_order(descriptors)?
        .into_iter()
        .map(|i| descriptors[i].id)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const A: ListenerId = ListenerId::new("a");
    const B: ListenerId = ListenerId::new("b");
    const C: ListenerId = ListenerId::new("c");
    const D: ListenerId = ListenerId::new("d");

    fn position(order: &[ListenerId], id: ListenerId) -> usize {
        order.iter().position(|x| *x == id).unwrap()
    }

    #[test]
    fn test_before_overrides_registration_order() {
        let order = resolve_ids(&[
            ListenerDescriptor::new(B),
            ListenerDescriptor::new(A).before(B),
        ])
        .unwrap();
        assert_eq!(order, vec![A, B]);
    }

    #[test]
    fn test_after_is_mirror_of_before() {
        let order = resolve_ids(&[
            ListenerDescriptor::new(A).after(B),
            ListenerDescriptor::new(B),
        ])
        .unwrap();
        assert_eq!(order, vec![B, A]);
    }

    #[test]
    fn test_unconstrained_keeps_registration_order() {
        let order = resolve_ids(&[
            ListenerDescriptor::new(C),
            ListenerDescriptor::new(A),
            ListenerDescriptor::new(B),
        ])
        .unwrap();
        assert_eq!(order, vec![C, A, B]);
    }

    #[test]
    fn test_ties_prefer_earliest_registration() {
        // D must precede A; B and C are free and registered before D.
        let order = resolve_ids(&[
            ListenerDescriptor::new(A),
            ListenerDescriptor::new(B),
            ListenerDescriptor::new(C),
            ListenerDescriptor::new(D).before(A),
        ])
        .unwrap();
        assert_eq!(order, vec![B, C, D, A]);
    }

    #[rstest]
    #[case::chain(vec![
        ListenerDescriptor::new(C),
        ListenerDescriptor::new(B).before(C),
        ListenerDescriptor::new(A).before(B),
    ])]
    #[case::diamond(vec![
        ListenerDescriptor::new(D),
        ListenerDescriptor::new(C).before(D),
        ListenerDescriptor::new(B).before(D),
        ListenerDescriptor::new(A).before(B).before(C),
    ])]
    #[case::mixed(vec![
        ListenerDescriptor::new(A).after(D),
        ListenerDescriptor::new(B).before(A),
        ListenerDescriptor::new(C).after(B).before(A),
        ListenerDescriptor::new(D),
    ])]
    fn test_every_constraint_respected(#[case] descriptors: Vec<ListenerDescriptor>) {
        let order = resolve_ids(&descriptors).unwrap();
        assert_eq!(order.len(), descriptors.len());
        for d in &descriptors {
            for other in &d.before {
                assert!(position(&order, d.id) < position(&order, *other));
            }
            for other in &d.after {
                assert!(position(&order, *other) < position(&order, d.id));
            }
        }
    }

    #[test]
    fn test_cycle_is_rejected() {
        let err = resolve_order(&[
            ListenerDescriptor::new(A).before(B),
            ListenerDescriptor::new(B).before(C),
            ListenerDescriptor::new(C).before(A),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            OrderingError::Cycle {
                listeners: vec![A, B, C]
            }
        );
    }

    #[test]
    fn test_cycle_reports_only_unresolved() {
        let err = resolve_order(&[
            ListenerDescriptor::new(D),
            ListenerDescriptor::new(A).before(B),
            ListenerDescriptor::new(B).before(A),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            OrderingError::Cycle {
                listeners: vec![A, B]
            }
        );
    }

    #[test]
    fn test_self_constraint_is_a_cycle() {
        let err = resolve_order(&[ListenerDescriptor::new(A).before(A)]).unwrap_err();
        assert!(matches!(err, OrderingError::Cycle { .. }));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = resolve_order(&[ListenerDescriptor::new(A), ListenerDescriptor::new(A)])
            .unwrap_err();
        assert_eq!(err, OrderingError::DuplicateListener(A));
    }

    #[test]
    fn test_unknown_constraint_ignored() {
        let order = resolve_ids(&[
            ListenerDescriptor::new(A).before(ListenerId::new("missing")),
            ListenerDescriptor::new(B),
        ])
        .unwrap();
        assert_eq!(order, vec![A, B]);
    }

    #[test]
    fn test_empty() {
        assert!(resolve_order(&[]).unwrap().is_empty());
    }
}
