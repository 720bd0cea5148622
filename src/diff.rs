//! Edit scripts between two ordered lists for incremental list updates.
//!
//! Matching runs Myers' O((N+M)·D) shortest-edit-script search over an
//! identity predicate. Unmatched items that reappear elsewhere become moves.
//! Ops are positional and applied in order: removes (descending), moves,
//! inserts (ascending, final positions), then changes (final positions).

use serde::Serialize;

use crate::preprocess::NotificationGroup;

/// Identity and content predicates used to diff two lists.
pub trait DiffCallback<T> {
    /// Same logical item (may have moved or changed).
    fn are_items_same(&self, old: &T, new: &T) -> bool;
    /// Same rendered content; only asked for items that are the same.
    fn are_contents_same(&self, old: &T, new: &T) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum EditOp {
    Remove { position: usize },
    Insert { position: usize },
    /// Remove at `from`, then insert at `to` in the shortened list.
    Move { from: usize, to: usize },
    Change { position: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EditScript {
    ops: Vec<EditOp>,
}

impl EditScript {
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Removes, inserts and moves; everything except redraws.
    pub fn structural_len(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| !matches!(op, EditOp::Change { .. }))
            .count()
    }

    pub fn count(&self, pred: impl Fn(&EditOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// Replay the script on `old`, taking inserted and changed items from `new`.
    ///
    /// # Panics
    ///
    /// If the script was not produced by `diff(old, new, ..)`.
    pub fn apply<T: Clone>(&self, old: &[T], new: &[T]) -> Vec<T> {
        let mut current = old.to_vec();
        for op in &self.ops {
            match *op {
                EditOp::Remove { position } => {
                    current.remove(position);
                }
                EditOp::Insert { position } => current.insert(position, new[position].clone()),
                EditOp::Move { from, to } => {
                    let item = current.remove(from);
                    current.insert(to, item);
                }
                EditOp::Change { position } => current[position] = new[position].clone(),
            }
        }
        current
    }
}

/// Compute the edit script turning `old` into `new`.
pub fn diff<T, C>(old: &[T], new: &[T], callback: &C) -> EditScript
where
    C: DiffCallback<T> + ?Sized,
{
    let same = |i: usize, j: usize| callback.are_items_same(&old[i], &new[j]);

    // new index -> old index for every matched pair (common subsequence + moves)
    let mut new_to_old: Vec<Option<usize>> = vec![None; new.len()];
    let mut in_common: Vec<bool> = vec![false; old.len()];
    for (i, j) in common_subsequence(old.len(), new.len(), &same) {
        new_to_old[j] = Some(i);
        in_common[i] = true;
    }

    let mut old_matched = in_common.clone();
    for i in 0..old.len() {
        if old_matched[i] {
            continue;
        }
        if let Some(j) = (0..new.len()).find(|&j| new_to_old[j].is_none() && same(i, j)) {
            new_to_old[j] = Some(i);
            old_matched[i] = true;
        }
    }

    let mut ops = Vec::new();

    // Removes, descending so earlier positions stay valid.
    let mut current: Vec<usize> = (0..old.len()).collect();
    for i in (0..old.len()).rev() {
        if !old_matched[i] {
            current.remove(i);
            ops.push(EditOp::Remove { position: i });
        }
    }

    // Moves, in ascending target order. Each moved item lands right after
    // its predecessor in the target order, which is already settled.
    let target: Vec<usize> = new_to_old.iter().flatten().copied().collect();
    for (k, &old_index) in target.iter().enumerate() {
        if in_common[old_index] {
            continue;
        }
        let Some(from) = current.iter().position(|&t| t == old_index) else {
            continue;
        };
        current.remove(from);
        let to = match k.checked_sub(1) {
            Some(prev) => current
                .iter()
                .position(|&t| t == target[prev])
                .map_or(0, |p| p + 1),
            None => 0,
        };
        current.insert(to, old_index);
        if from != to {
            ops.push(EditOp::Move { from, to });
        }
    }

    for (j, matched) in new_to_old.iter().enumerate() {
        if matched.is_none() {
            ops.push(EditOp::Insert { position: j });
        }
    }

    for (j, matched) in new_to_old.iter().enumerate() {
        if let Some(i) = *matched {
            if !callback.are_contents_same(&old[i], &new[j]) {
                ops.push(EditOp::Change { position: j });
            }
        }
    }

    EditScript { ops }
}

/// Myers greedy forward search, then backtrack through the saved frontiers.
/// Returns matched `(old, new)` index pairs in ascending order.
fn common_subsequence(
    n: usize,
    m: usize,
    same: &dyn Fn(usize, usize) -> bool,
) -> Vec<(usize, usize)> {
    let (n, m) = (n as isize, m as isize);
    let max = n + m;
    let offset = max;
    let mut v = vec![0isize; 2 * max as usize + 2];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    let at = |k: isize| (k + offset) as usize;
    let go_down = |v: &[isize], k: isize, d: isize| {
        k == -d || (k != d && v[at(k) - 1] < v[at(k) + 1])
    };

    'search: for d in 0..=max {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let mut x = if go_down(v.as_slice(), k, d) {
                v[at(k) + 1]
            } else {
                v[at(k) - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && same(x as usize, y as usize) {
                x += 1;
                y += 1;
            }
            v[at(k)] = x;
            if x >= n && y >= m {
                break 'search;
            }
            k += 2;
        }
    }

    let mut matches = Vec::new();
    let (mut x, mut y) = (n, m);
    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let prev_k = if go_down(v.as_slice(), k, d) { k + 1 } else { k - 1 };
        let prev_x = v[at(prev_k)];
        let prev_y = prev_x - prev_k;
        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            matches.push((x as usize, y as usize));
        }
        if d > 0 {
            x = prev_x;
            y = prev_y;
        }
    }
    matches.reverse();
    matches
}

// ---------------------------------------------------------------------------
// Notification groups
// ---------------------------------------------------------------------------

/// Diff predicates for the notification list.
///
/// Contents never compare equal: every matched card is redrawn with fresh
/// content, only identity drives reordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupDiff;

impl DiffCallback<NotificationGroup> for GroupDiff {
    fn are_items_same(&self, old: &NotificationGroup, new: &NotificationGroup) -> bool {
        same_group(Some(old), Some(new))
    }

    fn are_contents_same(&self, _old: &NotificationGroup, _new: &NotificationGroup) -> bool {
        false
    }
}

/// Same package, same header and the same children in the same order.
pub fn same_group(a: Option<&NotificationGroup>, b: Option<&NotificationGroup>) -> bool {
    let (a, b) = match (a, b) {
        (None, None) => return true,
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };
    if std::ptr::eq(a, b) {
        return true;
    }
    if a.package() != b.package() || a.child_count() != b.child_count() {
        return false;
    }
    let headers_match = match (a.header(), b.header()) {
        (None, None) => true,
        (Some(x), Some(y)) => x.key.same_notification(&y.key),
        _ => false,
    };
    headers_match
        && a
            .children()
            .iter()
            .zip(b.children())
            .all(|(x, y)| x.key.same_notification(&y.key))
}
