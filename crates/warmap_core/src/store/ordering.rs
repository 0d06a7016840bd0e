//! Splice helpers shared by task and goal reordering.

use crate::store::rejection::{Rejection, StoreResult};

/// Moves the item at `from` so it ends up at `to`.
///
/// `to` is clamped to the last position. Rejects an out-of-range `from`
/// without touching `items`.
pub fn move_within<T>(items: &mut Vec<T>, from: usize, to: usize) -> StoreResult<()> {
    if from >= items.len() {
        return Err(Rejection::IndexOutOfRange {
            index: from,
            len: items.len(),
        });
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    Ok(())
}

/// Inserts `item` at `index` clamped to `items.len()`; returns the final index.
pub fn insert_clamped<T>(items: &mut Vec<T>, index: usize, item: T) -> usize {
    let index = index.min(items.len());
    items.insert(index, item);
    index
}

#[cfg(test)]
mod tests {
    use super::{insert_clamped, move_within};
    use crate::store::rejection::Rejection;

    #[test]
    fn move_within_moves_down_and_up() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        move_within(&mut items, 0, 2).unwrap();
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        move_within(&mut items, 2, 0).unwrap();
        assert_eq!(items, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn move_within_clamps_destination() {
        let mut items = vec![1, 2, 3];
        move_within(&mut items, 0, 99).unwrap();
        assert_eq!(items, vec![2, 3, 1]);
    }

    #[test]
    fn move_within_rejects_missing_source() {
        let mut items = vec![1, 2];
        let err = move_within(&mut items, 2, 0).unwrap_err();
        assert_eq!(err, Rejection::IndexOutOfRange { index: 2, len: 2 });
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn insert_clamped_appends_past_the_end() {
        let mut items = vec![1, 2];
        assert_eq!(insert_clamped(&mut items, 10, 3), 2);
        assert_eq!(insert_clamped(&mut items, 0, 0), 0);
        assert_eq!(items, vec![0, 1, 2, 3]);
    }
}
