//! Partial stable reordering of the generate-phase list.

/// True if `order` contains every index in `0..len` exactly once.
pub fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        match seen.get_mut(i) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

/// Reorder the subsequence of `items` found at `positions`.
///
/// `positions` lists, in ascending order, where one plugin's items sit in
/// `items`; `order` is a permutation of `0..positions.len()` giving their new
/// order. The recognised items are removed and re-inserted, in `order`,
/// starting at the first removed position. Everything else keeps its
/// relative order.
///
/// Callers must check `order` with [`is_permutation`] first.
pub fn partial_reorder<T>(items: Vec<T>, positions: &[usize], order: &[usize]) -> Vec<T> {
    let Some(&first) = positions.first() else {
        return items;
    };

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut picked: Vec<Option<T>> = positions
        .iter()
        .map(|&p| slots.get_mut(p).and_then(Option::take))
        .collect();

    let mut out = Vec::with_capacity(slots.len());
    for (index, slot) in slots.into_iter().enumerate() {
        if index == first {
            out.extend(
                order
                    .iter()
                    .filter_map(|&i| picked.get_mut(i).and_then(Option::take)),
            );
        }
        if let Some(item) = slot {
            out.push(item);
        }
    }
    out
}
