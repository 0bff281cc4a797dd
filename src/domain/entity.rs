//! Copy-on-write helpers shared by every collection
//!
//! All mutations go through [`update_item`]: the input slice is never
//! touched, a fresh `Vec` comes back, and an unknown ID yields an unchanged
//! copy rather than an error.

use super::id::Identified;

/// Finds an item by ID
pub fn find_item<'a, T: Identified>(id: &T::Id, items: &'a [T]) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

/// Finds the position of an item by ID
pub fn find_item_index<T: Identified>(id: &T::Id, items: &[T]) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Returns a copy of `items` where the item matching `id` has been passed
/// through `update`
pub fn update_item<T, F>(id: &T::Id, items: &[T], update: F) -> Vec<T>
where
    T: Identified + Clone,
    F: FnOnce(&mut T),
{
    let mut updated = items.to_vec();
    if let Some(index) = find_item_index(id, &updated) {
        update(&mut updated[index]);
    }
    updated
}
