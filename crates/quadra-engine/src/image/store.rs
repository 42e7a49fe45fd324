use std::collections::HashMap;

use super::ImageId;

/// Handle table mapping [`ImageId`]s to backend textures.
///
/// Removal is idempotent: removing an id twice, or an id that was never
/// inserted, returns `None` and leaves the table untouched.
#[derive(Debug)]
pub struct ImageStore<T> {
    entries: HashMap<ImageId, T>,
    next_id: u64,
}

impl<T> Default for ImageStore<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 1,
        }
    }
}

impl<T> ImageStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture: T) -> ImageId {
        let id = ImageId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, texture);
        id
    }

    pub fn get(&self, id: ImageId) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn remove(&mut self, id: ImageId) -> Option<T> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry, yielding the textures so the backend can release them.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.entries.drain().map(|(_, t)| t)
    }
}
