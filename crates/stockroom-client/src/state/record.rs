//! The per-resource record a UI renders from.

use stockroom_core::{Identified, Page, PageInfo};

/// `{items, selected, pagination, loading, error}` for one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord<E> {
    pub items: Vec<E>,
    pub selected: Option<E>,
    pub pagination: Option<PageInfo>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<E> Default for EntityRecord<E> {
    fn default() -> Self {
        EntityRecord {
            items: Vec::new(),
            selected: None,
            pagination: None,
            loading: false,
            error: None,
        }
    }
}

impl<E: Identified> EntityRecord<E> {
    /// Marks the start of an action: `loading` on, previous error gone.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Records a failure. Items and selection are left as they were.
    pub fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn finish(&mut self) {
        self.loading = false;
    }

    pub fn replace_page(&mut self, page: Page<E>) {
        self.items = page.items;
        self.pagination = page.pagination;
        self.loading = false;
    }

    pub fn find(&self, id: &E::Id) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn prepend(&mut self, entity: E) {
        self.items.insert(0, entity);
    }

    /// Replaces the entry with the same id, and `selected` if it matches.
    ///
    /// An entity not in `items` (e.g. on another page) is left out of the list
    /// but still refreshes `selected`.
    pub fn splice(&mut self, entity: E)
    where
        E: Clone,
    {
        if let Some(slot) = self.items.iter_mut().find(|item| item.id() == entity.id()) {
            *slot = entity.clone();
        }
        if self
            .selected
            .as_ref()
            .is_some_and(|selected| selected.id() == entity.id())
        {
            self.selected = Some(entity);
        }
    }

    pub fn remove(&mut self, id: &E::Id) {
        self.items.retain(|item| item.id() != id);
        if self.selected.as_ref().is_some_and(|selected| selected.id() == id) {
            self.selected = None;
        }
    }
}
