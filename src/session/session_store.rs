use std::collections::HashMap;

use crate::common::{resolve_label, Color, Item, UserId};

/// Per-user item lists for the lifetime of the process.
///
/// Sessions only grow: items are appended in arrival order and never edited.
/// Nothing is persisted, a restart starts every user from scratch.
pub struct SessionStore {
    sessions: HashMap<UserId, Vec<Item>>,
    label_prefix: String,
}

impl SessionStore {
    pub fn new(label_prefix: impl Into<String>) -> Self {
        Self {
            sessions: HashMap::new(),
            label_prefix: label_prefix.into(),
        }
    }

    /// Makes sure a session exists for `user` without touching existing items.
    pub fn start(&mut self, user: UserId) {
        self.sessions.entry(user).or_default();
    }

    /// Appends an item and returns it. Blank captions get a positional label.
    pub fn record(&mut self, user: UserId, caption: Option<&str>, color: Color) -> &Item {
        let items = self.sessions.entry(user).or_default();
        let label = resolve_label(caption, &self.label_prefix, items.len() + 1);
        tracing::info!("Recording {} {} for {}", label, color, user);
        items.push(Item::new(label, color));
        &items[items.len() - 1]
    }

    pub fn items(&self, user: UserId) -> &[Item] {
        self.sessions
            .get(&user)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self, user: UserId) -> usize {
        self.items(user).len()
    }

    pub fn is_empty(&self, user: UserId) -> bool {
        self.items(user).is_empty()
    }

    pub fn clear(&mut self, user: UserId) {
        if let Some(items) = self.sessions.get_mut(&user) {
            items.clear();
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new("Gift")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    #[test]
    fn unknown_user_has_no_items() {
        let store = SessionStore::default();
        assert!(store.items(ALICE).is_empty());
        assert_eq!(store.len(ALICE), 0);
    }

    #[test]
    fn record_appends_in_order_with_default_labels() {
        let mut store = SessionStore::default();
        store.record(ALICE, None, Color::new(1, 1, 1));
        let item = store.record(ALICE, Some("Lamp"), Color::new(2, 2, 2));
        assert_eq!(item.label(), "Lamp");
        store.record(ALICE, Some(" "), Color::new(3, 3, 3));

        let labels: Vec<&str> = store.items(ALICE).iter().map(Item::label).collect();
        assert_eq!(labels, vec!["Gift #1", "Lamp", "Gift #3"]);
    }

    #[test]
    fn sessions_are_isolated_per_user() {
        let mut store = SessionStore::new("Present");
        store.record(ALICE, None, Color::new(9, 9, 9));
        store.record(BOB, None, Color::new(8, 8, 8));
        assert_eq!(store.items(BOB)[0].label(), "Present #1");
        assert_eq!(store.len(ALICE), 1);
    }

    #[test]
    fn start_keeps_existing_items_and_clear_empties() {
        let mut store = SessionStore::default();
        store.record(ALICE, Some("Book"), Color::new(5, 5, 5));
        store.start(ALICE);
        assert_eq!(store.len(ALICE), 1);

        store.clear(ALICE);
        assert!(store.is_empty(ALICE));
        assert_eq!(store.record(ALICE, None, Color::FALLBACK).label(), "Gift #1");
    }
}
