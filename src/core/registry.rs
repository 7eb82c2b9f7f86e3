//! # Page Registry
//!
//! Insertion-ordered page storage. A page is identified by
//! `(owner id, page name)`, both compared case-insensitively; registering
//! the same pair again replaces the page in place so its index, and any
//! open view pointing at it, stays valid.

use std::collections::{BTreeSet, HashMap};

use log::{debug, info};

use crate::core::page::Page;

/// Owner labels longer than this are cut when disambiguating titles.
pub const DEFAULT_OWNER_LABEL_LEN: usize = 8;

#[derive(Debug)]
pub struct PageRegistry {
    pages: Vec<Page>,
    /// owner key -> normalized page name -> index into `pages`
    slots_by_owner: HashMap<String, HashMap<String, usize>>,
    /// normalized page name -> owner keys using it
    owners_by_name: HashMap<String, BTreeSet<String>>,
    owner_label_len: usize,
}

impl Default for PageRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_OWNER_LABEL_LEN)
    }
}

impl PageRegistry {
    pub fn new(owner_label_len: usize) -> Self {
        Self {
            pages: Vec::new(),
            slots_by_owner: HashMap::new(),
            owners_by_name: HashMap::new(),
            owner_label_len,
        }
    }

    /// Store `page`, replacing an earlier page with the same identity.
    /// Returns its index.
    pub fn add_or_replace(&mut self, page: Page) -> usize {
        let owner_key = page.owner().key();
        let name_key = page.normalized_name();

        self.owners_by_name
            .entry(name_key.clone())
            .or_default()
            .insert(owner_key.clone());

        let slots = self.slots_by_owner.entry(owner_key).or_default();
        if let Some(&index) = slots.get(&name_key) {
            debug!("Replacing page '{}' at index {}", page.name(), index);
            self.pages[index] = page;
            return index;
        }

        let index = self.pages.len();
        slots.insert(name_key, index);
        info!(
            "Registered page '{}' for owner '{}' at index {}",
            page.name(),
            page.owner().id,
            index
        );
        self.pages.push(page);
        index
    }

    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Title shown in the index list. Names shared by more than one owner
    /// get the (truncated) owner label appended.
    pub fn display_title(&self, index: usize) -> Option<String> {
        let page = self.pages.get(index)?;
        let shared = self
            .owners_by_name
            .get(&page.normalized_name())
            .is_some_and(|owners| owners.len() > 1);
        if !shared {
            return Some(page.name().to_string());
        }
        let label: String = page.owner().label().chars().take(self.owner_label_len).collect();
        Some(format!("{} ({})", page.name(), label))
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.slots_by_owner.clear();
        self.owners_by_name.clear();
    }
}
