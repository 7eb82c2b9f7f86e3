//! # Pages
//!
//! A [`Page`] is a named, ordered list of [`Item`]s registered by one
//! [`Owner`]. Row numbers are positions in that list.

use crate::core::error::BuildError;
use crate::core::item::Item;

/// Who registered a page: a stable id plus a human-facing name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: String,
    pub name: String,
}

impl Owner {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Display label, falling back to the id when the name is blank.
    pub fn label(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() { self.id.trim() } else { name }
    }

    pub(crate) fn key(&self) -> String {
        self.id.trim().to_lowercase()
    }
}

/// Trim a page name; blank names are rejected.
pub fn normalize_page_name(name: &str) -> Result<String, BuildError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(BuildError::EmptyPageName);
    }
    Ok(trimmed.to_string())
}

#[derive(Debug)]
pub struct Page {
    name: String,
    owner: Owner,
    items: Vec<Item>,
}

impl Page {
    pub fn new(owner: Owner, name: &str) -> Result<Self, BuildError> {
        if owner.id.trim().is_empty() {
            return Err(BuildError::EmptyOwner);
        }
        Ok(Self {
            name: normalize_page_name(name)?,
            owner,
            items: Vec::new(),
        })
    }

    /// The trimmed display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-folded name used for identity comparisons.
    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_name_is_trimmed() {
        let page = Page::new(Owner::new("a", "A"), "  Audio  ").unwrap();
        assert_eq!(page.name(), "Audio");
        assert_eq!(page.normalized_name(), "audio");
    }

    #[test]
    fn test_blank_name_and_owner_rejected() {
        assert_eq!(
            Page::new(Owner::new("a", "A"), "   ").unwrap_err(),
            BuildError::EmptyPageName
        );
        assert_eq!(
            Page::new(Owner::new(" ", "A"), "Audio").unwrap_err(),
            BuildError::EmptyOwner
        );
    }

    #[test]
    fn test_owner_label_falls_back_to_id() {
        assert_eq!(Owner::new("com.example.mod", "  ").label(), "com.example.mod");
        assert_eq!(Owner::new("com.example.mod", "Example").label(), "Example");
    }

    #[test]
    fn test_rows_keep_insertion_order() {
        let mut page = Page::new(Owner::new("a", "A"), "P").unwrap();
        page.push(Item::new(|| "first".to_string()));
        page.push(Item::new(|| "second".to_string()));
        assert_eq!(page.len(), 2);
        assert_eq!(page.item(1).map(|i| i.label()), Some("second".to_string()));
        assert!(page.item(2).is_none());
    }
}
