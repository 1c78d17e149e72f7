//! Content library of reusable post bodies

use tracing::debug;
use uuid::Uuid;

use crate::types::{extract_hashtags, ContentLibraryItem, MediaAttachment};

/// Saved post bodies, in the order they were added
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    items: Vec<ContentLibraryItem>,
}

impl ContentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a new item and return its id
    ///
    /// When `hashtags` is empty they are pulled out of the content.
    pub fn add_item(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        hashtags: Vec<String>,
        media: Vec<MediaAttachment>,
        category: impl Into<String>,
    ) -> String {
        let content = content.into();
        let hashtags = if hashtags.is_empty() {
            extract_hashtags(&content)
        } else {
            hashtags
        };

        let item = ContentLibraryItem {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            content,
            hashtags,
            media,
            usage_count: 0,
            category: category.into(),
        };
        let id = item.id.clone();
        debug!(item_id = %id, category = %item.category, "saved library item");
        self.items.push(item);
        id
    }

    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&ContentLibraryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn items(&self) -> &[ContentLibraryItem] {
        &self.items
    }

    pub fn items_in_category(&self, category: &str) -> Vec<&ContentLibraryItem> {
        self.items
            .iter()
            .filter(|i| i.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for item in &self.items {
            if !categories.contains(&item.category) {
                categories.push(item.category.clone());
            }
        }
        categories
    }

    /// Bump the usage counter and hand back a copy of the item
    pub(crate) fn take_for_use(&mut self, id: &str) -> Option<ContentLibraryItem> {
        let item = self.items.iter_mut().find(|i| i.id == id)?;
        item.usage_count += 1;
        Some(item.clone())
    }
}
