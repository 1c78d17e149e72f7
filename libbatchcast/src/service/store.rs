//! In-memory store for draft posts
//!
//! The store owns the ordered draft collection and the selection set. Every
//! write recomputes the derived fields (`errors`, `status`, and
//! `character_count` when content changes) so they never go stale.
//!
//! Operations on unknown ids are silent no-ops: they return `false`, `0` or
//! `None` and leave the store untouched.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::validation::{count_characters, Validator};
use crate::types::{dedup_platforms, DraftPost, MediaAttachment, Platform, PostPatch, PostStatus};

/// Ordered draft collection with selection tracking
#[derive(Debug, Clone, Default)]
pub struct PostStore {
    posts: Vec<DraftPost>,
    selected: HashSet<String>,
    validator: Validator,
}

/// Status counts across the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total: usize,
    pub draft: usize,
    pub ready: usize,
    pub scheduled: usize,
    pub error: usize,
    pub selected: usize,
}

impl PostStore {
    pub fn new(validator: Validator) -> Self {
        Self {
            posts: Vec::new(),
            selected: HashSet::new(),
            validator,
        }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Append a new draft and return its id
    pub fn add(
        &mut self,
        content: Option<String>,
        platforms: Option<Vec<Platform>>,
        media: Option<Vec<MediaAttachment>>,
    ) -> String {
        let draft = DraftPost::new(
            content.unwrap_or_default(),
            platforms.unwrap_or_default(),
            media.unwrap_or_default(),
        );
        self.insert(draft)
    }

    /// Append an already-built draft
    ///
    /// The draft enters as `draft` with no errors and fresh character
    /// counts, whatever status it carried; only later writes derive
    /// `ready` or `scheduled`.
    pub fn insert(&mut self, mut draft: DraftPost) -> String {
        draft.status = PostStatus::Draft;
        draft.errors.clear();
        draft.character_count = count_characters(&draft.content);
        let id = draft.id.clone();
        debug!(post_id = %id, "adding draft");
        self.posts.push(draft);
        id
    }

    pub fn get(&self, id: &str) -> Option<&DraftPost> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// All drafts in insertion order
    pub fn posts(&self) -> &[DraftPost] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Merge `patch` into the draft and re-derive its status
    ///
    /// Returns `false` when no draft has this id.
    pub fn update(&mut self, id: &str, patch: PostPatch) -> bool {
        match self.position(id) {
            Some(index) => {
                self.apply(index, patch, false);
                true
            }
            None => {
                debug!(post_id = %id, "update ignored, draft not found");
                false
            }
        }
    }

    /// Remove a draft and drop it from the selection
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.posts.len();
        self.posts.retain(|p| p.id != id);
        self.selected.remove(id);
        let removed = self.posts.len() != before;
        if removed {
            debug!(post_id = %id, "deleted draft");
        }
        removed
    }

    /// Remove every draft whose id is in `ids`, returning how many went
    pub fn delete_many(&mut self, ids: &[String]) -> usize {
        let doomed: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let before = self.posts.len();
        self.posts.retain(|p| !doomed.contains(p.id.as_str()));
        self.selected.retain(|id| !doomed.contains(id.as_str()));
        let removed = before - self.posts.len();
        debug!(removed, "deleted drafts");
        removed
    }

    /// Copy a draft under a new id; the copy always starts as `draft`
    pub fn duplicate(&mut self, id: &str) -> Option<String> {
        let source = self.get(id)?;
        let mut copy = source.clone();
        copy.id = uuid::Uuid::new_v4().to_string();
        copy.status = PostStatus::Draft;
        Some(self.insert(copy))
    }

    /// Promote every `ready` draft to `scheduled`
    ///
    /// Returns the ids that were promoted, in store order. Drafts in any
    /// other state are left alone.
    pub fn schedule_all_ready(&mut self) -> Vec<String> {
        let ready: Vec<usize> = self
            .posts
            .iter()
            .enumerate()
            .filter(|(_, p)| p.status == PostStatus::Ready)
            .map(|(i, _)| i)
            .collect();

        let mut scheduled = Vec::with_capacity(ready.len());
        for index in ready {
            self.apply(index, PostPatch::default(), true);
            if self.posts[index].status == PostStatus::Scheduled {
                scheduled.push(self.posts[index].id.clone());
            }
        }
        scheduled
    }

    /// Validate every draft, marking failures as `error`
    ///
    /// Valid drafts become `ready` (scheduled drafts stay scheduled).
    /// Returns how many drafts failed validation.
    pub fn revalidate_all(&mut self) -> usize {
        let mut failed = 0;
        for post in &mut self.posts {
            post.errors = self.validator.validate(post);
            post.status = if !post.errors.is_empty() {
                failed += 1;
                PostStatus::Error
            } else if post.status == PostStatus::Scheduled {
                PostStatus::Scheduled
            } else {
                PostStatus::Ready
            };
        }
        failed
    }

    pub fn select(&mut self, id: &str) -> bool {
        if self.position(id).is_some() {
            self.selected.insert(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn deselect(&mut self, id: &str) -> bool {
        self.selected.remove(id)
    }

    /// Flip selection for `id`, returning whether it is now selected
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.select(id)
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.posts.iter().map(|p| p.id.clone()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Selected ids in store order
    pub fn selected_ids(&self) -> Vec<String> {
        self.posts
            .iter()
            .filter(|p| self.selected.contains(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Delete every selected draft
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selected_ids();
        self.delete_many(&ids)
    }

    pub fn stats(&self) -> BatchStats {
        let mut stats = BatchStats {
            total: self.posts.len(),
            selected: self.selected.len(),
            ..Default::default()
        };
        for post in &self.posts {
            match post.status {
                PostStatus::Draft => stats.draft += 1,
                PostStatus::Ready => stats.ready += 1,
                PostStatus::Scheduled => stats.scheduled += 1,
                PostStatus::Error => stats.error += 1,
            }
        }
        stats
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.posts.iter().position(|p| p.id == id)
    }

    fn apply(&mut self, index: usize, patch: PostPatch, promote: bool) {
        let post = &mut self.posts[index];

        if let Some(content) = patch.content {
            if content != post.content {
                post.character_count = count_characters(&content);
            }
            post.content = content;
        }
        if let Some(platforms) = patch.platforms {
            post.platforms = dedup_platforms(platforms);
        }
        if let Some(date) = patch.scheduled_date {
            post.scheduled_date = date;
        }
        if let Some(time) = patch.scheduled_time {
            post.scheduled_time = time;
        }
        if let Some(media) = patch.media {
            post.media = media;
        }
        if let Some(hashtags) = patch.hashtags {
            post.hashtags = hashtags;
        }

        post.errors = self.validator.validate(post);
        post.status = if !post.errors.is_empty() {
            PostStatus::Draft
        } else if promote || post.status == PostStatus::Scheduled {
            PostStatus::Scheduled
        } else {
            PostStatus::Ready
        };

        debug!(post_id = %post.id, status = %post.status, errors = post.errors.len(), "updated draft");
    }
}
