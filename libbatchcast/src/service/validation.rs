//! Draft validation and character counting
//!
//! Validation is a pure function of the draft and the platform limit table.
//! Rules are applied in a fixed order so error lists are deterministic:
//!
//! 1. Content must not be blank
//! 2. At least one platform must be selected
//! 3. Content must fit every selected platform's character limit
//! 4. Both the schedule date and time must be set

use std::collections::{BTreeMap, HashMap};

use crate::types::{DraftPost, Platform};

pub const CONTENT_REQUIRED: &str = "Content is required";
pub const PLATFORM_REQUIRED: &str = "Select at least one platform";
pub const SCHEDULE_REQUIRED: &str = "Schedule date and time required";

/// Count content length for every platform
///
/// Every platform gets the same value: the UTF-16 code unit length of the
/// content. No link shortening or emoji weighting is applied.
pub fn count_characters(content: &str) -> BTreeMap<Platform, usize> {
    let length = content_length(content);
    Platform::ALL.into_iter().map(|p| (p, length)).collect()
}

/// Length used for limit checks (UTF-16 code units)
pub fn content_length(content: &str) -> usize {
    content.encode_utf16().count()
}

/// Character limit table, one entry per platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformLimits {
    limits: HashMap<Platform, usize>,
}

impl Default for PlatformLimits {
    fn default() -> Self {
        Self {
            limits: Platform::ALL
                .into_iter()
                .map(|p| (p, p.default_char_limit()))
                .collect(),
        }
    }
}

impl PlatformLimits {
    /// Built-in limits with `overrides` applied on top
    pub fn with_overrides(overrides: &HashMap<Platform, usize>) -> Self {
        let mut limits = Self::default();
        for (platform, limit) in overrides {
            limits.limits.insert(*platform, *limit);
        }
        limits
    }

    pub fn limit(&self, platform: Platform) -> usize {
        self.limits
            .get(&platform)
            .copied()
            .unwrap_or_else(|| platform.default_char_limit())
    }
}

/// Validates drafts against the platform limit table
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: PlatformLimits,
}

impl Validator {
    pub fn new(limits: PlatformLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &PlatformLimits {
        &self.limits
    }

    /// Return every validation message for `draft`, empty when valid
    pub fn validate(&self, draft: &DraftPost) -> Vec<String> {
        let mut errors = Vec::new();

        if draft.content.trim().is_empty() {
            errors.push(CONTENT_REQUIRED.to_string());
        }

        if draft.platforms.is_empty() {
            errors.push(PLATFORM_REQUIRED.to_string());
        }

        let length = content_length(&draft.content);
        for platform in &draft.platforms {
            let limit = self.limits.limit(*platform);
            if length > limit {
                errors.push(format!(
                    "Content exceeds {} limit ({} chars)",
                    platform, limit
                ));
            }
        }

        if !draft.has_schedule() {
            errors.push(SCHEDULE_REQUIRED.to_string());
        }

        errors
    }

    pub fn is_valid(&self, draft: &DraftPost) -> bool {
        self.validate(draft).is_empty()
    }
}
