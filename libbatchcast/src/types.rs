//! Core types for Batchcast

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::validation::count_characters;

/// Platforms supported by the bulk scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
    Twitter,
    Linkedin,
    Threads,
    Tiktok,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Instagram,
        Platform::Facebook,
        Platform::Twitter,
        Platform::Linkedin,
        Platform::Threads,
        Platform::Tiktok,
    ];

    /// Lower-case tag used in CSV files, config and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
            Platform::Threads => "threads",
            Platform::Tiktok => "tiktok",
        }
    }

    /// Built-in character limit for a single post
    pub fn default_char_limit(&self) -> usize {
        match self {
            Platform::Twitter => 280,
            Platform::Instagram => 2200,
            Platform::Facebook => 63206,
            Platform::Linkedin => 3000,
            Platform::Threads => 500,
            Platform::Tiktok => 2200,
        }
    }

    /// Match a tag case-insensitively, ignoring surrounding whitespace
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_lowercase();
        Platform::ALL.into_iter().find(|p| p.as_str() == tag)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::from_tag(s).ok_or_else(|| {
            format!(
                "Unknown platform: '{}'. Valid options: instagram, facebook, twitter, linkedin, threads, tiktok",
                s
            )
        })
    }
}

/// Lifecycle state of a draft post
///
/// `Ready` and `Scheduled` are only ever held by drafts with no validation
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Ready,
    Scheduled,
    Error,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "draft"),
            PostStatus::Ready => write!(f, "ready"),
            PostStatus::Scheduled => write!(f, "scheduled"),
            PostStatus::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// A media file attached to a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub id: String,
    pub kind: MediaKind,
    pub url: String,
    pub name: String,
    /// File size in bytes
    pub size: u64,
}

impl MediaAttachment {
    pub fn new(kind: MediaKind, url: impl Into<String>, name: impl Into<String>, size: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            url: url.into(),
            name: name.into(),
            size,
        }
    }
}

/// A post being prepared in the bulk scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPost {
    pub id: String,
    pub content: String,
    pub platforms: Vec<Platform>,
    pub scheduled_date: Option<NaiveDate>,
    /// Raw "HH:MM" string, kept as entered
    pub scheduled_time: Option<String>,
    pub media: Vec<MediaAttachment>,
    pub status: PostStatus,
    pub errors: Vec<String>,
    pub hashtags: Vec<String>,
    pub character_count: BTreeMap<Platform, usize>,
}

impl DraftPost {
    /// Create a draft with a fresh id and character counts for `content`
    pub fn new(content: String, platforms: Vec<Platform>, media: Vec<MediaAttachment>) -> Self {
        let character_count = count_characters(&content);
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            platforms: dedup_platforms(platforms),
            scheduled_date: None,
            scheduled_time: None,
            media,
            status: PostStatus::Draft,
            errors: Vec::new(),
            hashtags: Vec::new(),
            character_count,
        }
    }

    /// True when both halves of the schedule are present
    pub fn has_schedule(&self) -> bool {
        self.scheduled_date.is_some()
            && self
                .scheduled_time
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty())
    }
}

/// Keep the first occurrence of each platform, preserving order
pub(crate) fn dedup_platforms(platforms: Vec<Platform>) -> Vec<Platform> {
    let mut seen = Vec::with_capacity(platforms.len());
    for platform in platforms {
        if !seen.contains(&platform) {
            seen.push(platform);
        }
    }
    seen
}

/// Partial update applied by `PostStore::update`
///
/// Fields left as `None` are untouched. Status is never part of a patch: it
/// is derived from validation after every write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub content: Option<String>,
    pub platforms: Option<Vec<Platform>>,
    pub scheduled_date: Option<Option<NaiveDate>>,
    pub scheduled_time: Option<Option<String>>,
    pub media: Option<Vec<MediaAttachment>>,
    pub hashtags: Option<Vec<String>>,
}

impl PostPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    pub fn scheduled_date(mut self, date: NaiveDate) -> Self {
        self.scheduled_date = Some(Some(date));
        self
    }

    pub fn scheduled_time(mut self, time: impl Into<String>) -> Self {
        self.scheduled_time = Some(Some(time.into()));
        self
    }

    /// Remove both the date and the time
    pub fn clear_schedule(mut self) -> Self {
        self.scheduled_date = Some(None);
        self.scheduled_time = Some(None);
        self
    }

    pub fn media(mut self, media: Vec<MediaAttachment>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn hashtags(mut self, hashtags: Vec<String>) -> Self {
        self.hashtags = Some(hashtags);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == PostPatch::default()
    }
}

/// A recurring posting template: time of day on a set of weekdays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: String,
    pub name: String,
    /// "HH:MM"
    pub time: String,
    pub days: Vec<Weekday>,
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub is_default: bool,
}

/// Reusable post body saved in the content library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLibraryItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub hashtags: Vec<String>,
    pub media: Vec<MediaAttachment>,
    pub usage_count: u32,
    pub category: String,
}

/// One imported row before it is turned into a draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub platforms: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
}

/// Extract `#tag` tokens from text, without the leading `#`
///
/// Tags are made of alphanumerics and underscores; duplicates are dropped
/// case-insensitively, keeping the first spelling.
pub fn extract_hashtags(content: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '#' {
            continue;
        }
        let mut tag = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_alphanumeric() || next == '_' {
                tag.push(next);
                chars.next();
            } else {
                break;
            }
        }
        if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
    }

    tags
}
