//! Service layer for Batchcast
//!
//! `BatchService` is the single owner of the draft store, the time-slot
//! registry, the content library and the event bus. All mutation goes
//! through `&mut self`, so there is exactly one writer of the draft
//! collection at any time.
//!
//! - `store`: draft CRUD, selection, batch scheduling
//! - `validation`: validation rules and character counting
//! - `import`: CSV/JSON import and CSV export
//! - `slots`: recurring time slots and slot assignment
//! - `library`: reusable content
//! - `events`: progress events
//!
//! # Example
//!
//! ```no_run
//! use libbatchcast::service::BatchService;
//! use libbatchcast::Config;
//!
//! # fn example() -> libbatchcast::Result<()> {
//! let mut service = BatchService::from_config(Config::default_config())?;
//!
//! let ids = service.import_csv("content,platforms\nHello,twitter\n");
//! service.apply_slot("morning-boost", &ids)?;
//! let scheduled = service.schedule_all_ready();
//! println!("Scheduled {} posts", scheduled.len());
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod import;
pub mod library;
pub mod slots;
pub mod store;
pub mod validation;

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use self::events::{Event, EventBus, EventReceiver};
use self::import::{import_rows, parse_csv, read_rows, ImportReport};
use self::library::ContentLibrary;
use self::slots::{apply_slot, SlotRegistry};
use self::store::{BatchStats, PostStore};
use self::validation::Validator;
use crate::types::PostPatch;
use crate::{Config, Result};

/// Facade over the bulk-scheduling components
pub struct BatchService {
    config: Config,
    store: PostStore,
    slots: SlotRegistry,
    library: ContentLibrary,
    event_bus: EventBus,
}

impl BatchService {
    /// Create a service from the config file, or defaults when none exists
    pub fn new() -> Result<Self> {
        Self::from_config(Config::load_or_default()?)
    }

    /// Create a service with a pre-built configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured time slots are invalid.
    pub fn from_config(config: Config) -> Result<Self> {
        let validator = Validator::new(config.platform_limits());
        let slots = config.slot_registry()?;
        let event_bus = EventBus::new(config.events.capacity);

        Ok(Self {
            config,
            store: PostStore::new(validator),
            slots,
            library: ContentLibrary::new(),
            event_bus,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PostStore {
        &mut self.store
    }

    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut SlotRegistry {
        &mut self.slots
    }

    pub fn library(&self) -> &ContentLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut ContentLibrary {
        &mut self.library
    }

    pub fn stats(&self) -> BatchStats {
        self.store.stats()
    }

    /// Subscribe to import and scheduling events
    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }

    /// Import CSV text held in memory, returning the new draft ids
    pub fn import_csv(&mut self, text: &str) -> Vec<String> {
        let rows = parse_csv(text, self.config.defaults.platform);
        import_rows(rows)
            .into_iter()
            .map(|draft| self.store.insert(draft))
            .collect()
    }

    /// Import each file in turn, one report per file
    ///
    /// A failing file is reported and skipped; the remaining files are
    /// still imported.
    pub async fn import_files(&mut self, paths: &[PathBuf]) -> Vec<ImportReport> {
        let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        self.event_bus.emit(Event::ImportStarted {
            files: names.clone(),
        });

        let mut reports = Vec::with_capacity(paths.len());
        for (path, name) in paths.iter().zip(names) {
            match read_rows(path, self.config.defaults.platform).await {
                Ok(rows) => {
                    let ids: Vec<String> = import_rows(rows)
                        .into_iter()
                        .map(|draft| self.store.insert(draft))
                        .collect();
                    info!(file = %name, drafts = ids.len(), "imported file");
                    self.event_bus.emit(Event::ImportFileCompleted {
                        file: name.clone(),
                        drafts: ids.len(),
                    });
                    reports.push(ImportReport::succeeded(name, ids));
                }
                Err(e) => {
                    warn!(file = %name, error = %e, "import failed");
                    self.event_bus.emit(Event::ImportFileFailed {
                        file: name.clone(),
                        error: e.to_string(),
                    });
                    reports.push(ImportReport::failed(name, &e));
                }
            }
        }
        reports
    }

    /// Apply a slot to `post_ids`, counting dates from today
    pub fn apply_slot(&mut self, slot_id: &str, post_ids: &[String]) -> Result<usize> {
        self.apply_slot_on(slot_id, post_ids, Local::now().date_naive())
    }

    /// Apply a slot to `post_ids`, counting dates from `today`
    ///
    /// Unknown slots are a no-op returning `Ok(0)`.
    pub fn apply_slot_on(
        &mut self,
        slot_id: &str,
        post_ids: &[String],
        today: NaiveDate,
    ) -> Result<usize> {
        let Some(slot) = self.slots.get(slot_id).cloned() else {
            warn!(slot_id, "time slot not found");
            return Ok(0);
        };

        let updated = apply_slot(&mut self.store, &slot, post_ids, today)?;
        self.event_bus.emit(Event::SlotApplied {
            slot_id: slot.id,
            updated,
        });
        Ok(updated)
    }

    /// Promote every ready draft to scheduled
    pub fn schedule_all_ready(&mut self) -> Vec<String> {
        let post_ids = self.store.schedule_all_ready();
        info!(count = post_ids.len(), "scheduled ready drafts");
        self.event_bus.emit(Event::DraftsScheduled {
            post_ids: post_ids.clone(),
        });
        post_ids
    }

    /// Start a new draft from a library item
    ///
    /// Copies the item's content, hashtags and media, and bumps its usage
    /// counter. Returns `None` for an unknown item.
    pub fn use_library_item(&mut self, item_id: &str) -> Option<String> {
        let item = self.library.take_for_use(item_id)?;
        let id = self.store.add(Some(item.content), None, Some(item.media));
        self.store
            .update(&id, PostPatch::new().hashtags(item.hashtags));
        Some(id)
    }
}
