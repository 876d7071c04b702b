use std::path::PathBuf;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::SiteConfig;
use crate::confirm::Confirm;
use crate::models::guestbook::{GuestbookEntry, GuestbookForm};
use crate::notify::{Notifier, Severity};
use crate::render;
use crate::store::{namespaced, Storage};

pub const CLEAR_PROMPT: &str =
    "Are you sure you want to clear all guestbook entries? This cannot be undone.";

/// Source of "now" for entry ids and dates.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The container that shows the entry list. The guestbook is its only
/// writer and always replaces the whole contents.
pub trait EntriesView {
    fn replace(&self, html: &str);
}

/// Writes the container contents to an HTML fragment on disk, which the
/// site includes as its guestbook list.
pub struct FragmentFile {
    pub path: PathBuf,
}

impl EntriesView for FragmentFile {
    fn replace(&self, html: &str) {
        if let Err(e) = std::fs::write(&self.path, html) {
            log::warn!("Could not write {}: {}", self.path.display(), e);
        }
    }
}

/// Persisted guestbook: an ordered entry list under one storage key, kept in
/// sync with its on-page container.
pub struct Guestbook<'a> {
    storage: &'a dyn Storage,
    notifier: &'a dyn Notifier,
    view: &'a dyn EntriesView,
    clock: &'a dyn Clock,
    key: String,
    anonymous_name: String,
    tz: Tz,
}

impl<'a> Guestbook<'a> {
    pub fn new(
        storage: &'a dyn Storage,
        notifier: &'a dyn Notifier,
        view: &'a dyn EntriesView,
        clock: &'a dyn Clock,
        config: &SiteConfig,
    ) -> Self {
        Guestbook {
            storage,
            notifier,
            view,
            clock,
            key: namespaced(&config.namespace, "guestbook"),
            anonymous_name: config.anonymous_name.clone(),
            tz: config.tz(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored entries, newest first. Absent or unreadable data is an empty
    /// guestbook; the unreadable case is logged, never reported to the user.
    pub fn load(&self) -> Vec<GuestbookEntry> {
        let raw = match self.storage.get(&self.key) {
            Some(raw) => raw,
            None => return vec![],
        };
        match GuestbookEntry::list_from_json(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Guestbook data under {} is unreadable, treating as empty: {}", self.key, e);
                vec![]
            }
        }
    }

    /// Sign the guestbook. A blank message is refused with an error
    /// notification and `Ok(None)`; nothing is written. Storage failures are
    /// returned as `Err` before any re-render or notification.
    pub fn append(&self, name: &str, message: &str) -> Result<Option<GuestbookEntry>, String> {
        let form = GuestbookForm::new(name, message);
        let entry = match GuestbookEntry::from_form(&form, &self.anonymous_name, self.clock.now()) {
            Ok(entry) => entry,
            Err(reason) => {
                self.notifier.notify(&reason, Severity::Error);
                return Ok(None);
            }
        };

        // Read-modify-write with no isolation: a concurrent writer's entry is lost
        let mut entries = self.load();
        entries.insert(0, entry.clone());
        let json = GuestbookEntry::list_to_json(&entries)?;
        self.storage.set(&self.key, &json)?;

        self.view.replace(&self.render(&entries));
        self.notifier.notify("Guestbook entry added!", Severity::Success);
        log::info!("Guestbook signed by {} ({} entries)", entry.name, entries.len());

        Ok(Some(entry))
    }

    /// Remove every entry once the visitor confirms. Returns whether the
    /// guestbook was cleared; declining changes nothing and stays silent.
    pub fn clear(&self, confirm: &dyn Confirm) -> Result<bool, String> {
        if !confirm.confirm(CLEAR_PROMPT) {
            return Ok(false);
        }

        self.storage.remove(&self.key)?;
        self.view.replace(&self.render(&[]));
        self.notifier.notify("Guestbook cleared!", Severity::Info);
        log::info!("Guestbook cleared");

        Ok(true)
    }

    pub fn render(&self, entries: &[GuestbookEntry]) -> String {
        render::render_entries(entries, self.tz)
    }

    /// Page load: show whatever is stored.
    pub fn refresh(&self) -> Vec<GuestbookEntry> {
        let entries = self.load();
        self.view.replace(&self.render(&entries));
        entries
    }
}
