//! Section state manager.
//!
//! Keeps the sections of one page in step with the store. Store failures
//! never escape the per-section operations: they are logged, completion
//! falls back to a marker that lives only as long as this manager, and the
//! visible state is updated either way.

use std::ops::Range;

use tracing::{debug, error, info, warn};

use crate::backup::{Backup, ImportReport};
use crate::config::DEFAULT_BACKUP_SUFFIX;
use crate::error::{Error, Result};
use crate::format::{apply_emphasis, normalize_selection, Emphasis};
use crate::keys::{PageContext, COMPLETED_SENTINEL};
use crate::section::{NoteField, Section, SectionStatus};
use crate::storage::KeyValueStore;
use crate::ui::{Prompt, UiUpdate, CLEAR_NOTE_PROMPT};

const EXPORT_UNAVAILABLE: &str = "Export requires storage support";
const IMPORT_SUCCEEDED: &str = "Data imported successfully!";
const IMPORT_FAILED: &str = "Error importing data. Please check the file format.";

/// Completion and note state of every section on one page.
#[derive(Debug)]
pub struct SectionStateManager<S> {
    store: S,
    context: PageContext,
    sections: Vec<Section>,
    backup_suffix: String,
}

impl<S: KeyValueStore> SectionStateManager<S> {
    /// Create a manager for the sections of the page described by `context`.
    ///
    /// Nothing is read until [`load`](Self::load) runs.
    #[must_use]
    pub fn new(store: S, context: PageContext, sections: Vec<Section>) -> Self {
        Self {
            store,
            context,
            sections,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }

    /// Use `suffix` when naming exported backups.
    #[must_use]
    pub fn with_backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }

    /// The page this manager works on.
    #[must_use]
    pub fn context(&self) -> &PageContext {
        &self.context
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give back the store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// All sections in page order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a section by id.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        let found = self.sections.iter().position(|s| s.id == id);
        if found.is_none() {
            debug!("No section {id} on {}", self.context.page_path);
        }
        found
    }

    fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        let index = self.position(id)?;
        self.sections.get_mut(index)
    }

    /// Apply stored state to every section, as on page start.
    ///
    /// A failed read falls back to the in-memory completion marker; after a
    /// failed completion read the note is skipped.
    pub fn load(&mut self) -> Vec<UiUpdate> {
        let mut updates = Vec::new();

        for section in &mut self.sections {
            let completion_key = self.context.completion_key(&section.id);
            match self.store.get(&completion_key) {
                Ok(Some(value)) if !value.is_empty() => {
                    section.completed = true;
                    updates.push(style_update(section));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Store not available for loading {}: {e}", section.id);
                    if section.fallback_completed {
                        section.completed = true;
                        updates.push(style_update(section));
                    }
                    continue;
                }
            }

            let Some(note) = section.note.as_mut() else {
                continue;
            };
            match self.store.get(&self.context.notes_key(&section.id)) {
                Ok(Some(text)) if !text.is_empty() => {
                    *note = NoteField::with_text(text);
                    updates.push(UiUpdate::NoteText {
                        section: section.id.clone(),
                        text: note.text.clone(),
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Store not available for loading notes of {}: {e}", section.id);
                    if section.fallback_completed && !section.completed {
                        section.completed = true;
                        updates.push(style_update(section));
                    }
                }
            }
        }

        // Every counter is refreshed on start, stored note or not.
        for section in &self.sections {
            if section.note.is_some() {
                updates.push(char_count_update(section));
            }
        }

        debug!(
            "Loaded {} sections for {}",
            self.sections.len(),
            self.context.page_path
        );
        updates
    }

    /// Forget the in-memory view and load again from the store.
    ///
    /// Stands in for a page reload, so the fallback markers go too.
    pub fn reload(&mut self) -> Vec<UiUpdate> {
        for section in &mut self.sections {
            section.completed = false;
            section.fallback_completed = false;
            if let Some(note) = section.note.as_mut() {
                *note = NoteField::default();
            }
        }
        self.load()
    }

    /// Mark a section complete.
    pub fn mark_complete(&mut self, id: &str) -> Vec<UiUpdate> {
        let Some(index) = self.position(id) else {
            return Vec::new();
        };
        let key = self.context.completion_key(id);
        let result = self.store.set(&key, COMPLETED_SENTINEL);

        let section = &mut self.sections[index];
        if let Err(e) = result {
            warn!("Store not available, completion of {id} will not persist: {e}");
            section.fallback_completed = true;
        }
        section.completed = true;
        vec![style_update(section)]
    }

    /// Clear a section's completion.
    pub fn unmark(&mut self, id: &str) -> Vec<UiUpdate> {
        let Some(index) = self.position(id) else {
            return Vec::new();
        };
        let key = self.context.completion_key(id);
        let result = self.store.remove(&key);

        let section = &mut self.sections[index];
        if let Err(e) = result {
            warn!("Store not available, unmarking {id} will not persist: {e}");
            section.fallback_completed = false;
        }
        section.completed = false;
        vec![style_update(section)]
    }

    /// Replace a section's note text, as typed, and save it.
    pub fn edit_note(&mut self, id: &str, text: &str) -> Vec<UiUpdate> {
        let Some(section) = self.section_mut(id) else {
            return Vec::new();
        };
        let Some(note) = section.note.as_mut() else {
            return Vec::new();
        };
        *note = NoteField::with_text(text);
        let updates = vec![char_count_update(section)];

        self.save_note(id, text);
        updates
    }

    /// Move the selection inside a section's note input.
    pub fn select(&mut self, id: &str, selection: Range<usize>) -> Vec<UiUpdate> {
        let Some(note) = self.section_mut(id).and_then(|s| s.note.as_mut()) else {
            return Vec::new();
        };
        note.selection = normalize_selection(&note.text, selection);
        Vec::new()
    }

    /// Wrap the current selection of a note in bold or italic delimiters.
    ///
    /// Without a selection the text is left alone, but it is still saved.
    pub fn apply_format(&mut self, id: &str, emphasis: Emphasis) -> Vec<UiUpdate> {
        let Some(section) = self.section_mut(id) else {
            return Vec::new();
        };
        let section_id = section.id.clone();
        let Some(note) = section.note.as_mut() else {
            return Vec::new();
        };

        let mut updates = Vec::new();
        if let Some(formatted) = apply_emphasis(&note.text, note.selection.clone(), emphasis) {
            debug!("Applied {emphasis} to {section_id}");
            note.text = formatted.text;
            note.selection = formatted.selection;
            updates.push(UiUpdate::NoteText {
                section: section_id.clone(),
                text: note.text.clone(),
            });
            updates.push(UiUpdate::Focus {
                section: section_id.clone(),
            });
            updates.push(UiUpdate::Selection {
                section: section_id.clone(),
                selection: note.selection.clone(),
            });
        }
        let text = note.text.clone();
        updates.push(char_count_update(section));

        self.save_note(id, &text);
        updates
    }

    /// Empty a section's note after the user confirms.
    pub fn clear_note(&mut self, id: &str, prompt: &mut dyn Prompt) -> Vec<UiUpdate> {
        let has_note = self.section(id).is_some_and(|s| s.note.is_some());
        if !has_note || !prompt.confirm(CLEAR_NOTE_PROMPT) {
            return Vec::new();
        }

        let mut updates = Vec::new();
        if let Some(section) = self.section_mut(id) {
            section.note = Some(NoteField::default());
            updates.push(UiUpdate::NoteText {
                section: section.id.clone(),
                text: String::new(),
            });
            updates.push(char_count_update(section));
            updates.push(UiUpdate::Focus {
                section: section.id.clone(),
            });
        }

        if let Err(e) = self.store.remove(&self.context.notes_key(id)) {
            warn!("Store not available, note of {id} not removed: {e}");
        }
        updates
    }

    /// Collect every stored entry of this page into a backup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the store cannot be enumerated
    /// or read.
    pub fn export(&self) -> Result<Backup> {
        let unavailable = |e: Error| Error::store_unavailable(e.to_string());

        let mut backup = Backup::new();
        for key in self.store.keys().map_err(unavailable)? {
            if !self.context.owns(&key) {
                continue;
            }
            if let Some(value) = self.store.get(&key).map_err(unavailable)? {
                backup.insert(key, value);
            }
        }
        info!(
            "Exported {} entries for {}",
            backup.len(),
            self.context.page_path
        );
        Ok(backup)
    }

    /// Export and hand the backup to the host as a download.
    ///
    /// An unusable store turns into an alert and no download.
    pub fn export_download(&self) -> Vec<UiUpdate> {
        let contents = self.export().and_then(|backup| backup.to_pretty_json());
        match contents {
            Ok(contents) => vec![UiUpdate::Download {
                file_name: self.context.backup_file_name(&self.backup_suffix),
                contents,
            }],
            Err(e) => {
                warn!("Export aborted: {e}");
                vec![UiUpdate::alert(EXPORT_UNAVAILABLE)]
            }
        }
    }

    /// Write the entries of a backup document that belong to this page.
    ///
    /// Entries of other pages are skipped. A refused write is logged and
    /// counted; the remaining entries are still written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedBackup`] before writing anything if the
    /// document does not parse.
    pub fn import(&mut self, text: &str) -> Result<ImportReport> {
        let backup = Backup::parse(text)?;

        let mut report = ImportReport::default();
        for (key, value) in backup.iter() {
            if !self.context.owns(key) {
                report.skipped += 1;
                continue;
            }
            match self.store.set(key, value) {
                Ok(()) => report.written += 1,
                Err(e) => {
                    warn!("Store not available for import of {key}: {e}");
                    report.failed += 1;
                }
            }
        }
        info!(
            "Imported {} entries into {} ({} skipped, {} failed)",
            report.written, self.context.page_path, report.skipped, report.failed
        );
        Ok(report)
    }

    /// Import an uploaded file and reload, reporting the outcome to the user.
    pub fn import_file(&mut self, text: &str) -> Vec<UiUpdate> {
        match self.import(text) {
            Ok(_) => {
                let mut updates = vec![UiUpdate::alert(IMPORT_SUCCEEDED), UiUpdate::Reload];
                updates.extend(self.reload());
                updates
            }
            Err(e) => {
                error!("Import error: {e}");
                vec![UiUpdate::alert(IMPORT_FAILED)]
            }
        }
    }

    fn save_note(&mut self, id: &str, text: &str) {
        if let Err(e) = self.store.set(&self.context.notes_key(id), text) {
            warn!("Store not available, note of {id} not saved: {e}");
        }
    }
}

fn style_update(section: &Section) -> UiUpdate {
    UiUpdate::SectionStyle {
        section: section.id.clone(),
        status: SectionStatus::from_completed(section.completed),
    }
}

fn char_count_update(section: &Section) -> UiUpdate {
    UiUpdate::CharCount {
        section: section.id.clone(),
        count: section.char_count(),
    }
}
