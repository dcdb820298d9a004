//! Local editor state the coordinator reads and mutates through intents.

use std::collections::HashMap;

use crate::document::Document;
use crate::reusable::{EntryId, ReusableEntry};
use crate::selection::Selection;
use crate::services::Resource;
use crate::template::Template;
use crate::tree::NodeTree;

#[derive(Debug, Clone)]
pub struct EditorState {
    /// The document being edited. `None` until a `Setup` intent arrives.
    pub document: Option<Document>,
    /// The structured content tree, including detached reusable nodes.
    pub tree: NodeTree,
    pub selection: Selection,
    /// Last known autosave resource, used to backfill autosave payloads.
    pub autosave: Option<Resource>,
    pub template: Option<Template>,
    /// Whether the tree currently conforms to a fully locked template.
    pub template_valid: bool,
    /// Reusable fragments by entry id.
    pub reusables: HashMap<EntryId, ReusableEntry>,
    /// Temporary ids that have been promoted, mapped to their persisted ids.
    pub promotions: HashMap<u64, u64>,
    /// Set when a save completed but edits were still pending afterwards.
    pub(crate) forced_dirty: bool,
    next_temporary_id: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            document: None,
            tree: NodeTree::default(),
            selection: Selection::None,
            autosave: None,
            template: None,
            template_valid: true,
            reusables: HashMap::new(),
            promotions: HashMap::new(),
            forced_dirty: false,
            next_temporary_id: 1,
        }
    }
}

impl EditorState {
    /// Whether the document carries unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.forced_dirty
            || self
                .document
                .as_ref()
                .map_or(false, |document| !document.edits.is_empty())
    }

    pub fn reusable(&self, id: EntryId) -> Option<&ReusableEntry> {
        self.reusables.get(&id)
    }

    /// The id a temporary entry currently answers to: its persisted id if it
    /// was promoted, otherwise the id itself.
    pub fn current_entry_id(&self, id: EntryId) -> EntryId {
        match id {
            EntryId::Temporary(raw) => match self.promotions.get(&raw) {
                Some(&persisted) => EntryId::Persisted(persisted),
                None => id,
            },
            EntryId::Persisted(_) => id,
        }
    }

    pub(crate) fn allocate_temporary_id(&mut self) -> EntryId {
        let id = EntryId::Temporary(self.next_temporary_id);
        self.next_temporary_id += 1;
        id
    }
}
