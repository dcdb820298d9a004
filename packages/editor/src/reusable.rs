//! # Reusable Content
//!
//! Lifecycle of reusable fragments: named, independently persisted subtrees
//! referenced from the document by lightweight reference nodes.
//!
//! ## Identity
//!
//! An entry converted locally starts with a temporary id. The first
//! successful create promotes it to the persisted id the service assigned;
//! the promotion is recorded as a mapping and every reference node pointing
//! at the temporary id is re-pointed. Deleting or re-saving through a stale
//! temporary id after promotion is a caller error the mapping absorbs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::editor::Editor;
use crate::errors::EditorError;
use crate::messages::REUSABLE_NOTICE_ID;
use crate::services::{NoticeOptions, ReadParams, Resource};
use crate::transaction::{Phase, Snapshot};
use crate::tree::{Attributes, NodeId};

pub const REUSABLE_COLLECTION: &str = "reusables";

/// Attribute a reference node carries to name its entry.
pub const REF_ATTRIBUTE: &str = "ref";

/// Layout survives conversion between concrete and reference form.
pub const LAYOUT_ATTRIBUTE: &str = "layout";

pub const DEFAULT_REUSABLE_TITLE: &str = "Untitled reusable fragment";

/// Identity of a reusable entry. `Temporary` exists only until the first
/// successful create returns the persisted id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryId {
    Temporary(u64),
    Persisted(u64),
}

impl EntryId {
    pub fn is_temporary(self) -> bool {
        matches!(self, EntryId::Temporary(_))
    }

    pub fn raw(self) -> u64 {
        match self {
            EntryId::Temporary(raw) | EntryId::Persisted(raw) => raw,
        }
    }

    /// Attribute value a reference node stores for this id.
    pub fn to_attribute(self) -> Value {
        match self {
            EntryId::Temporary(raw) => json!({ "temporary": raw }),
            EntryId::Persisted(raw) => json!({ "persisted": raw }),
        }
    }

    pub fn from_attribute(value: &Value) -> Option<EntryId> {
        if let Some(raw) = value.get("temporary").and_then(Value::as_u64) {
            return Some(EntryId::Temporary(raw));
        }
        value.get("persisted").and_then(Value::as_u64).map(EntryId::Persisted)
    }
}

/// A reusable fragment and the detached node holding its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReusableEntry {
    pub id: EntryId,
    pub node: NodeId,
    pub title: String,
}

impl ReusableEntry {
    pub fn is_temporary(&self) -> bool {
        self.id.is_temporary()
    }
}

impl Editor {
    pub(crate) async fn handle_fetch_reusable(&mut self, id: Option<u64>) -> Result<(), EditorError> {
        debug!(?id, "fetching reusable entries");
        match self
            .persistence
            .read(REUSABLE_COLLECTION, id, ReadParams::edit())
            .await
        {
            Ok(entries) => self.handle_receive_reusable(entries).await,
            Err(error) => {
                warn!(%error, "fetching reusable entries failed");
                Ok(())
            }
        }
    }

    pub(crate) async fn handle_receive_reusable(
        &mut self,
        entries: Vec<Resource>,
    ) -> Result<(), EditorError> {
        for resource in entries {
            let content = resource.content.as_deref().unwrap_or_default();
            let Some(data) = self.parser.parse(content).into_iter().next() else {
                continue;
            };
            let node = self.state.tree.insert_data(&data);
            let entry = ReusableEntry {
                id: EntryId::Persisted(resource.id),
                node,
                title: resource.title.clone().unwrap_or_default(),
            };
            if let Some(previous) = self.state.reusables.insert(entry.id, entry) {
                self.state.tree.remove(&[previous.node]);
            }
        }
        Ok(())
    }

    pub(crate) async fn handle_save_reusable(&mut self, id: EntryId) -> Result<(), EditorError> {
        let id = self.state.current_entry_id(id);
        let Some(entry) = self.state.reusables.get(&id).cloned() else {
            return Ok(());
        };
        let Some(data) = self.state.tree.data_of(entry.node) else {
            return Ok(());
        };
        let content = self.parser.serialize(std::slice::from_ref(&data));
        let payload = Resource {
            title: Some(entry.title.clone()),
            content: Some(content),
            ..Default::default()
        };

        let creating = entry.is_temporary();
        let result = if creating {
            self.persistence.create(REUSABLE_COLLECTION, &payload).await
        } else {
            let payload = Resource {
                id: id.raw(),
                ..payload
            };
            self.persistence
                .update(REUSABLE_COLLECTION, id.raw(), &payload)
                .await
        };

        match result {
            Ok(saved) => {
                if creating {
                    self.promote_entry(id, saved.id);
                }
                let message = if creating {
                    "Reusable fragment created."
                } else {
                    "Reusable fragment updated."
                };
                self.notices
                    .success(message, NoticeOptions::with_id(REUSABLE_NOTICE_ID));
            }
            Err(error) => {
                // the entry keeps its prior persisted/temporary state
                self.notices
                    .error(&error.message, NoticeOptions::with_id(REUSABLE_NOTICE_ID));
            }
        }
        Ok(())
    }

    pub(crate) async fn handle_delete_reusable(&mut self, id: EntryId) -> Result<(), EditorError> {
        let id = self.state.current_entry_id(id);
        // referential guard: unknown or never-persisted entries are refused
        // silently, with no request issued
        let Some(entry) = self.state.reusables.get(&id).cloned() else {
            return Ok(());
        };
        if entry.is_temporary() {
            return Ok(());
        }

        let mut targets =
            self.state
                .tree
                .find_by_attribute(self.registry.reference_type(), REF_ATTRIBUTE, &id.to_attribute());
        targets.push(entry.node);

        let transaction_id = format!("reusable-delete-{}", id.raw());
        self.transactions.begin(
            &transaction_id,
            Snapshot::Reusable {
                tree: self.state.tree.clone(),
                entry: entry.clone(),
            },
        );
        self.state.reusables.remove(&id);
        self.state.tree.remove(&targets);

        match self.persistence.delete(REUSABLE_COLLECTION, id.raw()).await {
            Ok(()) => {
                self.transactions.resolve(&transaction_id, Phase::Commit);
                self.notices.success(
                    "Reusable fragment deleted.",
                    NoticeOptions::with_id(REUSABLE_NOTICE_ID),
                );
            }
            Err(error) => {
                self.apply_revert(&transaction_id);
                self.notices
                    .error(&error.message, NoticeOptions::with_id(REUSABLE_NOTICE_ID));
            }
        }
        Ok(())
    }

    pub(crate) async fn handle_convert_to_static(&mut self, node: NodeId) -> Result<(), EditorError> {
        let Some(reference) = self.state.tree.get(node) else {
            return Ok(());
        };
        if reference.type_name != self.registry.reference_type() {
            return Ok(());
        }
        let Some(entry_id) = reference
            .attributes
            .get(REF_ATTRIBUTE)
            .and_then(EntryId::from_attribute)
        else {
            return Ok(());
        };
        let entry_id = self.state.current_entry_id(entry_id);
        let Some(entry) = self.state.reusables.get(&entry_id) else {
            return Ok(());
        };
        // a fresh copy: the reference is broken, the content duplicated
        let Some(data) = self.state.tree.data_of(entry.node) else {
            return Ok(());
        };
        let replacement = self.state.tree.insert_data(&data);
        self.state.tree.replace(&[node], vec![replacement]);
        Ok(())
    }

    pub(crate) async fn handle_convert_to_reusable(&mut self, node: NodeId) -> Result<(), EditorError> {
        let Some(original) = self.state.tree.data_of(node) else {
            return Ok(());
        };
        let id = self.state.allocate_temporary_id();
        self.state.reusables.insert(
            id,
            ReusableEntry {
                id,
                node,
                title: DEFAULT_REUSABLE_TITLE.to_string(),
            },
        );
        self.handle_save_reusable(id).await?;
        // saving may already have promoted the temporary id
        let current = self.state.current_entry_id(id);

        let mut attributes = Attributes::new();
        attributes.insert(REF_ATTRIBUTE.to_string(), current.to_attribute());
        if let Some(layout) = original.attributes.get(LAYOUT_ATTRIBUTE) {
            attributes.insert(LAYOUT_ATTRIBUTE.to_string(), layout.clone());
        }
        let reference_type = self.registry.reference_type().to_string();
        let reference = self.state.tree.alloc(reference_type, attributes);
        self.state.tree.replace(&[node], vec![reference]);
        // the replace dropped the original node's registration, but the entry
        // still addresses it; put the content back under the same handle
        self.state.tree.register(node, &original);
        Ok(())
    }

    fn promote_entry(&mut self, from: EntryId, persisted: u64) {
        debug!(?from, persisted, "promoting reusable entry");
        if let Some(mut entry) = self.state.reusables.remove(&from) {
            entry.id = EntryId::Persisted(persisted);
            self.state.reusables.insert(entry.id, entry);
        }
        if let EntryId::Temporary(raw) = from {
            self.state.promotions.insert(raw, persisted);
        }
        let reference_type = self.registry.reference_type().to_string();
        let stale = from.to_attribute();
        let fresh = EntryId::Persisted(persisted).to_attribute();
        for reference in self
            .state
            .tree
            .find_by_attribute(&reference_type, REF_ATTRIBUTE, &stale)
        {
            self.state.tree.set_attribute(reference, REF_ATTRIBUTE, fresh.clone());
        }
    }
}
