//! # Capability Seams
//!
//! External collaborators the coordinator depends on, expressed as narrow
//! traits injected at construction time. Nothing in this crate reaches for a
//! global service.
//!
//! - [`PersistenceService`]: async CRUD over named resource collections.
//! - [`NotificationService`]: user-facing success/error/warning messages,
//!   identified by stable ids so a newer notice replaces the prior one.
//! - [`ContentParser`]: raw content to and from the structured tree form.
//! - [`SavePolicy`]: host-supplied saveability predicates gating save and
//!   autosave.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::Status;
use crate::errors::RequestError;
use crate::state::EditorState;
use crate::tree::NodeData;

/// A record exchanged with the persistence service. Fields a collection does
/// not use stay `None` and are skipped on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Public URL of the resource, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Read-side context: `Edit` asks for the editable representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadContext {
    #[default]
    View,
    Edit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadParams {
    pub context: ReadContext,
}

impl ReadParams {
    pub fn edit() -> Self {
        Self {
            context: ReadContext::Edit,
        }
    }
}

/// Async CRUD over named resource collections. Every failure carries a
/// [`RequestError`] with a service-defined code and message.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    async fn create(&self, collection: &str, data: &Resource) -> Result<Resource, RequestError>;

    async fn update(
        &self,
        collection: &str,
        id: u64,
        data: &Resource,
    ) -> Result<Resource, RequestError>;

    async fn delete(&self, collection: &str, id: u64) -> Result<(), RequestError>;

    /// Read one resource (`id` set) or the whole collection (`id` unset).
    async fn read(
        &self,
        collection: &str,
        id: Option<u64>,
        params: ReadParams,
    ) -> Result<Vec<Resource>, RequestError>;
}

/// Presentation options attached to a notice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeOptions {
    /// Stable id; a later notice with the same id replaces the earlier one.
    pub id: Option<String>,
    /// Variant announced by assistive technology, when it should differ from
    /// the visible message.
    pub spoken_message: Option<String>,
    /// Link to view the affected resource.
    pub action_link: Option<String>,
}

impl NoticeOptions {
    pub fn with_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }
}

pub trait NotificationService: Send + Sync {
    fn success(&self, message: &str, options: NoticeOptions);
    fn error(&self, message: &str, options: NoticeOptions);
    fn warning(&self, message: &str, options: NoticeOptions);
    fn remove(&self, id: &str);
}

/// Converts raw document content to and from the structured tree form.
pub trait ContentParser: Send + Sync {
    fn parse(&self, raw: &str) -> Vec<NodeData>;
    fn serialize(&self, nodes: &[NodeData]) -> String;
}

/// Host-supplied gate deciding whether a save attempt should run at all.
/// A refused save is not an error; nothing happens and no notice appears.
pub trait SavePolicy: Send + Sync {
    fn is_saveable(&self, state: &EditorState) -> bool;
    fn is_autosaveable(&self, state: &EditorState) -> bool;
}

/// Default gate: anything with unsaved changes may save or autosave.
pub struct DefaultSavePolicy;

impl SavePolicy for DefaultSavePolicy {
    fn is_saveable(&self, state: &EditorState) -> bool {
        state.is_dirty()
    }

    fn is_autosaveable(&self, state: &EditorState) -> bool {
        state.is_dirty()
    }
}
