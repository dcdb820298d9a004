//! # Intents
//!
//! Every effect the coordinator can be asked to run, as one exhaustive
//! tagged union. Dispatch is a compile-time-checked `match`; adding a
//! variant without handling it does not build.
//!
//! An intent is immutable once dispatched. Request completions arrive as
//! their own intents (`SaveSuccess`, `SaveFailure`, `TrashFailure`,
//! `ReceiveReusable`) so the follow-up path is replayable.

use serde::{Deserialize, Serialize};

use crate::document::{Document, Edits};
use crate::errors::RequestError;
use crate::reusable::EntryId;
use crate::services::Resource;
use crate::template::Template;
use crate::tree::NodeId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Save the document; `autosave` restricts the payload and stays silent.
    RequestSave { autosave: bool },

    /// A save request completed.
    SaveSuccess {
        previous: Document,
        updated: Resource,
        autosave: bool,
    },

    /// A save request was rejected.
    SaveFailure {
        previous: Document,
        attempted_edits: Edits,
        error: RequestError,
    },

    /// Move the document to the trash.
    Trash { id: u64 },

    /// A trash request was rejected.
    TrashFailure { error: RequestError },

    /// Refetch the canonical resource and replace local state. No optimism.
    Refresh,

    /// Combine two adjacent nodes into one.
    MergeNodes { first: NodeId, second: NodeId },

    /// Initialize the editor with a document and its surroundings.
    Setup {
        document: Document,
        autosave_snapshot: Option<Resource>,
        template: Option<Template>,
    },

    /// Reconcile the tree against the template; always yields a valid tree.
    SynchronizeTemplate,

    /// Recompute template validity without touching the tree.
    CheckTemplateValidity,

    /// Fetch one reusable entry, or all of them.
    FetchReusable { id: Option<u64> },

    /// Reusable entries arrived from the service.
    ReceiveReusable { entries: Vec<Resource> },

    /// Persist a reusable entry (create when temporary, update otherwise).
    SaveReusable { id: EntryId },

    /// Delete a persisted reusable entry and every node referencing it.
    DeleteReusable { id: EntryId },

    /// Replace a reference node with a concrete copy of its entry's content.
    ConvertToStatic { node: NodeId },

    /// Extract a node into a new reusable entry and reference it.
    ConvertToReusable { node: NodeId },

    /// Surface an ad-hoc success notice.
    NoticeCreated {
        content: String,
        spoken_message: Option<String>,
    },

    /// Accumulate unsaved field changes on the document.
    Edit { fields: Edits },

    SelectionCleared,

    NodeSelected { node: NodeId },

    MultiSelected { start: NodeId, end: NodeId },

    /// Nodes were removed; optionally restore selection to what preceded them.
    NodesRemoved {
        nodes: Vec<NodeId>,
        select_previous: bool,
    },
}
