//! # Folio Editor
//!
//! Side-effect coordination for a structured-content editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ intents: every effect as one tagged union   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: intent dispatch + local state       │
//! │  - Save / autosave / trash / refresh        │
//! │  - Optimistic transactions with revert      │
//! │  - Template reconciliation                  │
//! │  - Node merge resolution                    │
//! │  - Reusable fragment lifecycle              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ services: persistence / notices / parser    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Server authority**: optimistic local state always defers to what the
//!    persistence service actually stored
//! 2. **Exhaustive dispatch**: adding an intent without handling it does not
//!    build
//! 3. **Sequential effects**: one intent runs to completion before the next
//! 4. **Failure ends in a notice**: no handler escapes with a panic or a
//!    dangling transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::{Editor, Intent, NodeTypeRegistry};
//!
//! let mut editor = Editor::new(persistence, notices, parser, registry);
//!
//! editor.dispatch(Intent::Setup {
//!     document,
//!     autosave_snapshot: None,
//!     template: None,
//! }).await?;
//!
//! editor.dispatch(Intent::Edit { fields }).await?;
//! editor.dispatch(Intent::RequestSave { autosave: false }).await?;
//! ```

mod document;
mod editor;
mod errors;
mod intents;
mod merge;
mod messages;
mod registry;
mod reusable;
mod save;
mod selection;
mod services;
mod state;
mod template;
mod transaction;
mod tree;

pub use document::{Document, Edits, Status};
pub use editor::Editor;
pub use errors::{EditorError, RequestError};
pub use intents::Intent;
pub use messages::{
    AUTOSAVE_NOTICE_ID, NO_CHANGES_CODE, REUSABLE_NOTICE_ID, SAVE_NOTICE_ID, TRASH_NOTICE_ID,
    UNKNOWN_ERROR_CODE,
};
pub use registry::{NodeTypeDef, NodeTypeRegistry};
pub use reusable::{
    EntryId, ReusableEntry, DEFAULT_REUSABLE_TITLE, LAYOUT_ATTRIBUTE, REF_ATTRIBUTE,
    REUSABLE_COLLECTION,
};
pub use save::SAVE_TRANSACTION_ID;
pub use selection::Selection;
pub use services::{
    ContentParser, DefaultSavePolicy, NoticeOptions, NotificationService, PersistenceService,
    ReadContext, ReadParams, Resource, SavePolicy,
};
pub use state::EditorState;
pub use template::{Template, TemplateLock, TemplateSlot};
pub use tree::{Attributes, Node, NodeData, NodeId, NodeTree};
