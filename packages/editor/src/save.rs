//! # Save Coordination
//!
//! Orchestrates save, autosave, trash and refresh against the persistence
//! service, with optimistic local application tracked by the save
//! transaction.
//!
//! ## Save sequence
//!
//! 1. Gate through the save policy; a refused save is a silent no-op.
//! 2. Build the payload: all edits for a full save, the {title, content,
//!    excerpt} subset for autosave. A brand-new document with no explicit
//!    status edit gets a draft status injected so it never silently stays
//!    auto-draft.
//! 3. Merge in the serialized tree content and the document id.
//! 4. Begin the save transaction and apply the payload optimistically.
//! 5. Issue the request: autosave creates under the autosaves sub-resource
//!    (backfilled from the last autosave and the document, linked to its
//!    parent); full save clears standing save notices and updates the
//!    document resource.
//! 6. Success resets local state and resolves the transaction: as a revert
//!    when the service stored the change under a different resource identity
//!    (a revision, not the document), as a commit otherwise. Failure always
//!    reverts. Only full saves ever produce a notice.

use tracing::{debug, warn};

use crate::document::{Document, Edits, Status};
use crate::editor::Editor;
use crate::errors::{EditorError, RequestError};
use crate::messages::{self, AUTOSAVE_NOTICE_ID, SAVE_NOTICE_ID, TRASH_NOTICE_ID};
use crate::services::{NoticeOptions, ReadParams, Resource};
use crate::transaction::{Phase, Snapshot};

/// The one transaction id save and autosave share. At most one may be
/// optimistically in flight; overlap is a caller contract violation.
pub const SAVE_TRANSACTION_ID: &str = "save";

impl Editor {
    pub(crate) async fn handle_request_save(&mut self, autosave: bool) -> Result<(), EditorError> {
        let saveable = if autosave {
            self.policy.is_autosaveable(&self.state)
        } else {
            self.policy.is_saveable(&self.state)
        };
        if !saveable {
            debug!(autosave, "save gated; content not in a saveable state");
            return Ok(());
        }

        let previous = self.state.document.clone().ok_or(EditorError::NoDocument)?;
        debug!(autosave, id = previous.id, "saving document");

        let mut edits = if autosave {
            previous.edits.autosave_fields()
        } else {
            previous.edits.clone()
        };
        // a new document must not silently stay in its transient status;
        // explicit status edits still win
        if previous.is_new() && previous.edits.status.is_none() {
            edits.status = Some(Status::Draft);
        }
        edits.content = Some(self.serialized_content());

        let mut payload = Resource {
            id: previous.id,
            status: edits.status,
            title: edits.title.clone(),
            content: edits.content.clone(),
            excerpt: edits.excerpt.clone(),
            ..Default::default()
        };

        self.transactions
            .begin(SAVE_TRANSACTION_ID, Snapshot::Document(previous.clone()));
        if let Some(document) = self.state.document.as_mut() {
            document.apply_edits(&edits);
        }

        let result = if autosave {
            // backfill what the restricted edits left out, then link the
            // autosave to its parent document
            if payload.title.is_none() {
                payload.title = self
                    .state
                    .autosave
                    .as_ref()
                    .and_then(|autosave| autosave.title.clone())
                    .or_else(|| Some(previous.title.clone()));
            }
            if payload.excerpt.is_none() {
                payload.excerpt = self
                    .state
                    .autosave
                    .as_ref()
                    .and_then(|autosave| autosave.excerpt.clone())
                    .or_else(|| Some(previous.excerpt.clone()));
            }
            payload.parent = Some(previous.id);
            let collection = format!("{}/{}/autosaves", previous.collection(), previous.id);
            self.persistence.create(&collection, &payload).await
        } else {
            self.notices.remove(SAVE_NOTICE_ID);
            self.notices.remove(AUTOSAVE_NOTICE_ID);
            self.persistence
                .update(&previous.collection(), previous.id, &payload)
                .await
        };

        match result {
            Ok(updated) => self.handle_save_success(previous, updated, autosave).await,
            Err(error) => {
                self.handle_save_failure_inner(previous, edits, error, autosave)
                    .await
            }
        }
    }

    pub(crate) async fn handle_save_success(
        &mut self,
        previous: Document,
        updated: Resource,
        autosave: bool,
    ) -> Result<(), EditorError> {
        if autosave {
            self.state.autosave = Some(updated.clone());
        } else if let Some(document) = self.state.document.as_mut() {
            document.reset_from(&updated);
        }

        // a result under a different identity means the service stored the
        // change as a revision, not on the document itself: un-apply the
        // optimistic assumption and leave the document dirty
        if updated.id != previous.id {
            self.apply_revert(SAVE_TRANSACTION_ID);
        } else {
            self.transactions.resolve(SAVE_TRANSACTION_ID, Phase::Commit);
        }

        // recomputed on every success: a save that left nothing pending must
        // also clear a mark left behind by an earlier revision-branch revert
        self.state.forced_dirty = self
            .state
            .document
            .as_ref()
            .map_or(false, |document| !document.edits.is_empty());

        if autosave {
            return Ok(());
        }

        let next = updated.status.unwrap_or(previous.status);
        if let Some(notice) = messages::save_success_notice(&previous.label(), previous.status, next)
        {
            let options = NoticeOptions {
                id: Some(SAVE_NOTICE_ID.to_string()),
                spoken_message: None,
                action_link: if notice.include_link {
                    updated.link.clone()
                } else {
                    None
                },
            };
            self.notices.success(&notice.message, options);
        }
        Ok(())
    }

    pub(crate) async fn handle_save_failure(
        &mut self,
        previous: Document,
        attempted_edits: Edits,
        error: RequestError,
    ) -> Result<(), EditorError> {
        self.handle_save_failure_inner(previous, attempted_edits, error, false)
            .await
    }

    async fn handle_save_failure_inner(
        &mut self,
        previous: Document,
        attempted_edits: Edits,
        error: RequestError,
        autosave: bool,
    ) -> Result<(), EditorError> {
        debug!(id = previous.id, autosave, %error, "save failed");
        self.apply_revert(SAVE_TRANSACTION_ID);
        if autosave {
            return Ok(());
        }
        if let Some(message) = messages::save_failure_notice(attempted_edits.status, &error) {
            self.notices
                .error(&message, NoticeOptions::with_id(SAVE_NOTICE_ID));
        }
        Ok(())
    }

    pub(crate) async fn handle_trash(&mut self, id: u64) -> Result<(), EditorError> {
        let document = self.state.document.clone().ok_or(EditorError::NoDocument)?;
        self.notices.remove(TRASH_NOTICE_ID);
        match self.persistence.delete(&document.collection(), id).await {
            Ok(()) => {
                // status only; the rest of the document stays as edited
                if let Some(document) = self.state.document.as_mut() {
                    document.status = Status::Trash;
                }
                Ok(())
            }
            Err(error) => self.handle_trash_failure(error).await,
        }
    }

    pub(crate) async fn handle_trash_failure(&mut self, error: RequestError) -> Result<(), EditorError> {
        let message = messages::trash_failure_message(&error);
        self.notices
            .error(&message, NoticeOptions::with_id(TRASH_NOTICE_ID));
        Ok(())
    }

    pub(crate) async fn handle_refresh(&mut self) -> Result<(), EditorError> {
        let document = self.state.document.clone().ok_or(EditorError::NoDocument)?;
        match self
            .persistence
            .read(&document.collection(), Some(document.id), ReadParams::edit())
            .await
        {
            Ok(resources) => {
                if let Some(resource) = resources.first() {
                    if let Some(document) = self.state.document.as_mut() {
                        document.edits = Edits::default();
                        document.reset_from(resource);
                    }
                    self.state.forced_dirty = false;
                }
                Ok(())
            }
            Err(error) => {
                warn!(id = document.id, %error, "refresh failed");
                Ok(())
            }
        }
    }
}
