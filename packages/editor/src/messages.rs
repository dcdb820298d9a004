//! # Notice Selection
//!
//! Maps save/trash outcomes to user-facing messages. Selection is driven by
//! whether the previous and new statuses fall in the published family
//! (publish, private, scheduled), so a draft-to-draft update stays silent
//! while a publish gets its status-specific message.

use crate::document::Status;
use crate::errors::RequestError;

/// Notice ids. Stable so a newer notice replaces the prior one.
pub const SAVE_NOTICE_ID: &str = "editor-save";
pub const AUTOSAVE_NOTICE_ID: &str = "editor-autosave";
pub const TRASH_NOTICE_ID: &str = "editor-trash";
pub const REUSABLE_NOTICE_ID: &str = "editor-reusable";

/// Error code the service uses to reject an autosave that carries nothing
/// new. Not a real failure; never surfaced.
pub const NO_CHANGES_CODE: &str = "autosave_no_changes";

/// Error code for failures the service could not classify. Messages carrying
/// it are replaced with a canned fallback.
pub const UNKNOWN_ERROR_CODE: &str = "unknown_error";

/// A selected success notice for a completed full save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveNotice {
    pub message: String,
    /// Whether a view link to the resource should accompany the message.
    pub include_link: bool,
}

/// Success message for a full save, or `None` when both statuses sit outside
/// the published family (a plain draft update stays silent).
pub fn save_success_notice(label: &str, previous: Status, next: Status) -> Option<SaveNotice> {
    match (previous.is_published_family(), next.is_published_family()) {
        (false, false) => None,
        (true, false) => Some(SaveNotice {
            message: format!("{label} reverted to draft."),
            include_link: false,
        }),
        (false, true) => {
            let message = match next {
                Status::Private => format!("{label} published privately!"),
                Status::Future => format!("{label} scheduled!"),
                _ => format!("{label} published!"),
            };
            Some(SaveNotice {
                message,
                include_link: true,
            })
        }
        (true, true) => Some(SaveNotice {
            message: format!("{label} updated!"),
            include_link: true,
        }),
    }
}

/// Failure message for a full save, or `None` when the error is the
/// recognized no-changes rejection.
pub fn save_failure_notice(attempted_status: Option<Status>, error: &RequestError) -> Option<String> {
    if error.code == NO_CHANGES_CODE {
        return None;
    }
    let message = match attempted_status {
        Some(Status::Publish) | Some(Status::Private) => "Publishing failed.",
        Some(Status::Future) => "Scheduling failed.",
        _ => "Updating failed.",
    };
    Some(message.to_string())
}

/// Trash failures prefer the server's own message unless it is missing or
/// carries the unknown code.
pub fn trash_failure_message(error: &RequestError) -> String {
    if error.code == UNKNOWN_ERROR_CODE || error.message.is_empty() {
        "Trashing failed.".to_string()
    } else {
        error.message.clone()
    }
}
