//! # Document Model
//!
//! The persisted document plus its unsaved field deltas.
//!
//! A `Document` mirrors what the persistence service last told us, while
//! `edits` accumulates fields changed locally since. Saving applies edits
//! optimistically and clears the applied fields; a transaction revert puts
//! the whole record back.

use serde::{Deserialize, Serialize};

use crate::services::Resource;

/// Document lifecycle status.
///
/// `AutoDraft` is the transient status a freshly created document carries
/// until its first real save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    AutoDraft,
    Draft,
    Pending,
    Publish,
    Private,
    Future,
    Trash,
}

impl Status {
    /// Publish, private and scheduled all count as published when selecting
    /// save notices.
    pub fn is_published_family(self) -> bool {
        matches!(self, Status::Publish | Status::Private | Status::Future)
    }
}

/// Partial-field delta over a document. Absent fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Edits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl Edits {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.excerpt.is_none() && self.status.is_none()
    }

    /// Restrict to the fields autosave is allowed to carry.
    pub fn autosave_fields(&self) -> Edits {
        Edits {
            title: self.title.clone(),
            content: self.content.clone(),
            excerpt: self.excerpt.clone(),
            status: None,
        }
    }

    /// Overlay `other`; fields present in `other` win.
    pub fn merge(&mut self, other: Edits) {
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.content.is_some() {
            self.content = other.content;
        }
        if other.excerpt.is_some() {
            self.excerpt = other.excerpt;
        }
        if other.status.is_some() {
            self.status = other.status;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    /// Resource kind, e.g. "post" or "page". Determines the collection name
    /// and the display label used in notices.
    pub kind: String,
    /// Declared content format, if any. Drives the default node type when a
    /// document starts out empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub status: Status,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub edits: Edits,
}

impl Document {
    pub fn collection(&self) -> String {
        format!("{}s", self.kind)
    }

    /// Display label for notices: "post" becomes "Post".
    pub fn label(&self) -> String {
        let mut chars = self.kind.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }

    /// A document that has never been really saved.
    pub fn is_new(&self) -> bool {
        self.status == Status::AutoDraft
    }

    /// Optimistically apply a delta: set the fields it carries and clear the
    /// matching pending edits.
    pub fn apply_edits(&mut self, edits: &Edits) {
        if let Some(title) = &edits.title {
            self.title = title.clone();
            self.edits.title = None;
        }
        if let Some(content) = &edits.content {
            self.content = content.clone();
            self.edits.content = None;
        }
        if let Some(excerpt) = &edits.excerpt {
            self.excerpt = excerpt.clone();
            self.edits.excerpt = None;
        }
        if let Some(status) = edits.status {
            self.status = status;
            self.edits.status = None;
        }
    }

    /// Overwrite local fields from a resource the service returned.
    pub fn reset_from(&mut self, resource: &Resource) {
        self.id = resource.id;
        if let Some(status) = resource.status {
            self.status = status;
        }
        if let Some(title) = &resource.title {
            self.title = title.clone();
        }
        if let Some(content) = &resource.content {
            self.content = content.clone();
        }
        if let Some(excerpt) = &resource.excerpt {
            self.excerpt = excerpt.clone();
        }
    }
}
