//! # Effect Coordinator
//!
//! The `Editor` owns local state and the injected capability seams, and
//! turns intents into persistence requests, local mutations and notices.
//!
//! Handlers run synchronously up to their first outstanding request, then
//! suspend; completion always runs the follow-up path, success or failure.
//! No error escapes a handler as a panic or stray `Err`; failure paths end
//! in a notice and/or a transaction resolution.

use std::sync::Arc;

use tracing::debug;

use crate::errors::EditorError;
use crate::intents::Intent;
use crate::merge::{self, MergeOutcome};
use crate::registry::NodeTypeRegistry;
use crate::selection::{self, Selection};
use crate::services::{
    ContentParser, DefaultSavePolicy, NoticeOptions, NotificationService, PersistenceService,
    Resource, SavePolicy,
};
use crate::state::EditorState;
use crate::template::{Template, TemplateLock};
use crate::transaction::{Phase, Snapshot, TransactionManager};
use crate::tree::{Attributes, NodeId, NodeTree};
use crate::document::{Document, Edits};

pub struct Editor {
    pub(crate) state: EditorState,
    pub(crate) persistence: Arc<dyn PersistenceService>,
    pub(crate) notices: Arc<dyn NotificationService>,
    pub(crate) parser: Arc<dyn ContentParser>,
    pub(crate) policy: Box<dyn SavePolicy>,
    pub(crate) registry: NodeTypeRegistry,
    pub(crate) transactions: TransactionManager,
}

impl Editor {
    pub fn new(
        persistence: Arc<dyn PersistenceService>,
        notices: Arc<dyn NotificationService>,
        parser: Arc<dyn ContentParser>,
        registry: NodeTypeRegistry,
    ) -> Self {
        Self {
            state: EditorState::default(),
            persistence,
            notices,
            parser,
            policy: Box::new(DefaultSavePolicy),
            registry,
            transactions: TransactionManager::new(),
        }
    }

    /// Replace the default save gate.
    pub fn with_policy(mut self, policy: Box<dyn SavePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    /// Handle one intent to completion, including its follow-up path.
    pub async fn dispatch(&mut self, intent: Intent) -> Result<(), EditorError> {
        match intent {
            Intent::RequestSave { autosave } => self.handle_request_save(autosave).await,
            Intent::SaveSuccess {
                previous,
                updated,
                autosave,
            } => self.handle_save_success(previous, updated, autosave).await,
            Intent::SaveFailure {
                previous,
                attempted_edits,
                error,
            } => self.handle_save_failure(previous, attempted_edits, error).await,
            Intent::Trash { id } => self.handle_trash(id).await,
            Intent::TrashFailure { error } => self.handle_trash_failure(error).await,
            Intent::Refresh => self.handle_refresh().await,
            Intent::MergeNodes { first, second } => {
                self.handle_merge_nodes(first, second);
                Ok(())
            }
            Intent::Setup {
                document,
                autosave_snapshot,
                template,
            } => {
                self.handle_setup(document, autosave_snapshot, template);
                Ok(())
            }
            Intent::SynchronizeTemplate => {
                self.handle_synchronize_template();
                Ok(())
            }
            Intent::CheckTemplateValidity => {
                self.handle_check_template_validity();
                Ok(())
            }
            Intent::FetchReusable { id } => self.handle_fetch_reusable(id).await,
            Intent::ReceiveReusable { entries } => self.handle_receive_reusable(entries).await,
            Intent::SaveReusable { id } => self.handle_save_reusable(id).await,
            Intent::DeleteReusable { id } => self.handle_delete_reusable(id).await,
            Intent::ConvertToStatic { node } => self.handle_convert_to_static(node).await,
            Intent::ConvertToReusable { node } => self.handle_convert_to_reusable(node).await,
            Intent::NoticeCreated {
                content,
                spoken_message,
            } => {
                self.notices.success(
                    &content,
                    NoticeOptions {
                        id: None,
                        spoken_message,
                        action_link: None,
                    },
                );
                Ok(())
            }
            Intent::Edit { fields } => {
                self.handle_edit(fields);
                Ok(())
            }
            Intent::SelectionCleared => {
                self.state.selection = Selection::None;
                Ok(())
            }
            Intent::NodeSelected { node } => {
                self.state.selection = Selection::Node(node);
                Ok(())
            }
            Intent::MultiSelected { start, end } => {
                self.state.selection = Selection::Multi { start, end };
                Ok(())
            }
            Intent::NodesRemoved {
                nodes,
                select_previous,
            } => {
                self.handle_nodes_removed(nodes, select_previous);
                Ok(())
            }
        }
    }

    fn handle_setup(
        &mut self,
        document: Document,
        autosave_snapshot: Option<Resource>,
        template: Option<Template>,
    ) {
        debug!(id = document.id, "setting up editor");
        let mut tree = NodeTree::default();
        let mut valid = true;

        if !document.content.is_empty() {
            let data = self.parser.parse(&document.content);
            let roots = data.iter().map(|node| tree.insert_data(node)).collect();
            tree.set_roots(roots);
            if let Some(template) = &template {
                if template.lock == TemplateLock::All && !template.matches(&tree.roots_data()) {
                    valid = false;
                }
            }
        } else if let Some(template) = &template {
            tree.replace_roots(&template.reconcile(&[]));
        } else if let Some(type_name) = document
            .format
            .as_deref()
            .and_then(|format| self.registry.default_type_for_format(format))
        {
            let node = tree.alloc(type_name.to_string(), Attributes::new());
            tree.set_roots(vec![node]);
        }

        self.state.document = Some(document);
        self.state.autosave = autosave_snapshot;
        self.state.template = template;
        self.state.template_valid = valid;
        self.state.tree = tree;
        self.state.selection = Selection::None;
        self.state.forced_dirty = false;
    }

    fn handle_synchronize_template(&mut self) {
        if let Some(template) = self.state.template.clone() {
            let existing = self.state.tree.roots_data();
            self.state.tree.replace_roots(&template.reconcile(&existing));
        }
        // synchronization always produces a conforming result
        self.state.template_valid = true;
    }

    fn handle_check_template_validity(&mut self) {
        self.state.template_valid = match &self.state.template {
            Some(template) if template.lock == TemplateLock::All => {
                template.matches(&self.state.tree.roots_data())
            }
            _ => true,
        };
    }

    fn handle_edit(&mut self, fields: Edits) {
        if let Some(document) = self.state.document.as_mut() {
            document.edits.merge(fields);
        }
    }

    fn handle_merge_nodes(&mut self, first: NodeId, second: NodeId) {
        match merge::resolve_merge(&mut self.state.tree, &self.registry, first, second) {
            MergeOutcome::SelectFirst => self.state.selection = Selection::Node(first),
            MergeOutcome::Unchanged | MergeOutcome::Merged => {}
        }
    }

    fn handle_nodes_removed(&mut self, nodes: Vec<NodeId>, select_previous: bool) {
        if !select_previous {
            self.state.tree.remove(&nodes);
            return;
        }
        // selection restoration reads the tree as it was before the removal
        let snapshot = self.state.tree.clone();
        self.state.tree.remove(&nodes);
        if let Some(target) = selection::restore_after_removal(&snapshot, &nodes) {
            if self.state.selection != Selection::Node(target) {
                self.state.selection = Selection::Node(target);
            }
        }
    }

    /// The reconciler's revert half: unwind the snapshot an open transaction
    /// captured at begin.
    pub(crate) fn apply_revert(&mut self, transaction_id: &str) {
        match self.transactions.resolve(transaction_id, Phase::Revert) {
            Some(Snapshot::Document(document)) => {
                self.state.document = Some(document);
            }
            Some(Snapshot::Reusable { tree, entry }) => {
                self.state.tree = tree;
                self.state.reusables.insert(entry.id, entry);
            }
            None => {}
        }
    }

    pub(crate) fn serialized_content(&self) -> String {
        self.parser.serialize(&self.state.tree.roots_data())
    }
}
