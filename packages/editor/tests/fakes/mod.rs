//! Shared test doubles: a scriptable persistence service, a recording
//! notification sink, and a JSON-backed content parser.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use folio_editor::{
    ContentParser, Document, Edits, Editor, NodeData, NodeTypeRegistry, NoticeOptions,
    NotificationService, PersistenceService, ReadParams, RequestError, Resource, Status,
};

/// One request the editor issued against persistence, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Create {
        collection: String,
        resource: Resource,
    },
    Update {
        collection: String,
        id: u64,
        resource: Resource,
    },
    Delete {
        collection: String,
        id: u64,
    },
    Read {
        collection: String,
        id: Option<u64>,
        params: ReadParams,
    },
}

/// Persistence double. Results can be scripted per operation; when no result
/// is queued, requests succeed by echoing their payload (creates get a fresh
/// id from 1000 up).
pub struct FakePersistence {
    log: Mutex<Vec<Request>>,
    create_results: Mutex<VecDeque<Result<Resource, RequestError>>>,
    update_results: Mutex<VecDeque<Result<Resource, RequestError>>>,
    delete_results: Mutex<VecDeque<Result<(), RequestError>>>,
    read_results: Mutex<VecDeque<Result<Vec<Resource>, RequestError>>>,
    next_id: Mutex<u64>,
}

impl FakePersistence {
    pub fn new() -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            create_results: Mutex::new(VecDeque::new()),
            update_results: Mutex::new(VecDeque::new()),
            delete_results: Mutex::new(VecDeque::new()),
            read_results: Mutex::new(VecDeque::new()),
            next_id: Mutex::new(1000),
        }
    }

    pub fn queue_create(&self, result: Result<Resource, RequestError>) {
        self.create_results.lock().unwrap().push_back(result);
    }

    pub fn queue_update(&self, result: Result<Resource, RequestError>) {
        self.update_results.lock().unwrap().push_back(result);
    }

    pub fn queue_delete(&self, result: Result<(), RequestError>) {
        self.delete_results.lock().unwrap().push_back(result);
    }

    pub fn queue_read(&self, result: Result<Vec<Resource>, RequestError>) {
        self.read_results.lock().unwrap().push_back(result);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl PersistenceService for FakePersistence {
    async fn create(&self, collection: &str, data: &Resource) -> Result<Resource, RequestError> {
        self.log.lock().unwrap().push(Request::Create {
            collection: collection.to_string(),
            resource: data.clone(),
        });
        if let Some(result) = self.create_results.lock().unwrap().pop_front() {
            return result;
        }
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;
        Ok(Resource { id, ..data.clone() })
    }

    async fn update(
        &self,
        collection: &str,
        id: u64,
        data: &Resource,
    ) -> Result<Resource, RequestError> {
        self.log.lock().unwrap().push(Request::Update {
            collection: collection.to_string(),
            id,
            resource: data.clone(),
        });
        if let Some(result) = self.update_results.lock().unwrap().pop_front() {
            return result;
        }
        Ok(Resource { id, ..data.clone() })
    }

    async fn delete(&self, collection: &str, id: u64) -> Result<(), RequestError> {
        self.log.lock().unwrap().push(Request::Delete {
            collection: collection.to_string(),
            id,
        });
        self.delete_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn read(
        &self,
        collection: &str,
        id: Option<u64>,
        params: ReadParams,
    ) -> Result<Vec<Resource>, RequestError> {
        self.log.lock().unwrap().push(Request::Read {
            collection: collection.to_string(),
            id,
            params,
        });
        self.read_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub options: NoticeOptions,
}

#[derive(Default)]
pub struct RecordingNotices {
    notices: Mutex<Vec<Notice>>,
    removed: Mutex<Vec<String>>,
}

impl RecordingNotices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }

    fn record(&self, kind: NoticeKind, message: &str, options: NoticeOptions) {
        self.notices.lock().unwrap().push(Notice {
            kind,
            message: message.to_string(),
            options,
        });
    }
}

impl NotificationService for RecordingNotices {
    fn success(&self, message: &str, options: NoticeOptions) {
        self.record(NoticeKind::Success, message, options);
    }

    fn error(&self, message: &str, options: NoticeOptions) {
        self.record(NoticeKind::Error, message, options);
    }

    fn warning(&self, message: &str, options: NoticeOptions) {
        self.record(NoticeKind::Warning, message, options);
    }

    fn remove(&self, id: &str) {
        self.removed.lock().unwrap().push(id.to_string());
    }
}

/// Content parser over the JSON form of `Vec<NodeData>`.
pub struct JsonParser;

impl ContentParser for JsonParser {
    fn parse(&self, raw: &str) -> Vec<NodeData> {
        serde_json::from_str(raw).unwrap_or_default()
    }

    fn serialize(&self, nodes: &[NodeData]) -> String {
        serde_json::to_string(nodes).unwrap_or_default()
    }
}

pub struct Harness {
    pub editor: Editor,
    pub persistence: Arc<FakePersistence>,
    pub notices: Arc<RecordingNotices>,
}

pub fn harness(registry: NodeTypeRegistry) -> Harness {
    let persistence = Arc::new(FakePersistence::new());
    let notices = Arc::new(RecordingNotices::new());
    let editor = Editor::new(
        persistence.clone(),
        notices.clone(),
        Arc::new(JsonParser),
        registry,
    );
    Harness {
        editor,
        persistence,
        notices,
    }
}

pub fn content_of(nodes: &[NodeData]) -> String {
    serde_json::to_string(nodes).unwrap()
}

pub fn draft_post(id: u64) -> Document {
    Document {
        id,
        kind: "post".to_string(),
        format: None,
        status: Status::Draft,
        title: "Hello".to_string(),
        content: String::new(),
        excerpt: "Summary".to_string(),
        edits: Edits::default(),
    }
}
