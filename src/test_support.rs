//! Shared test doubles for collaborator traits.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::net::identity::{IdentityProvider, SessionListener};
use crate::net::posts::PostsBackend;
use crate::net::types::{AuthError, Credentials, ErrorKind, Post, PostsError, ProviderUser};
use crate::util::listeners::{Listeners, Subscription};

pub(crate) fn user(uid: &str) -> ProviderUser {
    ProviderUser { uid: uid.to_owned(), email: Some(format!("{uid}@example.com")) }
}

pub(crate) fn post(name: &str, content: &str) -> Post {
    Post { name: name.to_owned(), content: content.to_owned() }
}

// =============================================================================
// FakeProvider
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ProviderCall {
    CreateAccount(Credentials),
    Authenticate(Credentials),
    TerminateSession,
}

/// Scripted identity provider.
///
/// Responses are popped from per-operation queues; an empty queue succeeds.
/// Successful operations emit a session change the way a real provider does,
/// unless built with [`FakeProvider::silent`].
pub(crate) struct FakeProvider {
    calls: Mutex<Vec<ProviderCall>>,
    authenticate: Mutex<VecDeque<Result<ProviderUser, AuthError>>>,
    create_account: Mutex<VecDeque<Result<ProviderUser, AuthError>>>,
    terminate: Mutex<VecDeque<Result<(), AuthError>>>,
    listeners: Listeners<Option<ProviderUser>>,
    emits_on_success: bool,
}

impl FakeProvider {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::build(true))
    }

    /// Never emits on its own; tests drive changes with [`FakeProvider::emit`].
    pub(crate) fn silent() -> Arc<Self> {
        Arc::new(Self::build(false))
    }

    fn build(emits_on_success: bool) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            authenticate: Mutex::new(VecDeque::new()),
            create_account: Mutex::new(VecDeque::new()),
            terminate: Mutex::new(VecDeque::new()),
            listeners: Listeners::new(),
            emits_on_success,
        }
    }

    pub(crate) fn script_authenticate(&self, result: Result<ProviderUser, AuthError>) {
        self.authenticate.lock().unwrap().push_back(result);
    }

    pub(crate) fn script_create_account(&self, result: Result<ProviderUser, AuthError>) {
        self.create_account.lock().unwrap().push_back(result);
    }

    pub(crate) fn script_terminate(&self, result: Result<(), AuthError>) {
        self.terminate.lock().unwrap().push_back(result);
    }

    /// Deliver a session change to every registered listener.
    pub(crate) fn emit(&self, user: Option<ProviderUser>) {
        self.listeners.emit(&user);
    }

    pub(crate) fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&ProviderCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FakeProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError> {
        self.record(ProviderCall::CreateAccount(Credentials::new(email, password)));
        let result = self.create_account.lock().unwrap().pop_front().unwrap_or_else(|| Ok(user("created")));
        if let (Ok(u), true) = (&result, self.emits_on_success) {
            self.emit(Some(u.clone()));
        }
        result
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError> {
        self.record(ProviderCall::Authenticate(Credentials::new(email, password)));
        let result = self.authenticate.lock().unwrap().pop_front().unwrap_or_else(|| Ok(user("existing")));
        if let (Ok(u), true) = (&result, self.emits_on_success) {
            self.emit(Some(u.clone()));
        }
        result
    }

    async fn terminate_session(&self) -> Result<(), AuthError> {
        self.record(ProviderCall::TerminateSession);
        let result = self.terminate.lock().unwrap().pop_front().unwrap_or(Ok(()));
        if result.is_ok() && self.emits_on_success {
            self.emit(None);
        }
        result
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.listeners.add(listener)
    }
}

pub(crate) fn invalid_credential() -> AuthError {
    AuthError::new(ErrorKind::InvalidCredential, "EMAIL_NOT_FOUND")
}

pub(crate) fn network_failure() -> AuthError {
    AuthError::new(ErrorKind::NetworkFailure, "connection refused")
}

// =============================================================================
// FakeBackend
// =============================================================================

/// Scripted posts backend. An empty list queue answers `[]`.
pub(crate) struct FakeBackend {
    lists: Mutex<VecDeque<Result<Vec<Post>, PostsError>>>,
    creates: Mutex<VecDeque<Result<(), PostsError>>>,
    list_calls: AtomicUsize,
    created: Mutex<Vec<Post>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            lists: Mutex::new(VecDeque::new()),
            creates: Mutex::new(VecDeque::new()),
            list_calls: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn with_posts(posts: Vec<Post>) -> Arc<Self> {
        let backend = Self::new();
        backend.script_list(Ok(posts));
        backend
    }

    pub(crate) fn script_list(&self, result: Result<Vec<Post>, PostsError>) {
        self.lists.lock().unwrap().push_back(result);
    }

    pub(crate) fn script_create(&self, result: Result<(), PostsError>) {
        self.creates.lock().unwrap().push_back(result);
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn created(&self) -> Vec<Post> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PostsBackend for FakeBackend {
    async fn list_posts(&self) -> Result<Vec<Post>, PostsError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.lists.lock().unwrap().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create_post(&self, post: &Post) -> Result<(), PostsError> {
        self.created.lock().unwrap().push(post.clone());
        self.creates.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

// =============================================================================
// HTTP mocks
// =============================================================================

/// Serve `router` on an ephemeral local port and return its base URL.
pub(crate) async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a local port with nothing listening.
pub(crate) async fn closed_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
