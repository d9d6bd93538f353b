//! Server execution logic.

use std::{future::Future, num::NonZeroUsize, sync::Arc};

use axum::{Router, routing::get};
use bough_shared::{
    protocol::{Node, NodeId},
    time::{Clock, SystemClock},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    domain::{MessageRepository, NodeIdFactory},
    infrastructure::{Broadcaster, InMemoryMessageRepository, Recents},
    usecase::{AcceptMessageUseCase, QueryMessageUseCase, WelcomeClientUseCase},
};

use super::{
    handler::{get_message, get_stats, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Author recorded on the root node
const ROOT_AUTHOR: &str = "server";

/// bough broadcast server
///
/// Owns the wiring between the store, the recents buffer and the broadcaster.
///
/// # Example
///
/// ```ignore
/// let server = Server::bootstrap(NonZeroUsize::new(10).unwrap(), "Root message").await?;
/// server.run("127.0.0.1".to_string(), 7777).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create the in-memory store with its root node and spawn the actors.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn bootstrap(
        recents_capacity: NonZeroUsize,
        root_content: &str,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let repository: Arc<dyn MessageRepository> = Arc::new(InMemoryMessageRepository::new());

        let mut root = Node::root(root_content, ROOT_AUTHOR, SystemClock.now_unix_secs());
        root.id = NodeIdFactory::generate();
        let root_id = root.id.clone();
        repository.add(root).await?;
        tracing::info!("Root message id is {}", root_id);

        Ok(Self::new(repository, root_id, recents_capacity))
    }

    /// Wire a server around an existing repository that already holds `root_id`.
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        root_id: NodeId,
        recents_capacity: NonZeroUsize,
    ) -> Self {
        let broadcaster = Broadcaster::spawn();
        let recents = Recents::spawn(recents_capacity);

        let welcome_client_usecase =
            Arc::new(WelcomeClientUseCase::new(root_id, recents.clone()));
        let query_message_usecase = Arc::new(QueryMessageUseCase::new(repository.clone()));
        let accept_message_usecase = Arc::new(AcceptMessageUseCase::new(
            repository.clone(),
            recents.clone(),
            broadcaster.clone(),
        ));

        let state = Arc::new(AppState {
            repository,
            broadcaster,
            recents,
            welcome_client_usecase,
            query_message_usecase,
            accept_message_usecase,
        });
        Self { state }
    }

    pub fn root_id(&self) -> &NodeId {
        self.state.welcome_client_usecase.root_id()
    }

    /// Build the axum router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(websocket_handler))
            .route("/api/health", get(health_check))
            .route("/api/stats", get(get_stats))
            .route("/api/messages/{id}", get(get_message))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until Ctrl+C
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 7777)
    pub async fn run(
        self,
        host: String,
        port: u16,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("bough server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.run_until(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn run_until<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
