//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    domain::MessageRepository,
    infrastructure::{Broadcaster, Recents},
    usecase::{AcceptMessageUseCase, QueryMessageUseCase, WelcomeClientUseCase},
};

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn MessageRepository>,
    /// Broadcaster（全クライアントへの配信）
    pub broadcaster: Broadcaster,
    /// Recents（直近に受理した id）
    pub recents: Recents,
    /// WelcomeClientUseCase（接続時のハンドシェイク）
    pub welcome_client_usecase: Arc<WelcomeClientUseCase>,
    /// QueryMessageUseCase（QUERY への応答）
    pub query_message_usecase: Arc<QueryMessageUseCase>,
    /// AcceptMessageUseCase（NEW_MESSAGE の受理）
    pub accept_message_usecase: Arc<AcceptMessageUseCase>,
}
