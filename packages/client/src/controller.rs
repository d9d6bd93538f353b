//! Glue between server events, user commands and the thread view.
//!
//! The controller owns the [`ThreadView`] and turns everything that happens
//! into [`Effect`]s for the session to carry out. Queries for the same gap
//! are not repeated while one is outstanding.

use std::collections::HashSet;

use bough_shared::{
    protocol::{Node, NodeId, Welcome},
    time::Clock,
};

use crate::{
    command::Command,
    domain::{MessageTree, NavigationError, Side, ThreadView, TreeStore},
    transport::ServerEvent,
};

/// Something the session has to do on the controller's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Query(NodeId),
    Send(Node),
    Notice(String),
    Help,
    Quit,
}

pub struct ThreadController {
    view: ThreadView<MessageTree>,
    pending: HashSet<NodeId>,
    author: String,
    clock: Box<dyn Clock>,
}

impl ThreadController {
    pub fn new(author: impl Into<String>, clock: Box<dyn Clock>) -> Self {
        Self {
            view: ThreadView::new(MessageTree::new()),
            pending: HashSet::new(),
            author: author.into(),
            clock,
        }
    }

    pub fn view(&self) -> &ThreadView<MessageTree> {
        &self.view
    }

    pub fn pending(&self) -> &HashSet<NodeId> {
        &self.pending
    }

    pub fn handle_event(&mut self, event: ServerEvent) -> Vec<Effect> {
        match event {
            ServerEvent::Welcome(welcome) => self.on_welcome(welcome),
            ServerEvent::Message(node) => self.on_node(node),
        }
    }

    /// Ask for the root and every recent id not known yet.
    pub fn on_welcome(&mut self, welcome: Welcome) -> Vec<Effect> {
        tracing::info!(
            "Welcomed by server (protocol {}.{}), root '{}', {} recent",
            welcome.version.major,
            welcome.version.minor,
            welcome.root,
            welcome.recent.len()
        );
        std::iter::once(welcome.root)
            .chain(welcome.recent)
            .filter_map(|id| self.query(id))
            .collect()
    }

    /// Record a node, possibly advance the leaf, and ask for the next gap.
    pub fn on_node(&mut self, node: Node) -> Vec<Effect> {
        let id = node.id.clone();
        self.pending.remove(&id);
        if !self.view.add(node) {
            tracing::debug!("Ignoring duplicate message '{}'", id);
        }
        self.view.update_leaf(&id);
        self.refresh()
    }

    pub fn on_command(&mut self, command: Command) -> Vec<Effect> {
        let moved = match command {
            Command::Up => self.view.move_cursor_toward_root(),
            Command::Down => self.view.move_cursor_toward_leaf(),
            Command::Left => self.view.move_cursor_sibling(Side::Left),
            Command::Right => self.view.move_cursor_sibling(Side::Right),
            Command::Reply => return self.begin_reply(),
            Command::Cancel => {
                self.view.clear_reply();
                return Vec::new();
            }
            Command::Text(text) => return self.send_reply(text),
            Command::Sync => {
                self.pending.clear();
                return self.refresh();
            }
            Command::Help => return vec![Effect::Help],
            Command::Quit => return vec![Effect::Quit],
            Command::Unknown(line) => {
                return vec![Effect::Notice(format!(
                    "Unknown command '{}' (type ? for help)",
                    line
                ))];
            }
        };
        match moved {
            Ok(()) => self.refresh(),
            Err(e) => {
                tracing::debug!("Navigation refused: {}", e);
                vec![Effect::Notice(e.to_string())]
            }
        }
    }

    /// Refresh the view and mark the cursor as seen.
    pub fn refresh(&mut self) -> Vec<Effect> {
        let gap = self.view.refresh();
        self.view.mark_cursor_seen();
        gap.and_then(|id| self.query(id)).into_iter().collect()
    }

    fn begin_reply(&mut self) -> Vec<Effect> {
        match self.view.cursor().cloned() {
            Some(cursor) => {
                self.view.reply_to(cursor);
                Vec::new()
            }
            None => vec![Effect::Notice(NavigationError::NoCursor.to_string())],
        }
    }

    fn send_reply(&mut self, text: String) -> Vec<Effect> {
        let Some(parent) = self.view.reply_id().cloned() else {
            return Vec::new();
        };
        if text.is_empty() {
            return vec![Effect::Notice("Empty reply not sent".to_string())];
        }
        self.view.clear_reply();
        tracing::info!("Sending reply to {}", parent);
        vec![Effect::Send(Node::reply(
            parent,
            text,
            self.author.clone(),
            self.clock.now_unix_secs(),
        ))]
    }

    fn query(&mut self, id: NodeId) -> Option<Effect> {
        if id.is_empty() || self.view.store().get(&id).is_some() {
            return None;
        }
        self.pending.insert(id.clone()).then_some(Effect::Query(id))
    }
}
