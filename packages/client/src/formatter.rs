//! Thread formatting utilities for client display.

use bough_shared::{protocol::Node, time::timestamp_to_local_clock};

use crate::domain::{ThreadView, TreeStore};

const RULE: &str = "============================================================";

/// Thread formatter for client display
pub struct ThreadFormatter;

impl ThreadFormatter {
    /// Format the current thread, root at the top and leaf at the bottom
    ///
    /// The cursor line is marked with `>`, unread messages with `*`, and
    /// messages with siblings show how many alternatives exist.
    ///
    /// # Arguments
    ///
    /// * `view` - The thread view to render (after a refresh)
    ///
    /// # Returns
    ///
    /// A formatted multi-line string
    pub fn format_thread<S: TreeStore>(view: &ThreadView<S>) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str(RULE);
        output.push('\n');

        let ancestry = view.ancestry();
        if ancestry.is_empty() {
            output.push_str("(Waiting for messages...)\n");
        } else if ancestry.last().is_some_and(|oldest| !oldest.is_root()) {
            output.push_str("  ... (loading earlier messages)\n");
        }

        for node in ancestry.iter().rev() {
            let is_cursor = view.cursor() == Some(&node.id);
            let unread = !is_cursor && !view.store().seen(&node.id);
            let siblings = node
                .parent
                .as_ref()
                .map(|parent| view.store().children(parent).len().saturating_sub(1))
                .unwrap_or_default();
            output.push_str(&Self::format_node(node, is_cursor, unread, siblings));
        }

        output.push_str(RULE);
        output.push('\n');
        if let Some(reply_id) = view.reply_id() {
            output.push_str(&format!(
                "Replying to {} (type your message, :cancel to abort)\n",
                reply_id
            ));
        }
        output
    }

    /// Format one message line
    pub fn format_node(node: &Node, is_cursor: bool, unread: bool, siblings: usize) -> String {
        let cursor_mark = if is_cursor { ">" } else { " " };
        let unread_mark = if unread { "*" } else { " " };
        let sibling_mark = if siblings > 0 {
            format!(" (+{} other replies)", siblings)
        } else {
            String::new()
        };
        format!(
            "{}{} [{}] {}: {}{}\n",
            cursor_mark,
            unread_mark,
            timestamp_to_local_clock(node.timestamp),
            node.author,
            node.content.trim_end(),
            sibling_mark
        )
    }

    /// Format the command help
    pub fn format_help() -> String {
        [
            "Commands:",
            "  k / up      move toward the root",
            "  j / down    move toward the newest message",
            "  h / left    previous sibling reply",
            "  l / right   next sibling reply",
            "  r / reply   reply to the focused message",
            "  :cancel     abandon the reply",
            "  :sync       re-request missing messages",
            "  :q          quit",
            "",
        ]
        .join("\n")
    }

    /// Format a refused action
    pub fn format_notice(notice: &str) -> String {
        format!("! {}\n", notice)
    }
}
