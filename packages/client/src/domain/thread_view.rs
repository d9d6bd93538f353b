//! Navigable view over a partially known thread.
//!
//! The view follows a *leaf* (the deepest node of interest) and shows a
//! *cursor* (the focused node) somewhere on the path from that leaf to the
//! root. Missing ancestors are resolved one at a time: [`ThreadView::refresh`]
//! reports at most one unknown id, the caller queries it, and refreshes again
//! once the answer has arrived.

use bough_shared::protocol::{Node, NodeId};

use super::{
    error::NavigationError,
    tree::{MessageTree, TreeStore},
};

/// Upper bound on the ancestry walked by a single refresh.
pub const MAX_THREAD_LENGTH: usize = 1024;

/// Direction for sibling navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

pub struct ThreadView<S = MessageTree> {
    store: S,
    /// Leaf → root, possibly stopping short at a gap
    ancestry: Vec<Node>,
    cursor: Option<NodeId>,
    leaf: Option<NodeId>,
    reply_to: Option<NodeId>,
}

impl<S: TreeStore> ThreadView<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            ancestry: Vec::new(),
            cursor: None,
            leaf: None,
            reply_to: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a node in the local store without touching the view.
    pub fn add(&mut self, node: Node) -> bool {
        self.store.add(node)
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.store.get(id)
    }

    /// Make `id` the new leaf if it directly extends the current leaf, or if
    /// no leaf is set yet. The first node ever seen also becomes the cursor.
    ///
    /// Nodes on other branches never move the leaf; switching branches is an
    /// explicit navigation.
    pub fn update_leaf(&mut self, id: &NodeId) {
        let Some(node) = self.store.get(id) else {
            tracing::debug!("Ignoring leaf update for unknown message '{}'", id);
            return;
        };
        if self.leaf.is_none() || node.parent == self.leaf {
            self.leaf = Some(node.id.clone());
        }
        if self.cursor.is_none() {
            self.cursor = Some(node.id.clone());
        }
    }

    /// Recompute the ancestry of the current leaf.
    ///
    /// Returns the first ancestor that is not known locally, which the caller
    /// should query before refreshing again.
    pub fn refresh(&mut self) -> Option<NodeId> {
        let Some(leaf) = &self.leaf else {
            self.ancestry.clear();
            return None;
        };
        let (items, query) = self.store.get_items(leaf, MAX_THREAD_LENGTH);
        self.ancestry = items;
        query
    }

    pub fn cursor(&self) -> Option<&NodeId> {
        self.cursor.as_ref()
    }

    pub fn leaf(&self) -> Option<&NodeId> {
        self.leaf.as_ref()
    }

    /// Nodes from the leaf toward the root, as of the last refresh
    pub fn ancestry(&self) -> &[Node] {
        &self.ancestry
    }

    pub fn mark_cursor_seen(&mut self) {
        if let Some(cursor) = &self.cursor {
            self.store.mark_seen(cursor);
        }
    }

    /// Move the cursor to its parent.
    pub fn move_cursor_toward_root(&mut self) -> Result<(), NavigationError> {
        let node = self.cursor_node()?;
        let parent = node.parent.clone().ok_or(NavigationError::AtRoot)?;
        if self.store.get(&parent).is_none() {
            return Err(NavigationError::UnresolvedParent(parent));
        }
        self.cursor = Some(parent);
        Ok(())
    }

    /// Move the cursor one step back toward the tracked leaf.
    pub fn move_cursor_toward_leaf(&mut self) -> Result<(), NavigationError> {
        let cursor = self.cursor_id()?;
        let index = index_of(cursor, &self.ancestry)
            .ok_or_else(|| NavigationError::NotInThread(cursor.clone()))?;
        if index == 0 {
            return Err(NavigationError::AtLeaf);
        }
        self.cursor = Some(self.ancestry[index - 1].id.clone());
        Ok(())
    }

    /// Move the cursor to the next sibling on `side`, wrapping around, and
    /// follow that sibling's deepest known branch.
    pub fn move_cursor_sibling(&mut self, side: Side) -> Result<(), NavigationError> {
        let node = self.cursor_node()?;
        let parent = node.parent.clone().ok_or(NavigationError::NoSiblings)?;
        let cursor = node.id.clone();

        let siblings = self.store.children(&parent);
        if siblings.len() < 2 {
            return Err(NavigationError::NoSiblings);
        }
        let index = siblings
            .iter()
            .position(|id| *id == cursor)
            .unwrap_or_default();
        let count = siblings.len();
        let next = match side {
            Side::Right => (index + 1) % count,
            Side::Left => (index + count - 1) % count,
        };
        let target = siblings[next].clone();
        tracing::debug!("Selecting new cursor (old {}) as {}", cursor, target);
        self.view_subtree_of(&target);
        Ok(())
    }

    /// Focus `id` and follow its deepest known descendant.
    pub fn view_subtree_of(&mut self, id: &NodeId) {
        self.cursor = Some(id.clone());
        self.leaf = Some(self.store.leaf(id));
    }

    /// Start composing a reply to `id`. Navigation is disabled until
    /// [`ThreadView::clear_reply`].
    pub fn reply_to(&mut self, id: NodeId) {
        self.reply_to = Some(id);
    }

    pub fn clear_reply(&mut self) {
        self.reply_to = None;
    }

    pub fn is_replying(&self) -> bool {
        self.reply_to.is_some()
    }

    pub fn reply_id(&self) -> Option<&NodeId> {
        self.reply_to.as_ref()
    }

    fn cursor_id(&self) -> Result<&NodeId, NavigationError> {
        if self.is_replying() {
            return Err(NavigationError::Replying);
        }
        self.cursor.as_ref().ok_or(NavigationError::NoCursor)
    }

    fn cursor_node(&self) -> Result<&Node, NavigationError> {
        let cursor = self.cursor_id()?;
        self.store
            .get(cursor)
            .ok_or_else(|| NavigationError::UnknownMessage(cursor.clone()))
    }
}

/// Position of `id` in `nodes`
pub fn index_of(id: &NodeId, nodes: &[Node]) -> Option<usize> {
    nodes.iter().position(|node| node.id == *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>) -> Node {
        Node {
            id: NodeId::from(id),
            parent: parent.map(NodeId::from),
            content: format!("content of {id}"),
            author: "tester".to_string(),
            timestamp: 0,
        }
    }

    fn id(value: &str) -> NodeId {
        NodeId::from(value)
    }

    fn ancestry_ids<S: TreeStore>(view: &ThreadView<S>) -> Vec<&str> {
        view.ancestry().iter().map(|n| n.id.as_str()).collect()
    }

    /// root ← a ← b ← leaf, following `leaf`, cursor at `leaf`
    fn chain_view() -> ThreadView {
        let mut view = ThreadView::new(MessageTree::new());
        for n in [
            node("root", None),
            node("a", Some("root")),
            node("b", Some("a")),
            node("leaf", Some("b")),
        ] {
            view.add(n);
        }
        view.view_subtree_of(&id("leaf"));
        view.refresh();
        view
    }

    /// P with children [C1, C2, C3], cursor at C2
    fn siblings_view() -> ThreadView {
        let mut view = ThreadView::new(MessageTree::new());
        for n in [
            node("P", None),
            node("C1", Some("P")),
            node("C2", Some("P")),
            node("C3", Some("P")),
        ] {
            view.add(n);
        }
        view.view_subtree_of(&id("C2"));
        view.refresh();
        view
    }

    #[test]
    fn test_refresh_full_chain() {
        // テスト項目: 完全なチェーンでは [leaf, b, a, root] が得られ、QUERY は不要
        // given (前提条件):
        let mut view = chain_view();

        // when (操作):
        let query = view.refresh();

        // then (期待する結果):
        assert_eq!(ancestry_ids(&view), vec!["leaf", "b", "a", "root"]);
        assert_eq!(query, None);
    }

    #[test]
    fn test_refresh_reports_single_gap() {
        // テスト項目: a が欠けている場合は [leaf, b] と欠落 id a が得られる
        // given (前提条件):
        let mut view = ThreadView::new(MessageTree::new());
        view.add(node("root", None));
        view.add(node("b", Some("a")));
        view.add(node("leaf", Some("b")));
        view.update_leaf(&id("leaf"));

        // when (操作):
        let query = view.refresh();

        // then (期待する結果):
        assert_eq!(ancestry_ids(&view), vec!["leaf", "b"]);
        assert_eq!(query, Some(id("a")));
    }

    #[test]
    fn test_refresh_resolves_gaps_incrementally() {
        // テスト項目: 欠落した祖先を 1 つずつ取得し、refresh のたびに祖先列が伸びる
        // given (前提条件):
        let mut view = ThreadView::new(MessageTree::new());
        view.add(node("leaf", Some("b")));
        view.update_leaf(&id("leaf"));
        let upstream = [node("b", Some("a")), node("a", Some("root")), node("root", None)];

        // when (操作) / then (期待する結果):
        let mut round_trips = 0;
        for arriving in upstream {
            let query = view.refresh().expect("a gap should be reported");
            assert_eq!(query, arriving.id);
            view.add(arriving);
            round_trips += 1;
        }
        assert_eq!(view.refresh(), None);
        assert_eq!(round_trips, 3);
        assert_eq!(ancestry_ids(&view), vec!["leaf", "b", "a", "root"]);
        // ギャップ解消のための到着で leaf は動かない
        assert_eq!(view.leaf(), Some(&id("leaf")));
    }

    #[test]
    fn test_refresh_without_leaf_is_empty() {
        // テスト項目: leaf 未設定の refresh は空の祖先列で QUERY なし
        // given (前提条件):
        let mut view = ThreadView::new(MessageTree::new());

        // when (操作):
        let query = view.refresh();

        // then (期待する結果):
        assert!(view.ancestry().is_empty());
        assert_eq!(query, None);
    }

    #[test]
    fn test_first_node_becomes_leaf_and_cursor() {
        // テスト項目: 最初に届いたノードが leaf と cursor の両方になる
        // given (前提条件):
        let mut view = ThreadView::new(MessageTree::new());
        view.add(node("x", Some("root")));

        // when (操作):
        view.update_leaf(&id("x"));

        // then (期待する結果):
        assert_eq!(view.leaf(), Some(&id("x")));
        assert_eq!(view.cursor(), Some(&id("x")));
    }

    #[test]
    fn test_update_leaf_advances_only_for_children_of_leaf() {
        // テスト項目: 現在の leaf の子だけが leaf を進め、別の枝のノードでは leaf が動かない
        // given (前提条件):
        let mut view = ThreadView::new(MessageTree::new());
        view.add(node("X", Some("root")));
        view.update_leaf(&id("X"));

        // when (操作):
        view.add(node("other", Some("Y")));
        view.update_leaf(&id("other"));

        // then (期待する結果):
        assert_eq!(view.leaf(), Some(&id("X")));

        // when (操作):
        view.add(node("child", Some("X")));
        view.update_leaf(&id("child"));

        // then (期待する結果): leaf は進むが cursor は最初のノードのまま
        assert_eq!(view.leaf(), Some(&id("child")));
        assert_eq!(view.cursor(), Some(&id("X")));
    }

    #[test]
    fn test_update_leaf_for_unknown_node_is_ignored() {
        // テスト項目: ローカルに存在しないノードでの leaf 更新は無視される
        // given (前提条件):
        let mut view = ThreadView::new(MessageTree::new());

        // when (操作):
        view.update_leaf(&id("ghost"));

        // then (期待する結果):
        assert_eq!(view.leaf(), None);
        assert_eq!(view.cursor(), None);
    }

    #[test]
    fn test_move_toward_root_until_root() {
        // テスト項目: cursor は親へ移動し、ルートではそれ以上移動しない
        // given (前提条件):
        let mut view = chain_view();

        // when (操作):
        let moves: Vec<_> = (0..4).map(|_| view.move_cursor_toward_root()).collect();

        // then (期待する結果):
        assert_eq!(moves[..3], [Ok(()), Ok(()), Ok(())]);
        assert_eq!(moves[3], Err(NavigationError::AtRoot));
        assert_eq!(view.cursor(), Some(&id("root")));
    }

    #[test]
    fn test_move_toward_root_refuses_unresolved_parent() {
        // テスト項目: 親が未到着の場合は cursor を移動しない
        // given (前提条件):
        let mut view = ThreadView::new(MessageTree::new());
        view.add(node("b", Some("a")));
        view.update_leaf(&id("b"));

        // when (操作):
        let result = view.move_cursor_toward_root();

        // then (期待する結果):
        assert_eq!(result, Err(NavigationError::UnresolvedParent(id("a"))));
        assert_eq!(view.cursor(), Some(&id("b")));
    }

    #[test]
    fn test_move_toward_leaf_walks_back_down() {
        // テスト項目: cursor は祖先列を leaf 方向へ戻り、leaf では止まる
        // given (前提条件):
        let mut view = chain_view();
        view.move_cursor_toward_root().unwrap();
        view.move_cursor_toward_root().unwrap();
        assert_eq!(view.cursor(), Some(&id("a")));

        // when (操作):
        let first = view.move_cursor_toward_leaf();
        let second = view.move_cursor_toward_leaf();
        let third = view.move_cursor_toward_leaf();

        // then (期待する結果):
        assert_eq!(first, Ok(()));
        assert_eq!(second, Ok(()));
        assert_eq!(third, Err(NavigationError::AtLeaf));
        assert_eq!(view.cursor(), Some(&id("leaf")));
    }

    #[test]
    fn test_sibling_navigation_wraps_around() {
        // テスト項目: 子 [C1, C2, C3] で C2 から右へ移動すると C3、さらに右で C1 に戻る
        // given (前提条件):
        let mut view = siblings_view();

        // when (操作) / then (期待する結果):
        view.move_cursor_sibling(Side::Right).unwrap();
        assert_eq!(view.cursor(), Some(&id("C3")));
        view.move_cursor_sibling(Side::Right).unwrap();
        assert_eq!(view.cursor(), Some(&id("C1")));
        view.move_cursor_sibling(Side::Left).unwrap();
        assert_eq!(view.cursor(), Some(&id("C3")));
    }

    #[test]
    fn test_sibling_selection_follows_that_branch() {
        // テスト項目: 兄弟を選択すると leaf がその兄弟の最も深い子孫に切り替わる
        // given (前提条件):
        let mut view = siblings_view();
        view.add(node("C3-child", Some("C3")));
        view.add(node("C3-grandchild", Some("C3-child")));

        // when (操作):
        view.move_cursor_sibling(Side::Right).unwrap();
        let query = view.refresh();

        // then (期待する結果):
        assert_eq!(view.cursor(), Some(&id("C3")));
        assert_eq!(view.leaf(), Some(&id("C3-grandchild")));
        assert_eq!(query, None);
        assert_eq!(ancestry_ids(&view), vec!["C3-grandchild", "C3-child", "C3", "P"]);
    }

    #[test]
    fn test_sibling_navigation_requires_two_children() {
        // テスト項目: 兄弟がいない場合やルートでは兄弟移動しない
        // given (前提条件):
        let mut view = chain_view();

        // when (操作):
        let at_leaf = view.move_cursor_sibling(Side::Right);
        view.view_subtree_of(&id("root"));
        let at_root = view.move_cursor_sibling(Side::Left);

        // then (期待する結果):
        assert_eq!(at_leaf, Err(NavigationError::NoSiblings));
        assert_eq!(at_root, Err(NavigationError::NoSiblings));
    }

    #[test]
    fn test_navigation_is_disabled_while_replying() {
        // テスト項目: 返信作成中はすべての cursor 移動が無効になり、解除後に再び有効になる
        // given (前提条件):
        let mut view = siblings_view();
        view.reply_to(id("C2"));

        // when (操作):
        let results = [
            view.move_cursor_toward_root(),
            view.move_cursor_toward_leaf(),
            view.move_cursor_sibling(Side::Left),
            view.move_cursor_sibling(Side::Right),
        ];

        // then (期待する結果):
        assert!(view.is_replying());
        assert_eq!(view.reply_id(), Some(&id("C2")));
        for result in results {
            assert_eq!(result, Err(NavigationError::Replying));
        }
        assert_eq!(view.cursor(), Some(&id("C2")));

        view.clear_reply();
        assert!(!view.is_replying());
        assert_eq!(view.move_cursor_sibling(Side::Right), Ok(()));
    }

    #[test]
    fn test_navigation_without_cursor() {
        // テスト項目: cursor 未設定では移動できない
        // given (前提条件):
        let mut view = ThreadView::new(MessageTree::new());

        // when (操作):
        let result = view.move_cursor_toward_root();

        // then (期待する結果):
        assert_eq!(result, Err(NavigationError::NoCursor));
    }

    #[test]
    fn test_mark_cursor_seen() {
        // テスト項目: cursor のノードが既読になる
        // given (前提条件):
        let mut view = chain_view();

        // when (操作):
        view.mark_cursor_seen();

        // then (期待する結果):
        assert!(view.store().seen(&id("leaf")));
        assert!(!view.store().seen(&id("b")));
    }
}
