//! Tree node (one message in a threaded conversation).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque node identifier.
///
/// Ids are assigned by the server when a node is accepted. An empty id marks
/// a node that has not been accepted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Id carried by nodes that the server has not accepted yet.
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One message in the tree.
///
/// `parent` is `None` only for the single root node announced in the welcome
/// handshake. Once the server has assigned `id`, neither `id` nor `parent`
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "NodeId::is_empty")]
    pub id: NodeId,
    #[serde(
        default,
        deserialize_with = "deserialize_parent",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl Node {
    /// Build a reply to `parent` that still waits for a server-assigned id.
    pub fn reply(
        parent: NodeId,
        content: impl Into<String>,
        author: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: NodeId::unassigned(),
            parent: Some(parent),
            content: content.into(),
            author: author.into(),
            timestamp,
        }
    }

    /// Build a root node (no parent, no id yet).
    pub fn root(content: impl Into<String>, author: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: NodeId::unassigned(),
            parent: None,
            content: content.into(),
            author: author.into(),
            timestamp,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

// Peers may send `"parent": ""` for the root; treat it as no parent.
fn deserialize_parent<'de, D>(deserializer: D) -> Result<Option<NodeId>, D::Error>
where
    D: Deserializer<'de>,
{
    let parent = Option::<NodeId>::deserialize(deserializer)?;
    Ok(parent.filter(|id| !id.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_parent_string_is_decoded_as_root() {
        // テスト項目: 空文字列の parent はルート (None) として扱われる
        // given (前提条件):
        let json = r#"{"id":"r","parent":"","content":"root","author":"server","timestamp":1}"#;

        // when (操作):
        let node: Node = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert!(node.is_root());
        assert_eq!(node.id, NodeId::from("r"));
    }

    #[test]
    fn test_unassigned_id_is_omitted_on_the_wire() {
        // テスト項目: 未割り当ての id はシリアライズ時に省略される
        // given (前提条件):
        let node = Node::reply(NodeId::from("p"), "hello", "alice", 10);

        // when (操作):
        let json = serde_json::to_value(&node).unwrap();

        // then (期待する結果):
        assert!(json.get("id").is_none());
        assert_eq!(json["parent"], "p");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        // テスト項目: 欠落したフィールドはデフォルト値で補完される
        // given (前提条件):
        let json = r#"{"id":"only-id"}"#;

        // when (操作):
        let node: Node = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(node.id.as_str(), "only-id");
        assert!(node.parent.is_none());
        assert!(node.content.is_empty());
        assert_eq!(node.timestamp, 0);
    }
}
