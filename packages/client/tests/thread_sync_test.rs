//! End-to-end test: a client that only knows the newest message resolves
//! the rest of its thread from a real server, one ancestor at a time.

use std::{num::NonZeroUsize, time::Duration};

use bough_client::{
    controller::{Effect, ThreadController},
    multiplexer::run_request_multiplexer,
    transport::{ServerEvent, WsEnvelopeWriter, read_server_events},
};
use bough_server::ui::Server;
use bough_shared::{
    codec,
    protocol::{Envelope, Node, NodeId},
    time::FixedClock,
};
use futures_util::{SinkExt, StreamExt};
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot},
    time::timeout,
};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

async fn start_server(recents: usize) -> (String, NodeId, oneshot::Sender<()>) {
    let server = Server::bootstrap(NonZeroUsize::new(recents).unwrap(), "Root message")
        .await
        .expect("Failed to bootstrap server");
    let root = server.root_id().clone();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async move {
            let _ = shutdown_rx.await;
        };
        let _ = server.run_until(listener, shutdown).await;
    });
    (format!("ws://{}/ws", addr), root, shutdown)
}

/// Post root ← a ← b ← c over a plain connection and return the ids.
async fn post_chain(url: &str, root: &NodeId) -> Vec<NodeId> {
    let (mut poster, _) = connect_async(url).await.expect("Failed to connect");
    let mut parent = root.clone();
    let mut ids = Vec::new();
    for content in ["a", "b", "c"] {
        let node = Node::reply(parent.clone(), content, "poster", 0);
        let text = codec::encode(&Envelope::new_message(node)).unwrap();
        poster.send(Message::text(text)).await.unwrap();

        // Skip the welcome and wait for our own broadcast.
        let accepted = loop {
            let frame = timeout(Duration::from_secs(2), poster.next())
                .await
                .expect("timed out waiting for broadcast")
                .expect("connection closed")
                .expect("websocket error");
            let Message::Text(text) = frame else { continue };
            if let Ok(Envelope::NewMessage { node }) = codec::decode(text.as_str()) {
                break node;
            }
        };
        assert_eq!(accepted.content, content);
        parent = accepted.id.clone();
        ids.push(accepted.id);
    }
    ids
}

#[tokio::test]
async fn test_thread_is_resolved_from_newest_message_to_root() {
    // テスト項目: 最新メッセージだけを知るクライアントが、祖先を 1 件ずつ QUERY してルートまでのスレッドを復元する
    // given (前提条件):
    let (url, root, _shutdown) = start_server(1).await;
    let chain = post_chain(&url, &root).await;
    let newest = chain[2].clone();

    let (observer, _) = connect_async(url.as_str()).await.expect("Failed to connect");
    let (write, read) = observer.split();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    tokio::spawn(read_server_events(read, event_tx));
    let (query_tx, query_rx) = mpsc::channel(8);
    let (_outbound_tx, outbound_rx) = mpsc::channel(8);
    tokio::spawn(run_request_multiplexer(
        query_rx,
        outbound_rx,
        WsEnvelopeWriter::new(write),
    ));
    let mut controller = ThreadController::new("observer", Box::new(FixedClock::new(0)));

    // when (操作):
    let mut gap_queries = Vec::new();
    loop {
        let event = timeout(Duration::from_secs(2), event_rx.recv())
            .await
            .expect("timed out waiting for server event")
            .expect("reader stopped");
        let effects = match event {
            ServerEvent::Welcome(welcome) => {
                assert_eq!(welcome.recent, vec![newest.clone()]);
                query_tx.send(newest.clone()).await.unwrap();
                continue;
            }
            ServerEvent::Message(node) => controller.on_node(node),
        };
        for effect in effects {
            if let Effect::Query(id) = effect {
                gap_queries.push(id.clone());
                query_tx.send(id).await.unwrap();
            }
        }
        if controller
            .view()
            .ancestry()
            .last()
            .is_some_and(|oldest| oldest.is_root())
        {
            break;
        }
    }

    // then (期待する結果):
    assert_eq!(
        gap_queries,
        vec![chain[1].clone(), chain[0].clone(), root.clone()]
    );
    let ancestry: Vec<NodeId> = controller
        .view()
        .ancestry()
        .iter()
        .map(|node| node.id.clone())
        .collect();
    assert_eq!(
        ancestry,
        vec![chain[2].clone(), chain[1].clone(), chain[0].clone(), root]
    );
    assert_eq!(controller.view().leaf(), Some(&newest));
    assert_eq!(controller.view().cursor(), Some(&newest));
    assert!(controller.pending().is_empty());
}
