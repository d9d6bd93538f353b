//! WebSocket client session management.

use bough_shared::time::SystemClock;
use futures_util::StreamExt;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{sync::mpsc, task::JoinError};
use tokio_tungstenite::{connect_async, tungstenite};

use crate::{
    command::Command,
    controller::{Effect, ThreadController},
    error::ClientError,
    formatter::ThreadFormatter,
    multiplexer::run_request_multiplexer,
    transport::{WsEnvelopeWriter, read_server_events},
    ui::{PROMPT, redisplay_prompt},
};

/// Capacity of the query and outbound queues feeding the multiplexer
const REQUEST_QUEUE_CAPACITY: usize = 64;

/// Run one WebSocket client session.
///
/// Returns `Ok` when the user quits and an error when the connection could
/// not be established or was lost.
pub async fn run_client_session(url: &str, author: &str) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await.map_err(|e| match e {
        tungstenite::Error::Url(e) => ClientError::InvalidUrl(format!("{url}: {e}")),
        tungstenite::Error::HttpFormat(e) => ClientError::InvalidUrl(format!("{url}: {e}")),
        e => ClientError::ConnectionError(e.to_string()),
    })?;

    tracing::info!("Connected to {}", url);
    println!("\nYou are '{}'. Type ? for help, :q to quit.\n", author);

    let (write, read) = ws_stream.split();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut read_task = tokio::spawn(read_server_events(read, event_tx));

    let (query_tx, query_rx) = mpsc::channel(REQUEST_QUEUE_CAPACITY);
    let (outbound_tx, outbound_rx) = mpsc::channel(REQUEST_QUEUE_CAPACITY);
    let mut mux_task = tokio::spawn(run_request_multiplexer(
        query_rx,
        outbound_rx,
        WsEnvelopeWriter::new(write),
    ));

    let mut input_rx = spawn_readline();
    let mut controller = ThreadController::new(author, Box::new(SystemClock));

    let result = loop {
        let effects = tokio::select! {
            Some(event) = event_rx.recv() => controller.handle_event(event),
            line = input_rx.recv() => match line {
                Some(line) => {
                    let command = Command::parse(&line, controller.view().is_replying());
                    controller.on_command(command)
                }
                None => break Ok(()),
            },
            result = &mut read_task => {
                break flatten(result, "reader");
            }
            result = &mut mux_task => {
                break flatten(result, "multiplexer").and(Err(ClientError::ConnectionError(
                    "Request writer stopped".to_string(),
                )));
            }
        };

        let mut quit = false;
        for effect in effects {
            match effect {
                Effect::Query(id) => {
                    if query_tx.send(id).await.is_err() {
                        tracing::warn!("Request writer is gone, dropping query");
                    }
                }
                Effect::Send(node) => {
                    if outbound_tx.send(node).await.is_err() {
                        tracing::warn!("Request writer is gone, dropping reply");
                    }
                }
                Effect::Notice(notice) => print!("{}", ThreadFormatter::format_notice(&notice)),
                Effect::Help => print!("{}", ThreadFormatter::format_help()),
                Effect::Quit => quit = true,
            }
        }
        if quit {
            break Ok(());
        }

        print!("{}", ThreadFormatter::format_thread(controller.view()));
        redisplay_prompt();
    };

    read_task.abort();
    mux_task.abort();
    result
}

fn flatten(
    result: Result<Result<(), ClientError>, JoinError>,
    task: &str,
) -> Result<(), ClientError> {
    result.unwrap_or_else(|e| {
        Err(ClientError::ConnectionError(format!(
            "{} task failed: {}",
            task, e
        )))
    })
}

/// Read lines on a dedicated thread; rustyline is synchronous.
fn spawn_readline() -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line).ok();
                    if input_tx.send(line.to_string()).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
