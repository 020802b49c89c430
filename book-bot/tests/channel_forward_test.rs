//! Button presses on channel results: the post is forwarded by id, nothing is downloaded.

mod common;

use std::sync::Arc;

use book_bot::messages;
use book_bot::{callback_data, Bot, DownloadHandler, Handler, HandlerResponse, SearchSessions};
use book_search::{
    post_link, BookCandidate, CandidateKind, Downloader, HttpClient, HttpSettings, LinkResolver,
};
use common::mock_bot::{MockBot, Sent};
use common::{callback, CHAT_ID};
use tempfile::TempDir;

const CHANNEL_ID: i64 = -1001234567890;

fn channel_candidate(title: &str, message_id: i32) -> BookCandidate {
    BookCandidate::new(
        title,
        post_link(CHANNEL_ID, message_id),
        "channel",
        CandidateKind::ChannelPost,
    )
}

fn handler(mock: &Arc<MockBot>, sessions: Arc<SearchSessions>, dir: &TempDir) -> DownloadHandler {
    let http = HttpClient::new(&HttpSettings::default()).expect("http client");
    DownloadHandler::new(
        mock.clone() as Arc<dyn Bot>,
        sessions,
        Arc::new(LinkResolver::new(http.clone(), 2)),
        Arc::new(Downloader::new(http, dir.path().to_path_buf(), 1024)),
    )
}

/// **Test: pressing a channel result forwards the post and removes the status message.**
#[tokio::test]
async fn test_channel_post_is_forwarded() {
    let dir = TempDir::new().unwrap();
    let sessions = Arc::new(SearchSessions::new(60));
    let token = sessions
        .insert(
            CHAT_ID,
            "dune",
            vec![channel_candidate("Dune", 41), channel_candidate("Dune Messiah", 42)],
        )
        .await;
    let mock = MockBot::new();

    let response = handler(&mock, sessions, &dir)
        .handle(&callback(&callback_data(&token, 1)))
        .await
        .unwrap();

    assert_eq!(response, HandlerResponse::Reply("Dune Messiah".to_string()));
    assert_eq!(
        mock.calls(),
        vec![
            Sent::Status {
                chat_id: CHAT_ID,
                message_id: "100".to_string(),
                text: messages::fetching("Dune Messiah"),
            },
            Sent::Forward {
                chat_id: CHAT_ID,
                from_chat_id: CHANNEL_ID,
                message_id: 42,
            },
            Sent::Delete {
                message_id: "100".to_string(),
            },
        ]
    );
    assert!(mock.documents().is_empty());
}

/// **Test: when Telegram refuses the forward the status explains the membership requirement.**
#[tokio::test]
async fn test_channel_forward_failure_edits_status() {
    let dir = TempDir::new().unwrap();
    let sessions = Arc::new(SearchSessions::new(60));
    let token = sessions
        .insert(CHAT_ID, "dune", vec![channel_candidate("Dune", 41)])
        .await;
    let mock = MockBot::new();
    mock.reject_forwards();

    let response = handler(&mock, sessions, &dir)
        .handle(&callback(&callback_data(&token, 0)))
        .await
        .unwrap();

    assert_eq!(response, HandlerResponse::Reply(messages::FORWARD_FAILED.to_string()));
    assert_eq!(
        mock.calls().last(),
        Some(&Sent::Edit {
            message_id: "100".to_string(),
            text: messages::FORWARD_FAILED.to_string(),
        })
    );
}
