//! End-to-end tests for the search → choose → download → send flow.
//!
//! A mockito server plays the library site and the file host; [`common::mock_bot::MockBot`]
//! stands in for Telegram. Config comes from env, so tests are serial.

mod common;

use std::env;
use std::sync::Arc;

use book_bot::messages;
use book_bot::{BookBot, Bot, BotConfig, HandlerResponse};
use common::mock_bot::{MockBot, Sent};
use common::{callback, callback_in_chat, group_text_message, text_message, CHAT_ID};
use mockito::{Matcher, ServerGuard};
use serial_test::serial;
use tempfile::TempDir;

const RESET_VARS: &[&str] = &[
    "TELEGRAM_API_URL",
    "TELOXIDE_API_URL",
    "ALLOWED_USERS",
    "GOOGLE_API_KEY",
    "GOOGLE_CSE_ID",
    "GOOGLE_CX",
    "AI_FILTER_ENABLED",
    "MAX_SEARCH_RESULTS",
    "DOWNLOAD_MAX_MB",
    "SESSION_TTL_SECS",
    "RESOLVE_MAX_HOPS",
];

const BOOK_PAGE: &str = r##"<html><body>
    <h1>Dune - Frank Herbert</h1>
    <a href="#">Share</a>
    <a class="btn-download" href="/files/dune.pdf">Download PDF</a>
</body></html>"##;

/// Points the library provider at `server` and downloads into `dir`; `extra` is applied last.
fn setup_config(server: &ServerGuard, dir: &TempDir, extra: &[(&str, &str)]) -> BotConfig {
    for var in RESET_VARS {
        env::remove_var(var);
    }
    env::set_var("BOT_TOKEN", "12345:test_bot_token");
    env::set_var("SEARCH_PROVIDERS", "library");
    env::set_var("LIBRARY_BASE_URL", server.url());
    env::set_var("LIBRARY_SEARCH_PATH", "/search?query=");
    env::set_var("SEARCH_LINK_FALLBACK", "false");
    env::set_var("DOWNLOAD_DIR", dir.path());
    for (k, v) in extra {
        env::set_var(k, v);
    }
    let config = BotConfig::load(None).expect("BotConfig::load must succeed in test setup");
    config.validate().expect("test config must be valid");
    config
}

fn book_bot(config: BotConfig) -> (BookBot, Arc<MockBot>) {
    let mock = MockBot::new();
    let bot = BookBot::new_with_bot(config, mock.clone() as Arc<dyn Bot>).expect("build bot");
    (bot, mock)
}

async fn mock_search(server: &mut ServerGuard, query: &str, body: &str) -> mockito::Mock {
    server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded("query".into(), query.into()))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .create_async()
        .await
}

async fn mock_page(server: &mut ServerGuard, path: &str, body: &str) -> mockito::Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .create_async()
        .await
}

fn dir_is_empty(dir: &TempDir) -> bool {
    std::fs::read_dir(dir.path())
        .expect("read_dir")
        .next()
        .is_none()
}

/// **Test: a title search offers the result, pressing it uploads the PDF and removes the local copy.**
#[tokio::test]
#[serial]
async fn test_search_choose_download_send() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let _search = mock_search(
        &mut server,
        "dune",
        r#"<a href="/book-dune-pdf" title="Dune - Frank Herbert">cover</a>
           <a href="/book-dune-pdf">Dune - Frank Herbert</a>
           <a href="/book-dune-pdf">Details</a>"#,
    )
    .await;
    let _page = mock_page(&mut server, "/book-dune-pdf", BOOK_PAGE).await;
    let _file = server
        .mock("GET", "/files/dune.pdf")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body("%PDF-1.4 dune test")
        .create_async()
        .await;

    let (bot, mock) = book_bot(setup_config(&server, &dir, &[]));

    bot.handle_update(&text_message("dune")).await;
    let calls = mock.calls();
    assert_eq!(
        calls[0],
        Sent::Status {
            chat_id: CHAT_ID,
            message_id: "100".to_string(),
            text: messages::searching("dune"),
        }
    );
    assert_eq!(
        calls[1],
        Sent::Delete {
            message_id: "100".to_string()
        }
    );
    match &calls[2] {
        Sent::Choices { text, choices } => {
            assert_eq!(text, &messages::choices_header("dune", 1));
            assert_eq!(choices.len(), 1);
            assert_eq!(choices[0].label, "1. Dune - Frank Herbert");
        }
        other => panic!("expected choices, got {:?}", other),
    }

    let callbacks = mock.last_callbacks();
    assert_eq!(callbacks.len(), 1);
    assert!(callbacks[0].starts_with("dl:"));

    bot.handle_update(&callback(&callbacks[0])).await;
    let calls = mock.calls();
    assert_eq!(
        calls[3],
        Sent::Status {
            chat_id: CHAT_ID,
            message_id: "102".to_string(),
            text: messages::fetching("Dune - Frank Herbert"),
        }
    );
    match &calls[4] {
        Sent::Document {
            file_name,
            caption,
            size,
            existed,
            path,
        } => {
            assert_eq!(file_name, "Dune - Frank Herbert.pdf");
            assert_eq!(caption.as_deref(), Some("Dune - Frank Herbert"));
            assert_eq!(*size, "%PDF-1.4 dune test".len() as u64);
            assert!(existed);
            assert!(!path.exists(), "local copy must be deleted after upload");
        }
        other => panic!("expected document, got {:?}", other),
    }
    assert_eq!(
        calls[5],
        Sent::Delete {
            message_id: "102".to_string()
        }
    );
    assert!(dir_is_empty(&dir));
}

/// **Test: nothing found edits the status and offers a Google link when the fallback is on.**
#[tokio::test]
#[serial]
async fn test_not_found_with_link_fallback() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let _search = mock_search(&mut server, "unknown book", "<p>No results</p>").await;

    let (bot, mock) = book_bot(setup_config(
        &server,
        &dir,
        &[("SEARCH_LINK_FALLBACK", "true")],
    ));
    bot.handle_update(&text_message("unknown book")).await;

    let calls = mock.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[1],
        Sent::Edit {
            message_id: "100".to_string(),
            text: messages::not_found("unknown book"),
        }
    );
    match &calls[2] {
        Sent::Choices { choices, .. } => {
            assert_eq!(choices.len(), 1);
            assert!(matches!(
                &choices[0].action,
                book_bot::ChoiceAction::Url(u) if u.starts_with("https://www.google.com/search?q=")
            ));
        }
        other => panic!("expected link choice, got {:?}", other),
    }
}

/// **Test: a failing library site shows the generic search error.**
#[tokio::test]
#[serial]
async fn test_search_error_edits_status() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let _search = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let (bot, mock) = book_bot(setup_config(&server, &dir, &[]));
    bot.handle_update(&text_message("dune")).await;

    assert_eq!(
        mock.calls().last(),
        Some(&Sent::Edit {
            message_id: "100".to_string(),
            text: messages::SEARCH_FAILED.to_string(),
        })
    );
}

/// **Test: unknown tokens and presses from another chat get the expired message.**
#[tokio::test]
#[serial]
async fn test_expired_or_foreign_session() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let _search = mock_search(
        &mut server,
        "dune",
        r#"<a href="/book-dune-pdf">Dune - Frank Herbert</a>"#,
    )
    .await;

    let (bot, mock) = book_bot(setup_config(&server, &dir, &[]));
    bot.handle_update(&callback("dl:deadbeef:0")).await;
    assert_eq!(
        mock.calls(),
        vec![Sent::Text {
            chat_id: CHAT_ID,
            text: messages::SESSION_EXPIRED.to_string(),
        }]
    );

    bot.handle_update(&text_message("dune")).await;
    let data = mock.last_callbacks().remove(0);
    bot.handle_update(&callback_in_chat(&data, 999)).await;
    assert_eq!(
        mock.calls().last(),
        Some(&Sent::Text {
            chat_id: 999,
            text: messages::SESSION_EXPIRED.to_string(),
        })
    );
    assert!(mock.documents().is_empty());
}

/// **Test: a page without a download link reports it and sends nothing.**
#[tokio::test]
#[serial]
async fn test_no_download_link() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let _search = mock_search(
        &mut server,
        "dune",
        r#"<a href="/book-dune-pdf">Dune - Frank Herbert</a>"#,
    )
    .await;
    let _page = mock_page(&mut server, "/book-dune-pdf", "<p>Removed at the author's request</p>").await;

    let (bot, mock) = book_bot(setup_config(&server, &dir, &[]));
    bot.handle_update(&text_message("dune")).await;
    let data = mock.last_callbacks().remove(0);
    bot.handle_update(&callback(&data)).await;

    assert_eq!(
        mock.calls().last(),
        Some(&Sent::Edit {
            message_id: "102".to_string(),
            text: messages::NO_DOWNLOAD_LINK.to_string(),
        })
    );
    assert!(mock.documents().is_empty());
}

/// **Test: files over DOWNLOAD_MAX_MB are refused and nothing is left on disk.**
#[tokio::test]
#[serial]
async fn test_file_too_large() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let _search = mock_search(
        &mut server,
        "dune",
        r#"<a href="/book-dune-pdf">Dune - Frank Herbert</a>"#,
    )
    .await;
    let _page = mock_page(&mut server, "/book-dune-pdf", BOOK_PAGE).await;
    let mut body = b"%PDF-1.4 ".to_vec();
    body.resize(2 * 1024 * 1024, b'x');
    let _file = server
        .mock("GET", "/files/dune.pdf")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body(body)
        .create_async()
        .await;

    let (bot, mock) = book_bot(setup_config(&server, &dir, &[("DOWNLOAD_MAX_MB", "1")]));
    bot.handle_update(&text_message("dune")).await;
    let data = mock.last_callbacks().remove(0);
    bot.handle_update(&callback(&data)).await;

    match mock.calls().last() {
        Some(Sent::Edit { message_id, text }) => {
            assert_eq!(message_id, "102");
            assert!(text.contains("too large"), "unexpected text: {}", text);
            assert!(text.contains("limit 1.0 MB"), "unexpected text: {}", text);
        }
        other => panic!("expected edit, got {:?}", other),
    }
    assert!(mock.documents().is_empty());
    assert!(dir_is_empty(&dir));
}

/// **Test: text in a group chat is not searched and gets no answer.**
#[tokio::test]
#[serial]
async fn test_group_chat_text_is_ignored() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let search = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (bot, mock) = book_bot(setup_config(&server, &dir, &[]));
    let response = bot
        .handle_update(&group_text_message("hello everyone in the group", -100123))
        .await;

    assert_eq!(response, Some(HandlerResponse::Continue));
    assert!(mock.calls().is_empty());
    search.assert_async().await;
}

/// **Test: /start greets, unknown commands and one-letter queries never reach the search.**
#[tokio::test]
#[serial]
async fn test_commands_and_short_queries() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let search = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (bot, mock) = book_bot(setup_config(&server, &dir, &[]));
    bot.handle_update(&text_message("/start")).await;
    bot.handle_update(&text_message("/settings")).await;
    bot.handle_update(&text_message("a")).await;
    bot.handle_update(&text_message("   ")).await;

    assert_eq!(
        mock.calls(),
        vec![
            Sent::Text {
                chat_id: CHAT_ID,
                text: messages::GREETING.to_string(),
            },
            Sent::Text {
                chat_id: CHAT_ID,
                text: messages::QUERY_TOO_SHORT.to_string(),
            },
        ]
    );
    search.assert_async().await;
}

/// **Test: with ALLOWED_USERS set, other users get no answer at all.**
#[tokio::test]
#[serial]
async fn test_allowed_users_blocks_others() {
    let server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let (bot, mock) = book_bot(setup_config(&server, &dir, &[("ALLOWED_USERS", "1,2")]));
    let response = bot.handle_update(&text_message("dune")).await;

    assert!(response.is_none());
    assert!(mock.calls().is_empty());
}
