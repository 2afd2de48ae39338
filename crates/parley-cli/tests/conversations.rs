//! Integration tests for `parley conversations` and `parley search`.

mod support;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use support::{can_bind_localhost, read_state, temp_parley_home, write_state};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_conversations_list_resolves_labels() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_parley_home();
    write_state(
        home.path(),
        &json!({ "conversationId": "c2", "session": "session=xyz" }),
    );
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/conversations"))
        .and(header("cookie", "session=xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "conversation_id": "c1", "subject": "Trip plans", "conversation_name": null },
            { "conversation_id": "c2", "subject": null, "conversation_name": "Recipes" },
            { "conversation_id": "0123456789", "subject": "", "conversation_name": "" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_SERVER_URL", server.uri())
        .args(["conversations", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  Trip plans  c1"))
        .stdout(predicate::str::contains("* Recipes  c2"))
        .stdout(predicate::str::contains("Conversation 01234567  0123456789"));
}

#[tokio::test]
async fn test_conversations_list_empty() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_parley_home();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_SERVER_URL", server.uri())
        .args(["conversations", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No conversations found."));
}

#[tokio::test]
async fn test_conversations_show_prints_transcript() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_parley_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/load_conversation"))
        .and(body_json(json!({ "conversation_id": "abc123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{ "user": "Hello", "bot": "Hi" }],
            "subject": "Greetings"
        })))
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_SERVER_URL", server.uri())
        .args(["conversations", "show", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Greetings"))
        .stdout(predicate::str::contains("user: Hello\nbot: Hi"));
}

#[tokio::test]
async fn test_conversations_show_keeps_active_conversation() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_parley_home();
    write_state(home.path(), &json!({ "conversationId": "keep" }));
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/load_conversation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{ "user": "Hello", "bot": "Hi" }]
        })))
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_SERVER_URL", server.uri())
        .args(["conversations", "show", "other"])
        .assert()
        .success();

    assert_eq!(read_state(home.path())["conversationId"], "keep");
}

#[tokio::test]
async fn test_conversations_show_not_found() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_parley_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/load_conversation"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_SERVER_URL", server.uri())
        .args(["conversations", "show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("load conversation 'missing': not found"));
}

#[tokio::test]
async fn test_conversations_delete_active_clears_state() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_parley_home();
    write_state(home.path(), &json!({ "conversationId": "abc123" }));
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/delete_conversation"))
        .and(body_json(json!({ "conversation_id": "abc123" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Conversation deleted" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_SERVER_URL", server.uri())
        .args(["conversations", "delete", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conversation deleted"));

    assert!(read_state(home.path()).get("conversationId").is_none());
}

#[tokio::test]
async fn test_conversations_delete_other_keeps_active() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_parley_home();
    write_state(home.path(), &json!({ "conversationId": "keep" }));
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/delete_conversation"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Conversation deleted" })),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_SERVER_URL", server.uri())
        .args(["conversations", "delete", "other"])
        .assert()
        .success();

    assert_eq!(read_state(home.path())["conversationId"], "keep");
}

#[tokio::test]
async fn test_conversations_rename_blank_is_rejected() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_parley_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rename_conversation"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_SERVER_URL", server.uri())
        .args(["conversations", "rename", "abc123", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("new_name must not be empty"));
}

#[tokio::test]
async fn test_conversations_rename_prints_ack() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_parley_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rename_conversation"))
        .and(body_json(json!({ "conversation_id": "abc123", "new_name": "Trip" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Conversation renamed" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_SERVER_URL", server.uri())
        .args(["conversations", "rename", "abc123", " Trip "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conversation renamed"));
}

#[tokio::test]
async fn test_search_prints_hits() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_parley_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({ "search_term": "paris" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "user": "Trip to paris?", "bot": "Sure", "subject": null, "conversation_id": "c9" }
        ])))
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_SERVER_URL", server.uri())
        .args(["search", " paris "])
        .assert()
        .success()
        .stdout(predicate::str::contains("N/A  c9"))
        .stdout(predicate::str::contains("You: Trip to paris?"))
        .stdout(predicate::str::contains("Bot: Sure"));
}

#[tokio::test]
async fn test_search_no_results() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_parley_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    cargo_bin_cmd!("parley")
        .env("PARLEY_HOME", home.path())
        .env("PARLEY_SERVER_URL", server.uri())
        .args(["search", "nothing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found."));
}
