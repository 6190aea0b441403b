//! End-to-end triage runs against mocked Gmail, token, and chat endpoints.

#![allow(clippy::unwrap_used)]

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use mailtriage_core::testing::FakeCredentials;
use mailtriage_core::{
    Category, ClassificationResult, Classifier, FailureReason, GmailTicketSource,
    OAuthCredentialProvider, OpenAiChatClient, Orchestrator, Session, TicketOrigin, Urgency,
    config::BATCH_SIZE,
};
use mailtriage_gmail::GmailClient;
use mailtriage_oauth::{Token, TokenStore};
use serde_json::{Value, json};
use std::fs;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fresh_token() -> Token {
    Token::new("ya29.pipeline", "Bearer").with_expires_at(Utc::now() + Duration::hours(1))
}

fn gmail_client(server: &MockServer) -> GmailClient {
    GmailClient::new(reqwest::Client::new()).with_base_url(format!("{}/gmail/v1", server.uri()))
}

fn chat_client(server: &MockServer) -> OpenAiChatClient {
    OpenAiChatClient::new(reqwest::Client::new(), "gsk_pipeline")
        .with_api_base(format!("{}/openai/v1", server.uri()))
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-pipeline",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content},
                     "finish_reason": "stop"}]
    })
}

fn full_message(id: &str, subject: &str, body: &str) -> Value {
    json!({
        "id": id,
        "threadId": id,
        "labelIds": ["INBOX"],
        "payload": {
            "mimeType": "multipart/alternative",
            "headers": [{"name": "Subject", "value": subject}],
            "parts": [
                {"mimeType": "text/html", "body": {"size": 1, "data": URL_SAFE_NO_PAD.encode("<p>html</p>")}},
                {"mimeType": "text/plain", "body": {"size": body.len(), "data": URL_SAFE_NO_PAD.encode(body)}}
            ]
        }
    })
}

async fn mount_inbox(server: &MockServer, messages: &[(&str, &str, &str)]) {
    let refs: Vec<_> = messages
        .iter()
        .map(|(id, _, _)| json!({"id": id, "threadId": id}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": refs})))
        .mount(server)
        .await;
    for (id, subject, body) in messages {
        Mock::given(method("GET"))
            .and(path(format!("/gmail/v1/users/me/messages/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_message(id, subject, body)))
            .mount(server)
            .await;
    }
}

async fn chat_prompts(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().ends_with("/chat/completions"))
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            body["messages"][1]["content"].as_str().unwrap().to_string()
        })
        .collect()
}

#[tokio::test]
async fn test_inbox_tickets_are_classified() {
    let server = MockServer::start().await;
    mount_inbox(
        &server,
        &[
            ("m1", "Compte bloqué", "Je n'arrive plus à me connecter depuis ce matin."),
            ("m2", "Imprimante", "L'imprimante du 2e étage ne répond plus."),
        ],
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"categorie": "probleme_acces_authentification", "urgence": "elevee",
                "synthese": "L'utilisateur ne peut plus se connecter."}"#,
        )))
        .expect(2)
        .mount(&server)
        .await;

    let session = Session::new(FakeCredentials::new().with_stored(fresh_token()));
    let mut orchestrator = Orchestrator::new(
        GmailTicketSource::new(gmail_client(&server), session),
        Classifier::new(chat_client(&server), "llama-3.1-8b-instant"),
    );

    let run = orchestrator.run(BATCH_SIZE).await.unwrap();
    assert_eq!(run.origin, TicketOrigin::Mailbox);
    assert_eq!(run.entries.len(), 2);
    assert_eq!(run.entries[0].ticket.subject, "Compte bloqué");
    assert_eq!(
        run.entries[1].ticket.body,
        "L'imprimante du 2e étage ne répond plus."
    );
    for entry in &run.entries {
        assert_eq!(entry.result.category(), Some(Category::AccessProblem));
        assert_eq!(entry.result.urgency(), Some(Urgency::High));
    }

    let prompts = chat_prompts(&server).await;
    assert!(prompts[0].contains("Je n'arrive plus à me connecter depuis ce matin."));
    assert!(prompts[1].contains("Imprimante"));
}

#[tokio::test]
async fn test_rate_limited_mailbox_falls_back_to_samples() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("^/gmail/v1/"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "Too many requests",
                      "errors": [{"reason": "rateLimitExceeded"}]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"categorie": "demande_administrative", "urgence": "faible", "synthese": "Demande."}"#,
        )))
        .mount(&server)
        .await;

    let session = Session::new(FakeCredentials::new().with_stored(fresh_token()));
    let mut orchestrator = Orchestrator::new(
        GmailTicketSource::new(gmail_client(&server), session),
        Classifier::new(chat_client(&server), "llama-3.1-8b-instant"),
    );

    let run = orchestrator.run(BATCH_SIZE).await.unwrap();
    assert_eq!(run.origin, TicketOrigin::Samples);
    assert!(run.entries.len() >= 2);
    assert!(run.entries.iter().all(|e| e.ticket.is_sample()));

    let prompts = chat_prompts(&server).await;
    assert_eq!(prompts.len(), run.entries.len());
    assert!(prompts.iter().any(|p| p.contains("Demande d'attestation de scolarité")));
}

#[tokio::test]
async fn test_chat_failures_stay_per_ticket() {
    let server = MockServer::start().await;
    mount_inbox(&server, &[("m1", "Sujet", "Corps")]).await;
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let session = Session::new(FakeCredentials::new().with_stored(fresh_token()));
    let mut orchestrator = Orchestrator::new(
        GmailTicketSource::new(gmail_client(&server), session),
        Classifier::new(chat_client(&server), "llama-3.1-8b-instant"),
    );

    let run = orchestrator.run(BATCH_SIZE).await.unwrap();
    assert_eq!(run.entries.len(), 1);
    assert_eq!(
        run.entries[0].result,
        ClassificationResult::failed(FailureReason::ServiceRejected { status: 503 })
    );
    assert_eq!(
        run.entries[0].result.to_json(),
        json!({"erreur": "service_rejected (503)"})
    );
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_persisted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.refreshed",
            "token_type": "Bearer",
            "expires_in": 3599,
            "scope": "https://www.googleapis.com/auth/gmail.readonly"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_inbox(&server, &[("m1", "Sujet", "Corps")]).await;
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"categorie": "demande_support_utilisateur", "urgence": "moderee", "synthese": "Question."}"#,
        )))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let secrets_path = dir.path().join("credentials.json");
    fs::write(
        &secrets_path,
        json!({"installed": {
            "client_id": "123.apps.googleusercontent.com",
            "client_secret": "shh",
            "auth_uri": format!("{}/oauth/auth", server.uri()),
            "token_uri": format!("{}/oauth/token", server.uri())
        }})
        .to_string(),
    )
    .unwrap();
    let token_path = dir.path().join("token.json");
    let store = TokenStore::new(&token_path);
    store
        .save(
            &Token::new("ya29.expired", "Bearer")
                .with_refresh_token("1//keep")
                .with_expires_at(Utc::now() - Duration::hours(1)),
        )
        .unwrap();

    let provider =
        OAuthCredentialProvider::new(&secrets_path, &token_path, reqwest::Client::new())
            .without_browser();
    let mut orchestrator = Orchestrator::new(
        GmailTicketSource::new(gmail_client(&server), Session::new(provider)),
        Classifier::new(chat_client(&server), "llama-3.1-8b-instant"),
    );

    let run = orchestrator.run(BATCH_SIZE).await.unwrap();
    assert_eq!(run.origin, TicketOrigin::Mailbox);
    assert_eq!(run.entries[0].result.urgency(), Some(Urgency::Moderate));

    let persisted = store.load().unwrap().unwrap();
    assert_eq!(persisted.access_token, "ya29.refreshed");
    assert_eq!(persisted.refresh_token.as_deref(), Some("1//keep"));

    let gmail_auth = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.url.path().starts_with("/gmail/v1/"))
        .unwrap();
    assert_eq!(
        gmail_auth.headers.get("authorization").unwrap(),
        "Bearer ya29.refreshed"
    );
}
