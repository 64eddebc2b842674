mod common;

use common::ScriptedLlm;
use cpf_chat::{ChatEngine, ContentFetcher, FetchError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<!DOCTYPE html>
<html>
<head><title>About CPF</title><script>var x = "<p>not a paragraph</p>";</script></head>
<body>
  <h1>Central Provident Fund</h1>
  <p>The CPF is a compulsory savings scheme.</p>
  <p>It has an <a href="/oa">Ordinary Account</a> and a Special Account.</p>
  <table><tr><td>Table text is ignored</td></tr></table>
</body>
</html>"#;

async fn serve_article(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/about-cpf/"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_fetch_flattens_paragraphs() {
    let server = serve_article(200, ARTICLE).await;
    let fetcher = ContentFetcher::new(format!("{}/about-cpf/", server.uri()));

    let text = fetcher.fetch().await.unwrap();
    assert_eq!(
        text,
        "The CPF is a compulsory savings scheme. It has an Ordinary Account and a Special Account."
    );
}

#[tokio::test]
async fn test_fetch_non_success_is_error() {
    let server = serve_article(404, "gone").await;
    let fetcher = ContentFetcher::new(format!("{}/about-cpf/", server.uri()));

    let err = fetcher.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let fetcher = ContentFetcher::new("http://127.0.0.1:9/about-cpf/");
    let (text, err) = fetcher.fetch_or_empty().await;
    assert_eq!(text, "");
    assert!(matches!(err, Some(FetchError::Network { .. })));
}

#[tokio::test]
async fn test_session_starts_with_article_context() {
    let server = serve_article(200, ARTICLE).await;
    let engine = ChatEngine::new(ScriptedLlm::new())
        .with_fetcher(ContentFetcher::new(format!("{}/about-cpf/", server.uri())));

    let session = engine.start_session().await;
    assert!(session.context().starts_with("The CPF is a compulsory savings scheme."));
    assert!(session.notice().is_none());
}

#[tokio::test]
async fn test_fetch_notice_outlives_successful_turns() {
    let server = serve_article(503, "down").await;
    let engine = ChatEngine::new(ScriptedLlm::new())
        .with_fetcher(ContentFetcher::new(format!("{}/about-cpf/", server.uri())));

    let mut session = engine.start_session().await;
    let notice = session.notice().map(str::to_string);
    assert!(notice.is_some());

    engine.process_turn(&mut session, "What is CPF?").await.unwrap();
    engine.process_turn(&mut session, "CPF payout age?").await.unwrap();

    assert_eq!(session.notice().map(str::to_string), notice);
    assert_eq!(session.context(), "");
    assert_eq!(session.history().len(), 4);
}

#[tokio::test]
async fn test_failed_fetch_degrades_to_empty_context_with_notice() {
    let server = serve_article(500, "boom").await;
    let engine = ChatEngine::new(ScriptedLlm::new())
        .with_fetcher(ContentFetcher::new(format!("{}/about-cpf/", server.uri())));

    let session = engine.start_session().await;
    assert_eq!(session.context(), "");
    let notice = session.notice().unwrap();
    assert!(notice.starts_with("Error loading website content:"));
    assert!(notice.contains("500"));
    assert_eq!(session.suggestions().as_slice().len(), 3);
}
