//! Integration tests for Repurpose using wiremock

use repurpose::{
    AssetRequest, DirectFetcher, FetchError, FetchOptions, Fetcher, FetcherChain, GeminiClient,
    GeminiConfig, GenerationClient, GenerationError, GenerationParams, PipelineError,
    RelayFetcher, RepurposeInput, Repurposer, Selection,
};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-2.0-flash:generateContent";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("repurpose=debug")
        .with_test_writer()
        .try_init();
}

fn article_page() -> String {
    let paragraph = "Shipping small changes every day keeps the feedback loop short \
                     and the blast radius of every mistake small. ";
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Ship small</title><script>var tracking = 1;</script></head>
<body>
    <nav>Home | Blog | Pricing | Contact</nav>
    <article>
        <h1>Ship small, ship often</h1>
        <p>{p}</p>
        <p>{p}</p>
        <p>{p}</p>
        <p>{p}</p>
        <p>{p}</p>
    </article>
    <footer>Copyright 2024</footer>
</body>
</html>"#,
        p = paragraph
    )
}

fn bundle_reply(posts: usize) -> String {
    let posts: Vec<_> = (0..posts)
        .map(|i| serde_json::json!({"angle": format!("Angle {i}"), "content": format!("Post {i}")}))
        .collect();
    serde_json::json!({
        "linkedinPosts": posts,
        "twitterHooks": [
            {"framing": "How-to", "content": "Hook 0"},
            {"framing": "Warning", "content": "Hook 1"},
            {"framing": "Listicle", "content": "Hook 2"}
        ],
        "metaDescription": "Why small releases win.",
        "videoScript": {"title": "Ship Small", "description": "Big releases hurt. Here is the fix."}
    })
    .to_string()
}

fn gemini_envelope(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

async fn mount_gemini(server: &MockServer, reply: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(reply)
        .mount(server)
        .await;
}

fn gemini_client(server: &MockServer) -> GeminiClient {
    let mut config = GeminiConfig::new("test-key");
    config.base_url = server.uri();
    GeminiClient::new(config).unwrap()
}

fn request() -> AssetRequest {
    AssetRequest {
        prompt: "Repurpose this".to_string(),
        params: GenerationParams::default(),
    }
}

#[tokio::test]
async fn test_direct_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(article_page(), "text/html"))
        .mount(&mock_server)
        .await;

    let fetcher = DirectFetcher::default();
    let url = Url::parse(&format!("{}/post", mock_server.uri())).unwrap();
    let html = fetcher.fetch_html(&url).await.unwrap();
    assert!(html.contains("Ship small, ship often"));
}

#[tokio::test]
async fn test_direct_fetch_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = Url::parse(&format!("{}/missing", mock_server.uri())).unwrap();
    let err = DirectFetcher::default().fetch_html(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Status(404)));
}

#[tokio::test]
async fn test_direct_fetch_rejects_binary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/paper.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.7".to_vec(), "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let url = Url::parse(&format!("{}/paper.pdf", mock_server.uri())).unwrap();
    let err = DirectFetcher::default().fetch_html(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::BinaryContent(ct) if ct == "application/pdf"));
}

#[tokio::test]
async fn test_user_agent_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "Repurpose/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>ok</p>", "text/html"))
        .mount(&mock_server)
        .await;

    let url = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    assert!(DirectFetcher::default().fetch_html(&url).await.is_ok());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>late</p>", "text/html")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let options = FetchOptions {
        timeout: Duration::from_millis(200),
        ..Default::default()
    };
    let url = Url::parse(&format!("{}/slow", mock_server.uri())).unwrap();
    let err = DirectFetcher::new(options).fetch_html(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout));
}

#[tokio::test]
async fn test_relay_passes_target_as_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/proxy"))
        .and(query_param("url", "https://blog.example/post?id=7"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(article_page(), "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let relay = RelayFetcher::new(
        format!("{}/api/proxy", mock_server.uri()),
        FetchOptions::default(),
    );
    let target = Url::parse("https://blog.example/post?id=7").unwrap();
    let html = relay.fetch_html(&target).await.unwrap();
    assert!(html.contains("<article>"));
}

#[tokio::test]
async fn test_chain_falls_back_from_relay_to_direct() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/proxy"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(article_page(), "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let chain = FetcherChain::with_defaults(
        &[format!("{}/api/proxy", mock_server.uri())],
        true,
        FetchOptions::default(),
    );
    let html = chain
        .fetch_html(&format!("{}/post", mock_server.uri()))
        .await
        .unwrap();
    assert!(html.contains("Ship small, ship often"));
}

#[tokio::test]
async fn test_chain_all_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let chain = FetcherChain::with_defaults(
        &[format!("{}/relay", mock_server.uri())],
        true,
        FetchOptions::default(),
    );
    let err = chain
        .fetch_html(&format!("{}/post", mock_server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::AllFailed(msg) if msg.contains("503")));
}

#[tokio::test]
async fn test_gemini_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"parts": [{"text": "Repurpose this"}]}],
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_envelope("{\"ok\":true}")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = gemini_client(&mock_server);
    let text = client.complete(&request()).await.unwrap();
    assert_eq!(text, "{\"ok\":true}");
}

#[tokio::test]
async fn test_gemini_server_error() {
    let mock_server = MockServer::start().await;
    mount_gemini(&mock_server, ResponseTemplate::new(500)).await;

    let err = gemini_client(&mock_server)
        .complete(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn test_gemini_rate_limited() {
    let mock_server = MockServer::start().await;
    mount_gemini(&mock_server, ResponseTemplate::new(429)).await;

    let err = gemini_client(&mock_server)
        .complete(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::ServiceUnavailable(msg) if msg.contains("rate limit")));
}

#[tokio::test]
async fn test_gemini_empty_candidates() {
    let mock_server = MockServer::start().await;
    mount_gemini(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
    )
    .await;

    let err = gemini_client(&mock_server)
        .complete(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_gemini_safety_block() {
    let mock_server = MockServer::start().await;
    mount_gemini(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"finishReason": "SAFETY"}]
        })),
    )
    .await;

    let err = gemini_client(&mock_server)
        .complete(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_repurpose_url_end_to_end() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(article_page(), "text/html"))
        .mount(&mock_server)
        .await;
    mount_gemini(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(gemini_envelope(&bundle_reply(3))),
    )
    .await;

    let repurposer = Repurposer::builder()
        .api_key("test-key")
        .gemini_base_url(mock_server.uri())
        .build()
        .unwrap();

    let mut phases = Vec::new();
    let bundle = repurposer
        .repurpose_with_status(
            RepurposeInput::url(format!("{}/post", mock_server.uri())),
            |status| phases.push(status.phase),
        )
        .await
        .unwrap();

    assert_eq!(bundle.linkedin_posts.len(), 3);
    assert_eq!(bundle.twitter_hooks[1].framing, "Warning");
    assert_eq!(bundle.meta_description, "Why small releases win.");
    assert_eq!(bundle.video_script.title, "Ship Small");
    assert_eq!(
        phases,
        vec!["validate", "fetch", "extract", "generate", "complete"]
    );

    let cards = bundle.cards();
    assert_eq!(cards.len(), 8);
    assert_eq!(cards[0].badge, "Angle 0");
    assert_eq!(cards[7].secondary.as_deref(), Some("Big releases hurt. Here is the fix."));
}

#[tokio::test]
async fn test_extract_url_skips_chrome() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(article_page(), "text/html"))
        .mount(&mock_server)
        .await;

    let repurposer = Repurposer::builder().api_key("unused").build().unwrap();
    let content = repurposer
        .extract_url(&format!("{}/post", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(content.selection, Selection::Semantic { selector: "article" });
    assert!(content.text.starts_with("Ship small, ship often"));
    assert!(!content.text.contains("Pricing"));
    assert!(!content.text.contains("Copyright"));
    assert!(!content.text.contains("tracking"));
    assert!(!content.truncated);
}

#[tokio::test]
async fn test_repurpose_text_at_minimum_length() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_envelope(&bundle_reply(3))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let repurposer = Repurposer::builder()
        .api_key("test-key")
        .gemini_base_url(mock_server.uri())
        .build()
        .unwrap();
    let bundle = repurposer
        .repurpose(RepurposeInput::text("a".repeat(50)))
        .await
        .unwrap();
    assert_eq!(bundle.twitter_hooks.len(), 3);
}

#[tokio::test]
async fn test_repurpose_rejects_two_posts() {
    let mock_server = MockServer::start().await;
    mount_gemini(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(gemini_envelope(&bundle_reply(2))),
    )
    .await;

    let repurposer = Repurposer::builder()
        .api_key("test-key")
        .gemini_base_url(mock_server.uri())
        .build()
        .unwrap();
    let err = repurposer
        .repurpose(RepurposeInput::text("b".repeat(200)))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::MalformedResponse));
}

#[tokio::test]
async fn test_repurpose_blocked_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                "<html><body><header>Sign in</header><p>Please log in.</p></body></html>",
                "text/html",
            ),
        )
        .mount(&mock_server)
        .await;

    let repurposer = Repurposer::builder()
        .api_key("test-key")
        .gemini_base_url(mock_server.uri())
        .build()
        .unwrap();
    let err = repurposer
        .repurpose(RepurposeInput::url(format!("{}/login", mock_server.uri())))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::InsufficientContent));
    assert_eq!(
        err.to_string(),
        "Website blocked reading or no content found. Please paste text instead."
    );
}
