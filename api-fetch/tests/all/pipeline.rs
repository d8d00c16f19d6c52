use std::sync::Arc;

use api_fetch::{
    api_fetch, core_api_fetch, AutoContentType, Body, BoxFuture, ClientBuilder, Credentials,
    Envelope, Error, FetchOptions, MapOptions, Middleware, Next, RequestInit, Result,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::json;

use crate::helpers::{FailingTransport, RecordingTransport, API_URL};

fn success() -> RecordingTransport {
    RecordingTransport::json(200, json!({ "foo": "bar" }))
}

fn default_request(method: Method) -> RequestInit {
    RequestInit {
        credentials: Some(Credentials::SameOrigin),
        method: Some(method),
        ..Default::default()
    }
}

/// Keeps the last path segment of the url, like a proxy would.
fn last_segment_only(mut options: FetchOptions, next: Next<'_>) -> BoxFuture<'_, Result<Envelope>> {
    let segment = options.url.rsplit('/').next().unwrap_or_default().to_owned();
    options.url = format!("/{}", segment);
    next.run(options)
}

/// Answers from memory without going to the network.
struct Cached;

#[async_trait::async_trait]
impl Middleware for Cached {
    async fn handle(&self, options: FetchOptions, _next: Next<'_>) -> Result<Envelope> {
        Ok(Envelope::new(options.url, StatusCode::OK).with_data(json!({ "cached": true })))
    }
}

/// Appends its name to the `x-order` header.
struct Tag(&'static str);

#[async_trait::async_trait]
impl Middleware for Tag {
    async fn handle(&self, mut options: FetchOptions, next: Next<'_>) -> Result<Envelope> {
        options
            .request
            .headers
            .get_or_insert_with(HeaderMap::new)
            .append("x-order", HeaderValue::from_static(self.0));
        tokio::task::yield_now().await;
        next.run(options).await
    }
}

#[tokio::test]
async fn resolves_with_parsed_response() {
    let transport = success();

    let envelope = api_fetch(&transport, FetchOptions::new(API_URL), &[])
        .await
        .unwrap();

    assert_eq!(envelope.data(), Some(&json!({ "foo": "bar" })));
    assert_eq!(envelope.status(), StatusCode::OK);
}

#[tokio::test]
async fn resolves_with_unparsed_response() {
    let transport = success();

    let envelope = api_fetch(&transport, FetchOptions::new(API_URL).parsed(false), &[])
        .await
        .unwrap();

    assert_eq!(envelope.data(), None);
    assert_eq!(envelope.text(), Some(r#"{"foo":"bar"}"#));
    assert_eq!(envelope.status(), StatusCode::OK);
}

#[tokio::test]
async fn rejects_invalid_json() {
    let transport = RecordingTransport::new(200, "foo");

    let err = api_fetch(&transport, FetchOptions::new(API_URL), &[])
        .await
        .unwrap_err();

    assert!(err.is_decode(), "{:?}", err);
}

#[tokio::test]
async fn unparsed_responses_are_not_decoded() {
    let transport = RecordingTransport::new(200, "foo");

    let envelope = api_fetch(&transport, FetchOptions::new(API_URL).parsed(false), &[])
        .await
        .unwrap();

    assert_eq!(envelope.body().as_ref(), b"foo");
}

#[tokio::test]
async fn rejects_with_the_whole_envelope() {
    let transport = RecordingTransport::json(500, json!({ "error": "bar" }));

    let err = api_fetch(&transport, FetchOptions::new(API_URL), &[])
        .await
        .unwrap_err();

    assert!(err.is_status());
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.url(), Some(API_URL));
    let envelope = err.into_envelope().unwrap();
    assert_eq!(envelope.data(), Some(&json!({ "error": "bar" })));
}

#[tokio::test]
async fn classifies_status_boundaries() {
    for (status, resolves) in [(199, false), (200, true), (399, true), (400, false)] {
        let transport = RecordingTransport::json(status, json!({}));

        let outcome = api_fetch(&transport, FetchOptions::new(API_URL), &[]).await;

        match outcome {
            Ok(envelope) => {
                assert!(resolves, "{} should reject", status);
                assert_eq!(envelope.status().as_u16(), status);
            }
            Err(err) => {
                assert!(!resolves, "{} should resolve", status);
                assert_eq!(err.status().map(|s| s.as_u16()), Some(status));
            }
        }
    }
}

#[tokio::test]
async fn transport_failures_propagate() {
    let err = api_fetch(&FailingTransport, FetchOptions::new(API_URL), &[])
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn sets_default_params() {
    let transport = success();

    api_fetch(&transport, FetchOptions::new(API_URL), &[])
        .await
        .unwrap();

    assert_eq!(
        transport.single_call(),
        (API_URL.to_owned(), default_request(Method::GET))
    );
}

#[tokio::test]
async fn leaves_unset_params_out() {
    let transport = success();
    let mut options = FetchOptions::new(API_URL).method(Method::POST);
    options.request.body = None;

    api_fetch(&transport, options, &[]).await.unwrap();

    let (_, init) = transport.single_call();
    assert_eq!(init, default_request(Method::POST));
    assert_eq!(init.body, None);
    assert_eq!(init.headers, None);
}

#[tokio::test]
async fn core_fetch_adds_nothing() {
    let transport = success();

    core_api_fetch(&transport, FetchOptions::new(API_URL), &[])
        .await
        .unwrap();

    let (url, init) = transport.single_call();
    assert_eq!(url, API_URL);
    assert!(init.is_empty());
}

#[tokio::test]
async fn accepts_custom_middleware() {
    let transport = success();
    let middlewares: Vec<Arc<dyn Middleware>> = vec![Arc::new(last_segment_only)];

    api_fetch(&transport, FetchOptions::new(API_URL), &middlewares)
        .await
        .unwrap();

    assert_eq!(
        transport.single_call(),
        ("/api".to_owned(), default_request(Method::GET))
    );
}

#[tokio::test]
async fn runs_middlewares_in_registration_order() {
    let transport = success();
    let middlewares: Vec<Arc<dyn Middleware>> =
        vec![Arc::new(Tag("first")), Arc::new(Tag("second")), Arc::new(Tag("third"))];

    api_fetch(&transport, FetchOptions::new(API_URL), &middlewares)
        .await
        .unwrap();

    let (_, init) = transport.single_call();
    let headers = init.headers.unwrap();
    let order: Vec<_> = headers
        .get_all("x-order")
        .iter()
        .map(|value| value.to_str().unwrap())
        .collect();
    assert_eq!(order, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn custom_middleware_sees_defaults_applied() {
    let transport = success();
    let middlewares: Vec<Arc<dyn Middleware>> = vec![Arc::new(MapOptions(
        |options: FetchOptions| -> Result<FetchOptions> {
            assert_eq!(options.request.method, Some(Method::GET));
            assert_eq!(options.is_parsed, Some(true));
            assert_eq!(
                options.request.body,
                Some(Body::SerializedJson("[1,2]".to_owned()))
            );
            Ok(options)
        },
    ))];

    api_fetch(
        &transport,
        FetchOptions::new(API_URL).body(json!([1, 2])),
        &middlewares,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn short_circuit_skips_the_transport() {
    let transport = success();
    let middlewares: Vec<Arc<dyn Middleware>> =
        vec![Arc::new(Cached), Arc::new(last_segment_only)];

    let envelope = api_fetch(&transport, FetchOptions::new(API_URL), &middlewares)
        .await
        .unwrap();

    assert!(transport.calls().is_empty());
    assert_eq!(envelope.url(), API_URL);
    assert_eq!(envelope.data(), Some(&json!({ "cached": true })));
}

#[tokio::test]
async fn middleware_failures_propagate() {
    let transport = success();
    let middlewares: Vec<Arc<dyn Middleware>> = vec![Arc::new(MapOptions(
        |_: FetchOptions| -> Result<FetchOptions> { Err(anyhow::anyhow!("boom").into()) },
    ))];

    let err = api_fetch(&transport, FetchOptions::new(API_URL), &middlewares)
        .await
        .unwrap_err();

    assert!(err.is_middleware());
    assert_eq!(err.to_string(), "Middleware error: boom");
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn serializes_body() {
    let transport = success();

    api_fetch(
        &transport,
        FetchOptions::new(API_URL)
            .method(Method::POST)
            .body(json!({ "foo": "bar" })),
        &[],
    )
    .await
    .unwrap();

    let (_, init) = transport.single_call();
    assert_eq!(
        init.body.as_ref().and_then(Body::as_text),
        Some(r#"{"foo":"bar"}"#)
    );
}

#[tokio::test]
async fn string_body_passes_through() {
    let transport = success();

    api_fetch(
        &transport,
        FetchOptions::new(API_URL)
            .method(Method::POST)
            .body("plain text"),
        &[],
    )
    .await
    .unwrap();

    let (_, init) = transport.single_call();
    assert_eq!(init.body, Some(Body::Text("plain text".to_owned())));
}

#[tokio::test]
async fn sets_content_type() {
    let transport = success();
    let middlewares: Vec<Arc<dyn Middleware>> = vec![Arc::new(AutoContentType)];
    let options = FetchOptions::new(API_URL)
        .method(Method::POST)
        .header("x-custom-token", HeaderValue::from_static("123456789"))
        .body(json!({ "foo": "bar" }));

    api_fetch(&transport, options, &middlewares).await.unwrap();

    let mut headers = HeaderMap::new();
    headers.insert("x-custom-token", HeaderValue::from_static("123456789"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    assert_eq!(
        transport.single_call(),
        (
            API_URL.to_owned(),
            RequestInit {
                body: Some(Body::SerializedJson(r#"{"foo":"bar"}"#.to_owned())),
                credentials: Some(Credentials::SameOrigin),
                method: Some(Method::POST),
                headers: Some(headers),
                ..Default::default()
            }
        )
    );
}

#[tokio::test]
async fn concurrent_calls_do_not_share_chains() {
    let transport = success();
    let chain_a: Vec<Arc<dyn Middleware>> = vec![Arc::new(Tag("a1")), Arc::new(Tag("a2"))];
    let chain_b: Vec<Arc<dyn Middleware>> = vec![Arc::new(Tag("b1"))];

    let (a, b) = tokio::join!(
        api_fetch(&transport, FetchOptions::new("/a"), &chain_a),
        api_fetch(&transport, FetchOptions::new("/b"), &chain_b),
    );
    a.unwrap();
    b.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    for (url, init) in calls {
        let headers = init.headers.unwrap();
        let order: Vec<_> = headers
            .get_all("x-order")
            .iter()
            .map(|value| value.to_str().unwrap().to_owned())
            .collect();
        match url.as_str() {
            "/a" => assert_eq!(order, vec!["a1", "a2"]),
            "/b" => assert_eq!(order, vec!["b1"]),
            other => panic!("unexpected url {}", other),
        }
    }
}

#[tokio::test]
async fn client_runs_its_chain() {
    let transport = success();
    let client = ClientBuilder::with_defaults(transport.clone())
        .with(AutoContentType)
        .build();

    client
        .fetch(FetchOptions::new(API_URL).body(json!({ "foo": "bar" })))
        .await
        .unwrap();
    let extra: Vec<Arc<dyn Middleware>> = vec![Arc::new(Cached)];
    let cached = client
        .fetch_with(FetchOptions::new(API_URL), &extra)
        .await
        .unwrap();

    assert_eq!(client.middleware_count(), 3);
    assert_eq!(cached.data(), Some(&json!({ "cached": true })));
    let (_, init) = transport.single_call();
    assert_eq!(
        init.headers.unwrap().get(CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn client_is_a_tower_service() {
    use tower_service::Service;

    let transport = success();
    let mut client = ClientBuilder::new(transport.clone()).build();

    let envelope = client.call(FetchOptions::new(API_URL)).await.unwrap();

    assert_eq!(envelope.data(), Some(&json!({ "foo": "bar" })));
    let (_, init) = transport.single_call();
    assert!(init.is_empty());
}

#[tokio::test]
async fn client_can_be_extended() {
    let transport = success();
    let client = ClientBuilder::new(transport.clone()).with(Tag("one")).build();

    let extended = ClientBuilder::from_client(client).with(Cached).build();
    extended.fetch(FetchOptions::new(API_URL)).await.unwrap();

    assert_eq!(extended.middleware_count(), 2);
    assert!(transport.calls().is_empty());
}
