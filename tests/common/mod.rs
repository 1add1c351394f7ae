#![allow(dead_code)]

pub use sitehook_test_utils::{entries, init_tracing, journal, with_timeout, Journal};

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Send one request with no body through the router in-process.
pub async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");

    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();

    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Text of the `<pre id="...">` block, if present.
pub fn pre_block(html: &str, id: &str) -> Option<String> {
    let open = format!("<pre id=\"{id}\">");
    let start = html.find(&open)? + open.len();
    let end = html[start..].find("</pre>")? + start;
    Some(html[start..end].to_string())
}
