use anyhow::Result;
use aw_core::Error;
use aw_web::{HttpSearchClient, SearchClient};
use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use url::Url;

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let query = params.get("q").cloned().unwrap_or_default();
    if query == "nothing" {
        return Json(json!([]));
    }
    Json(json!([
        {
            "id": 11,
            "title": format!("About {}", query),
            "content": "Body text",
            "image_url": null,
            "created_at": "2024-04-01T12:00:00",
            "views": 5
        }
    ]))
}

async fn spawn_backend() -> Result<Url> {
    let app = Router::new()
        .route("/api/search", get(search))
        .route("/broken/api/search", get(|| async { "<html>oops</html>" }))
        .route("/down/api/search", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Ok(Url::parse(&format!("http://{}", addr))?)
}

#[tokio::test]
async fn decodes_articles_and_escapes_query() -> Result<()> {
    let backend = spawn_backend().await?;
    let client = HttpSearchClient::new(&backend)?;

    let articles = client.search("rust & tokio").await?;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "About rust & tokio");
    assert_eq!(articles[0].detail_path(), "/articles/11");
    assert_eq!(articles[0].image(), None);

    assert!(client.search("nothing").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn non_json_body_is_a_decoding_error() -> Result<()> {
    let backend = spawn_backend().await?;
    let client = HttpSearchClient::with_endpoint(backend.join("/broken/api/search")?);

    match client.search("cats").await {
        Err(Error::Serialization(_)) => {}
        other => panic!("expected a decoding error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn server_errors_are_reported_with_status() -> Result<()> {
    let backend = spawn_backend().await?;
    let client = HttpSearchClient::with_endpoint(backend.join("/down/api/search")?);

    match client.search("cats").await {
        Err(Error::Status { status, url }) => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/down/api/search?q=cats"));
        }
        other => panic!("expected a status error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_an_http_error() -> Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = HttpSearchClient::new(&Url::parse(&format!("http://{}", addr))?)?;
    assert!(matches!(client.search("cats").await, Err(Error::Http(_))));
    Ok(())
}
