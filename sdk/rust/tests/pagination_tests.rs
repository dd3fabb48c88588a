//! End-to-end tests through the public client API.
//!
//! Every test runs against `MockBackend`, so no network access is needed.

use std::sync::Arc;

use futures::TryStreamExt;
use serde_json::{json, Value};

use ghclient::testing::{MockBackend, MockResponse};
use ghclient::{AccessKind, ClientConfig, Error, GitHubClient, Relation, Repository};

const BASE: &str = "https://api.example.com";

fn url(path: &str) -> String {
    format!("{BASE}/{path}")
}

fn client(backend: &MockBackend) -> GitHubClient {
    let config = ClientConfig::new("2022-11-28", "ghclient-it", "secret").with_base_url(BASE);
    GitHubClient::with_backend(config, Arc::new(backend.clone()))
}

fn repo(n: u32) -> Value {
    json!({"id": n, "full_name": format!("acme/repo-{n}")})
}

/// `user/repos` over three pages holding repo-1..=repo-7.
fn user_repos(backend: &MockBackend) {
    let first = MockResponse::page(&[repo(1), repo(2), repo(3)]).with_links(
        BASE,
        &[(Relation::Next, "user/repos?page=2"), (Relation::Last, "user/repos?page=3")],
    );
    backend.push(url("user/repos"), first.clone());
    backend.push(url("user/repos?page=1"), first);
    backend.push(
        url("user/repos?page=2"),
        MockResponse::page(&[repo(4), repo(5), repo(6)]).with_links(
            BASE,
            &[
                (Relation::First, "user/repos?page=1"),
                (Relation::Prev, "user/repos?page=1"),
                (Relation::Next, "user/repos?page=3"),
                (Relation::Last, "user/repos?page=3"),
            ],
        ),
    );
    backend.push(
        url("user/repos?page=3"),
        MockResponse::page(&[repo(7)]).with_links(
            BASE,
            &[(Relation::First, "user/repos?page=1"), (Relation::Prev, "user/repos?page=2")],
        ),
    );
}

fn names(repos: &[Repository]) -> Vec<String> {
    repos
        .iter()
        .filter_map(|r| r.full_name().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn test_list_walks_every_page_in_both_directions() {
    let backend = MockBackend::new();
    user_repos(&backend);
    let client = client(&backend);

    let mut repos = client
        .repos()
        .list_for_authenticated_user(&[("per_page", "3")])
        .await
        .expect("first page");
    let forward = repos.collect_all().await.expect("forward");
    assert_eq!(
        names(&forward),
        (1..=7).map(|n| format!("acme/repo-{n}")).collect::<Vec<_>>()
    );

    let backward = repos.reversed().collect_all().await.expect("backward");
    assert_eq!(
        names(&backward),
        (1..=7).rev().map(|n| format!("acme/repo-{n}")).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_filters_only_go_on_the_first_request() {
    let backend = MockBackend::new();
    user_repos(&backend);
    let client = client(&backend);

    let mut repos = client
        .repos()
        .list_for_authenticated_user(&[("visibility", "all")])
        .await
        .expect("first page");
    assert_eq!(repos.count().await.expect("count"), 7);

    let requests = backend.requests();
    assert_eq!(
        requests[0].query,
        vec![("visibility".to_string(), "all".to_string())]
    );
    assert!(requests[1..].iter().all(|r| r.query.is_empty()));
}

#[tokio::test]
async fn test_indexing_from_either_end() {
    let backend = MockBackend::new();
    user_repos(&backend);
    let client = client(&backend);
    let mut repos = client
        .repos()
        .list_for_authenticated_user(&[])
        .await
        .expect("first page");

    let fifth = repos.get(4).await.expect("index 4");
    assert_eq!(fifth.full_name(), Some("acme/repo-5"));

    let last = repos.get(-1).await.expect("index -1");
    assert_eq!(last.full_name(), Some("acme/repo-7"));

    let err = repos.get(7).await.unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange { index: 7 }));
}

#[tokio::test]
async fn test_stream_of_commits_from_repository_handle() {
    let backend = MockBackend::new();
    backend.push(
        url("repos/acme/widget"),
        MockResponse::json(200, r#"{"full_name": "acme/widget"}"#),
    );
    backend.push(
        url("repos/acme/widget/commits"),
        MockResponse::page(&[json!({"sha": "b"}), json!({"sha": "a"})]),
    );
    let client = client(&backend);

    let widget = client.repos().get("acme", "widget").await.expect("repo");
    let commits: Vec<_> = widget
        .commits(&[])
        .await
        .expect("first page")
        .into_stream()
        .try_collect()
        .await
        .expect("stream");

    let shas: Vec<_> = commits.iter().filter_map(|c| c.sha()).collect();
    assert_eq!(shas, vec!["b", "a"]);
}

#[tokio::test]
async fn test_directory_listing_then_file_fetch() {
    let backend = MockBackend::new();
    backend.push(
        url("repos/acme/widget/contents/docs"),
        MockResponse::json(
            200,
            r#"[{"name": "guide.md", "type": "file",
                 "url": "https://api.example.com/repos/acme/widget/contents/docs/guide.md"}]"#,
        ),
    );
    backend.push(
        url("repos/acme/widget/contents/docs/guide.md"),
        MockResponse::json(
            200,
            r#"{"name": "guide.md", "type": "file", "encoding": "base64", "content": "IyBHdWlk\nZQo="}"#,
        ),
    );
    let client = client(&backend);

    let listing = client
        .contents()
        .get("acme/widget", "docs", None)
        .await
        .expect("directory");
    let entries = listing.as_directory().expect("directory listing");
    assert_eq!(entries.len(), 1);

    let file = entries[0].fetch().await.expect("file");
    let file = file.as_file().expect("single file");
    assert_eq!(file.decoded_content().expect("base64"), b"# Guide\n");
}

#[tokio::test]
async fn test_access_error_surfaces_from_deep_page() {
    let backend = MockBackend::new();
    backend.push(
        url("user/repos"),
        MockResponse::page(&[repo(1)]).with_links(BASE, &[(Relation::Next, "user/repos?page=2")]),
    );
    backend.push(url("user/repos?page=2"), MockResponse::json(403, "{}"));
    let client = client(&backend);

    let mut repos = client
        .repos()
        .list_for_authenticated_user(&[])
        .await
        .expect("first page");
    let first = repos.next_item().await.expect("first item");
    assert!(first.is_some());

    let err = repos.next_item().await.unwrap_err();
    assert_eq!(err.access_kind(), Some(AccessKind::Forbidden));
    assert_eq!(err.command(), Some("user/repos?page=2"));
}
