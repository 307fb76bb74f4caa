//! Share resolution flow tests.

mod helpers;

use sharedrop_backend::memory::Operation;
use sharedrop_service::ShareState;
use sharedrop_service::share::resolver::NOT_FOUND_MESSAGE;

use helpers::{ORIGIN, TestApp, share_config};
use sharedrop_core::config::UploadConfig;
use sharedrop_service::LocalFile;

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let app = TestApp::new();
    let page = app.shares.open("doesnotexist0000000").await;

    assert_eq!(page.state(), &ShareState::NotFound);
    assert_eq!(page.state().message(), Some(NOT_FOUND_MESSAGE));
    assert!(app.notices.is_empty());
}

#[tokio::test]
async fn test_lookup_failure_is_error() {
    let app = TestApp::new();
    app.backend
        .fail_once(Operation::SelectSingle, "relation does not exist");
    let page = app.shares.open("sometoken").await;

    assert_eq!(page.state(), &ShareState::Error);
    assert_eq!(app.notices.messages(), ["Failed to load file"]);
}

#[tokio::test]
async fn test_resolves_by_url() {
    let app = TestApp::new();
    app.sign_in().await;
    let file = app.upload("a.txt", "aaaa").await;
    let token = file.share_token.clone().expect("token");

    let page = app
        .shares
        .open(&format!("{ORIGIN}/share/{token}"))
        .await;
    assert_eq!(page.file().map(|f| &f.id), Some(&file.id));
    assert_eq!(page.token(), Some(&token));
}

#[tokio::test]
async fn test_two_downloads_add_two() {
    let app = TestApp::new();
    app.sign_in().await;
    let file = app.upload("a.txt", "aaaa").await;
    let token = file.share_token.clone().expect("token");
    app.session.sign_out().await.expect("sign out");

    let mut page = app.shares.open(token.as_str()).await;
    let original = page.file().expect("found").download_count;

    assert_eq!(
        app.shares.download(&mut page).await,
        Some(file.storage_url.clone())
    );
    app.shares.download(&mut page).await.expect("second");

    assert_eq!(page.file().expect("found").download_count, original + 2);
    assert_eq!(app.backend.rows("files")[0]["download_count"], original + 2);
    assert_eq!(
        app.notices.messages(),
        ["a.txt uploaded successfully!", "Download started", "Download started"]
    );
}

#[tokio::test]
async fn test_download_failure_keeps_count() {
    let app = TestApp::new();
    app.sign_in().await;
    let file = app.upload("a.txt", "aaaa").await;
    let token = file.share_token.expect("token");

    let mut page = app.shares.open(token.as_str()).await;
    app.backend.fail_once(Operation::Update, "network unreachable");

    assert!(app.shares.download(&mut page).await.is_none());
    assert_eq!(page.file().expect("found").download_count, 0);
    assert_eq!(
        app.notices.messages().last().map(String::as_str),
        Some("Failed to download file")
    );
}

#[tokio::test]
async fn test_terminal_state_is_not_resolved_again() {
    let app = TestApp::new();
    let mut page = app.shares.open("missing").await;
    let calls = app.backend.call_count();

    app.shares.resolve(&mut page).await;
    assert_eq!(app.backend.call_count(), calls);
    assert_eq!(page.state(), &ShareState::NotFound);
    assert!(app.shares.download(&mut page).await.is_none());
}

#[tokio::test]
async fn test_copy_link_uses_opened_url() {
    let app = TestApp::new();
    app.sign_in().await;
    let file = app.upload("a.txt", "aaaa").await;
    let token = file.share_token.expect("token");
    let opened = format!("{ORIGIN}/share/{token}?ref=mail");

    let page = app.shares.open(&opened).await;
    assert!(app.shares.copy_link(&page));
    assert_eq!(app.clipboard.contents(), Some(opened));
    assert_eq!(
        app.notices.messages().last().map(String::as_str),
        Some("Link copied to clipboard")
    );
}

#[tokio::test]
async fn test_preview_only_for_images() {
    let app = TestApp::new();
    app.sign_in().await;
    let text = app.upload("a.txt", "aaaa").await;
    let image = app
        .uploads
        .upload_batch(
            vec![LocalFile::new("cat.png", "image/png", vec![1u8, 2, 3])],
            |_| {},
        )
        .await
        .uploaded
        .remove(0);

    let text_page = app
        .shares
        .open(text.share_token.expect("token").as_str())
        .await;
    let image_page = app
        .shares
        .open(image.share_token.clone().expect("token").as_str())
        .await;

    assert_eq!(text_page.preview(), None);
    assert_eq!(image_page.preview(), Some(image.storage_url.as_str()));
}

#[tokio::test]
async fn test_require_public_hides_private_files() {
    let app = TestApp::with_config(UploadConfig::default(), share_config(true));
    app.sign_in().await;
    let file = app.upload("a.txt", "aaaa").await;
    let token = file.share_token.clone().expect("token");

    let page = app.shares.open(token.as_str()).await;
    assert_eq!(page.state(), &ShareState::NotFound);

    app.listing.load().await;
    app.listing
        .toggle_visibility(&file.id)
        .await
        .expect("made public");
    let page = app.shares.open(token.as_str()).await;
    assert!(matches!(page.state(), ShareState::Found(_)));
}
