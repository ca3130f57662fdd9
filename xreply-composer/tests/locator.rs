//! Composer locator behavior.

use std::sync::Arc;
use std::time::Duration;

use xreply_composer::{
    ComposerError, ComposerLocator, DEFAULT_POLL, DEFAULT_WAIT, DomElement, MatchSource,
    ReflectPolicy, ReplyPage, VirtualDocument, VirtualElement,
};

fn page(children: Vec<xreply_composer::virtual_dom::ElementBuilder>) -> Arc<VirtualDocument> {
    let body = children
        .into_iter()
        .fold(VirtualElement::build("body").size(1280.0, 800.0), |body, child| {
            body.child(child)
        });
    Arc::new(VirtualDocument::new(body))
}

fn editable() -> xreply_composer::virtual_dom::ElementBuilder {
    VirtualElement::build("div")
        .attr("contenteditable", "true")
        .size(400.0, 60.0)
}

#[tokio::test]
async fn test_most_specific_selector_wins() {
    let doc = page(vec![
        VirtualElement::build("textarea")
            .attr("placeholder", "Post your reply")
            .size(400.0, 60.0),
        editable().attr("data-testid", "tweetTextarea_0"),
    ]);

    let found = ComposerLocator::new().find(doc.as_ref()).await.unwrap().unwrap();

    assert_eq!(found.source, MatchSource::Selector(0));
    assert_eq!(
        found.element.attribute("data-testid").await.unwrap().as_deref(),
        Some("tweetTextarea_0")
    );
}

#[tokio::test]
async fn test_hidden_and_disabled_candidates_are_skipped() {
    let doc = page(vec![
        editable()
            .attr("data-testid", "tweetTextarea_0")
            .style("display", "none"),
        editable()
            .attr("role", "textbox")
            .attr("aria-label", "Post text")
            .disabled(),
        editable().attr("role", "textbox").attr("id", "live"),
    ]);

    let found = ComposerLocator::new().find(doc.as_ref()).await.unwrap().unwrap();

    assert_eq!(found.source, MatchSource::Selector(3));
    assert_eq!(
        found.element.attribute("id").await.unwrap().as_deref(),
        Some("live")
    );
}

#[tokio::test]
async fn test_textarea_selector_matches_late() {
    let doc = page(vec![
        VirtualElement::build("textarea")
            .attr("placeholder", "Tweet your reply")
            .size(400.0, 60.0),
    ]);

    let found = ComposerLocator::new().find(doc.as_ref()).await.unwrap().unwrap();
    assert_eq!(found.source, MatchSource::Selector(10));
}

#[tokio::test]
async fn test_fallback_accepts_composer_in_form() {
    let doc = page(vec![
        VirtualElement::build("form").child(editable().size(300.0, 50.0)),
    ]);

    let found = ComposerLocator::new().find(doc.as_ref()).await.unwrap().unwrap();
    assert_eq!(found.source, MatchSource::Fallback);
}

#[tokio::test]
async fn test_fallback_accepts_labelled_region() {
    let doc = page(vec![editable().attr("aria-label", "Message")]);

    let found = ComposerLocator::new().find(doc.as_ref()).await.unwrap().unwrap();
    assert_eq!(found.source, MatchSource::Fallback);
}

#[tokio::test]
async fn test_fallback_rejects_small_or_contextless_regions() {
    let doc = page(vec![
        VirtualElement::build("form").child(editable().size(150.0, 50.0)),
        VirtualElement::build("form").child(editable().size(300.0, 20.0)),
        editable(),
    ]);

    assert!(ComposerLocator::new().find(doc.as_ref()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_custom_selector_is_skipped() {
    let doc = page(vec![editable().attr("id", "box").attr("role", "textbox")]);
    let locator = ComposerLocator::new().with_selectors(["div[", r#"[role="textbox"]"#]);

    let found = locator.find(doc.as_ref()).await.unwrap().unwrap();
    assert_eq!(found.source, MatchSource::Selector(1));
}

#[tokio::test]
async fn test_reply_page_composer_is_found() {
    let doc = ReplyPage::new("hi").with_policy(ReflectPolicy::never()).build();
    let found = ComposerLocator::new().find(doc.as_ref()).await.unwrap().unwrap();
    assert_eq!(found.source, MatchSource::Selector(0));
}

#[tokio::test(start_paused = true)]
async fn test_wait_gives_up_after_timeout() {
    let doc = ReplyPage::new("hi").without_composer().build();

    let err = ComposerLocator::new()
        .wait_for(doc.as_ref(), DEFAULT_WAIT, DEFAULT_POLL)
        .await
        .unwrap_err();

    match err {
        ComposerError::NotFound { waited_ms } => assert!(waited_ms >= 5000),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_wait_sees_composer_appear() {
    let doc = page(vec![
        editable()
            .attr("data-testid", "tweetTextarea_0")
            .style("display", "none"),
    ]);
    let hidden = doc.find(r#"[data-testid="tweetTextarea_0"]"#).unwrap();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(750)).await;
        hidden.set_style("display", "block").await.unwrap();
    });

    let found = ComposerLocator::new()
        .wait_for(doc.as_ref(), DEFAULT_WAIT, DEFAULT_POLL)
        .await
        .unwrap();
    assert_eq!(found.source, MatchSource::Selector(0));
}
