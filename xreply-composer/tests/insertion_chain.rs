//! Insertion chain behavior against simulated editors.

use std::sync::Arc;
use std::time::Duration;

use xreply_composer::{
    ChainState, ComposerError, DomElement, EventKind, InsertionChain, InsertionContext,
    InsertionMethod, InsertionTimings, MemoryClipboard, ReflectPolicy, ReplyPage, VerifiedVia,
    VirtualElement,
};
use xreply_core::TypingDelay;

const COMPOSER: &str = r#"[data-testid="tweetTextarea_0"]"#;
const REPLY: &str = "Totally agree, the borrow checker grows on you 🦀";

struct Fixture {
    ctx: InsertionContext,
    editor: Arc<VirtualElement>,
    clipboard: Arc<MemoryClipboard>,
}

fn fixture(policy: ReflectPolicy) -> Fixture {
    fixture_with(policy, Arc::new(MemoryClipboard::new()))
}

fn fixture_with(policy: ReflectPolicy, clipboard: Arc<MemoryClipboard>) -> Fixture {
    let doc = ReplyPage::new("What finally made Rust click for you?")
        .with_policy(policy)
        .build();
    let editor = doc.find(COMPOSER).expect("composer in page");
    let ctx = InsertionContext::new(doc, editor.clone())
        .with_clipboard(clipboard.clone())
        .with_timings(InsertionTimings::immediate());
    Fixture {
        ctx,
        editor,
        clipboard,
    }
}

#[tokio::test]
async fn test_typing_only_editor_succeeds_on_fourth_strategy() {
    let f = fixture(ReflectPolicy::only_typing());

    let outcome = InsertionChain::standard().insert(&f.ctx, REPLY).await;

    let success = outcome.result.as_ref().expect("insertion verified");
    assert_eq!(success.method, InsertionMethod::Typing);
    assert_eq!(success.verified_via, VerifiedVia::TextContent);
    assert_eq!(outcome.attempts_count(), 4);
    assert!(outcome.attempts[..3].iter().all(|a| !a.is_success()));
    assert!(outcome.attempts[3].is_success());

    assert_eq!(f.editor.text(), REPLY);
    assert_eq!(f.editor.committed_text().as_deref(), Some(REPLY));
    assert_eq!(outcome.final_state(), ChainState::Succeeded(3));
}

#[tokio::test]
async fn test_unreflecting_editor_exhausts_all_strategies() {
    let f = fixture(ReflectPolicy::never());

    let outcome = InsertionChain::standard().insert(&f.ctx, REPLY).await;

    assert!(matches!(
        outcome.result,
        Err(ComposerError::AllMethodsExhausted { attempts: 4 })
    ));
    assert_eq!(outcome.attempts_count(), 4);
    assert!(outcome.attempts.iter().all(|a| a.handled && a.verified.is_none()));
    assert_eq!(outcome.final_state(), ChainState::Exhausted);
    assert_eq!(f.editor.text(), "");
}

#[tokio::test]
async fn test_accepting_editor_uses_clipboard_first() {
    let f = fixture(ReflectPolicy::all());

    let outcome = InsertionChain::standard().insert(&f.ctx, REPLY).await;

    assert_eq!(outcome.successful_method(), Some(InsertionMethod::Clipboard));
    assert_eq!(outcome.attempts_count(), 1);
    assert_eq!(f.clipboard.contents(), REPLY);
    assert_eq!(f.editor.text(), REPLY);
}

#[tokio::test]
async fn test_state_sequence() {
    let f = fixture(ReflectPolicy::only(InsertionMethod::InputEvent));

    let outcome = InsertionChain::standard().insert(&f.ctx, REPLY).await;

    assert_eq!(
        outcome.transitions,
        vec![
            ChainState::Idle,
            ChainState::Clearing,
            ChainState::Attempting(0),
            ChainState::Verifying(0),
            ChainState::Clearing,
            ChainState::Attempting(1),
            ChainState::Verifying(1),
            ChainState::Succeeded(1),
        ]
    );
}

#[tokio::test]
async fn test_direct_write_builds_editor_block() {
    let f = fixture(ReflectPolicy::only(InsertionMethod::Direct));

    let outcome = InsertionChain::standard().insert(&f.ctx, REPLY).await;

    assert_eq!(outcome.successful_method(), Some(InsertionMethod::Direct));
    let span = f
        .editor
        .query(r#".public-DraftStyleDefault-block span[data-text="true"]"#)
        .await
        .unwrap()
        .expect("editor block written");
    assert_eq!(span.text_content().await.unwrap(), REPLY);
}

#[tokio::test]
async fn test_refused_clipboard_falls_through() {
    let clipboard = Arc::new(MemoryClipboard::denied());
    let f = fixture_with(ReflectPolicy::all(), clipboard);

    let outcome = InsertionChain::standard().insert(&f.ctx, REPLY).await;

    assert_eq!(outcome.successful_method(), Some(InsertionMethod::InputEvent));
    assert_eq!(outcome.errors().len(), 1);
    assert!(!outcome.attempts[0].handled);
    assert_eq!(f.clipboard.write_attempts(), 3);
}

#[tokio::test]
async fn test_missing_clipboard_is_declined_not_failed() {
    let f = fixture(ReflectPolicy::all());
    let ctx = InsertionContext {
        clipboard: None,
        ..f.ctx.clone()
    };

    let outcome = InsertionChain::standard().insert(&ctx, REPLY).await;

    assert_eq!(outcome.successful_method(), Some(InsertionMethod::InputEvent));
    assert!(outcome.errors().is_empty());
    assert!(!outcome.attempts[0].handled);
}

#[tokio::test]
async fn test_success_dispatches_recognition_volley() {
    let f = fixture(ReflectPolicy::all());

    InsertionChain::standard().insert(&f.ctx, REPLY).await;

    let kinds: Vec<_> = f.editor.events().iter().map(|e| e.kind).collect();
    let paste_at = kinds
        .iter()
        .position(|k| *k == EventKind::Paste)
        .expect("paste dispatched");
    let volley = &kinds[paste_at + 1..];
    for expected in [
        EventKind::FocusIn,
        EventKind::CompositionStart,
        EventKind::CompositionEnd,
        EventKind::TextInput,
        EventKind::Cut,
        EventKind::Select,
    ] {
        assert!(volley.contains(&expected), "missing {expected}");
    }
    assert_eq!(f.editor.text(), REPLY);
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let f = fixture(ReflectPolicy::all());

    let outcome = InsertionChain::standard().insert(&f.ctx, "   ").await;

    assert_eq!(outcome.result, Err(ComposerError::EmptyText));
    assert_eq!(outcome.attempts_count(), 0);
}

#[tokio::test]
async fn test_detached_composer_fails_fast() {
    let f = fixture(ReflectPolicy::all());
    f.editor.remove();

    let outcome = InsertionChain::standard().insert(&f.ctx, REPLY).await;

    assert!(matches!(outcome.result, Err(ComposerError::Port(_))));
    assert_eq!(outcome.attempts_count(), 0);
}

#[tokio::test]
async fn test_sticky_placeholder_editor_still_verifies() {
    let doc = ReplyPage::new("hello")
        .with_policy(ReflectPolicy::only_typing())
        .with_sticky_placeholder()
        .build();
    let editor = doc.find(COMPOSER).unwrap();
    let ctx = InsertionContext::new(doc, editor.clone()).with_timings(InsertionTimings::immediate());

    let outcome = InsertionChain::standard().insert(&ctx, "short one").await;

    assert_eq!(outcome.successful_method(), Some(InsertionMethod::Typing));
    assert_eq!(editor.text(), "short one");
}

#[tokio::test(start_paused = true)]
async fn test_default_timings_pause_between_methods() {
    let doc = ReplyPage::new("hello")
        .with_policy(ReflectPolicy::only_typing())
        .build();
    let editor = doc.find(COMPOSER).unwrap();
    let timings = InsertionTimings::default().with_typing_delay(TypingDelay::from_millis(50, 30));
    let ctx = InsertionContext::new(doc, editor).with_timings(timings);

    let outcome = InsertionChain::standard().insert(&ctx, "abc").await;

    assert!(outcome.is_success());
    // Three failed strategies each wait before the next one runs.
    assert!(outcome.duration >= Duration::from_millis(3 * 200));
    assert!(outcome.attempts[3].duration >= Duration::from_millis(3 * 50));
}
