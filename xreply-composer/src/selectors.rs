//! Host page selectors.

/// Composer selectors, most specific first.
pub const COMPOSER_SELECTORS: &[&str] = &[
    r#"[data-testid="tweetTextarea_0"]"#,
    r#"div[contenteditable="true"][data-testid="tweetTextarea_0"]"#,
    r#"[role="textbox"][data-testid="tweetTextarea_0"]"#,
    r#"[contenteditable="true"][role="textbox"]"#,
    r#".public-DraftEditor-content[contenteditable="true"]"#,
    r#".notranslate[contenteditable="true"]"#,
    r#"div[contenteditable="true"][aria-label*="Tweet"]"#,
    r#"div[contenteditable="true"][aria-label*="reply"]"#,
    r#"div[contenteditable="true"][placeholder*="Tweet"]"#,
    r#"div[contenteditable="true"][placeholder*="reply"]"#,
    r#"textarea[placeholder*="Tweet"]"#,
    r#"textarea[placeholder*="reply"]"#,
];

/// Any editable region; scanned when no specific selector matches.
pub const EDITABLE: &str = r#"[contenteditable="true"]"#;

/// Ancestors that mark an editable region as a composer.
pub const COMPOSER_CONTEXT: &str =
    r#"[data-testid="toolBar"], [data-testid="tweetButton"], form"#;

// ============================================================================
// Rich-text editor internals
// ============================================================================

/// Class of the rich-text editor's content root.
pub const DRAFT_CONTENT_CLASS: &str = "public-DraftEditor-content";

/// The rich-text editor's content root.
pub const DRAFT_CONTENT: &str = ".public-DraftEditor-content";

/// A text block inside the rich-text editor.
pub const DRAFT_BLOCK: &str = ".public-DraftStyleDefault-block";

/// Classes of a freshly built editor block.
pub const DRAFT_BLOCK_CLASSES: &str = "public-DraftStyleDefault-block public-DraftStyleDefault-ltr";

/// `data-offset-key` of a freshly built editor block.
pub const DRAFT_BLOCK_KEY: &str = "draft-js-block-key";

/// Placeholder overlays the editor shows while it believes it is empty.
pub const DRAFT_PLACEHOLDER: &str =
    ".public-DraftEditorPlaceholder-root, .public-DraftEditorPlaceholder-inner";

/// Text colors the editor uses for placeholder text.
pub const PLACEHOLDER_COLORS: &[&str] = &["rgb(83, 100, 113)", "rgb(139, 152, 165)"];

// ============================================================================
// Tweet markup
// ============================================================================

/// A tweet card.
pub const TWEET_ARTICLE: &str = r#"article[data-testid="tweet"]"#;

/// Tweet body.
pub const TWEET_TEXT: &str = r#"[data-testid="tweetText"]"#;

/// Author name.
pub const TWEET_AUTHOR: &str = r#"[data-testid="User-Name"] span"#;

/// Attached media.
pub const TWEET_MEDIA: &str = "img, video";

/// A tweet nested inside another (thread context).
pub const TWEET_NESTED: &str = r#"[data-testid="tweet"] [data-testid="tweet"]"#;

/// Reply marker.
pub const TWEET_REPLY_LINK: &str = r#"[data-testid="reply-link"]"#;

/// Verified badge.
pub const TWEET_VERIFIED: &str = r#"[data-testid="icon-verified"]"#;

/// Reply counter.
pub const TWEET_REPLY_COUNT: &str = r#"[data-testid="reply"] span"#;

/// Retweet counter.
pub const TWEET_RETWEET_COUNT: &str = r#"[data-testid="retweet"] span"#;

/// Like counter.
pub const TWEET_LIKE_COUNT: &str = r#"[data-testid="like"] span"#;

/// Publication time.
pub const TWEET_TIME: &str = "time";
