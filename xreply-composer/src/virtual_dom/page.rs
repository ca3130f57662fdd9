//! A reply page fixture.

use std::sync::Arc;

use super::{ElementBuilder, ReflectPolicy, VirtualDocument, VirtualElement};

/// A page with one tweet and an open reply composer.
#[derive(Debug, Clone)]
pub struct ReplyPage {
    tweet_text: String,
    author: String,
    policy: ReflectPolicy,
    placeholder_sticky: bool,
    with_composer: bool,
}

impl ReplyPage {
    /// Creates a page showing `tweet_text`.
    pub fn new(tweet_text: impl Into<String>) -> Self {
        Self {
            tweet_text: tweet_text.into(),
            author: "Ada Lovelace".to_string(),
            policy: ReflectPolicy::all(),
            placeholder_sticky: false,
            with_composer: true,
        }
    }

    /// Sets the author name.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets what the composer editor accepts.
    pub fn with_policy(mut self, policy: ReflectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Makes the composer stick in placeholder mode until cleared.
    pub fn with_sticky_placeholder(mut self) -> Self {
        self.placeholder_sticky = true;
        self
    }

    /// Leaves the composer out.
    pub fn without_composer(mut self) -> Self {
        self.with_composer = false;
        self
    }

    fn tweet(&self) -> ElementBuilder {
        let counter = |testid: &str, label: &str| {
            VirtualElement::build("div")
                .attr("data-testid", testid)
                .child(VirtualElement::build("span").text(label))
        };

        VirtualElement::build("article")
            .attr("data-testid", "tweet")
            .size(600.0, 240.0)
            .child(
                VirtualElement::build("div")
                    .attr("data-testid", "User-Name")
                    .child(VirtualElement::build("span").text(&self.author)),
            )
            .child(
                VirtualElement::build("div")
                    .attr("data-testid", "tweetText")
                    .child(VirtualElement::build("span").text(&self.tweet_text)),
            )
            .child(
                VirtualElement::build("time").attr("datetime", "2024-05-01T12:30:00.000Z"),
            )
            .child(counter("reply", "12"))
            .child(counter("retweet", "1.2K"))
            .child(counter("like", "3,400"))
            .child(
                VirtualElement::build("button")
                    .attr("class", "xreply-button")
                    .text("✨ Auto Reply"),
            )
    }

    fn composer(&self) -> ElementBuilder {
        let mut editor = VirtualElement::build("div")
            .attr("class", "notranslate public-DraftEditor-content")
            .attr("role", "textbox")
            .attr("data-testid", "tweetTextarea_0")
            .attr("aria-label", "Post text")
            .size(480.0, 60.0)
            .editor(self.policy);
        if self.placeholder_sticky {
            editor = editor.placeholder_sticky();
        }

        VirtualElement::build("form")
            .size(600.0, 120.0)
            .child(
                VirtualElement::build("div")
                    .attr("class", "public-DraftEditorPlaceholder-root")
                    .text("Post your reply"),
            )
            .child(editor)
            .child(VirtualElement::build("div").attr("data-testid", "toolBar"))
    }

    /// Builds the document.
    pub fn build(&self) -> Arc<VirtualDocument> {
        let mut body = VirtualElement::build("body")
            .size(1280.0, 800.0)
            .child(self.tweet());
        if self.with_composer {
            body = body.child(self.composer());
        }
        Arc::new(VirtualDocument::new(body))
    }
}
