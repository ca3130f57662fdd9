//! Tweet extraction.
//!
//! Reads the tweet a reply button belongs to. Missing pieces fall back to
//! defaults; only a missing body makes extraction fail.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};
use xreply_core::{Engagement, TweetContent};

use crate::dom::ElementRef;
use crate::error::PortError;
use crate::selectors::{
    TWEET_ARTICLE, TWEET_AUTHOR, TWEET_LIKE_COUNT, TWEET_MEDIA, TWEET_NESTED, TWEET_REPLY_COUNT,
    TWEET_REPLY_LINK, TWEET_RETWEET_COUNT, TWEET_TEXT, TWEET_TIME, TWEET_VERIFIED,
};

/// Scrapes [`TweetContent`] from a tweet card.
#[derive(Debug, Clone, Copy, Default)]
pub struct TweetExtractor;

impl TweetExtractor {
    /// The tweet card containing `element`.
    ///
    /// # Errors
    ///
    /// Returns a port error if the page cannot be read.
    pub async fn article_for(element: &ElementRef) -> Result<Option<ElementRef>, PortError> {
        element.closest(TWEET_ARTICLE).await
    }

    /// Extracts the tweet a button inside the card belongs to.
    ///
    /// # Errors
    ///
    /// Returns a port error if the page cannot be read.
    pub async fn extract_from_button(
        button: &ElementRef,
    ) -> Result<Option<TweetContent>, PortError> {
        match Self::article_for(button).await? {
            Some(article) => Self::extract(&article).await,
            None => {
                debug!("Button is not inside a tweet");
                Ok(None)
            }
        }
    }

    /// Extracts a tweet card. Returns `None` if it has no text.
    ///
    /// # Errors
    ///
    /// Returns a port error if the page cannot be read.
    #[instrument(skip(article), fields(node = article.node_id()))]
    pub async fn extract(article: &ElementRef) -> Result<Option<TweetContent>, PortError> {
        let Some(body) = article.query(TWEET_TEXT).await? else {
            debug!("Tweet has no text element");
            return Ok(None);
        };

        let nodes = body.text_nodes().await?;
        let text = nodes
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            return Ok(None);
        }

        let author = match article.query(TWEET_AUTHOR).await? {
            Some(span) => span.text_content().await?,
            None => String::new(),
        };

        let engagement = Engagement {
            replies: Self::count(article, TWEET_REPLY_COUNT).await?,
            retweets: Self::count(article, TWEET_RETWEET_COUNT).await?,
            likes: Self::count(article, TWEET_LIKE_COUNT).await?,
        };

        let mut tweet = TweetContent::from_text(text)
            .with_author(author)
            .with_engagement(engagement);
        if let Some(timestamp) = Self::timestamp(article).await? {
            tweet = tweet.with_timestamp(timestamp);
        }

        tweet.has_media = article.query(TWEET_MEDIA).await?.is_some();
        tweet.is_thread = article.query(TWEET_NESTED).await?.is_some();
        tweet.is_reply = article.query(TWEET_REPLY_LINK).await?.is_some();
        tweet.is_verified = article.query(TWEET_VERIFIED).await?.is_some();

        debug!(
            chars = tweet.text.chars().count(),
            language = %tweet.language,
            tweet_type = %tweet.tweet_type,
            "Tweet extracted"
        );
        Ok(Some(tweet))
    }

    async fn count(article: &ElementRef, selector: &str) -> Result<u64, PortError> {
        Ok(match article.query(selector).await? {
            Some(span) => Engagement::parse_count(&span.text_content().await?),
            None => 0,
        })
    }

    async fn timestamp(article: &ElementRef) -> Result<Option<DateTime<Utc>>, PortError> {
        let Some(time) = article.query(TWEET_TIME).await? else {
            return Ok(None);
        };
        Ok(time
            .attribute("datetime")
            .await?
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_dom::{ReplyPage, VirtualElement};
    use chrono::TimeZone;
    use xreply_core::UNKNOWN_AUTHOR;

    #[tokio::test]
    async fn test_extracts_reply_page_tweet() {
        let doc = ReplyPage::new("Is Rust worth learning in 2024?")
            .with_author("Grace")
            .build();
        let button: ElementRef = doc.find(".xreply-button").unwrap();

        let tweet = TweetExtractor::extract_from_button(&button)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(tweet.text, "Is Rust worth learning in 2024?");
        assert_eq!(tweet.author, "Grace");
        assert_eq!(tweet.engagement.replies, 12);
        assert_eq!(tweet.engagement.retweets, 1200);
        assert_eq!(tweet.engagement.likes, 3400);
        assert_eq!(
            tweet.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())
        );
        assert!(!tweet.has_media);
        assert!(!tweet.is_thread);
    }

    #[tokio::test]
    async fn test_flags_and_defaults() {
        let article: ElementRef = VirtualElement::build("article")
            .attr("data-testid", "tweet")
            .child(
                VirtualElement::build("div")
                    .attr("data-testid", "tweetText")
                    .child(VirtualElement::build("span").text("look at "))
                    .child(VirtualElement::build("a").text("this")),
            )
            .child(VirtualElement::build("img"))
            .child(VirtualElement::build("svg").attr("data-testid", "icon-verified"))
            .child(VirtualElement::build("div").attr("data-testid", "tweet"))
            .finish();

        let tweet = TweetExtractor::extract(&article).await.unwrap().unwrap();
        assert_eq!(tweet.text, "look at this");
        assert_eq!(tweet.author, UNKNOWN_AUTHOR);
        assert!(tweet.has_media);
        assert!(tweet.is_verified);
        assert!(tweet.is_thread);
        assert!(!tweet.is_reply);
        assert_eq!(tweet.engagement, Engagement::default());
        assert_eq!(tweet.timestamp, None);
    }

    #[tokio::test]
    async fn test_missing_body_is_none() {
        let article: ElementRef = VirtualElement::build("article")
            .attr("data-testid", "tweet")
            .finish();
        assert!(TweetExtractor::extract(&article).await.unwrap().is_none());

        let stray: ElementRef = VirtualElement::build("button").finish();
        assert!(
            TweetExtractor::extract_from_button(&stray)
                .await
                .unwrap()
                .is_none()
        );
    }
}
