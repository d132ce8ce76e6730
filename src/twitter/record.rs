//! The tweet record returned by the scraping pipeline.

use serde::{Deserialize, Serialize};

/// Text stored on a record when the tweet page was found but its body could not be read.
pub const CONTENT_UNAVAILABLE: &str = "Tweet exists but content could not be extracted";

/// Author handle used whenever the author could not be determined.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Normalized existence/content record for a single tweet.
///
/// Field names follow the JSON contract consumed by the verification workflow
/// (`tweetId`, `authorUsername`, `tweetText`, `createdAt`, `exists`, `timestamp`).
///
/// Records are built through [`TweetRecord::found`], [`TweetRecord::content_unavailable`]
/// and [`TweetRecord::not_found`] so that the not-found invariants always hold:
/// a record with `exists == false` has an `"unknown"` author, empty text, empty
/// creation time and a zero timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetRecord {
    /// Numeric tweet identifier
    pub tweet_id: String,
    /// Author handle without the leading `@`, or `"unknown"`
    pub author_username: String,
    /// Tweet body, or the content-unavailable placeholder
    pub tweet_text: String,
    /// Creation time exactly as the source rendered it
    pub created_at: String,
    /// Whether the tweet was found on any source
    pub exists: bool,
    /// Capture time in epoch seconds, `0` for not-found records
    pub timestamp: i64,
}

impl TweetRecord {
    /// Builds an accepted record captured now.
    ///
    /// An empty author is replaced with `"unknown"`; text is stored trimmed.
    pub fn found(
        tweet_id: &str,
        author_username: impl Into<String>,
        tweet_text: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        let author = author_username.into();
        let author = author.trim();
        Self {
            tweet_id: tweet_id.to_string(),
            author_username: if author.is_empty() {
                UNKNOWN_AUTHOR.to_string()
            } else {
                author.to_string()
            },
            tweet_text: tweet_text.into().trim().to_string(),
            created_at: created_at.into(),
            exists: true,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Builds the "page exists but body unreadable" record.
    pub fn content_unavailable(tweet_id: &str) -> Self {
        Self::found(tweet_id, UNKNOWN_AUTHOR, CONTENT_UNAVAILABLE, "")
    }

    /// The canonical not-found sentinel.
    pub fn not_found(tweet_id: &str) -> Self {
        Self {
            tweet_id: tweet_id.to_string(),
            author_username: UNKNOWN_AUTHOR.to_string(),
            tweet_text: String::new(),
            created_at: String::new(),
            exists: false,
            timestamp: 0,
        }
    }

    /// True when the record can end the pipeline: it exists and carries either
    /// real text or the content-unavailable placeholder.
    pub fn is_accepted(&self) -> bool {
        self.exists && !self.tweet_text.trim().is_empty()
    }

    /// True when the record only proves existence, without confirmed content.
    pub fn is_content_unavailable(&self) -> bool {
        self.exists && self.tweet_text == CONTENT_UNAVAILABLE
    }
}
