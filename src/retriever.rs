use crate::constants::{MEME_EMOJI, MEME_FILENAME_BASE};
use crate::error::{AppError, Result};
use crate::fetcher::Fetcher;
use crate::scrape::scrape_meme;
use crate::settings::{self, ConfigStore};
use std::sync::Arc;

/// One downloaded image and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meme {
    pub caption: String,
    pub image_url: String,
    /// Randomizer page the image was scraped from, after redirects
    pub page_url: String,
    /// With leading dot, e.g. ".png"
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// What the command host sends back to the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub filename: String,
    pub bytefile: Vec<u8>,
}

impl From<Meme> for Reply {
    fn from(meme: Meme) -> Self {
        Self {
            text: format!("{}\n\n{}", meme.caption, meme.image_url),
            filename: format!("{}{}", MEME_FILENAME_BASE, meme.extension),
            bytefile: meme.bytes,
        }
    }
}

#[derive(Clone)]
pub struct MemeRetriever {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn ConfigStore>,
    scope: String,
    max_attempts: usize,
}

impl MemeRetriever {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn ConfigStore>,
        scope: impl Into<String>,
        max_attempts: usize,
    ) -> Self {
        Self {
            fetcher,
            store,
            scope: scope.into(),
            max_attempts,
        }
    }

    pub fn store(&self) -> &dyn ConfigStore {
        self.store.as_ref()
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Fetch a meme from `source_url` within the configured size budget
    pub async fn get_meme(&self, source_url: &str) -> Result<Reply> {
        let max_size = settings::max_meme_size(self.store(), &self.scope).await?;
        let meme = self.fetch(source_url, max_size).await?;
        Ok(meme.into())
    }

    /// Load random pages until one yields an image of at most `max_size`
    /// bytes. After `max_attempts` misses the smallest oversized image wins,
    /// the earliest one on ties.
    ///
    /// Transport and scrape failures abort the whole retrieval.
    pub async fn fetch(&self, source_url: &str, max_size: usize) -> Result<Meme> {
        let mut best: Option<Meme> = None;

        for attempt in 1..=self.max_attempts {
            let page = self.fetcher.get(source_url).await?;
            let scraped = scrape_meme(&page.text(), &page.final_url)?;

            let image = self.fetcher.get(&scraped.image_url).await?;
            let size = image.body.len();
            let candidate = Meme {
                caption: scraped.caption,
                image_url: scraped.image_url,
                page_url: page.final_url,
                extension: image.extension().or_default(),
                bytes: image.body,
            };

            if size <= max_size {
                tracing::info!(
                    "{} Attempt {}: {} ({} bytes) fits",
                    MEME_EMOJI,
                    attempt,
                    candidate.image_url,
                    size
                );
                best = Some(candidate);
                break;
            }

            let smaller = best.as_ref().map_or(true, |kept| kept.bytes.len() > size);
            tracing::debug!(
                "{} Attempt {}: {} is {} bytes, over budget of {} ({})",
                MEME_EMOJI,
                attempt,
                candidate.image_url,
                size,
                max_size,
                if smaller { "keeping as fallback" } else { "discarded" }
            );
            if smaller {
                best = Some(candidate);
            }
        }

        let meme = best.ok_or(AppError::NoCandidate)?;
        if meme.bytes.len() > max_size {
            tracing::warn!(
                "{} No meme under {} bytes after {} attempts, sending {} bytes",
                MEME_EMOJI,
                max_size,
                self.max_attempts,
                meme.bytes.len()
            );
        }
        Ok(meme)
    }
}
