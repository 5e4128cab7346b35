//! Pulls the meme out of a randomizer page.
//!
//! The meme sites wrap each story in `div.storyContent`; the last one on the
//! page is the random pick and its first `img` carries the caption in
//! `title` and the picture in `src`.

use crate::error::{AppError, Result};
use scraper::{Html, Selector};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedMeme {
    pub caption: String,
    pub image_url: String,
}

pub fn scrape_meme(html: &str, page_url: &str) -> Result<ScrapedMeme> {
    let story_sel = selector("div.storyContent")?;
    let img_sel = selector("img")?;

    let document = Html::parse_document(html);
    let story = document
        .select(&story_sel)
        .last()
        .ok_or_else(|| AppError::Scrape("no storyContent block on page".to_string()))?;
    let img = story
        .select(&img_sel)
        .next()
        .ok_or_else(|| AppError::Scrape("storyContent block has no image".to_string()))?;

    let caption = img
        .value()
        .attr("title")
        .ok_or_else(|| AppError::Scrape("image has no title".to_string()))?;
    let src = img
        .value()
        .attr("src")
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .ok_or_else(|| AppError::Scrape("image has no src".to_string()))?;

    Ok(ScrapedMeme {
        caption: caption.to_string(),
        image_url: resolve(page_url, src)?,
    })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Scrape(format!("bad selector {}: {:?}", css, e)))
}

// Absolute URLs pass through untouched; relative ones hang off the page.
fn resolve(page_url: &str, src: &str) -> Result<String> {
    if let Ok(absolute) = Url::parse(src) {
        return Ok(absolute.to_string());
    }

    Url::parse(page_url)
        .and_then(|base| base.join(src))
        .map(|url| url.to_string())
        .map_err(|e| AppError::Scrape(format!("cannot resolve image src {:?}: {}", src, e)))
}
