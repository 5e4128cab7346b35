//! File extension inference for downloaded images.
//!
//! Strategies run in a fixed order: the `content-disposition` filename, else
//! the last path segment of the final URL, then the `content-type` header.
//! A filename is only consulted for its extension; when it has none the
//! content type decides, the URL is never tried after a header filename.

use crate::constants::DEFAULT_EXTENSION;
use once_cell::sync::Lazy;
use regex::Regex;

static FILENAME_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)filename\s*=\s*"?([^";]+)"?"#).expect("filename regex is valid")
});

/// Where an extension came from. Extensions include the leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionSource {
    HeaderFilename(String),
    UrlPath(String),
    ContentType(String),
    Unknown,
}

impl ExtensionSource {
    pub fn extension(&self) -> Option<&str> {
        match self {
            ExtensionSource::HeaderFilename(ext)
            | ExtensionSource::UrlPath(ext)
            | ExtensionSource::ContentType(ext) => Some(ext),
            ExtensionSource::Unknown => None,
        }
    }

    pub fn or_default(self) -> String {
        self.extension()
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
    }
}

pub fn infer_extension(
    content_disposition: Option<&str>,
    content_type: Option<&str>,
    final_url: &str,
) -> ExtensionSource {
    let from_header = content_disposition.and_then(disposition_filename);

    let found = match from_header {
        Some(name) => suffix(&name).map(ExtensionSource::HeaderFilename),
        None => suffix(last_path_segment(final_url)).map(ExtensionSource::UrlPath),
    };

    found
        .or_else(|| content_type.and_then(from_content_type).map(ExtensionSource::ContentType))
        .unwrap_or(ExtensionSource::Unknown)
}

fn disposition_filename(disposition: &str) -> Option<String> {
    FILENAME_PARAM
        .captures(disposition)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

fn last_path_segment(url: &str) -> &str {
    let url = url.split('#').next().unwrap_or(url);
    let url = url.split('?').next().unwrap_or(url);
    url.rsplit('/').next().unwrap_or(url)
}

fn suffix(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext))
}

fn from_content_type(content_type: &str) -> Option<String> {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    match media_type.as_str() {
        "" => None,
        "text/plain" => Some(".txt".to_string()),
        "image/jpeg" => Some(".jpg".to_string()),
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first())
            .map(|ext| format!(".{}", ext)),
    }
}
