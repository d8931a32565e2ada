//! Optional image localization: download `<img src>` targets next to the site
//! and point the post body at the local copies.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{info, warn};

use crate::config::ImageConfig;
use crate::contract::{Post, WordPressApi};
use crate::error::SyncError;
use crate::render::sanitize_stem;

static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img[^>]*?\ssrc=["']([^"']+)["']"#).expect("static regex"));

const DEFAULT_IMAGE_EXT: &str = "jpg";

/// Distinct image URLs in document order.
pub fn image_urls(html: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for cap in IMG_SRC.captures_iter(html) {
        let url = cap[1].to_string();
        if !urls.contains(&url) {
            urls.push(url);
        }
    }
    urls
}

/// Extension of the last path segment of `url`, ignoring query and fragment.
pub fn image_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.rsplit('/').next().unwrap_or(path);
    Path::new(last)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .unwrap_or(DEFAULT_IMAGE_EXT)
        .to_string()
}

/// Download every image in the post body into `config.dir` and return the
/// body with rewritten `src` attributes. Local names derive from the sanitized
/// slug, so they never leave `config.dir`. Images that fail to download keep
/// their remote URL.
pub async fn localize_images<A>(api: &A, post: &Post, config: &ImageConfig) -> Result<String, SyncError>
where
    A: WordPressApi + ?Sized,
{
    let html = post.content.rendered.as_str();
    let urls = image_urls(html);
    if urls.is_empty() {
        return Ok(html.to_string());
    }
    fs::create_dir_all(&config.dir).map_err(|e| SyncError::io(&config.dir, e))?;

    let stem = sanitize_stem(&post.slug, post.id);
    let prefix = config.url_prefix.trim_end_matches('/');
    let mut local: HashMap<String, String> = HashMap::new();
    for (index, url) in urls.iter().enumerate() {
        let file_name = format!("{stem}-{index}.{}", image_extension(url));
        match api.fetch_bytes(url).await {
            Ok(bytes) => {
                let path = config.dir.join(&file_name);
                fs::write(&path, &bytes).map_err(|e| SyncError::io(&path, e))?;
                info!(url = %url, path = %path.display(), "Localized image");
                local.insert(url.clone(), format!("{prefix}/{file_name}"));
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Image download failed, keeping remote URL");
                println!("⚠️ Image download failed: {url}");
            }
        }
    }
    Ok(rewrite_sources(html, &local))
}

/// Replace each captured `src` value found in `local`, leaving the rest of the
/// tag and all other text untouched.
fn rewrite_sources(html: &str, local: &HashMap<String, String>) -> String {
    IMG_SRC
        .replace_all(html, |caps: &Captures| {
            let tag = &caps[0];
            let (Some(whole), Some(src)) = (caps.get(0), caps.get(1)) else {
                return tag.to_string();
            };
            match local.get(src.as_str()) {
                Some(replacement) => {
                    let start = src.start() - whole.start();
                    let end = src.end() - whole.start();
                    format!("{}{}{}", &tag[..start], replacement, &tag[end..])
                }
                None => tag.to_string(),
            }
        })
        .into_owned()
}
