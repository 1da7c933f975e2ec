use crate::domain::TokenKind;
use anyhow::{anyhow, Context};
use reqwest::Url;

/// `<base_url>/api/confirm/<token>` or `<base_url>/api/unsubscribe/<token>`.
///
/// Any path already present in `base_url` is kept as a prefix.
pub fn token_url(base_url: &str, kind: TokenKind, token: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(base_url).context("Invalid base URL.")?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("{} cannot be used as a base URL.", base_url))?
        .pop_if_empty()
        .extend(["api", kind.as_str(), token]);
    Ok(url)
}
