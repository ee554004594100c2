//! Bot name derivation from a source URL.
//!
//! The builder names each bot after the URL it was built from, so the
//! client can compute the name locally (e.g. to query the tracker or to
//! attach to a bot that was built earlier).

use url::Url;

use octochat_types::bot::BotName;
use octochat_types::error::BotError;

/// Characters of the path "hash" kept after concatenation.
const PATH_HASH_LEN: usize = 10;

/// Characters taken from each path segment.
const SEGMENT_PREFIX_LEN: usize = 2;

/// Derive the builder's bot name for `source_url`.
///
/// The name is the URL's network location, exactly as written (userinfo and
/// port included), followed by the first two characters of each raw path
/// segment, capped at ten characters, then passed through
/// [`convert_to_title`]. The URL is parsed only to reject malformed input;
/// the name comes from the raw text, not from `Url`'s normalised form.
///
/// `http://example.com/docs` becomes `Examplecomdo`.
pub fn bot_name_from_url(source_url: &str) -> Result<BotName, BotError> {
    let trimmed = source_url.trim();
    let invalid = |reason: &str| BotError::InvalidUrl {
        url: trimmed.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if parsed.host_str().is_none() {
        return Err(invalid("url has no host"));
    }
    let (netloc, path) = raw_netloc_and_path(trimmed).ok_or_else(|| invalid("url has no host"))?;

    let path_hash: String = path
        .split('/')
        .skip(1)
        .flat_map(|segment| segment.chars().take(SEGMENT_PREFIX_LEN))
        .take(PATH_HASH_LEN)
        .collect();

    BotName::new(convert_to_title(&format!("{netloc}{path_hash}")))
}

/// Split `scheme://netloc/path?query#fragment` into the raw netloc and path.
fn raw_netloc_and_path(url: &str) -> Option<(&str, &str)> {
    let (_, rest) = url.split_once("://")?;
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    Some(match rest.find('/') {
        Some(slash) => rest.split_at(slash),
        None => (rest, ""),
    })
}

/// Strip ASCII punctuation, title-case, and remove whitespace.
///
/// An alphabetic character is upper-cased when it starts the string or
/// follows a non-alphabetic character; every other alphabetic character is
/// lower-cased.
pub fn convert_to_title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_alphabetic = false;

    for c in s.chars().filter(|c| !c.is_ascii_punctuation()) {
        if c.is_alphabetic() {
            if previous_alphabetic {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_alphabetic = true;
        } else {
            previous_alphabetic = false;
            out.push(c);
        }
    }

    out.retain(|c| !c.is_whitespace());
    out
}
