//! URL slugs and site paths.

use crate::Title;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w-]+").expect("invalid non-word regex"));
static HYPHENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-{2,}").expect("invalid hyphens regex"));

/// Converts a text into a URL-friendly slug.
pub fn slugify(text: &str) -> String {
    let text = text.trim().to_lowercase();
    let text = WHITESPACES.replace_all(&text, "-");
    let text = NON_WORD.replace_all(&text, "");
    let text = HYPHENS.replace_all(&text, "-");

    text.trim_matches('-').to_owned()
}

/// Returns the path of the title page.
pub fn title_path(title: &Title) -> String {
    match slugify(&title.name).as_str() {
        "" => format!("/drama/{}", title.id),
        slug => format!("/drama/{}/{slug}", title.id),
    }
}

/// Returns the path of the watch page for episode `ordinal`.
pub fn watch_path(title: &Title, ordinal: u32) -> String {
    match slugify(&title.name).as_str() {
        "" => format!("/watch/{}/{ordinal}", title.id),
        slug => format!("/watch/{}/{slug}/{ordinal}", title.id),
    }
}
