use crate::models;
use eyre::{ensure, eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Name upstream uses when it has nothing better to say.
const UNKNOWN_NAME: &str = "Unknown Drama";

/// A drama (series) from the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    /// Title ID.
    pub id: TitleID,
    /// Display name.
    pub name: String,
    /// Cover image URL.
    pub cover: Option<String>,
    /// Declared number of episodes (0 when unknown).
    pub chapter_count: u32,
    /// Synopsis.
    pub introduction: Option<String>,
    /// Play counter, as displayed upstream.
    pub play_count: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Corner badge label.
    pub corner_name: Option<String>,
    /// Corner badge color.
    pub corner_color: Option<String>,
    /// Popularity score (heat, or views).
    pub popularity: u64,
    /// Whether the title looks dubbed in Indonesian.
    pub dubbed: bool,
}

impl Title {
    /// Returns the declared episode count, if any.
    pub fn declared_count(&self) -> Option<u32> {
        (self.chapter_count > 0).then(|| self.chapter_count)
    }

    /// Merges a fresher copy of the same title into this one.
    ///
    /// Fields set in `newer` win, the others are kept.
    #[must_use]
    pub fn merge(self, newer: Self) -> Self {
        let chapter_count = newer.declared_count().unwrap_or(self.chapter_count);

        Self {
            id: newer.id,
            name: newer.name,
            cover: newer.cover.or(self.cover),
            chapter_count,
            introduction: newer.introduction.or(self.introduction),
            play_count: newer.play_count.or(self.play_count),
            tags: if newer.tags.is_empty() {
                self.tags
            } else {
                newer.tags
            },
            corner_name: newer.corner_name.or(self.corner_name),
            corner_color: newer.corner_color.or(self.corner_color),
            popularity: newer.popularity.max(self.popularity),
            dubbed: newer.dubbed || self.dubbed,
        }
    }
}

impl TryFrom<models::book::Book> for Title {
    type Error = eyre::Report;

    fn try_from(value: models::book::Book) -> Result<Self, Self::Error> {
        let id = value
            .book_id
            .or(value.id)
            .ok_or_else(|| eyre!("missing title ID"))?;
        let name = non_empty(value.book_name)
            .or_else(|| non_empty(value.name))
            .ok_or_else(|| eyre!("missing title name"))?;
        ensure!(name != UNKNOWN_NAME, "placeholder title name");

        let (corner_name, corner_color) = match value.corner {
            Some(corner) => (
                corner.name.or(value.corner_name),
                corner.color.or(value.corner_color),
            ),
            None => (value.corner_name, value.corner_color),
        };
        let tags = if value.tag_v3s.is_empty() {
            value.tags
        } else {
            value.tag_v3s
        };
        let tags = tags
            .into_iter()
            .map(models::book::Tag::into_name)
            .collect::<Vec<_>>();
        let dubbed = value.is_dubbed
            || value.language.as_deref().map_or(false, |l| l.contains("id"))
            || value.dubbing.as_deref() == Some("indonesian")
            || tags.iter().any(|tag| tag == "sulih-suara");

        Ok(Self {
            id: id.parse().context("parse title ID")?,
            name,
            cover: non_empty(value.cover_wap).or_else(|| non_empty(value.cover)),
            chapter_count: value.chapter_count.unwrap_or_default(),
            introduction: non_empty(value.introduction)
                .or_else(|| non_empty(value.intro)),
            play_count: value.play_count,
            tags,
            corner_name,
            corner_color,
            popularity: value
                .heat
                .filter(|&heat| heat > 0)
                .or(value.views)
                .unwrap_or_default(),
            dubbed,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Title ID in the catalogue.
///
/// Upstream sends them as numbers or strings, we keep the textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleID(String);

impl TitleID {
    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric value of the ID, if it's numeric.
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for TitleID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TitleID {
    type Err = eyre::Report;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        ensure!(!value.is_empty(), "invalid title ID: empty");
        ensure!(
            !value.contains(|c: char| c == '/' || c.is_whitespace()),
            "invalid title ID: {value}"
        );

        Ok(Self(value.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::Book;

    fn book(json: &str) -> Book {
        serde_json::from_str(json).expect("valid book")
    }

    #[test]
    fn from_listing_book() {
        let title: Title = book(
            r#"{
                "bookId": "41000102",
                "bookName": "Hidden Heiress",
                "coverWap": "https://img/cover.jpg",
                "chapterCount": 60,
                "introduction": "She returns.",
                "playCount": "1.2M",
                "tags": ["Romance", "Revenge"],
                "cornerName": "Hot",
                "heat": 1500
            }"#,
        )
        .try_into()
        .expect("valid title");

        assert_eq!(title.id.as_str(), "41000102");
        assert_eq!(title.name, "Hidden Heiress");
        assert_eq!(title.cover.as_deref(), Some("https://img/cover.jpg"));
        assert_eq!(title.declared_count(), Some(60));
        assert_eq!(title.tags, vec!["Romance", "Revenge"]);
        assert_eq!(title.popularity, 1500);
        assert!(!title.dubbed);
    }

    #[test]
    fn aliased_fields() {
        let title: Title = book(
            r##"{
                "id": 7,
                "name": "Second Chance",
                "cover": "c.jpg",
                "intro": "Short.",
                "views": 30,
                "corner": {"name": "New", "color": "#0f0"},
                "language": "id-ID"
            }"##,
        )
        .try_into()
        .expect("valid title");

        assert_eq!(title.id.as_str(), "7");
        assert_eq!(title.cover.as_deref(), Some("c.jpg"));
        assert_eq!(title.introduction.as_deref(), Some("Short."));
        assert_eq!(title.corner_name.as_deref(), Some("New"));
        assert_eq!(title.declared_count(), None);
        assert_eq!(title.popularity, 30);
        assert!(title.dubbed);
    }

    #[test]
    fn rejects_unknown_name() {
        let res: Result<Title> =
            book(r#"{"bookId": 1, "bookName": "Unknown Drama"}"#).try_into();
        assert!(res.is_err());

        let res: Result<Title> = book(r#"{"bookName": "No ID"}"#).try_into();
        assert!(res.is_err());
    }

    #[test]
    fn merge_prefers_newer_fields() {
        let older: Title = book(
            r#"{"bookId": 1, "bookName": "Old", "chapterCount": 40, "cover": "old.jpg"}"#,
        )
        .try_into()
        .expect("valid title");
        let newer: Title =
            book(r#"{"bookId": 1, "bookName": "New", "chapterCount": 0}"#)
                .try_into()
                .expect("valid title");

        let merged = older.merge(newer);

        assert_eq!(merged.name, "New");
        assert_eq!(merged.chapter_count, 40);
        assert_eq!(merged.cover.as_deref(), Some("old.jpg"));
    }

    #[test]
    fn parse_id() {
        assert!("41000102".parse::<TitleID>().is_ok());
        assert!("abc-12".parse::<TitleID>().is_ok());
        assert!("".parse::<TitleID>().is_err());
        assert!("a/b".parse::<TitleID>().is_err());
        assert_eq!(
            "42".parse::<TitleID>().expect("valid ID").as_number(),
            Some(42)
        );
    }
}
