use crate::Title;
use clap::ValueEnum;
use std::{cmp::Reverse, fmt};

/// Browsing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Category {
    /// Everything, in upstream order.
    #[default]
    All,
    /// Newest first.
    Latest,
    /// Most watched first.
    Popular,
    /// Hottest first.
    Trending,
    /// Dubbed in Indonesian (sulih suara).
    Dubbed,
}

impl Category {
    /// Orders (and possibly filters) a listing for this category.
    pub fn arrange(self, mut titles: Vec<Title>) -> Vec<Title> {
        match self {
            Self::All => titles,
            Self::Latest => {
                // Higher IDs are newer.
                titles.sort_by_key(|title| {
                    Reverse(title.id.as_number().unwrap_or_default())
                });
                titles
            },
            Self::Popular | Self::Trending => {
                titles.sort_by_key(|title| Reverse(title.popularity));
                titles
            },
            Self::Dubbed => {
                if titles.iter().any(|title| title.dubbed) {
                    titles.retain(|title| title.dubbed);
                }
                titles
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::All => "all dramas",
                Self::Latest => "latest dramas",
                Self::Popular => "popular dramas",
                Self::Trending => "trending now",
                Self::Dubbed => "sulih suara",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(id: &str, heat: u64, dubbed: bool) -> Title {
        let book: crate::models::book::Book = serde_json::from_value(serde_json::json!({
            "bookId": id,
            "bookName": format!("Drama {id}"),
            "heat": heat,
            "isDubbed": dubbed,
        }))
        .expect("valid book");
        Title::try_from(book).expect("valid title")
    }

    fn ids(titles: &[Title]) -> Vec<&str> {
        titles.iter().map(|title| title.id.as_str()).collect()
    }

    fn listing() -> Vec<Title> {
        vec![title("10", 5, false), title("30", 1, true), title("20", 9, false)]
    }

    #[test]
    fn all_keeps_order() {
        assert_eq!(ids(&Category::All.arrange(listing())), ["10", "30", "20"]);
    }

    #[test]
    fn latest_by_id() {
        assert_eq!(ids(&Category::Latest.arrange(listing())), ["30", "20", "10"]);
    }

    #[test]
    fn popular_by_heat() {
        assert_eq!(ids(&Category::Popular.arrange(listing())), ["20", "10", "30"]);
        assert_eq!(ids(&Category::Trending.arrange(listing())), ["20", "10", "30"]);
    }

    #[test]
    fn dubbed_filter_falls_back_to_everything() {
        assert_eq!(ids(&Category::Dubbed.arrange(listing())), ["30"]);

        let undubbed = vec![title("1", 0, false), title("2", 0, false)];
        assert_eq!(ids(&Category::Dubbed.arrange(undubbed)), ["1", "2"]);
    }
}
