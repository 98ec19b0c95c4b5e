//! Book (title) records, as found in listings, detail and VIP payloads.

use super::{episode::RawRecord, loose_id, loose_text, loose_u32, loose_u64};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    // Title ID (`bookId`, sometimes `id`).
    #[serde(default, deserialize_with = "loose_id")]
    pub book_id: Option<String>,
    #[serde(default, deserialize_with = "loose_id")]
    pub id: Option<String>,
    // Name.
    pub book_name: Option<String>,
    pub name: Option<String>,
    // Cover image.
    pub cover_wap: Option<String>,
    pub cover: Option<String>,
    // Declared episode count.
    #[serde(default, deserialize_with = "loose_u32")]
    pub chapter_count: Option<u32>,
    // Synopsis.
    pub introduction: Option<String>,
    pub intro: Option<String>,
    // Play counter, as displayed.
    #[serde(default, deserialize_with = "loose_text")]
    pub play_count: Option<String>,
    // Tags.
    #[serde(default)]
    pub tag_v3s: Vec<Tag>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    // Corner badge.
    pub corner_name: Option<String>,
    pub corner_color: Option<String>,
    pub corner: Option<Corner>,
    // Popularity.
    #[serde(default, deserialize_with = "loose_u64")]
    pub heat: Option<u64>,
    #[serde(default, deserialize_with = "loose_u64")]
    pub views: Option<u64>,
    // Dubbing hints.
    #[serde(default)]
    pub is_dubbed: bool,
    pub language: Option<String>,
    pub dubbing: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Named {
        #[serde(rename = "tagName")]
        tag_name: String,
    },
    Plain(String),
}

impl Tag {
    pub fn into_name(self) -> String {
        match self {
            Self::Named { tag_name } => tag_name,
            Self::Plain(name) => name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Corner {
    pub name: Option<String>,
    pub color: Option<String>,
}

// From `/detail/<ID>/v2` {{{

#[derive(Debug, Default, Deserialize)]
pub struct Detail {
    pub drama: Option<Book>,
    pub book: Option<Book>,
    #[serde(default)]
    pub chapters: Vec<RawRecord>,
}

// }}}
// From `/vip` {{{

#[derive(Debug, Deserialize)]
pub struct VipResponse {
    pub data: VipOuter,
}

#[derive(Debug, Deserialize)]
pub struct VipOuter {
    pub data: VipData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VipData {
    #[serde(default)]
    pub column_vo_list: Vec<Column>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(default)]
    pub book_list: Vec<Book>,
}

// }}}
