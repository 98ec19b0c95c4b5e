//! Episode ("chapter") records, from the detail payload or `/chapters/<ID>`.

use super::{loose_id, loose_u32, stream::Video};
use serde::Deserialize;

/// Flat view over every episode shape upstream is known to send.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    // Primary ordinal (zero or one-based).
    #[serde(default, deserialize_with = "loose_u32")]
    pub index: Option<u32>,
    // Secondary ordinal.
    #[serde(default, deserialize_with = "loose_u32")]
    pub chapter_index: Option<u32>,
    // Episode ID.
    #[serde(default, deserialize_with = "loose_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "loose_id")]
    pub chapter_id: Option<String>,
    // Label.
    pub chapter_name: Option<String>,
    pub name: Option<String>,
    // Playable stream.
    pub video_path: Option<String>,
    pub video: Option<Video>,
}
