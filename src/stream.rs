use crate::models;

/// Playable sources of an episode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stream {
    /// HLS playlist URL.
    pub m3u8: Option<String>,
    /// Progressive download URL.
    pub mp4: Option<String>,
    /// Poster image URL.
    pub cover: Option<String>,
}

impl Stream {
    /// Returns the preferred source: HLS first, MP4 otherwise.
    pub fn preferred(&self) -> Option<&str> {
        self.m3u8.as_deref().or(self.mp4.as_deref())
    }

    /// Tests if the episode can be played.
    pub fn is_playable(&self) -> bool {
        self.preferred().is_some()
    }
}

impl From<models::stream::Chapter> for Stream {
    fn from(value: models::stream::Chapter) -> Self {
        let video = value.video.unwrap_or_default();
        let non_empty = |url: Option<String>| url.filter(|url| !url.is_empty());

        Self {
            m3u8: non_empty(video.m3u8),
            mp4: non_empty(video.mp4),
            cover: non_empty(value.cover),
        }
    }
}
