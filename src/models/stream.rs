//! Mininal model of the data returned by `/stream`.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct StreamData {
    pub chapter: Option<Chapter>,
}

#[derive(Debug, Deserialize)]
pub struct Chapter {
    pub video: Option<Video>,
    pub cover: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Video {
    pub m3u8: Option<String>,
    pub mp4: Option<String>,
}

/// The chapter may sit under `data` or at the top level.
#[derive(Debug, Default, Deserialize)]
pub struct StreamBody {
    pub data: Option<StreamData>,
    pub chapter: Option<Chapter>,
}

impl StreamBody {
    pub fn into_chapter(self) -> Option<Chapter> {
        self.data.and_then(|data| data.chapter).or(self.chapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_under_data() {
        let body = r#"{"data":{"chapter":{"video":{"m3u8":"https://cdn/x.m3u8"}}}}"#;
        let chapter = serde_json::from_str::<StreamBody>(body)
            .expect("stream body")
            .into_chapter()
            .expect("chapter");

        assert_eq!(
            chapter.video.and_then(|v| v.m3u8).as_deref(),
            Some("https://cdn/x.m3u8")
        );
    }

    #[test]
    fn chapter_at_top_level() {
        let body = r#"{"data":{},"chapter":{"video":{"mp4":"https://cdn/x.mp4"},"cover":"c.jpg"}}"#;
        let chapter = serde_json::from_str::<StreamBody>(body)
            .expect("stream body")
            .into_chapter()
            .expect("chapter");

        assert_eq!(chapter.cover.as_deref(), Some("c.jpg"));
    }
}
