use crate::models;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Match an "EP"-style marker followed by the episode number.
pub static EPISODE_LABEL_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"EP(?:ISODE)?\s*[.:#-]?\s*0*(?P<number>[0-9]+)")
        .expect("invalid episode label regex")
});

// -----------------------------------------------------------------------------

/// Episode ID, from upstream or synthesized for placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EpisodeID {
    /// ID sent by upstream.
    Upstream(String),
    /// ID made up for a record that has none.
    Generated(u32),
}

impl fmt::Display for EpisodeID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream(id) => write!(f, "{id}"),
            Self::Generated(ordinal) => write!(f, "generated-{ordinal}"),
        }
    }
}

// -----------------------------------------------------------------------------

/// What is known about an episode, regardless of where its ordinal came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeMeta {
    /// Upstream ID.
    pub id: Option<String>,
    /// Display label.
    pub label: Option<String>,
    /// Playable stream reference.
    pub stream: Option<String>,
}

/// An episode record as sent by upstream, tagged by the shape it came in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEpisode {
    /// Record carrying the primary `index` ordinal.
    Indexed { index: u32, meta: EpisodeMeta },
    /// Record carrying only the secondary `chapterIndex` ordinal.
    Chapter { chapter_index: u32, meta: EpisodeMeta },
    /// Record without any usable ordinal.
    Unnumbered { meta: EpisodeMeta },
}

impl RawEpisode {
    /// Returns the normalized 1-based ordinal, if the record has one.
    ///
    /// Ordinal 0 is folded into 1: zero-based lists lose their first entry
    /// to the second one.
    pub fn ordinal(&self) -> Option<u32> {
        match *self {
            Self::Indexed { index: n, .. }
            | Self::Chapter { chapter_index: n, .. } => Some(n.max(1)),
            Self::Unnumbered { .. } => None,
        }
    }

    /// Returns the record's metadata.
    pub fn meta(&self) -> &EpisodeMeta {
        match self {
            Self::Indexed { meta, .. }
            | Self::Chapter { meta, .. }
            | Self::Unnumbered { meta } => meta,
        }
    }

    pub(crate) fn into_meta(self) -> EpisodeMeta {
        match self {
            Self::Indexed { meta, .. }
            | Self::Chapter { meta, .. }
            | Self::Unnumbered { meta } => meta,
        }
    }
}

impl From<models::episode::RawRecord> for RawEpisode {
    fn from(value: models::episode::RawRecord) -> Self {
        let label = value
            .chapter_name
            .or(value.name)
            .filter(|label| !label.trim().is_empty());
        let stream = value
            .video
            .and_then(|video| video.m3u8.or(video.mp4))
            .or(value.video_path)
            .filter(|url| !url.is_empty());
        let meta = EpisodeMeta {
            id: value.id.or(value.chapter_id),
            label,
            stream,
        };

        match (value.index, value.chapter_index) {
            (Some(index), _) => Self::Indexed { index, meta },
            (None, Some(chapter_index)) => Self::Chapter {
                chapter_index,
                meta,
            },
            (None, None) => Self::Unnumbered { meta },
        }
    }
}

// -----------------------------------------------------------------------------

/// One watchable unit of a title, after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeDescriptor {
    /// Episode ID.
    id: EpisodeID,
    /// 1-based position in the list.
    ordinal: u32,
    /// Ordinal upstream knows the episode by, used to request the stream.
    link_ordinal: u32,
    /// Display label.
    label: String,
    /// Number shown to the user, may differ from `ordinal`.
    display_number: u32,
    /// Stream reference, when upstream provided one.
    stream: Option<String>,
    /// No real data exists for this position yet.
    placeholder: bool,
}

impl EpisodeDescriptor {
    /// Builds the descriptor of a real episode.
    ///
    /// `ordinal` is the position in the list, `link_ordinal` the normalized
    /// ordinal of the record.
    pub(crate) fn real(
        ordinal: u32,
        link_ordinal: u32,
        meta: EpisodeMeta,
    ) -> Self {
        let label = meta.label.unwrap_or_else(|| generic_label(link_ordinal));
        let display_number = label_number(&label).unwrap_or(link_ordinal);

        Self {
            id: meta.id.map_or(
                EpisodeID::Generated(link_ordinal),
                EpisodeID::Upstream,
            ),
            ordinal,
            link_ordinal,
            label,
            display_number,
            stream: meta.stream,
            placeholder: false,
        }
    }

    /// Builds a placeholder at position `ordinal`.
    pub(crate) fn placeholder(ordinal: u32) -> Self {
        Self {
            id: EpisodeID::Generated(ordinal),
            ordinal,
            link_ordinal: ordinal,
            label: generic_label(ordinal),
            display_number: ordinal,
            stream: None,
            placeholder: true,
        }
    }

    /// Returns the episode ID.
    pub fn id(&self) -> &EpisodeID {
        &self.id
    }

    /// Returns the 1-based position in the list.
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Returns the ordinal to use for navigation and stream lookup.
    ///
    /// Equal to [`Self::ordinal`] unless upstream skipped some episodes.
    pub fn link_ordinal(&self) -> u32 {
        self.link_ordinal
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the number to display.
    ///
    /// Taken from the label when it carries an "EP" marker, which can
    /// disagree with [`Self::ordinal`].
    pub fn display_number(&self) -> u32 {
        self.display_number
    }

    /// Returns the stream reference, if any.
    pub fn stream(&self) -> Option<&str> {
        self.stream.as_deref()
    }

    /// Tests if this episode is a placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

fn generic_label(ordinal: u32) -> String {
    format!("EP {ordinal}")
}

/// Extracts the episode number embedded in a label such as "EP 12".
pub fn label_number(label: &str) -> Option<u32> {
    EPISODE_LABEL_NUMBER
        .captures(label)
        .and_then(|captures| captures.name("number"))
        .and_then(|number| number.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::episode::RawRecord;

    fn record(json: &str) -> RawEpisode {
        serde_json::from_str::<RawRecord>(json)
            .expect("valid record")
            .into()
    }

    #[test]
    fn ordinal_sources() {
        assert_eq!(record(r#"{"index": 3, "chapterIndex": 9}"#).ordinal(), Some(3));
        assert_eq!(record(r#"{"chapterIndex": "4"}"#).ordinal(), Some(4));
        assert_eq!(record(r#"{"chapterName": "EP 5"}"#).ordinal(), None);
    }

    #[test]
    fn zero_collapses_into_one() {
        assert_eq!(record(r#"{"index": 0}"#).ordinal(), Some(1));
        assert_eq!(record(r#"{"chapterIndex": 0}"#).ordinal(), Some(1));
    }

    #[test]
    fn record_metadata() {
        let episode = record(
            r#"{
                "chapterId": 991,
                "chapterIndex": 2,
                "chapterName": "EP 3",
                "video": {"mp4": "https://cdn/3.mp4"}
            }"#,
        );

        assert!(matches!(episode, RawEpisode::Chapter { chapter_index: 2, .. }));
        assert_eq!(episode.meta().id.as_deref(), Some("991"));
        assert_eq!(episode.meta().label.as_deref(), Some("EP 3"));
        assert_eq!(episode.meta().stream.as_deref(), Some("https://cdn/3.mp4"));
    }

    #[test]
    fn label_numbers() {
        assert_eq!(label_number("EP 12"), Some(12));
        assert_eq!(label_number("EP.07"), Some(7));
        assert_eq!(label_number("EPISODE 3"), Some(3));
        assert_eq!(label_number("Finale (EP 80)"), Some(80));
        assert_eq!(label_number("EP 1 Part 2"), Some(1));
        assert_eq!(label_number("Episode 3"), None);
        assert_eq!(label_number("EP"), None);
        assert_eq!(label_number("Trailer"), None);
    }

    #[test]
    fn display_number_diverges_from_ordinal() {
        let meta = EpisodeMeta {
            label: Some("EP 5".into()),
            ..EpisodeMeta::default()
        };
        let episode = EpisodeDescriptor::real(2, 4, meta);

        assert_eq!(episode.ordinal(), 2);
        assert_eq!(episode.link_ordinal(), 4);
        assert_eq!(episode.display_number(), 5);
        assert_eq!(episode.id(), &EpisodeID::Generated(4));
    }

    #[test]
    fn unlabelled_episode_uses_link_ordinal() {
        let episode = EpisodeDescriptor::real(3, 5, EpisodeMeta::default());

        assert_eq!(episode.label(), "EP 5");
        assert_eq!(episode.display_number(), 5);
        assert_eq!(episode.id().to_string(), "generated-5");
    }

    #[test]
    fn placeholder_descriptor() {
        let episode = EpisodeDescriptor::placeholder(9);

        assert!(episode.is_placeholder());
        assert_eq!(episode.label(), "EP 9");
        assert_eq!(episode.link_ordinal(), 9);
        assert_eq!(episode.stream(), None);
        assert_eq!(episode.id().to_string(), "generated-9");
    }
}
