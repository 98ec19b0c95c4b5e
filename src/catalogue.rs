//! Typed access to the catalogue API endpoints.

use crate::{
    models::{
        self,
        book::{Book, VipResponse},
        episode::RawRecord,
        stream::StreamBody,
        Envelope,
    },
    Client, EpisodeSource, RawEpisode, Stream, Title, TitleID,
};
use eyre::{ensure, eyre, Result, WrapErr};
use tracing::debug;
use url::Url;

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://dramaboxapi-v3.vercel.app/api";

/// What the detail endpoint knows about a title.
#[derive(Debug, Clone, Default)]
pub struct Detail {
    /// Title info, if the payload had a usable one.
    pub title: Option<Title>,
    /// Episodes embedded in the payload.
    pub episodes: Vec<RawEpisode>,
}

impl From<models::book::Detail> for Detail {
    fn from(value: models::book::Detail) -> Self {
        let title = value
            .drama
            .or(value.book)
            .and_then(|book| Title::try_from(book).ok());

        Self {
            title,
            episodes: value.chapters.into_iter().map(RawEpisode::from).collect(),
        }
    }
}

/// The catalogue API.
#[derive(Clone)]
pub struct Catalogue {
    /// HTTP client.
    client: Client,
    /// API base URL (without trailing slash).
    base_url: Url,
}

impl Catalogue {
    /// Initializes a new catalogue on top of `base_url`.
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("invalid API URL {base_url}"))?;
        ensure!(
            !base_url.cannot_be_a_base(),
            "API URL {base_url} cannot be a base"
        );

        Ok(Self { client, base_url })
    }

    /// Returns a page of the home listing.
    pub fn home(&self, page: u32, size: u32) -> Result<Vec<Title>> {
        let url = self.endpoint(
            &["home"],
            &[("page", &page.to_string()), ("size", &size.to_string())],
        );
        self.get_titles(&url).context("call home endpoint")
    }

    /// Searches titles by keyword.
    pub fn search(&self, keyword: &str, page: u32) -> Result<Vec<Title>> {
        let url = self.endpoint(
            &["search"],
            &[("keyword", keyword), ("page", &page.to_string())],
        );
        self.get_titles(&url).context("call search endpoint")
    }

    /// Returns the recommended titles.
    pub fn recommendations(&self) -> Result<Vec<Title>> {
        let url = self.endpoint(&["recommend"], &[]);
        self.get_titles(&url).context("call recommend endpoint")
    }

    /// Returns the title, from its detail or the VIP listing.
    pub fn title(&self, id: &TitleID) -> Result<Title> {
        match self.title_detail(id) {
            Ok(Detail {
                title: Some(title), ..
            }) => return Ok(title),
            Ok(_) => debug!(%id, "detail has no usable title"),
            Err(err) => debug!(%id, "detail failed: {err:#}"),
        }

        self.lookup_title(id)?
            .ok_or_else(|| eyre!("title {id} not found"))
    }

    /// Returns the stream of the episode at `ordinal`.
    pub fn stream(&self, id: &TitleID, ordinal: u32) -> Result<Stream> {
        let url = self.endpoint(
            &["stream"],
            &[("bookId", id.as_str()), ("episode", &ordinal.to_string())],
        );
        let chapter = self
            .client
            .get_json::<StreamBody>(&url)
            .context("call stream endpoint")?
            .into_chapter();

        Ok(chapter.map(Stream::from).unwrap_or_default())
    }

    /// Fetches a listing and keeps the usable titles.
    fn get_titles(&self, url: &Url) -> Result<Vec<Title>> {
        let books = self.client.get_json::<Envelope<Vec<Book>>>(url)?;

        Ok(books
            .into_inner()
            .into_iter()
            .filter_map(|book| match Title::try_from(book) {
                Ok(title) => Some(title),
                Err(err) => {
                    debug!("skipping listing entry: {err:#}");
                    None
                },
            })
            .collect())
    }

    /// Builds the URL of an endpoint.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .expect("base URL checked at construction")
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }
}

impl EpisodeSource for Catalogue {
    fn title_detail(&self, id: &TitleID) -> Result<Detail> {
        let url = self.endpoint(&["detail", id.as_str(), "v2"], &[]);
        let detail = self
            .client
            .get_json::<Envelope<models::book::Detail>>(&url)
            .context("call detail endpoint")?;

        Ok(detail.into_inner().into())
    }

    fn full_episode_list(&self, id: &TitleID) -> Result<Vec<RawEpisode>> {
        let url = self.endpoint(&["chapters", id.as_str()], &[]);
        let records = self
            .client
            .get_json::<Envelope<Vec<RawRecord>>>(&url)
            .context("call chapters endpoint")?;

        Ok(records
            .into_inner()
            .into_iter()
            .map(RawEpisode::from)
            .collect())
    }

    fn lookup_title(&self, id: &TitleID) -> Result<Option<Title>> {
        let url = self.endpoint(&["vip"], &[]);
        let vip = self
            .client
            .get_json::<VipResponse>(&url)
            .context("call VIP endpoint")?;

        Ok(vip
            .data
            .data
            .column_vo_list
            .into_iter()
            .flat_map(|column| column.book_list)
            .filter_map(|book| Title::try_from(book).ok())
            .find(|title| &title.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;

    fn catalogue(base: &str) -> Catalogue {
        Catalogue::new(Client::new(ClientConfig::default()), base)
            .expect("valid catalogue")
    }

    #[test]
    fn endpoint_urls() {
        let api = catalogue("https://api.example.com/api/");

        assert_eq!(
            api.endpoint(&["detail", "41000102", "v2"], &[]).as_str(),
            "https://api.example.com/api/detail/41000102/v2"
        );
        assert_eq!(
            api.endpoint(&["search"], &[("keyword", "ceo wife"), ("page", "2")])
                .as_str(),
            "https://api.example.com/api/search?keyword=ceo+wife&page=2"
        );
    }

    #[test]
    fn endpoint_on_bare_host() {
        let api = catalogue("https://api.example.com");

        assert_eq!(
            api.endpoint(&["vip"], &[]).as_str(),
            "https://api.example.com/vip"
        );
    }

    #[test]
    fn rejects_bad_base() {
        let client = Client::new(ClientConfig::default());

        assert!(Catalogue::new(client.clone(), "not a url").is_err());
        assert!(Catalogue::new(client, "mailto:someone@example.com").is_err());
    }

    #[test]
    fn detail_conversion() {
        let body = r#"{
            "data": {
                "drama": {"bookId": 5, "bookName": "Unknown Drama"},
                "chapters": [{"index": 1}, {"chapterIndex": 2}, {}]
            }
        }"#;
        let detail: Detail =
            serde_json::from_str::<Envelope<models::book::Detail>>(body)
                .expect("detail body")
                .into_inner()
                .into();

        assert!(detail.title.is_none());
        assert_eq!(detail.episodes.len(), 3);
        assert!(matches!(detail.episodes[2], RawEpisode::Unnumbered { .. }));
    }
}
