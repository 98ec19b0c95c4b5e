//! Episode reconciliation.
//!
//! Upstream spreads a title's episodes over two endpoints (the title detail
//! and the chapter list), both of which may be partial, zero or one-based, or
//! plain missing. This module merges whatever is available into a single
//! gap-free list `1..=N`: real episodes first, in upstream order, then
//! placeholders up to the declared count.

use crate::{catalogue::Detail, EpisodeDescriptor, RawEpisode, Title, TitleID};
use eyre::Result;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Upper bound on the size of a reconciled list.
///
/// Protects against garbage counts/ordinals (no title comes close to it).
pub const MAX_EPISODES: u32 = 10_000;

/// Where reconciliation gets its raw data from.
pub trait EpisodeSource {
    /// Fetches the title detail (title info and embedded episodes).
    fn title_detail(&self, id: &TitleID) -> Result<Detail>;

    /// Fetches the dedicated episode list.
    fn full_episode_list(&self, id: &TitleID) -> Result<Vec<RawEpisode>>;

    /// Looks the title up through a secondary listing.
    fn lookup_title(&self, id: &TitleID) -> Result<Option<Title>>;
}

/// Tests if the dedicated episode list is worth fetching.
pub fn needs_full_list(declared: Option<u32>, detail_len: usize) -> bool {
    detail_len == 0
        || declared.map_or(false, |count| detail_len < count as usize)
}

/// Merges raw episode records into a consistent episode list.
///
/// `full` is only considered when [`needs_full_list`] says so, and only
/// replaces `detail` when it's longer. When two records land on the same
/// ordinal, the first one wins.
///
/// Real episodes take positions `1..=r` sorted by their ordinal, which they
/// keep as link ordinal. Placeholders then fill `r+1..=N`, where `N` is the
/// largest of the declared count and `r`.
pub fn reconcile(
    declared: Option<u32>,
    detail: Vec<RawEpisode>,
    full: Vec<RawEpisode>,
) -> EpisodeList {
    let chosen = if needs_full_list(declared, detail.len())
        && full.len() > detail.len()
    {
        full
    } else {
        detail
    };

    let mut seen = HashSet::new();
    let mut real = chosen
        .into_iter()
        .enumerate()
        .filter_map(|(position, episode)| {
            let ordinal = episode.ordinal().unwrap_or_else(|| {
                u32::try_from(position + 1).unwrap_or(u32::MAX)
            });
            if !seen.insert(ordinal) {
                debug!(ordinal, "ignoring duplicate episode");
                return None;
            }
            Some((ordinal, episode.into_meta()))
        })
        .collect::<Vec<_>>();
    real.sort_by_key(|(ordinal, _)| *ordinal);
    real.truncate(MAX_EPISODES as usize);

    let real_count = u32::try_from(real.len()).unwrap_or(MAX_EPISODES);
    let final_count = declared.unwrap_or(0).min(MAX_EPISODES).max(real_count);

    let episodes = real
        .into_iter()
        .zip(1..)
        .map(|((link_ordinal, meta), ordinal)| {
            EpisodeDescriptor::real(ordinal, link_ordinal, meta)
        })
        .chain(
            (real_count + 1..=final_count).map(EpisodeDescriptor::placeholder),
        )
        .collect();

    EpisodeList { episodes }
}

/// Result of [`fetch_episodes`].
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Best known info on the title, if any.
    pub title: Option<Title>,
    /// Reconciled episodes.
    pub episodes: EpisodeList,
}

/// Fetches and reconciles the episodes of a title.
///
/// Never fails: upstream errors are logged and reconciliation carries on with
/// whatever it got, down to an all-placeholder (or empty) list.
pub fn fetch_episodes<S>(
    source: &S,
    id: &TitleID,
    known: Option<Title>,
) -> Reconciled
where
    S: EpisodeSource + ?Sized,
{
    let detail = source.title_detail(id).unwrap_or_else(|err| {
        warn!(%id, "title detail unavailable: {err:#}");
        Detail::default()
    });

    let mut title = match (known, detail.title) {
        (Some(known), Some(fetched)) => Some(known.merge(fetched)),
        (known, fetched) => fetched.or(known),
    };

    // No usable title info or count: try the secondary listing.
    if title.as_ref().and_then(Title::declared_count).is_none() {
        match source.lookup_title(id) {
            Ok(Some(found)) => {
                title = Some(match title {
                    Some(title) => title.merge(found),
                    None => found,
                });
            },
            Ok(None) => debug!(%id, "title not found in secondary listing"),
            Err(err) => warn!(%id, "title lookup failed: {err:#}"),
        }
    }

    let declared = title.as_ref().and_then(Title::declared_count);
    let full = if needs_full_list(declared, detail.episodes.len()) {
        source.full_episode_list(id).unwrap_or_else(|err| {
            warn!(%id, "episode list unavailable: {err:#}");
            Vec::new()
        })
    } else {
        Vec::new()
    };

    let episodes = reconcile(declared, detail.episodes, full);
    debug!(
        %id,
        total = episodes.len(),
        real = episodes.real_count(),
        "episodes reconciled"
    );

    Reconciled { title, episodes }
}

/// Ordered, gap-free list of episodes (ordinals `1..=len`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeList {
    episodes: Vec<EpisodeDescriptor>,
}

impl EpisodeList {
    /// Returns the number of episodes.
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    /// Tests if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Returns the number of episodes backed by real data.
    pub fn real_count(&self) -> usize {
        self.episodes.iter().filter(|e| !e.is_placeholder()).count()
    }

    /// Returns the episodes, in order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = &EpisodeDescriptor> + ExactSizeIterator + '_ {
        self.episodes.iter()
    }

    /// Returns the episode at position `ordinal`.
    pub fn get(&self, ordinal: u32) -> Option<&EpisodeDescriptor> {
        let index = usize::try_from(ordinal).ok()?.checked_sub(1)?;
        self.episodes.get(index)
    }

    /// Returns the first episode linked to `link_ordinal`.
    pub fn find(&self, link_ordinal: u32) -> Option<&EpisodeDescriptor> {
        self.episodes
            .iter()
            .find(|episode| episode.link_ordinal() == link_ordinal)
    }

    /// Returns the link ordinals before and after `link_ordinal`, if any.
    ///
    /// Unknown ordinals are navigated by plain arithmetic within the list
    /// length.
    pub fn neighbours(&self, link_ordinal: u32) -> (Option<u32>, Option<u32>) {
        let link = |position: u32| {
            self.get(position).map(EpisodeDescriptor::link_ordinal)
        };

        match self.find(link_ordinal).map(EpisodeDescriptor::ordinal) {
            Some(position) => (
                position.checked_sub(1).and_then(link),
                position.checked_add(1).and_then(link),
            ),
            None => {
                let len = u32::try_from(self.len()).unwrap_or(u32::MAX);
                let prev = (link_ordinal > 1).then(|| link_ordinal - 1);
                let next = (link_ordinal < len).then(|| link_ordinal + 1);
                (prev, next)
            },
        }
    }
}

impl<'a> IntoIterator for &'a EpisodeList {
    type Item = &'a EpisodeDescriptor;
    type IntoIter = std::slice::Iter<'a, EpisodeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.episodes.iter()
    }
}
