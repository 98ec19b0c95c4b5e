pub mod fs;
pub mod slug;
pub mod termio;
pub mod view;
pub mod watchlist;

mod catalogue;
mod client;
mod episode;
mod explore;
mod models;
mod reconcile;
mod stream;
mod title;

pub use catalogue::{Catalogue, Detail, DEFAULT_API_URL};
pub use client::{Client, ClientConfig};
pub use episode::{EpisodeDescriptor, EpisodeID, EpisodeMeta, RawEpisode};
pub use explore::Category;
pub use reconcile::{
    fetch_episodes, needs_full_list, reconcile, EpisodeList, EpisodeSource,
    Reconciled, MAX_EPISODES,
};
pub use stream::Stream;
pub use title::{Title, TitleID};
