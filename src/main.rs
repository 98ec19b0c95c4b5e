//! dramadeck - Browse a drama-streaming catalogue and keep a personal watch list

// Lints {{{

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    future_incompatible,
    rustdoc::all,
    rustdoc::missing_crate_level_docs,
    missing_docs,
    unreachable_pub,
    unsafe_code,
    unused,
    unused_import_braces,
    unused_lifetimes,
    clippy::all,
    clippy::pedantic,
    clippy::clone_on_ref_ptr,
    clippy::exit,
    clippy::filetype_is_file,
    clippy::float_cmp_const,
    clippy::lossy_float_literal,
    clippy::mem_forget,
    clippy::panic,
    clippy::pattern_type_mismatch,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unneeded_field_pattern,
    clippy::verbose_file_reads,
    clippy::dbg_macro,
    clippy::let_underscore_must_use,
    clippy::todo,
    clippy::unwrap_used,
    clippy::use_debug
)]

// }}}

use clap::{Parser, Subcommand};
use dramadeck::{
    fetch_episodes, slug, termio, watchlist::FileStore, watchlist::WatchList,
    Catalogue, Category, Client, ClientConfig, EpisodeList, Title, TitleID,
    DEFAULT_API_URL,
};
use eyre::{ensure, Result, WrapErr};
use std::{path::PathBuf, time::Duration};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn,dramadeck=info";
/// Number of episodes per row in the episode grid.
const GRID_WIDTH: usize = 10;

fn main() -> Result<()> {
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let client = Client::new(opts.client_config());
    let catalogue =
        Catalogue::new(client, &opts.api_url).context("setup catalogue")?;
    let list = WatchList::new(FileStore::new(
        opts.list_file.clone().unwrap_or_else(FileStore::default_path),
    ));

    match opts.command {
        Command::Home { page, size } => {
            let titles = catalogue.home(page, size).context("get home")?;
            termio::print_heading(&format!("Home, page {page}"));
            print_titles(&titles);
        },
        Command::Search { keyword, page } => {
            let titles = catalogue
                .search(&keyword, page)
                .with_context(|| format!("search {keyword:?}"))?;
            termio::print_heading(&format!("Results for {keyword:?}"));
            print_titles(&titles);
        },
        Command::Explore {
            category,
            page,
            size,
        } => {
            let titles = catalogue
                .home(page, size)
                .with_context(|| format!("explore {category}"))?;
            termio::print_heading(&capitalize(&category.to_string()));
            print_titles(&category.arrange(titles));
        },
        Command::Recommend => {
            let titles = catalogue
                .recommendations()
                .context("get recommendations")?;
            termio::print_heading("Recommended");
            print_titles(&titles);
        },
        Command::Detail { id } => {
            show_detail(&catalogue, &list, &id)
                .with_context(|| format!("show title {id}"))?;
        },
        Command::Watch { id, episode } => {
            watch(&catalogue, &id, episode)
                .with_context(|| format!("watch title {id} episode {episode}"))?;
        },
        Command::List { action } => {
            manage_list(&catalogue, &list, action).context("update my list")?;
        },
    }

    Ok(())
}

/// Prints a title listing.
fn print_titles(titles: &[Title]) {
    if titles.is_empty() {
        termio::print_warn("nothing found");
        return;
    }

    for title in titles {
        let episodes = title
            .declared_count()
            .map_or_else(String::new, |count| format!(" ({count} eps)"));
        let badge = title
            .corner_name
            .as_deref()
            .map_or_else(String::new, |badge| format!(" [{badge}]"));
        println!("{:>10}  {}{episodes}{badge}", title.id, title.name);
    }
}

/// Shows a title card and its episode grid.
fn show_detail(
    catalogue: &Catalogue,
    list: &WatchList<FileStore>,
    id: &TitleID,
) -> Result<()> {
    let reconciled = fetch_episodes(catalogue, id, None);
    let episodes = &reconciled.episodes;

    match reconciled.title {
        Some(ref title) => {
            termio::print_heading(&title.name);
            if !title.tags.is_empty() {
                println!("{}", title.tags.join(" · "));
            }
            println!(
                "{}",
                title
                    .introduction
                    .as_deref()
                    .unwrap_or("No description available.")
            );
            println!("Page: {}", slug::title_path(title));
            if list.contains(id)? {
                termio::print_ok("in my list");
            }
        },
        None => termio::print_warn(&format!("no info on title {id}")),
    }

    println!();
    println!(
        "Episodes ({})",
        reconciled
            .title
            .as_ref()
            .and_then(Title::declared_count)
            .map_or(episodes.len(), |count| count as usize)
    );
    print_grid(episodes);

    match (reconciled.title.as_ref(), episodes.get(1)) {
        (_, None) => println!("Coming soon"),
        (Some(title), Some(first)) => {
            println!(
                "Start watching: {}",
                slug::watch_path(title, first.link_ordinal())
            );
        },
        (None, Some(first)) => {
            println!("Start watching: /watch/{id}/{}", first.link_ordinal());
        },
    }

    Ok(())
}

/// Prints the episode numbers, placeholders marked with `*`.
fn print_grid(episodes: &EpisodeList) {
    let cells = episodes
        .iter()
        .map(|episode| {
            let marker = if episode.is_placeholder() { "*" } else { " " };
            format!("{:>4}{marker}", episode.display_number())
        })
        .collect::<Vec<_>>();

    for row in cells.chunks(GRID_WIDTH) {
        println!("{}", row.concat());
    }
}

/// Resolves the stream of an episode, with navigation.
fn watch(catalogue: &Catalogue, id: &TitleID, episode: u32) -> Result<()> {
    ensure!(episode >= 1, "episodes start at 1");

    let reconciled = fetch_episodes(catalogue, id, None);
    let name = reconciled
        .title
        .as_ref()
        .map_or_else(|| id.to_string(), |title| title.name.clone());
    termio::print_heading(&format!("{name} - Episode {episode}"));

    match catalogue.stream(id, episode) {
        Ok(stream) => match stream.preferred() {
            Some(url) => termio::print_ok(url),
            None => termio::print_warn("no stream available"),
        },
        Err(err) => {
            tracing::warn!(%id, episode, "stream lookup failed: {err:#}");
            termio::print_warn("video unavailable");
        },
    }

    let path = |ordinal| match reconciled.title {
        Some(ref title) => slug::watch_path(title, ordinal),
        None => format!("/watch/{id}/{ordinal}"),
    };
    let (prev, next) = reconciled.episodes.neighbours(episode);
    if let Some(prev) = prev {
        println!("Previous: {}", path(prev));
    }
    if let Some(next) = next {
        println!("Next:     {}", path(next));
    }

    Ok(())
}

/// Applies a list action.
fn manage_list(
    catalogue: &Catalogue,
    list: &WatchList<FileStore>,
    action: ListAction,
) -> Result<()> {
    match action {
        ListAction::Show => {
            let entries = list.entries()?;
            let plural = if entries.len() == 1 { "drama" } else { "dramas" };
            termio::print_heading(&format!(
                "My List: {} {plural} saved",
                entries.len()
            ));
            for entry in entries {
                println!("{:>10}  {}", entry.id, entry.name);
            }
        },
        ListAction::Add { id } => {
            let title = catalogue.title(&id).context("get title")?;
            if list.add(&title)? {
                termio::print_ok(&format!("added {}", title.name));
            } else {
                termio::print_ok(&format!("{} already saved", title.name));
            }
        },
        ListAction::Remove { id } => {
            if list.remove(&id)? {
                termio::print_ok(&format!("removed {id}"));
            } else {
                termio::print_warn(&format!("{id} not in the list"));
            }
        },
        ListAction::Toggle { id } => {
            let title = catalogue.title(&id).context("get title")?;
            if list.toggle(&title)? {
                termio::print_ok(&format!("added {}", title.name));
            } else {
                termio::print_ok(&format!("removed {}", title.name));
            }
        },
        ListAction::Clear => {
            list.clear()?;
            termio::print_ok("list cleared");
        },
    }

    Ok(())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// CLI options.
#[derive(Parser)]
#[clap(author, version, about)]
pub struct Opts {
    /// Catalogue API base URL.
    #[clap(long, env = "DRAMADECK_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Path to the watch list file.
    #[clap(long, env = "DRAMADECK_LIST_FILE")]
    list_file: Option<PathBuf>,

    /// Max number of retry for HTTP requests.
    #[clap(long, default_value_t = 3)]
    retry: u8,

    /// Delay between HTTP requests, in milliseconds.
    #[clap(long, default_value_t = 250)]
    delay_ms: u64,

    /// HTTP timeout, in seconds.
    #[clap(long, default_value_t = 20)]
    timeout: u64,

    #[clap(subcommand)]
    command: Command,
}

impl Opts {
    /// Returns the HTTP client settings.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            retry: self.retry,
            delay: Duration::from_millis(self.delay_ms),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List the home page titles.
    Home {
        /// Page number.
        #[clap(long, default_value_t = 1)]
        page: u32,
        /// Page size.
        #[clap(long, default_value_t = 12)]
        size: u32,
    },
    /// Search titles by keyword.
    Search {
        /// Keyword.
        keyword: String,
        /// Page number.
        #[clap(long, default_value_t = 1)]
        page: u32,
    },
    /// Browse titles by category.
    Explore {
        /// Category.
        #[clap(short, long, value_enum, default_value = "all")]
        category: Category,
        /// Page number.
        #[clap(long, default_value_t = 1)]
        page: u32,
        /// Page size.
        #[clap(long, default_value_t = 48)]
        size: u32,
    },
    /// List recommended titles.
    Recommend,
    /// Show a title and its episodes.
    Detail {
        /// Title ID.
        id: TitleID,
    },
    /// Get the stream of an episode.
    Watch {
        /// Title ID.
        id: TitleID,
        /// Episode number.
        episode: u32,
    },
    /// Manage my list.
    List {
        #[clap(subcommand)]
        action: ListAction,
    },
}

#[derive(Subcommand)]
enum ListAction {
    /// Show the saved titles.
    Show,
    /// Save a title.
    Add {
        /// Title ID.
        id: TitleID,
    },
    /// Remove a title.
    Remove {
        /// Title ID.
        id: TitleID,
    },
    /// Save a title, or remove it if already saved.
    Toggle {
        /// Title ID.
        id: TitleID,
    },
    /// Empty the list.
    Clear,
}
