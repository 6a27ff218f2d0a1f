use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use console::{Emoji, Key, Term};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use podplay::favorites::sort_favorites;
use podplay::{
    CatalogGateway, EpisodeRef, Favorite, FavoritesStore, FileSlot, PlaybackController,
    ReqwestClient, Season, SortOrder, TransportState, DEFAULT_BASE_URL,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static STAR: Emoji<'_, '_> = Emoji("⭐ ", "[*] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");

/// How long the stand-in playback clock pretends each episode runs
const SIMULATED_TRACK_SECONDS: f64 = 1800.0;

/// Browse a podcast catalog, play episodes, and keep local favorites
#[derive(Parser, Debug)]
#[command(name = "podplay")]
#[command(about = "Browse a podcast catalog, play episodes, and keep local favorites")]
#[command(version)]
struct Args {
    /// Base URL of the catalog API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api: String,

    /// Path of the favorites file (defaults to the user data directory)
    #[arg(long)]
    favorites: Option<PathBuf>,

    /// Quiet mode - suppress banner and spinners
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all shows in the catalog
    Shows,

    /// Show one show's seasons and episodes
    Show {
        /// Catalog id of the show
        id: String,

        /// Resolve genre ids to names
        #[arg(long)]
        genres: bool,
    },

    /// Manage favorited episodes
    #[command(subcommand)]
    Favorites(FavoritesCommand),

    /// Play a show with an interactive transport
    Play {
        /// Catalog id of the show to start from (defaults to the first show)
        id: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    /// List favorites
    List {
        /// Ordering of the list
        #[arg(long, value_enum, default_value = "recent")]
        sort: SortArg,

        /// Only favorites whose title contains this text (case-insensitive)
        #[arg(long, default_value = "")]
        filter: String,
    },

    /// Remove a favorite by its show, season, and episode ids
    Remove {
        podcast_id: String,
        season_id: String,
        episode_id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    /// Title A-Z
    TitleAz,
    /// Title Z-A
    TitleZa,
    /// Most recently added first
    Recent,
    /// Furthest back first
    Oldest,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::TitleAz => SortOrder::TitleAsc,
            SortArg::TitleZa => SortOrder::TitleDesc,
            SortArg::Recent => SortOrder::MostRecent,
            SortArg::Oldest => SortOrder::Oldest,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "podplay".bold().magenta(),
            "- Podcast Catalog & Player".dimmed()
        );
    }

    let gateway = CatalogGateway::with_base_url(ReqwestClient::new(), args.api.clone());
    let store = FavoritesStore::new(FileSlot::new(favorites_path(args.favorites.clone())?));

    match args.command {
        Command::Shows => cmd_shows(&gateway, args.quiet).await,
        Command::Show { id, genres } => cmd_show(&gateway, &store, &id, genres, args.quiet).await,
        Command::Favorites(command) => {
            cmd_favorites(&store, command);
            Ok(())
        }
        Command::Play { id } => cmd_play(gateway, &store, id, args.quiet).await,
    }
}

fn favorites_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }

    let dirs = directories::ProjectDirs::from("", "", "podplay")
        .context("Could not determine a data directory for favorites")?;
    Ok(dirs.data_dir().join("favorites.json"))
}

fn spinner(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} {wide_msg}")
        .unwrap();

    let bar = ProgressBar::new_spinner();
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_message(format!("{SEARCH}{message}"));
    bar
}

/// Decode HTML entities the catalog embeds in descriptions and keep the
/// output to a single terminal-friendly line
fn clean_description(raw: &str, max_len: usize) -> String {
    let decoded = html_escape::decode_html_entities(raw).replace(['\n', '\r'], " ");
    let trimmed = decoded.split_whitespace().collect::<Vec<_>>().join(" ");

    if trimmed.chars().count() <= max_len {
        trimmed
    } else {
        let cut: String = trimmed.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

/// Seasons arrive from the catalog with inconsistent titles; fall back to
/// their ordinal name
fn season_display_title(index: usize, season: &Season) -> String {
    if season.title.trim().is_empty() {
        format!("Season {}", index + 1)
    } else {
        season.title.clone()
    }
}

async fn cmd_shows(gateway: &CatalogGateway<ReqwestClient>, quiet: bool) -> Result<()> {
    let bar = spinner(quiet, "Fetching catalog");
    let shows = gateway.list_shows().await;
    bar.finish_and_clear();

    let shows = shows.context("Failed to fetch the show catalog")?;
    if shows.is_empty() {
        println!("{}", "The catalog is empty.".dimmed());
        return Ok(());
    }

    for show in &shows {
        let updated = show
            .last_updated
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string());

        println!(
            "{} {} {}",
            show.title.bold().green(),
            format!("({})", show.id).dimmed(),
            format!("{} seasons, updated {}", show.seasons.len(), updated).cyan()
        );
        if let Some(description) = &show.description {
            println!("  {}", clean_description(description, 100).dimmed());
        }
    }

    println!("\n{} shows", shows.len().to_string().cyan());
    Ok(())
}

async fn cmd_show(
    gateway: &CatalogGateway<ReqwestClient>,
    store: &FavoritesStore<FileSlot>,
    id: &str,
    genres: bool,
    quiet: bool,
) -> Result<()> {
    let bar = spinner(quiet, &format!("Fetching show {id}"));
    let show = gateway.get_show(id).await;
    bar.finish_and_clear();

    let show = show.with_context(|| format!("Failed to fetch show {id}"))?;

    println!("{}", show.title.bold().magenta());
    if let Some(updated) = show.last_updated {
        println!("Last updated: {}", updated.format("%Y-%m-%d").to_string().cyan());
    }
    if let Some(description) = &show.description {
        println!("{}", clean_description(description, 300));
    }

    if genres && !show.genre_ids.is_empty() {
        let mut names = Vec::new();
        for genre_id in &show.genre_ids {
            match gateway.get_genre(*genre_id).await {
                Ok(genre) => names.push(genre.title),
                Err(e) => warn!("could not resolve genre {genre_id}: {e}"),
            }
        }
        if !names.is_empty() {
            println!("Genres: {}", names.join(", ").yellow());
        }
    }

    for (season_index, season) in show.seasons.iter().enumerate() {
        println!(
            "\n{} {}",
            season_display_title(season_index, season).bold().green(),
            format!("({} episodes)", season.episodes.len()).dimmed()
        );

        if season.episodes.is_empty() {
            println!("  {}", "PLACEHOLDER AUDIO TRACK".dimmed());
            continue;
        }

        for (episode_index, episode) in season.episodes.iter().enumerate() {
            let marker = if store.is_favorite(&episode.id) {
                format!(" {STAR}")
            } else {
                String::new()
            };
            println!(
                "  {}. {}{}",
                episode_index + 1,
                episode.title,
                marker.yellow()
            );
        }
    }

    Ok(())
}

fn cmd_favorites(store: &FavoritesStore<FileSlot>, command: FavoritesCommand) {
    match command {
        FavoritesCommand::List { sort, filter } => {
            let favorites = sort_favorites(store.filter_by_title(&filter), sort.into());

            if favorites.is_empty() {
                println!("{}", "No favorites found.".dimmed());
                return;
            }

            for favorite in &favorites {
                let title = favorite.title.as_deref().unwrap_or("(untitled)");
                println!("{}{}", STAR, title.bold());
                println!(
                    "   {} {} {}",
                    favorite.show_title.as_deref().unwrap_or("-").green(),
                    "•".dimmed(),
                    favorite.season_title.as_deref().unwrap_or("-").cyan()
                );
                println!(
                    "   Added: {}",
                    favorite
                        .timestamp
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .dimmed()
                );
            }
        }

        FavoritesCommand::Remove {
            podcast_id,
            season_id,
            episode_id,
        } => match store.remove(&podcast_id, &season_id, &episode_id) {
            Ok(()) => println!("Removed {episode_id} from favorites."),
            Err(e) => eprintln!("{FAILURE}{}", e.to_string().red()),
        },
    }
}

async fn cmd_play(
    gateway: CatalogGateway<ReqwestClient>,
    store: &FavoritesStore<FileSlot>,
    id: Option<String>,
    quiet: bool,
) -> Result<()> {
    let mut controller = PlaybackController::new(gateway);

    let bar = spinner(quiet, "Loading catalog");
    controller.load_initial_show().await;
    bar.finish_and_clear();

    if controller.state() == TransportState::Idle {
        println!("{}", "Nothing to play - the catalog is empty or unreachable.".dimmed());
        return Ok(());
    }

    if let Some(id) = id {
        controller
            .open_show(&id)
            .await
            .with_context(|| format!("Failed to open show {id}"))?;
    }

    run_transport(controller, store).await
}

/// Interactive transport loop
///
/// There is no audio decoder in this front-end; a fixed-length clock stands
/// in for the output device and feeds the controller its time updates.
async fn run_transport(
    mut controller: PlaybackController<ReqwestClient>,
    store: &FavoritesStore<FileSlot>,
) -> Result<()> {
    let term = Term::stdout();

    let (key_tx, mut key_rx) = tokio::sync::mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let term = Term::stdout();
        while let Ok(key) = term.read_key() {
            if key_tx.send(key).is_err() {
                break;
            }
        }
    });

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut drawn = render_player(&term, &controller, store, 0)?;

    loop {
        tokio::select! {
            _ = ticker.tick() => tick_clock(&mut controller),

            key = key_rx.recv() => {
                let Some(key) = key else { break };
                match key {
                    Key::Char('q') | Key::Escape => break,
                    Key::Char(' ') => controller.play_pause(),
                    Key::ArrowRight => controller.seek_relative(10.0),
                    Key::ArrowLeft => controller.seek_relative(-10.0),
                    Key::Char('n') => {
                        if let Err(e) = controller.skip_to_next().await {
                            warn!("skip failed: {e}");
                        }
                    }
                    Key::Char('p') => {
                        if let Err(e) = controller.skip_to_previous().await {
                            warn!("skip failed: {e}");
                        }
                    }
                    Key::Char('s') => cycle_season(&mut controller),
                    Key::Char('f') => toggle_favorite(&controller, store),
                    _ => {}
                }
            }
        }

        drawn = render_player(&term, &controller, store, drawn)?;
    }

    Ok(())
}

fn tick_clock(controller: &mut PlaybackController<ReqwestClient>) {
    if controller.state() != TransportState::Playing {
        return;
    }

    let snapshot = controller.snapshot();
    if snapshot.duration_seconds <= 0.0 {
        controller.on_duration_known(SIMULATED_TRACK_SECONDS);
        return;
    }

    let next = snapshot.position_seconds + 1.0;
    if next >= snapshot.duration_seconds {
        controller.on_playback_ended();
    } else {
        controller.on_time_update(next);
    }
}

fn cycle_season(controller: &mut PlaybackController<ReqwestClient>) {
    let seasons = controller.active_show_seasons();
    if seasons.len() < 2 {
        return;
    }

    let Some(current) = controller.active_season_index() else {
        return;
    };
    let next_id = seasons[(current + 1) % seasons.len()].id.clone();

    if let Err(e) = controller.switch_season(&next_id) {
        warn!("season switch failed: {e}");
    }
}

fn toggle_favorite(
    controller: &PlaybackController<ReqwestClient>,
    store: &FavoritesStore<FileSlot>,
) {
    let Some(episode_ref) = controller.current_episode_ref() else {
        return;
    };

    if let Err(e) = store.toggle(favorite_from_ref(&episode_ref)) {
        warn!("could not update favorites: {e}");
    }
}

fn favorite_from_ref(episode_ref: &EpisodeRef) -> Favorite {
    Favorite {
        podcast_id: episode_ref.show_id.clone(),
        season_id: episode_ref.season_id.clone(),
        episode_id: episode_ref.episode_id.clone(),
        title: Some(episode_ref.episode_title.clone()),
        show_title: Some(episode_ref.show_title.clone()),
        season_title: Some(episode_ref.season_title.clone()),
        timestamp: Utc::now(),
    }
}

fn render_player(
    term: &Term,
    controller: &PlaybackController<ReqwestClient>,
    store: &FavoritesStore<FileSlot>,
    previous_lines: usize,
) -> Result<usize> {
    if previous_lines > 0 {
        term.clear_last_lines(previous_lines)?;
    }

    let snapshot = controller.snapshot();
    let mut lines = Vec::new();

    let show = snapshot.show_title.as_deref().unwrap_or("-");
    let season = snapshot.season_title.as_deref().unwrap_or("-");
    lines.push(format!(
        "{HEADPHONES}{} {} {}",
        show.bold().green(),
        "•".dimmed(),
        season.cyan()
    ));

    match &snapshot.episode_title {
        Some(title) => {
            let starred = controller
                .current_episode_ref()
                .map(|r| store.is_favorite(&r.episode_id))
                .unwrap_or(false);
            let marker = if starred { " ★".yellow().to_string() } else { String::new() };

            lines.push(format!(
                "  [{}/{}] {}{}",
                snapshot.episode_number.unwrap_or(0),
                snapshot.episode_count,
                title.bold(),
                marker
            ));
        }
        None => lines.push(format!("  {}", "PLACEHOLDER AUDIO TRACK".dimmed())),
    }

    let status = if snapshot.paused { "paused" } else { "playing" };
    lines.push(format!(
        "  {} {} / {}  {}",
        progress_bar(snapshot.progress_percent),
        format_time(snapshot.position_seconds),
        format_time(snapshot.duration_seconds),
        status.dimmed()
    ));
    lines.push(format!(
        "  {}",
        "space play/pause · n/p skip · arrows seek 10s · s season · f favorite · q quit".dimmed()
    ));

    for line in &lines {
        term.write_line(line)?;
    }
    Ok(lines.len())
}

fn progress_bar(percent: f64) -> String {
    const WIDTH: usize = 20;
    let filled = ((percent / 100.0) * WIDTH as f64).round() as usize;
    let filled = filled.min(WIDTH);

    format!(
        "[{}{}]",
        "█".repeat(filled).cyan(),
        "░".repeat(WIDTH - filled).dimmed()
    )
}

fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
