//! `Moodify` - detect the mood of a song from its lyrics.

use std::fmt::Write as _;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodify::analysis::{AnalysisUpdate, MoodAnalyzer, MoodReport};
use moodify::config::Config;
use moodify::constants::async_tasks::CHANNEL_BUFFER_SIZE;
use moodify::library::{Song, SongLibrary};
use moodify::lyrics::LyricsProvider;
use moodify::mood::{ClassificationResult, MoodPalette};
use moodify::types::{LexiconPreset, MatchMode, Scoring};

#[derive(Parser)]
#[command(name = "moodify", version, about = "Detect the mood of a song from its lyrics")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// JSON lexicon file (overrides the preset)
    #[arg(long, global = true, value_name = "PATH")]
    lexicon: Option<PathBuf>,

    /// Built-in lexicon: full, minimal or simple
    #[arg(long, global = true)]
    preset: Option<LexiconPreset>,

    /// Keyword matching: substring or word
    #[arg(long, global = true)]
    match_mode: Option<MatchMode>,

    /// Score each keyword once, however often it occurs
    #[arg(long, global = true)]
    presence: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a song's lyrics and classify them
    Song {
        /// Song title
        title: String,
        /// Performing artist
        #[arg(short, long)]
        artist: Option<String>,
        /// Print the lyrics that were classified
        #[arg(long)]
        show_lyrics: bool,
    },
    /// Classify text from files, or stdin when none are given
    Text {
        /// Files to classify
        files: Vec<PathBuf>,
    },
    /// List the sample library
    Library {
        /// Only songs whose title or artist contains this term
        #[arg(short, long)]
        search: Option<String>,
        /// Classify every listed song
        #[arg(long)]
        analyze: bool,
    },
    /// Print the active lexicon as JSON
    Lexicon,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let config = apply_overrides(Config::load()?, &cli.global);
    let palette = MoodPalette::default();

    match cli.command {
        Command::Song { title, artist, show_lyrics } => {
            let analyzer = build_analyzer(&config)?;
            let song = Song::new(title, artist.as_deref());
            if let Some(report) = analyze_cancellable(&analyzer, song.clone()).await {
                print_report(&song, &report, &palette);
                if show_lyrics {
                    if let MoodReport::Detected { lyrics, .. } = &report {
                        println!("\n--- lyrics ({}) ---\n{}", lyrics.origin, lyrics.text);
                    }
                }
            }
        }
        Command::Text { files } => {
            let classifier = config.classifier()?;
            let texts = read_texts(&files)?;
            let results = classifier.classify_batch(&texts);
            for (name, result) in labels(&files).iter().zip(&results) {
                println!("{name}: {}", describe(result, &palette));
            }
        }
        Command::Library { search, analyze } => {
            let library = SongLibrary::sample();
            let songs: Vec<Song> = library.filter(search.as_deref().unwrap_or("")).into_iter().cloned().collect();
            tracing::info!("{} of {} songs listed", songs.len(), library.len());

            if analyze {
                let analyzer = build_analyzer(&config)?;
                let reports = tokio::select! {
                    reports = analyzer.analyze_all(&songs) => reports,
                    _ = signal::ctrl_c() => {
                        eprintln!("Cancelled");
                        return Ok(());
                    }
                };
                for (song, report) in songs.iter().zip(&reports) {
                    print_report(song, report, &palette);
                }
            } else {
                for (i, song) in songs.iter().enumerate() {
                    println!("{:>2}. {song}", i + 1);
                }
            }
        }
        Command::Lexicon => {
            println!("{}", config.lexicon()?.to_json_pretty()?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "moodify=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn apply_overrides(mut config: Config, args: &GlobalArgs) -> Config {
    if let Some(path) = &args.lexicon {
        config.lexicon_path = Some(path.clone());
    }
    if let Some(preset) = args.preset {
        config.preset = preset;
    }
    if let Some(mode) = args.match_mode {
        config.match_mode = mode;
    }
    if args.presence {
        config.scoring = Scoring::Presence;
    }
    config
}

fn build_analyzer(config: &Config) -> Result<MoodAnalyzer> {
    let classifier = config.classifier().context("Failed to build the mood classifier")?;
    let provider = LyricsProvider::from_config(config);
    tracing::debug!("Lyrics sources: {}", provider.source_names().join(", "));
    Ok(MoodAnalyzer::new(Arc::new(provider), Arc::new(classifier)))
}

/// Analyse one song on a background task; Ctrl-C cancels the lookup.
async fn analyze_cancellable(analyzer: &MoodAnalyzer, song: Song) -> Option<MoodReport> {
    let (tx, mut rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    let cancel = CancellationToken::new();
    let handle = analyzer.spawn(song, tx, cancel.clone());

    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut report = None;
    while let Some(update) = rx.recv().await {
        match update {
            AnalysisUpdate::Started(song) => tracing::debug!("Looking up lyrics for {song}"),
            AnalysisUpdate::Finished(_, r) => report = Some(r),
            AnalysisUpdate::Cancelled(song) => eprintln!("Cancelled lookup for {song}"),
        }
    }

    if let Err(e) = handle.await {
        tracing::warn!("Analysis task failed: {e}");
    }
    cancel.cancel();
    report
}

fn print_report(song: &Song, report: &MoodReport, palette: &MoodPalette) {
    match report {
        MoodReport::Detected { lyrics, result } => {
            println!("{song}: {} ({} lyrics)", describe(result, palette), lyrics.origin);
        }
        MoodReport::Unknown => println!("{song}: Unknown (lyrics unavailable)"),
    }
}

fn describe(result: &ClassificationResult, palette: &MoodPalette) -> String {
    let mut line = format!("{} {}", result.mood.to_uppercase(), palette.color_for(&result.mood));
    if !result.matched_keywords.is_empty() {
        let _ = write!(line, " [{}]", result.matched_keywords.join(", "));
    }
    line
}

fn read_texts(files: &[PathBuf]) -> Result<Vec<String>> {
    if files.is_empty() {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
        return Ok(vec![text]);
    }
    files
        .iter()
        .map(|path| Ok(fs_err::read_to_string(path)?))
        .collect()
}

fn labels(files: &[PathBuf]) -> Vec<String> {
    if files.is_empty() {
        vec!["stdin".to_string()]
    } else {
        files.iter().map(|p| p.display().to_string()).collect()
    }
}
