use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;
use walkdir::WalkDir;

use hirouen::{
    Config,
    client::ApiClient,
    format::{format_bytes, format_local, format_timestamp},
    gallery::GalleryView,
    upload::{PendingFile, Uploader},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Global options that apply to all commands
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// API base URL that the endpoint paths and relative photo URLs
    /// resolve against
    #[arg(long, global = true, env = "HIROUEN_API_BASE_URL")]
    base_url: Option<String>,

    /// Path of the photo list endpoint off the base URL
    #[arg(long, global = true, env = "HIROUEN_PHOTO_LIST_PATH")]
    list_path: Option<String>,

    /// Path of the photo upload endpoint off the base URL
    #[arg(long, global = true, env = "HIROUEN_PHOTO_UPLOAD_PATH")]
    upload_path: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload photos and videos to the shared gallery
    Upload {
        /// Files or directories to send
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Descend into subdirectories when a directory is given
        #[arg(short, long)]
        recursive: bool,
    },

    /// Browse what guests have shared
    Gallery {
        /// Step through photos one at a time
        #[arg(short, long)]
        interactive: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging first
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli)?;
    if config.api.base_url.is_empty() {
        warn!("API base URL is empty; requests will go to bare endpoint paths");
    }

    let client = ApiClient::new(&config.api)?;

    match cli.command {
        Commands::Upload { paths, recursive } => run_upload(client, paths, recursive).await,
        Commands::Gallery { interactive } => run_gallery(client, &config, interactive).await,
    }
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli.config.exists() {
        let content = std::fs::read_to_string(&cli.config)?;
        toml_edit::de::from_str::<Config>(&content)?
    } else {
        info!("Config file not found at {:?}, using defaults", cli.config);
        Config::default()
    };

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(list_path) = &cli.list_path {
        config.api.list_path = list_path.clone();
    }
    if let Some(upload_path) = &cli.upload_path {
        config.api.upload_path = upload_path.clone();
    }

    Ok(config)
}

async fn run_upload(
    client: ApiClient,
    paths: Vec<PathBuf>,
    recursive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pending = Vec::new();
    for path in collect_media_files(&paths, recursive)? {
        pending.push(PendingFile::from_path(&path).await?);
    }

    let mut uploader = Uploader::new(client);
    uploader.queue_mut().add_selection(pending);

    let queue = uploader.queue();
    if !queue.is_empty() {
        info!(
            "Selected {} file(s), {} total",
            queue.len(),
            format_bytes(queue.total_size() as f64)
        );
    }

    let outcome = uploader.upload_all().await;
    if outcome.is_success() {
        println!("{}", outcome.message());
        Ok(())
    } else {
        eprintln!("{}", outcome.message());
        std::process::exit(1);
    }
}

/// Expand the given paths into uploadable files. Directories are walked
/// (one level unless `recursive`) and filtered to image/video types;
/// explicitly named files are taken as-is, the way a drag-and-drop bypasses
/// the picker's type filter.
fn collect_media_files(
    paths: &[PathBuf],
    recursive: bool,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let max_depth = if recursive { usize::MAX } else { 1 };
            for entry in WalkDir::new(path).max_depth(max_depth).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && is_media(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            warn!("Skipping {:?}: not a file or directory", path);
        }
    }
    Ok(files)
}

fn is_media(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .map(|mime| {
            let kind = mime.type_();
            kind == mime_guess::mime::IMAGE || kind == mime_guess::mime::VIDEO
        })
        .unwrap_or(false)
}

async fn run_gallery(
    client: ApiClient,
    config: &Config,
    interactive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = GalleryView::new(client, config.api.base_url.clone());
    view.fetch_if_needed().await;

    if let Some(message) = view.fetch_error() {
        eprintln!("{}", message);
        std::process::exit(1);
    }

    if view.photos().is_empty() {
        println!("No photos yet. Be the first to share a moment.");
    } else {
        for (index, photo) in view.photos().iter().enumerate() {
            let uploaded = photo
                .uploaded_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_default();
            if uploaded.is_empty() {
                println!("{:>3}. {} ({})", index + 1, photo.title, photo.url);
            } else {
                println!(
                    "{:>3}. {} ({}) uploaded {}",
                    index + 1,
                    photo.title,
                    photo.url,
                    uploaded
                );
            }
        }
    }

    if let Some(synced) = view.last_updated() {
        println!("Synced {}", format_local(synced));
    }

    if interactive && !view.photos().is_empty() {
        // Whatever ends the loop, the cursor must not stay open.
        let result = lightbox_loop(&mut view);
        view.close_lightbox();
        result?;
    }

    Ok(())
}

/// Step through photos one at a time, wrapping around both ends of the
/// list.
fn lightbox_loop(view: &mut GalleryView) -> Result<(), Box<dyn std::error::Error>> {
    view.open_lightbox(0);
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some((index, photo)) = view.current_photo() {
        println!();
        println!("{} / {}  {}", index + 1, view.photos().len(), photo.title);
        println!("    {}", photo.url);
        if let Some(uploaded_at) = &photo.uploaded_at {
            let uploaded = format_timestamp(uploaded_at);
            if !uploaded.is_empty() {
                println!("    Uploaded {}", uploaded);
            }
        }
        print!("[n]ext, [p]rev, [q]uit, or a number > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match line?.trim() {
            "" | "n" => view.next_photo(),
            "p" => view.prev_photo(),
            "q" => break,
            other => {
                let jumped = other
                    .parse::<usize>()
                    .ok()
                    .filter(|position| *position >= 1)
                    .map(|position| view.open_lightbox(position - 1))
                    .unwrap_or(false);
                if !jumped {
                    println!("No photo there.");
                }
            }
        }
    }

    Ok(())
}
