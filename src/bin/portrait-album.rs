use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use portrait_album::{
    AlbumCompositor, AlbumConfig, AlbumInput, EncodedImage, GeminiConfig, GeminiStyleService,
    Orchestrator, OrchestratorConfig, ParsedKey, SessionState, StyleCatalog, compute_grid_layout,
};

#[derive(Parser, Debug)]
#[command(name = "portrait-album", version)]
struct Cli {
    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Restyle a portrait with the Gemini image API and save every variation.
    Generate(GenerateArgs),
    /// Compose existing `<style>_<variation>` images into an album JPEG.
    Compose(ComposeArgs),
    /// Print the computed grid layout as JSON.
    Layout(LayoutArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Source portrait image.
    #[arg(long)]
    portrait: PathBuf,

    /// Directory for the styled images (and `album.jpg`).
    #[arg(long)]
    out_dir: PathBuf,

    /// Style catalog JSON; the built-in catalog is used when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Gemini model name.
    #[arg(long)]
    model: Option<String>,

    /// Extra rounds for failed slots.
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Also compose `album.jpg` once every slot is done.
    #[arg(long, default_value_t = false)]
    album: bool,

    /// Album config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Concurrent restyle requests.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct ComposeArgs {
    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    /// Album config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Take every image file in this directory; the file stem is the key.
    #[arg(long, conflicts_with = "images", required_unless_present = "images")]
    dir: Option<PathBuf>,

    /// One entry as `KEY=PATH`, e.g. `LinkedIn_1=shots/a.png`. Repeatable.
    #[arg(long = "image", value_name = "KEY=PATH", value_parser = parse_key_path)]
    images: Vec<(String, PathBuf)>,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Album config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Compose(args) => cmd_compose(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_key_path(s: &str) -> Result<(String, PathBuf), String> {
    let (key, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=PATH, got '{s}'"))?;
    ParsedKey::parse(key).map_err(|e| e.to_string())?;
    if path.is_empty() {
        return Err(format!("empty path for key '{key}'"));
    }
    Ok((key.to_string(), PathBuf::from(path)))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AlbumConfig> {
    match path {
        Some(p) => Ok(AlbumConfig::from_path(p)?),
        None => Ok(AlbumConfig::default()),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let portrait = EncodedImage::from_path(&args.portrait)?;
    let catalog = match &args.catalog {
        Some(p) => StyleCatalog::from_path(p)?,
        None => StyleCatalog::default(),
    };
    // Fail on a bad album config before spending any API calls.
    let compositor = if args.album {
        Some(AlbumCompositor::new(load_config(args.config.as_deref())?)?)
    } else {
        None
    };

    let mut gemini = GeminiConfig::from_env();
    if let Some(model) = args.model {
        gemini.model = model;
    }
    let orch = Orchestrator::new(
        GeminiStyleService::new(gemini)?,
        catalog,
        OrchestratorConfig {
            threads: args.threads,
        },
    )?;

    let report = |s: &SessionState| {
        let p = s.progress();
        tracing::debug!(done = p.done, failed = p.failed, pending = p.pending, "progress");
    };
    let mut state = orch.generate_all(&SessionState::new(), &portrait, report);
    for round in 1..=args.retries {
        if state.progress().failed == 0 {
            break;
        }
        tracing::info!(round, "retrying failed slots");
        state = orch.regenerate_failed(&state, &portrait, report);
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for slot in state.slots() {
        if let Some(img) = slot.status.image() {
            let path = args
                .out_dir
                .join(format!("{}.{}", slot.id.key(), img.extension()));
            std::fs::write(&path, img.bytes())
                .with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        } else if let Some(msg) = slot.status.error_message() {
            eprintln!("failed {}: {msg}", slot.id);
        }
    }

    if let Some(compositor) = compositor {
        let album = orch.compose_album(&state, &compositor)?;
        let path = args.out_dir.join("album.jpg");
        album.write_to(&path)?;
        eprintln!("wrote {}", path.display());
        return Ok(());
    }

    let failed = state.progress().failed;
    if failed > 0 {
        anyhow::bail!("{failed} slot(s) failed");
    }
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let input = match &args.dir {
        Some(dir) => input_from_dir(dir, &args.out)?,
        None => {
            let mut input = AlbumInput::new();
            for (key, path) in &args.images {
                input.insert(key.clone(), EncodedImage::from_path(path)?);
            }
            input
        }
    };

    let album = AlbumCompositor::new(config)?.compose(&input)?;
    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    album.write_to(&args.out)?;
    eprintln!("wrote {} ({} images)", args.out.display(), album.captions.len());
    Ok(())
}

/// Every image file in `dir` whose stem is a valid key, skipping `out`.
fn input_from_dir(dir: &Path, out: &Path) -> anyhow::Result<AlbumInput> {
    let mut input = AlbumInput::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read dir '{}'", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("read dir '{}'", dir.display()))?
            .path();
        if !path.is_file() || same_file(&path, out) {
            continue;
        }
        if image::ImageFormat::from_path(&path).is_err() {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if ParsedKey::parse(stem).is_err() {
            tracing::warn!(path = %path.display(), "skipping file without a <style>_<variation> name");
            continue;
        }
        input.insert(stem, EncodedImage::from_path(&path)?);
    }
    Ok(input)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    config.validate()?;
    let layout = compute_grid_layout(&config.grid_spec())?;
    let json = serde_json::to_string_pretty(&layout).context("serialize layout")?;
    println!("{json}");
    Ok(())
}
