use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use image::DynamicImage;
use lookfx::{BlendMode, Chain, Effect, ExecOpts, Look, LookFile, Range, Registry, Stage};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lookfx", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the names of the built-in looks.
    List,
    /// Apply a look to an image.
    Apply(ApplyArgs),
    /// Blend two images of equal size.
    Blend(BlendArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image; the format follows the extension.
    #[arg(long)]
    out: PathBuf,

    /// Built-in look name (see `lookfx list`).
    #[arg(long, conflicts_with = "look_file", required_unless_present = "look_file")]
    look: Option<String>,

    /// JSON look file.
    #[arg(long)]
    look_file: Option<PathBuf>,

    /// Mix factor between the input (0) and the full look (1).
    #[arg(long, default_value_t = 1.0)]
    amount: f32,

    /// Restrict the look to `x,y,width,height`.
    #[arg(long, value_parser = Range::parse)]
    range: Option<Range>,

    /// Run on a single thread.
    #[arg(long, default_value_t = false)]
    serial: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct BlendArgs {
    /// Primary image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Second operand; converted to the primary image's layout.
    #[arg(long = "with")]
    with_path: PathBuf,

    /// Output image.
    #[arg(long)]
    out: PathBuf,

    /// Blend mode, e.g. `multiply`, `screen`, `hard-light`.
    #[arg(long, default_value = "normal")]
    mode: BlendMode,

    /// Restrict the blend to `x,y,width,height`.
    #[arg(long, value_parser = Range::parse)]
    range: Option<Range>,

    /// Blend alpha too instead of keeping the primary image's alpha.
    #[arg(long, default_value_t = false)]
    use_alpha: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::List => cmd_list(),
        Command::Apply(args) => cmd_apply(args),
        Command::Blend(args) => cmd_blend(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_list() -> anyhow::Result<()> {
    for name in Registry::builtin().names() {
        println!("{name}");
    }
    Ok(())
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let registry = Registry::builtin();
    let look = match (&args.look, &args.look_file) {
        (Some(name), _) => registry.get(name)?,
        (None, Some(path)) => load_look_file(path, &registry)?,
        (None, None) => anyhow::bail!("one of --look or --look-file is required"),
    };

    let mut chain = Chain::new();
    chain.push(Stage::nested(look.chain.with_range(args.range), args.amount));
    let opts = ExecOpts {
        parallel: !args.serial,
        threads: args.threads,
    };

    let mut img = open_image(&args.in_path)?;
    lookfx::process(&mut img, |buf| chain.run(buf, &opts))
        .with_context(|| format!("apply look '{}'", look.name))?;
    save_image(&img, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_blend(args: BlendArgs) -> anyhow::Result<()> {
    let mut base = open_image(&args.in_path)?;
    let other = open_image(&args.with_path)?;
    let other = match base {
        DynamicImage::ImageRgb8(_) => DynamicImage::ImageRgb8(other.to_rgb8()),
        _ => DynamicImage::ImageRgba8(other.to_rgba8()),
    };

    let overlay = lookfx::acquire(&other)?;
    let mut effect = Effect::bitmap_blend(overlay, args.mode).with_range(args.range);
    if args.use_alpha {
        effect = effect.with_alpha();
    }

    lookfx::process(&mut base, |buf| effect.apply(buf))
        .with_context(|| format!("blend '{}' with mode {}", args.with_path.display(), args.mode))?;
    save_image(&base, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn load_look_file(path: &Path, registry: &Registry) -> anyhow::Result<Look> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read look file '{}'", path.display()))?;
    let file: LookFile = serde_json::from_str(&text)
        .with_context(|| format!("parse look file '{}'", path.display()))?;
    let mut look = file.resolve(registry)?;
    if file.name.is_none()
        && let Some(stem) = path.file_stem()
    {
        look.name = stem.to_string_lossy().into_owned();
    }
    Ok(look)
}

/// Decode `path`, converting anything that is not 8-bit RGB/RGBA to RGBA8.
fn open_image(path: &Path) -> anyhow::Result<DynamicImage> {
    let img = image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
    Ok(match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
        other => DynamicImage::ImageRgba8(other.to_rgba8()),
    })
}

fn save_image(img: &DynamicImage, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save(out)
        .with_context(|| format!("write image '{}'", out.display()))
}
