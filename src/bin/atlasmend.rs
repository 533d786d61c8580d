use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "atlasmend", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Re-seat a generated 3x3 atlas PNG.
    Process(ProcessArgs),
    /// Pack a processed PNG into the binary texture framing.
    Pack(PackArgs),
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Input atlas PNG (must be 1024x1024).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Alignment mode.
    #[arg(long, value_enum, default_value_t = ModeChoice::Icon)]
    mode: ModeChoice,

    /// Write a JSON processing report here.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output texture blob path.
    #[arg(long)]
    out: PathBuf,

    /// Target pixel format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Rgba)]
    format: FormatChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Icon,
    Generic,
    Silhouette,
}

impl From<ModeChoice> for atlasmend::Mode {
    fn from(value: ModeChoice) -> Self {
        match value {
            ModeChoice::Icon => atlasmend::Mode::Icon,
            ModeChoice::Generic => atlasmend::Mode::Generic,
            ModeChoice::Silhouette => atlasmend::Mode::Silhouette,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Luminance,
    LuminanceAlpha,
    Rgb,
    Rgba,
}

impl From<FormatChoice> for atlasmend::PixelFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Luminance => atlasmend::PixelFormat::Luminance,
            FormatChoice::LuminanceAlpha => atlasmend::PixelFormat::LuminanceAlpha,
            FormatChoice::Rgb => atlasmend::PixelFormat::Rgb,
            FormatChoice::Rgba => atlasmend::PixelFormat::Rgba,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Process(args) => cmd_process(args),
        Command::Pack(args) => cmd_pack(args),
    }
}

fn read_raster(path: &Path) -> anyhow::Result<atlasmend::Raster> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(atlasmend::decode_png(&bytes)?)
}

fn write_with_parents(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_process(args: ProcessArgs) -> anyhow::Result<()> {
    let input = read_raster(&args.in_path)?;
    let (output, stats) = atlasmend::process_atlas_with_stats(&input, args.mode.into())?;

    write_with_parents(&args.out, &atlasmend::encode_png(&output)?)?;

    if let Some(report_path) = &args.report {
        let report = serde_json::to_vec_pretty(&stats).context("serialize report")?;
        write_with_parents(report_path, &report)?;
        eprintln!("wrote {}", report_path.display());
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let input = read_raster(&args.in_path)?;
    let blob = atlasmend::encode_texture(&input, args.format.into())?;
    write_with_parents(&args.out, &blob)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
