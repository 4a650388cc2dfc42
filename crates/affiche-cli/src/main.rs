//! Affiche CLI - compose a campaign poster and export it.
//!
//! The campaign configuration comes from a JSON file; field values arrive
//! as flags, standing in for the form the web frontend renders. Assets
//! resolve against a local directory, fonts against their hosted locations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use futures::future::BoxFuture;
use futures::FutureExt;

use affiche::fonts::FAMILIES;
use affiche::prelude::*;

#[derive(Parser)]
#[command(name = "affiche", version, about = "Campaign poster composer and renderer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a campaign's backgrounds, sizes, languages and the font menu.
    List {
        /// Campaign configuration (JSON).
        #[arg(long)]
        campaign: PathBuf,
    },
    /// Compose the poster and write the rendered artifact.
    Render(RenderArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Campaign configuration (JSON).
    #[arg(long)]
    campaign: PathBuf,

    /// Output file; its contents match --format.
    #[arg(long, default_value = "poster.svg")]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// Background index into the campaign's background list.
    #[arg(long, default_value_t = 0)]
    background: usize,

    /// Size index into the campaign's size list.
    #[arg(long, default_value_t = 0)]
    size: usize,

    /// Language index into the campaign's language list.
    #[arg(long, default_value_t = 0)]
    language: usize,

    /// Website / social media line.
    #[arg(long, default_value = "")]
    website: String,

    /// Program information, at most two lines (use \n).
    #[arg(long = "program-info", default_value = "")]
    program_info: String,

    /// Logo image file.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Picture image file; disables the default picture.
    #[arg(long)]
    picture: Option<PathBuf>,

    /// Font family for the text slots.
    #[arg(long)]
    font: Option<String>,

    #[arg(long = "font-size")]
    font_size: Option<f32>,

    /// Directory campaign assets resolve against; defaults to the campaign
    /// file's directory.
    #[arg(long = "assets-dir")]
    assets_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    Png,
    Pdf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    match Cli::parse().command {
        Command::List { campaign } => list(&campaign),
        Command::Render(args) => render(&args).await,
    }
}

fn load_campaign(path: &Path) -> Result<Campaign> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading campaign file {}", path.display()))?;
    Campaign::from_json(&json).context("parsing campaign configuration")
}

fn list(path: &Path) -> Result<()> {
    let campaign = load_campaign(path)?;

    println!("Backgrounds:");
    for (index, background) in campaign.backgrounds.iter().enumerate() {
        println!("  [{index}] {} ({})", background.name, background.color);
    }
    println!("Sizes:");
    for (index, size) in campaign.sizes.iter().enumerate() {
        println!("  [{index}] {} - {}x{}", size.label, size.width, size.height);
    }
    if !campaign.languages.is_empty() {
        println!("Languages:");
        for (index, language) in campaign.languages.iter().enumerate() {
            println!("  [{index}] {language}");
        }
    }
    println!("Fonts:");
    for family in FAMILIES {
        println!("  {family}");
    }
    Ok(())
}

async fn render(args: &RenderArgs) -> Result<()> {
    let campaign = load_campaign(&args.campaign)?;
    let session = build_session(args)?;
    let elements = compose(&campaign, &session).context("composing the poster")?;
    let size = &campaign.sizes[session.size];

    let assets_dir = match &args.assets_dir {
        Some(dir) => dir.clone(),
        None => args
            .campaign
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let assets: Arc<dyn AssetSource> = Arc::new(CliAssets::new(assets_dir));
    let fonts = Arc::new(FontStore::new(FontCatalog::builtin(), Arc::clone(&assets)));

    let bytes = match args.format {
        Format::Svg => {
            let measurer: Arc<dyn affiche::core::text::TextMeasurer> = Arc::clone(&fonts);
            SvgRenderer::new(measurer)
                .render(size.width, size.height, &elements)
                .await?
                .to_svg()
                .into_bytes()
        }
        Format::Png => RasterRenderer::new(Arc::clone(&assets), Arc::clone(&fonts))
            .render(size.width, size.height, &elements)
            .await?
            .encode_png()?,
        Format::Pdf => PdfRenderer::new(Arc::clone(&assets), Arc::clone(&fonts))
            .render(size.width, size.height, &elements)
            .await?
            .into_bytes(),
    };

    fs::write(&args.output, bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!(
        "Rendered {} ({}x{}) to {}",
        size.label,
        size.width,
        size.height,
        args.output.display()
    );
    Ok(())
}

fn build_session(args: &RenderArgs) -> Result<Session> {
    let mut session = Session::new();
    session.background = args.background;
    session.size = args.size;
    session.language = args.language;
    session.website = args.website.clone();
    if !session.set_program_info(&args.program_info) {
        bail!("--program-info allows at most two lines");
    }
    if let Some(font) = &args.font {
        session.font_family = font.clone();
    }
    if let Some(font_size) = args.font_size {
        session.font_size = font_size;
    }
    if let Some(logo) = &args.logo {
        session.logo = Some(read_image(logo)?);
    }
    if let Some(picture) = &args.picture {
        session.set_use_default_picture(false);
        session.picture = Some(read_image(picture)?);
    }
    Ok(session)
}

fn read_image(path: &Path) -> Result<ImageSource> {
    let bytes =
        fs::read(path).with_context(|| format!("reading image file {}", path.display()))?;
    Ok(ImageSource::from_bytes(bytes))
}

/// Scheme-dispatching asset source: hosted font URLs go over HTTP, campaign
/// assets resolve under the assets directory.
struct CliAssets {
    files: DirectoryAssets,
    http: reqwest::Client,
}

impl CliAssets {
    fn new(root: PathBuf) -> Self {
        Self {
            files: DirectoryAssets::new(root),
            http: reqwest::Client::new(),
        }
    }
}

impl AssetSource for CliAssets {
    fn fetch(&self, location: &str) -> BoxFuture<'_, Result<Vec<u8>, AssetError>> {
        let location = location.to_owned();
        async move {
            if location.starts_with("http://") || location.starts_with("https://") {
                let response =
                    self.http
                        .get(&location)
                        .send()
                        .await
                        .map_err(|err| AssetError::Io {
                            location: location.clone(),
                            reason: err.to_string(),
                        })?;
                if !response.status().is_success() {
                    return Err(AssetError::Io {
                        location,
                        reason: format!("bad response code: {}", response.status()),
                    });
                }
                let bytes = response.bytes().await.map_err(|err| AssetError::Io {
                    location: location.clone(),
                    reason: err.to_string(),
                })?;
                Ok(bytes.to_vec())
            } else {
                self.files.fetch(&location).await
            }
        }
        .boxed()
    }
}
