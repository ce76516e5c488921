use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doc_model::{AnnotationSet, PageIndicator};
use futures::executor::block_on;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use storage::AnnotationStore;
use viewer_core::{
    NavigationOutcome, PagedAnnotationViewer, PlaceholderDocument, PlaceholderProvider,
    ViewerConfig,
};

pub mod raster;
pub mod script;

use raster::RasterSurface;

const DEMO_DOCUMENT: &str = "demo.pdf";
const DATA_DIR_ENV: &str = "MARKUP_DATA_DIR";

type Viewer = PagedAnnotationViewer<PlaceholderDocument, RasterSurface>;

#[derive(Debug, Parser)]
#[command(name = "markup-cli")]
#[command(about = "Classroom PDF markup viewer, headless")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args)]
struct StoreArgs {
    /// Annotation store directory. Defaults to $MARKUP_DATA_DIR, then the
    /// platform data directory.
    #[arg(long, value_name = "DIR")]
    store: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a gesture script against the demo document and print the result.
    Replay {
        #[arg(long, value_name = "FILE")]
        script: PathBuf,
        #[arg(long, default_value_t = 5)]
        pages: u32,
        /// Load annotations for this submission first and save them after.
        #[arg(long)]
        submission: Option<String>,
        #[command(flatten)]
        store: StoreArgs,
        /// Viewer configuration JSON.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        #[arg(long)]
        read_only: bool,
        /// Write the final page with its annotations as PNG.
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },
    /// Render one page of the demo document with stored annotations.
    Render {
        #[arg(long, default_value_t = 5)]
        pages: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        submission: Option<String>,
        #[command(flatten)]
        store: StoreArgs,
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Print the stored annotations of a submission.
    Show {
        #[arg(long)]
        submission: String,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// List submissions with stored annotations.
    List {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Serialize)]
struct ReplayOutput<'a> {
    page: PageIndicator,
    steps: usize,
    ignored_navigations: usize,
    failed_renders: usize,
    annotations: &'a AnnotationSet,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.verbose);

    match cli.command {
        Commands::Replay { script, pages, submission, store, config, read_only, png } => {
            run_replay(ReplayArgs {
                script: &script,
                pages,
                submission: submission.as_deref(),
                store: &store,
                config: config.as_deref(),
                read_only,
                png: png.as_deref(),
            })
        }
        Commands::Render { pages, page, submission, store, output } => {
            run_render(pages, page, submission.as_deref(), &store, &output)
        }
        Commands::Show { submission, store } => run_show(&submission, &store),
        Commands::List { store } => run_list(&store),
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init();
}

struct ReplayArgs<'a> {
    script: &'a Path,
    pages: u32,
    submission: Option<&'a str>,
    store: &'a StoreArgs,
    config: Option<&'a Path>,
    read_only: bool,
    png: Option<&'a Path>,
}

fn run_replay(args: ReplayArgs<'_>) -> Result<()> {
    let source = fs::read_to_string(args.script)
        .with_context(|| format!("failed to read script {}", args.script.display()))?;
    let steps = script::parse(&source).context("failed to parse script")?;

    let mut config = match args.config {
        Some(path) => load_config(path)?,
        None => ViewerConfig::default(),
    };
    if args.read_only {
        config.editable = false;
    }

    let mut viewer = open_demo(config, args.pages)?;

    let store = match args.submission {
        Some(submission) => {
            let store = open_store(args.store)?;
            let annotations = store
                .load(submission)
                .with_context(|| format!("failed to load annotations for {submission}"))?;
            viewer.set_annotations(annotations);
            Some((store, submission))
        }
        None => None,
    };

    let summary = block_on(script::run(&mut viewer, &steps));

    if let Some((store, submission)) = store {
        store
            .save(submission, viewer.get_annotations())
            .with_context(|| format!("failed to save annotations for {submission}"))?;
    }

    if let Some(png) = args.png {
        write_png(&viewer, png)?;
    }

    let payload = ReplayOutput {
        page: viewer.page_indicator(),
        steps: summary.steps,
        ignored_navigations: summary.ignored_navigations,
        failed_renders: summary.failed_renders,
        annotations: viewer.get_annotations(),
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}

fn run_render(
    pages: u32,
    page: u32,
    submission: Option<&str>,
    store: &StoreArgs,
    output: &Path,
) -> Result<()> {
    let mut viewer = open_demo(ViewerConfig::read_only(), pages)?;

    if let Some(submission) = submission {
        let annotations = open_store(store)?
            .load(submission)
            .with_context(|| format!("failed to load annotations for {submission}"))?;
        viewer.set_annotations(annotations);
    }

    match block_on(viewer.go_to_page(page)).context("failed to render page")? {
        NavigationOutcome::Rendered(_) => {}
        NavigationOutcome::Ignored(err) => anyhow::bail!("{err}"),
        NavigationOutcome::Superseded { page } => anyhow::bail!("render of page {page} was superseded"),
    }

    write_png(&viewer, output)?;
    println!("{}", output.display());
    Ok(())
}

fn run_show(submission: &str, store: &StoreArgs) -> Result<()> {
    let annotations = open_store(store)?
        .load(submission)
        .with_context(|| format!("failed to load annotations for {submission}"))?;

    println!("{}", serde_json::to_string_pretty(&annotations)?);
    Ok(())
}

fn run_list(store: &StoreArgs) -> Result<()> {
    for submission in open_store(store)?.list().context("failed to list submissions")? {
        println!("{submission}");
    }
    Ok(())
}

fn open_demo(config: ViewerConfig, pages: u32) -> Result<Viewer> {
    let provider = PlaceholderProvider::new().with_document(DEMO_DOCUMENT, pages);
    let mut viewer = Viewer::new(config);

    block_on(viewer.load_from(&provider, DEMO_DOCUMENT)).context("failed to open document")?;
    Ok(viewer)
}

fn open_store(args: &StoreArgs) -> Result<AnnotationStore> {
    if let Some(dir) = &args.store {
        return Ok(AnnotationStore::with_root(dir));
    }

    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(AnnotationStore::with_root(PathBuf::from(dir)));
    }

    AnnotationStore::from_default_project().context("failed to locate annotation store")
}

fn load_config(path: &Path) -> Result<ViewerConfig> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("invalid config {}", path.display()))
}

fn write_png(viewer: &Viewer, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let image = RasterSurface::composite(viewer.base_surface(), viewer.overlay_surface());
    image
        .save(output)
        .with_context(|| format!("failed to write image to {}", output.display()))?;
    Ok(())
}
