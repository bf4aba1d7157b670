//! niio - inspect neuroimaging data files from the terminal.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use niio::{load, load_surf, ArraySummary, DatasetSelector, LoadOptions, Loaded, SurfaceSource};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "niio")]
#[command(about = "Load a neuroimaging data file and summarize its contents", long_about = None)]
struct Args {
    /// Path to a .mat, .gii, .h5 or .p file (or a surface with --surface)
    file: PathBuf,

    /// Dataset or variable name to extract (repeatable for HDF5)
    #[arg(long = "dataset", conflicts_with = "indices")]
    datasets: Vec<String>,

    /// GIFTI data-array index to extract (repeatable, sets column order)
    #[arg(long = "index")]
    indices: Vec<usize>,

    /// HDF5 group containing the datasets
    #[arg(long)]
    group: Option<String>,

    /// Return nothing instead of failing when a named MATLAB variable is missing
    #[arg(long)]
    legacy_missing_key: bool,

    /// Read the file as a triangulated surface mesh
    #[arg(long, value_enum)]
    surface: Option<SurfaceKind>,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SurfaceKind {
    Gifti,
    Freesurfer,
}

impl From<SurfaceKind> for SurfaceSource {
    fn from(kind: SurfaceKind) -> Self {
        match kind {
            SurfaceKind::Gifti => SurfaceSource::Gifti,
            SurfaceKind::Freesurfer => SurfaceSource::FreeSurfer,
        }
    }
}

impl Args {
    fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions::new().legacy_missing_key(self.legacy_missing_key);
        options.datasets = match (self.datasets.as_slice(), self.indices.as_slice()) {
            ([], []) => None,
            ([name], []) => Some(DatasetSelector::Name(name.clone())),
            (names, []) => Some(DatasetSelector::Names(names.to_vec())),
            (_, [index]) => Some(DatasetSelector::Index(*index)),
            (_, indices) => Some(DatasetSelector::Indices(indices.to_vec())),
        };
        options.group = self.group.clone();
        options
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(log_file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting niio");
    }

    if let Some(kind) = args.surface {
        let surface = load_surf(&args.file, kind)
            .with_context(|| format!("Failed to load surface {}", args.file.display()))?;
        println!("{}", args.file.display());
        println!(
            "  vertices: {}",
            ArraySummary::of(&surface.vertices.clone().into_dyn())
        );
        println!(
            "  faces: {}",
            ArraySummary::of(&surface.faces.mapv(f64::from).into_dyn())
        );
        return Ok(());
    }

    let loaded = load(&args.file, &args.load_options())
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    println!("{} ({})", args.file.display(), loaded.kind());
    match loaded {
        Loaded::Array(array) => println!("  {}", ArraySummary::of(&array)),
        Loaded::Mapping(map) => {
            for (name, array) in &map {
                println!("  {}: {}", name, ArraySummary::of(array));
            }
        }
        Loaded::Object(value) => println!("  {:?}", value),
        Loaded::Empty => println!("  <nothing>"),
    }

    if args.log.is_some() {
        tracing::info!("niio exited");
    }

    Ok(())
}
