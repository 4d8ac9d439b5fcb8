//! CLI interface for element-embeddings
//!
//! Provides command-line interface for:
//! - Featurising chemical formulas into pooled feature vectors
//! - Measuring distance or correlation between two elements
//! - Tabulating a metric over every element pair
//! - Inspecting and exporting an embedding preset

use crate::config::FeaturiserConfig;
use crate::embedding::export::ExportFormat;
use crate::embedding::{DirectoryPresets, EmbeddingStore, Metric};
use crate::featurise::featurise;
use crate::periodic::MendeleevTable;
use crate::pooling::PoolingStat;
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "element-embeddings")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compositional feature vectors and pairwise metrics from elemental embeddings")]
#[command(
    long_about = "element-embeddings - featurise chemical compositions with elemental embeddings\n\n\
    Each element is represented by a fixed-length vector taken from a named preset\n\
    (magpie, mat2vec, megnet16, ...). A formula is parsed, normalised to fractional\n\
    abundances and pooled into one feature vector per composition.\n\n\
    Key Features:\n\
    • Nested formulas with brackets and decimal counts\n\
    • Eight pooling statistics, concatenated in the order requested\n\
    • Distances and Pearson correlation between element vectors\n\
    • Pair tables ordered by Mendeleev number\n\n\
    Examples:\n\
      element-embeddings featurise -d ./data -p magpie -s mean,variance Fe2O3 CsPbI3\n\
      element-embeddings distance -d ./data -p mat2vec -m euclidean Li Na\n\
      element-embeddings pairs -d ./data -p megnet16 -m pearson --pivot"
)]
#[command(author = "Element Embeddings Contributors")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to find the embedding preset.
#[derive(Args, Clone, Debug)]
pub struct StoreArgs {
    /// Directory holding preset files (<preset>.json or <preset>.csv)
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Embedding preset to load [default: magpie]
    #[arg(short, long, value_name = "NAME")]
    pub preset: Option<String>,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl StoreArgs {
    /// Configuration with file values overridden by flags.
    fn resolve(&self) -> anyhow::Result<FeaturiserConfig> {
        let mut config = match &self.config {
            Some(path) => FeaturiserConfig::from_json_file(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => FeaturiserConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(preset) = &self.preset {
            config.preset = preset.clone();
        }
        Ok(config)
    }
}

fn load_store(config: &FeaturiserConfig) -> anyhow::Result<EmbeddingStore> {
    let resolver = DirectoryPresets::new(config.data_dir());
    EmbeddingStore::load(&config.preset, &resolver).with_context(|| {
        format!(
            "loading preset {:?} from {}",
            config.preset,
            config.data_dir().display()
        )
    })
}

#[derive(Subcommand)]
pub enum Commands {
    /// Turn chemical formulas into pooled feature vectors
    #[command(
        long_about = "Turn chemical formulas into pooled feature vectors\n\n\
        Every formula is parsed, normalised and pooled against the preset's element\n\
        vectors. One JSON object per formula is written to stdout with its input index,\n\
        formula and features. Formulas that fail are reported on stderr and skipped,\n\
        unless --strict is given, in which case the first failure aborts the run.\n\n\
        Statistics: sum, mean, variance, minpool, maxpool, range, geometric_mean,\n\
        harmonic_mean. The feature vector holds one block per statistic, in the order given.\n\n\
        Example:\n\
          element-embeddings featurise -d ./data -p magpie -s mean,range Li7La3ZrO12\n\
          element-embeddings featurise --config run.json --input formulas.txt"
    )]
    Featurise {
        #[command(flatten)]
        store: StoreArgs,

        /// Pooling statistics, comma separated [default: mean]
        #[arg(short, long, value_delimiter = ',', value_name = "STAT")]
        stats: Option<Vec<String>>,

        /// Pool with all eight statistics
        #[arg(long, conflicts_with = "stats")]
        all_stats: bool,

        /// Abort on the first formula that cannot be featurised
        #[arg(long)]
        strict: bool,

        /// Featurise on the calling thread only
        #[arg(long)]
        sequential: bool,

        /// File with one formula per line, read in addition to FORMULA arguments
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Formulas to featurise
        #[arg(value_name = "FORMULA")]
        formulas: Vec<String>,
    },

    /// Distance or correlation between two elements
    #[command(
        long_about = "Distance or correlation between two elements\n\n\
        Metrics:\n\
        • euclidean, manhattan, chebyshev: distances, 0 for identical vectors\n\
        • pearson: correlation in [-1, 1]\n\n\
        Example:\n\
          element-embeddings distance -d ./data -p magpie -m manhattan Fe Co"
    )]
    Distance {
        #[command(flatten)]
        store: StoreArgs,

        /// Metric to compute
        #[arg(short, long, default_value = "euclidean", value_name = "METRIC")]
        metric: String,

        /// First element
        a: String,

        /// Second element
        b: String,
    },

    /// Tabulate a metric over every pair of elements as CSV
    #[command(
        long_about = "Tabulate a metric over every pair of elements as CSV\n\n\
        Each unordered pair is computed once and written in both directions, with the\n\
        Mendeleev number of each element. With --pivot the table is reshaped into a\n\
        square matrix whose rows and columns are ordered by Mendeleev number. With\n\
        --all-metrics the table holds euclid_dist, reciprocal_euclid_dist and\n\
        pearson_corr columns instead of a single metric.\n\n\
        Example:\n\
          element-embeddings pairs -d ./data -p mat2vec -m pearson --pivot > pearson.csv\n\
          element-embeddings pairs -d ./data -p magpie --all-metrics > correlations.csv"
    )]
    Pairs {
        #[command(flatten)]
        store: StoreArgs,

        /// Metric to compute
        #[arg(short, long, default_value = "euclidean", value_name = "METRIC")]
        metric: String,

        /// Reshape into a square matrix ordered by Mendeleev number
        #[arg(long)]
        pivot: bool,

        /// Write distance, reciprocal distance and correlation together
        #[arg(long, conflicts_with_all = ["pivot", "metric"])]
        all_metrics: bool,
    },

    /// Show a preset's name, dimension, references and elements
    Info {
        #[command(flatten)]
        store: StoreArgs,

        /// List the elements as well
        #[arg(short, long)]
        elements: bool,
    },

    /// Write a preset out as JSON or CSV
    Export {
        #[command(flatten)]
        store: StoreArgs,

        /// Output format: json or csv
        #[arg(short, long, default_value = "json", value_name = "FORMAT")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Elements to leave out
        #[arg(long, value_delimiter = ',', value_name = "ELEMENT")]
        exclude: Vec<String>,
    },
}

/// Install the stderr log subscriber.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when run() is called in-process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Featurise {
            store,
            stats,
            all_stats,
            strict,
            sequential,
            input,
            mut formulas,
        } => {
            let mut config = store.resolve()?;
            if all_stats {
                config.stats = PoolingStat::ALL.to_vec();
            } else if let Some(names) = stats {
                config.stats = PoolingStat::parse_list(&names)?;
            }
            config.strict |= strict;
            config.parallel &= !sequential;

            if let Some(path) = input {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("reading formulas from {}", path.display()))?;
                formulas.extend(
                    text.lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(String::from),
                );
            }
            if formulas.is_empty() {
                bail!("no formulas given");
            }

            let embeddings = load_store(&config)?;
            let result = featurise(&formulas, &embeddings, &config.stats, &config.batch_options())?;

            for row in &result.rows {
                println!("{}", serde_json::to_string(row)?);
            }
            for failure in &result.failures {
                eprintln!(
                    "skipped #{} {:?} [{}]: {}",
                    failure.index,
                    failure.formula,
                    failure.kind(),
                    failure.error
                );
            }
            Ok(())
        }

        Commands::Distance { store, metric, a, b } => {
            let config = store.resolve()?;
            let metric: Metric = metric.parse()?;
            let embeddings = load_store(&config)?;
            let value = embeddings.metric_value(&a, &b, metric)?;
            println!("{value}");
            Ok(())
        }

        Commands::Pairs {
            store,
            metric,
            pivot,
            all_metrics,
        } => {
            let config = store.resolve()?;
            let metric: Metric = metric.parse()?;
            let embeddings = load_store(&config)?;
            let csv = if all_metrics {
                embeddings.correlation_table(&MendeleevTable)?.to_csv()
            } else if pivot {
                embeddings.pivot_table(metric, &MendeleevTable)?.to_csv()
            } else {
                embeddings.all_pairs_table(metric, &MendeleevTable)?.to_csv()
            };
            print!("{csv}");
            Ok(())
        }

        Commands::Info { store, elements } => {
            let config = store.resolve()?;
            let embeddings = load_store(&config)?;
            println!("Preset: {}", embeddings.name());
            println!("Dimension: {}", embeddings.dim());
            println!("Elements: {}", embeddings.len());
            for reference in embeddings.citation() {
                println!("Cite: {reference}");
            }
            if elements {
                println!("{}", embeddings.element_list().join(" "));
            }
            Ok(())
        }

        Commands::Export {
            store,
            format,
            output,
            exclude,
        } => {
            let config = store.resolve()?;
            let format: ExportFormat = format.parse()?;
            let mut embeddings = load_store(&config)?;
            if !exclude.is_empty() {
                embeddings = embeddings.without(&exclude)?;
            }
            let text = embeddings.export(format)?;
            match output {
                Some(path) => fs::write(&path, text)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{text}"),
            }
            Ok(())
        }
    }
}
