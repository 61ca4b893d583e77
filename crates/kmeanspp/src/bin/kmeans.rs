use clap::{ArgAction, Parser, ValueEnum};
use kmeanspp::{Config, EmptyClusterPolicy, Init};
use snafu::{ResultExt, Whatever};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Copy, Clone, ValueEnum)]
enum InitArg {
    /// Use the first K observations
    FirstK,
    /// k-means++ with a fixed seed, prints the chosen indices first
    PlusPlus,
}

#[derive(Copy, Clone, ValueEnum)]
enum EmptyClusterArg {
    Fail,
    KeepPrevious,
}

/// Cluster comma-separated observations into K groups and print the centroids
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Number of clusters
    k: usize,
    /// Number of observations
    n: usize,
    /// Number of dimensions
    d: usize,
    /// Maximum number of iterations
    max_iter: usize,
    /// CSV file with one observation per line, stdin if omitted
    input: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "first-k")]
    init: InitArg,

    #[arg(long, value_enum, default_value = "fail")]
    empty_cluster: EmptyClusterArg,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[snafu::report]
fn main() -> Result<(), Whatever> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let init = match args.init {
        InitArg::FirstK => Init::FirstK,
        InitArg::PlusPlus => Init::PlusPlus,
    };
    let empty_cluster = match args.empty_cluster {
        EmptyClusterArg::Fail => EmptyClusterPolicy::Fail,
        EmptyClusterArg::KeepPrevious => EmptyClusterPolicy::KeepPrevious,
    };

    let config = Config::new(args.k, args.n, args.d, args.max_iter)
        .whatever_context("invalid command line arguments")?
        .with_init(init)
        .with_empty_cluster_policy(empty_cluster);

    let points = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_whatever_context(|_| format!("cannot open {}", path.display()))?;
            kmeanspp::read_exact_points(BufReader::new(file), config.n(), config.d())
        }
        None => kmeanspp::read_exact_points(io::stdin().lock(), config.n(), config.d()),
    }
    .whatever_context("invalid input")?;
    debug!(n = points.len(), d = points.dim(), "read observations");

    let result = kmeanspp::cluster(&points, &config).whatever_context("clustering failed")?;

    let mut stdout = io::stdout().lock();
    write!(stdout, "{result}").whatever_context("cannot write the result")?;
    stdout.flush().whatever_context("cannot write the result")?;

    Ok(())
}
