use clap::Parser;
use dbscan2d::cluster::{cluster, ClusterablePoint};
use dbscan2d::io::read_points;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Density-based clustering over a file of 2D points.
#[derive(Parser, Debug)]
#[command(name = "dbscan2d", about = "Cluster a file of 2D points")]
struct Cli {
    /// Path to a text file of "x, y" pairs, one per line.
    input: PathBuf,

    /// Neighborhood radius.
    #[arg(long, default_value_t = 0.5)]
    eps: f64,

    /// Minimum weighted neighbor count to seed a cluster.
    #[arg(long = "min-pts", default_value_t = 4)]
    min_pts: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let raw = read_points(&cli.input)?;
    info!(count = raw.len(), "read points");

    let mut points: Vec<ClusterablePoint> =
        raw.into_iter().map(ClusterablePoint::new).collect();

    let cluster_count = cluster(&mut points, cli.eps, cli.min_pts)?;
    info!(cluster_count, "clustering finished");

    let mut sizes: BTreeMap<u64, usize> = BTreeMap::new();
    for p in &points {
        *sizes.entry(p.cluster_id).or_insert(0) += 1;
    }
    for cid in 1..=cluster_count {
        let count = sizes.get(&cid).copied().unwrap_or(0);
        println!("cluster {cid}: {count} points");
    }

    Ok(())
}
