//! cotsmooth CLI - cotangent mesh smoothing from the command line.
//!
//! Usage: cotsmooth <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `cotsmooth --help` for available commands. Set `RUST_LOG=debug` for
//! a per-run summary, `RUST_LOG=trace` for per-iteration displacement.

use std::io::Write;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use cotsmooth::algo::smooth::{self, PositionSnapshot, SmoothMode, SmoothOptions};
use cotsmooth::algo::Progress;
use cotsmooth::io;
use cotsmooth::mesh::{HalfEdgeMesh, Neighborhood};

#[derive(Parser)]
#[command(name = "cotsmooth")]
#[command(author, version, about = "Cotangent Laplacian / Taubin mesh smoothing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Smooth a mesh
    Smooth {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Smoothing mode
        #[arg(short, long, value_enum, default_value = "laplace")]
        mode: Mode,

        /// Number of iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Laplace step coefficient (0.0 to 1.0)
        #[arg(short, long, default_value = "0.33")]
        lambda: f64,

        /// Taubin step coefficient (-1.0 to 0.0)
        #[arg(long, default_value = "-0.34", allow_hyphen_values = true)]
        mu: f64,

        /// Scales the iteration count (0.0 to 1.0)
        #[arg(short, long, default_value = "1.0")]
        envelope: f64,

        /// Only smooth these vertices, e.g. "0-99,120"
        #[arg(long, value_parser = parse_selection)]
        select: Option<Selection>,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Cotangent-weighted Laplacian smoothing
    Laplace,
    /// Laplace step followed by a negative Taubin step (shrinkage-resistant)
    Taubin,
}

impl From<Mode> for SmoothMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Laplace => SmoothMode::Laplace,
            Mode::Taubin => SmoothMode::Taubin,
        }
    }
}

/// Vertex indices given on the command line, as inclusive ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Selection(Vec<RangeInclusive<usize>>);

impl Selection {
    /// Expand to vertex indices once the mesh size is known.
    fn indices(&self, num_vertices: usize) -> Result<impl Iterator<Item = usize> + '_, String> {
        if let Some(range) = self.0.iter().find(|r| *r.end() >= num_vertices) {
            return Err(format!(
                "selected vertex {} is out of range (mesh has {} vertices)",
                range.end(),
                num_vertices
            ));
        }
        Ok(self.0.iter().flat_map(|r| r.clone()))
    }
}

/// Parse comma-separated indices and inclusive ranges, e.g. `3,10-12`.
fn parse_selection(s: &str) -> Result<Selection, String> {
    let mut ranges = Vec::new();

    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let parse = |t: &str| {
            t.trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid vertex index '{}': {}", t.trim(), e))
        };

        match part.split_once('-') {
            Some((lo, hi)) => {
                let (lo, hi) = (parse(lo)?, parse(hi)?);
                if lo > hi {
                    return Err(format!("empty range '{}'", part));
                }
                ranges.push(lo..=hi);
            }
            None => {
                let i = parse(part)?;
                ranges.push(i..=i);
            }
        }
    }

    if ranges.is_empty() {
        return Err("selection is empty".to_string());
    }

    Ok(Selection(ranges))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Smooth {
            input,
            output,
            mode,
            iterations,
            lambda,
            mu,
            envelope,
            select,
            sequential,
        } => {
            let options = SmoothOptions::default()
                .with_mode(mode.into())
                .with_iterations(iterations)
                .with_lambda(lambda)
                .with_mu(mu)
                .with_envelope(envelope)
                .with_parallel(!sequential);
            cmd_smooth(&input, &output, &options, select)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that draws a bar on stderr.
fn create_progress() -> Progress {
    let last_percent = Arc::new(AtomicUsize::new(usize::MAX));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Redraw only when the rounded percentage changes.
        if last_percent.swap(percent, Ordering::Relaxed) == percent {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;

        eprint!(
            "\r[{}{}] {:3}% {}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            percent,
            message
        );
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    println!("Average edge length: {:.6}", mesh.average_edge_length());

    let valences = mesh.vertex_ids().map(|v| mesh.valence(v));
    let (min_valence, max_valence) = valences.fold((usize::MAX, 0), |(lo, hi), n| (lo.min(n), hi.max(n)));
    if max_valence > 0 {
        println!("Valence range: [{}, {}]", min_valence, max_valence);
    }

    let boundary = mesh.vertex_ids().filter(|&v| mesh.is_boundary(v)).count();
    if boundary == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary vertices, kept fixed when smoothing)", boundary);
    }

    Ok(())
}

fn cmd_smooth(
    input: &Path,
    output: &Path,
    options: &SmoothOptions,
    select: Option<Selection>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: HalfEdgeMesh = io::load(input)?;

    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let positions = mesh.positions();
    let initial = match select {
        Some(selection) => PositionSnapshot::selected(&positions, selection.indices(positions.len())?)?,
        None => PositionSnapshot::full(&positions),
    };

    let mode = if options.parallel { "parallel" } else { "sequential" };
    println!(
        "Applying {:?} smoothing ({} of {} iterations, lambda={}, mu={}, {} vertices, {})...",
        options.mode,
        options.effective_iterations(),
        options.iterations,
        options.lambda,
        options.mu,
        initial.num_selected(),
        mode
    );
    log::info!("smoothing {} -> {}", input.display(), output.display());

    let progress = create_progress();

    let start = Instant::now();
    let result = smooth::smooth_with_progress(&mesh, &initial, options, &progress)?;
    let elapsed = start.elapsed();

    result.apply_to(&mut mesh);
    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(selection: &Selection, num_vertices: usize) -> Vec<usize> {
        selection.indices(num_vertices).unwrap().collect()
    }

    #[test]
    fn test_parse_single_indices() {
        let selection = parse_selection("4,1").unwrap();
        assert_eq!(selection, Selection(vec![4..=4, 1..=1]));
        assert_eq!(expand(&selection, 5), vec![4, 1]);
    }

    #[test]
    fn test_parse_ranges() {
        assert_eq!(expand(&parse_selection("0-3, 10").unwrap(), 11), vec![0, 1, 2, 3, 10]);
        assert_eq!(expand(&parse_selection("7-7").unwrap(), 8), vec![7]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_selection("").is_err());
        assert!(parse_selection("a,2").is_err());
        assert!(parse_selection("5-2").is_err());
        assert!(parse_selection("1-").is_err());
    }

    #[test]
    fn test_huge_range_is_rejected_before_expansion() {
        let selection = parse_selection(&format!("0-{}", usize::MAX)).unwrap();
        assert_eq!(selection.0.len(), 1);
        assert!(selection.indices(100).is_err());
        assert!(parse_selection("0-99,100").unwrap().indices(100).is_err());
        assert!(parse_selection("0-99").unwrap().indices(100).is_ok());
    }

    #[test]
    fn test_cli_defaults_match_options() {
        let cli = Cli::parse_from(["cotsmooth", "smooth", "in.ply", "out.ply"]);
        let Commands::Smooth { mode, iterations, lambda, mu, envelope, select, sequential, .. } = cli.command else {
            panic!("expected smooth command");
        };
        let defaults = SmoothOptions::default();
        assert!(mode == Mode::Laplace);
        assert_eq!(iterations, 1);
        assert_eq!(lambda, defaults.lambda);
        assert_eq!(mu, defaults.mu);
        assert_eq!(envelope, defaults.envelope);
        assert_eq!(select, None);
        assert!(!sequential);
    }

    #[test]
    fn test_cli_parses_taubin_with_selection() {
        let cli = Cli::parse_from([
            "cotsmooth", "smooth", "in.stl", "out.stl", "-m", "taubin", "-i", "8", "--mu", "-0.5", "--select", "2-4",
        ]);
        let Commands::Smooth { mode, iterations, mu, select, .. } = cli.command else {
            panic!("expected smooth command");
        };
        assert!(mode == Mode::Taubin);
        assert_eq!(iterations, 8);
        assert_eq!(mu, -0.5);
        assert_eq!(select, Some(Selection(vec![2..=4])));
    }
}
