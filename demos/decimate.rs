//! Decimation CLI for facecrate.
//!
//! Usage: decimate [OPTIONS]
//!
//! Builds a generated mesh, loads it into a geometry record and decimates it.
//! Set `RUST_LOG=debug` for per-stage logs.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use facecrate_core::{IndexedMesh, OperationControl, Point3f, Progress, Provenance};
use facecrate_record::{EngineConfig, GeometryRecord};
use facecrate_simplification::DecimationMethod;

#[derive(Parser)]
#[command(name = "decimate")]
#[command(author, version, about = "Decimate a generated mesh", long_about = None)]
struct Cli {
    /// Shape to generate
    #[arg(short, long, value_enum, default_value = "cylinder")]
    shape: Shape,

    /// Segments around the cylinder or cells per cube side
    #[arg(long, default_value = "24")]
    resolution: usize,

    /// Fraction of triangles to remove (0.0 to 1.0, exclusive)
    #[arg(short, long, default_value = "0.5")]
    fraction: f64,

    /// Decimation method
    #[arg(short, long, value_enum, default_value = "quadric")]
    method: Method,

    /// Seed for the random method
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Cell size for vertex clustering (derived from the target when omitted)
    #[arg(long)]
    cell_size: Option<f32>,

    /// Engine configuration as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Collapse this edge after decimating, given as two vertex indices
    #[arg(long, num_args = 2, value_names = ["V1", "V2"])]
    collapse: Option<Vec<usize>>,

    /// Mark the mesh as procedurally generated (exact face reconstruction)
    #[arg(long)]
    exact: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Cube,
    Cylinder,
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    /// Quadric error metric edge collapse
    Quadric,
    /// Uniform grid vertex clustering
    Clustering,
    /// Seeded stride removal, for debugging
    Random,
}

impl Cli {
    fn method(&self) -> DecimationMethod {
        match self.method {
            Method::Quadric => DecimationMethod::QuadricEdgeCollapse,
            Method::Clustering => DecimationMethod::VertexClustering {
                cell_size: self.cell_size,
            },
            Method::Random => DecimationMethod::Random { seed: self.seed },
        }
    }

    fn config(&self) -> Result<EngineConfig> {
        match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
            }
            None => Ok(EngineConfig::default()),
        }
    }

    fn mesh(&self) -> IndexedMesh {
        let resolution = self.resolution.max(3);
        let mesh = match self.shape {
            Shape::Cube => subdivided_cube(resolution),
            Shape::Cylinder => cylinder(resolution, resolution),
        };
        if self.exact {
            mesh.with_provenance(Provenance::ProcedurallyGenerated)
        } else {
            mesh
        }
    }
}

/// Closed cylinder of radius 1 and height 2 with fan caps.
fn cylinder(segments: usize, rings: usize) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();
    for r in 0..rings {
        let z = r as f32 / (rings - 1) as f32 * 2.0;
        for s in 0..segments {
            let a = std::f32::consts::TAU * s as f32 / segments as f32;
            mesh.add_vertex(Point3f::new(a.cos(), a.sin(), z));
        }
    }
    let bottom = mesh.add_vertex(Point3f::new(0.0, 0.0, 0.0));
    let top = mesh.add_vertex(Point3f::new(0.0, 0.0, 2.0));
    let at = |r: usize, s: usize| r * segments + s % segments;

    for r in 0..rings - 1 {
        for s in 0..segments {
            mesh.add_face([at(r, s), at(r, s + 1), at(r + 1, s + 1)]);
            mesh.add_face([at(r, s), at(r + 1, s + 1), at(r + 1, s)]);
        }
    }
    for s in 0..segments {
        mesh.add_face([bottom, at(0, s + 1), at(0, s)]);
        mesh.add_face([top, at(rings - 1, s), at(rings - 1, s + 1)]);
    }
    mesh
}

/// Unit cube with each side split into `n` x `n` quads. Sides share no
/// vertices; repair welds the seams on load.
fn subdivided_cube(n: usize) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();
    // Origin, u axis and v axis of each side, with u x v pointing outward
    let sides: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let step = 1.0 / n as f32;

    for (origin, u, v) in sides {
        let base = mesh.vertex_count();
        for j in 0..=n {
            for i in 0..=n {
                let (s, t) = (i as f32 * step, j as f32 * step);
                mesh.add_vertex(Point3f::new(
                    origin[0] + u[0] * s + v[0] * t,
                    origin[1] + u[1] * s + v[1] * t,
                    origin[2] + u[2] * s + v[2] * t,
                ));
            }
        }
        let at = |i: usize, j: usize| base + j * (n + 1) + i;
        for j in 0..n {
            for i in 0..n {
                mesh.add_face([at(i, j), at(i + 1, j), at(i + 1, j + 1)]);
                mesh.add_face([at(i, j), at(i + 1, j + 1), at(i, j + 1)]);
            }
        }
    }
    mesh
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let mesh = cli.mesh();
    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.face_count(),
        "Generated mesh"
    );

    let mut record = GeometryRecord::load(mesh, config)?;
    println!(
        "Loaded: {} vertices, {} triangles, {} faces ({:?})",
        record.mesh().vertex_count(),
        record.mesh().face_count(),
        record.faces().len(),
        record.capability()
    );

    let checkpoints = Arc::new(AtomicUsize::new(0));
    let counter = checkpoints.clone();
    let control = OperationControl::new().with_progress(Progress::new(move |_, _, _| {
        counter.fetch_add(1, Ordering::Relaxed);
    }));

    let method = cli.method();
    let outcome = record.decimate(cli.fraction, method, &control)?;
    println!("\nMethod: {}", method.name());
    match &outcome.stats {
        Some(stats) => println!("{}", stats),
        None => println!("Nothing committed"),
    }
    println!("Completion: {:?}", outcome.completion);
    println!("Progress reports: {}", checkpoints.load(Ordering::Relaxed));
    println!(
        "Faces: {} ({:?})",
        record.faces().len(),
        record.capability()
    );

    if let Some(pair) = &cli.collapse {
        let (v1, v2) = (pair[0], pair[1]);
        let outcome = record.collapse_edge(v1, v2)?;
        println!("\nCollapsed edge {}-{}: {:?}", v1, v2, outcome.completion);
        println!(
            "Now {} vertices, {} triangles, {} faces",
            record.mesh().vertex_count(),
            record.mesh().face_count(),
            record.faces().len()
        );
    }

    Ok(())
}
