use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use halfedge_mesh::{DataStructure, HalfEdgeMesh, LoadOptions, Prompt, Query};

#[derive(Parser)]
#[command(version = "0.1", author = "Ryan G.")]
struct Opts {
  /// Input mesh file
  infile: PathBuf,

  /// Fail when two faces use the same directed edge
  #[arg(long)]
  strict: bool,

  /// Load through tobj (vertices renumbered in first-use order)
  #[arg(long)]
  tobj: bool,

  /// Log construction details
  #[arg(short, long)]
  verbose: bool,

  #[command(subcommand)]
  /// method
  method: Methods,
}

#[derive(Subcommand)]
enum Methods {
  /// print element counts
  Info,
  #[command(flatten)]
  Query(Query),
  /// write the mesh back out as OBJ
  Export { outfile: PathBuf },
  /// answer queries read from stdin, one per line
  Interactive,
}

fn init_logging(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();
}

fn interactive(mesh: &HalfEdgeMesh) -> Result<()> {
  let stdin = io::stdin();
  let mut stdout = io::stdout();

  for line in stdin.lock().lines() {
    let line = line.context("failed to read stdin")?;
    if line.trim().is_empty() {
      continue;
    }

    match Prompt::parse_line(&line) {
      Ok(Prompt::Quit) => break,
      Ok(Prompt::Query(query)) => match query.run(mesh) {
        Ok(answer) => writeln!(stdout, "{}", answer)?,
        Err(err) => writeln!(stdout, "error: {}", err)?,
      },
      Err(err) => writeln!(stdout, "{}", err)?,
    }
    stdout.flush()?;
  }

  Ok(())
}

fn main() -> Result<()> {
  let opts: Opts = Opts::parse();
  init_logging(opts.verbose);

  let options = if opts.strict {
    LoadOptions::strict()
  } else {
    LoadOptions::default()
  };

  let mesh = if opts.tobj {
    HalfEdgeMesh::from_obj(&opts.infile, &options)
  } else {
    HalfEdgeMesh::open(&opts.infile, &options)
  }
  .with_context(|| format!("failed to load {}", opts.infile.display()))?;

  info!(
    vertices = mesh.num_vertices(),
    faces = mesh.num_faces(),
    "loaded {}",
    opts.infile.display()
  );

  match opts.method {
    Methods::Info => {
      println!("vertices:   {}", mesh.num_vertices());
      println!("faces:      {}", mesh.num_faces());
      println!("edges:      {}", mesh.num_edges());
      println!("half-edges: {}", mesh.num_half_edges());
      println!("boundary:   {}", mesh.num_boundary_half_edges());
    }
    Methods::Query(query) => println!("{}", query.run(&mesh)?),
    Methods::Export { outfile } => mesh
      .save_obj(&outfile)
      .with_context(|| format!("failed to write {}", outfile.display()))?,
    Methods::Interactive => interactive(&mesh)?,
  }

  Ok(())
}
