//! Relax the lowest few states of a system described by a TOML file.
//!
//! ```text
//! relax workspace/relax.toml --outdir output/relax
//! ```

use std::{ fs::{ self, File }, path::{ Path, PathBuf } };
use anyhow::Context;
use clap::Parser;
use ndarray as nd;
use ndarray_npy::NpzWriter;
use rand::{ prelude as rnd, SeedableRng };
use serde::Deserialize;
use imtime::{
    boundary::Boundary,
    grid::{ AxisSpec, Grid },
    monitor,
    potential::{ Harmonic, Quartic, SoftCoulomb, SquareWell, Zero },
    snapshot::{ self, Snapshots },
    solve::{ Config, Solution, Solver, System },
    utils,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Imaginary-time relaxation of stationary states", long_about = None)]
struct Args {
    /// Path to the run description.
    config: PathBuf,

    /// Override the output directory.
    #[arg(short, long)]
    outdir: Option<PathBuf>,

    /// Override the number of states.
    #[arg(short, long)]
    nstates: Option<usize>,

    /// Suppress progress output.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PotentialConf {
    Zero,
    Harmonic { omega: Vec<f64>, center: Option<Vec<f64>> },
    Quartic { a: f64 },
    SoftCoulomb { z: f64, a: f64 },
    SquareWell { lo: Vec<f64>, hi: Vec<f64>, depth: f64 },
    /// Pre-sampled potential stored in a `.npy` file.
    File { path: PathBuf },
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BoundaryConf {
    #[default]
    Dirichlet,
    Periodic,
}

impl From<BoundaryConf> for Boundary {
    fn from(conf: BoundaryConf) -> Self {
        match conf {
            BoundaryConf::Dirichlet => Self::Dirichlet,
            BoundaryConf::Periodic => Self::Periodic,
        }
    }
}

fn def_outdir() -> PathBuf { PathBuf::from("output/relax") }

fn def_nstates() -> usize { 1 }

fn def_epsilon() -> Option<f64> { Some(1e-6) }

fn def_progress() -> usize { 1000 }

fn def_seed() -> u64 { 10546 }

#[derive(Clone, Debug, Deserialize)]
struct RunConf {
    /// `[start, end, step]` for each spatial axis.
    axes: Vec<(f64, f64, f64)>,
    /// `[start, end, step]` for imaginary time.
    time: (f64, f64, f64),
    potential: PotentialConf,
    #[serde(default)]
    boundary: BoundaryConf,
    #[serde(default = "def_epsilon")]
    epsilon: Option<f64>,
    #[serde(default)]
    maxiters: Option<usize>,
    #[serde(default = "def_nstates")]
    nstates: usize,
    /// Gaussian seed width; defaults to a quarter of the shortest axis.
    #[serde(default)]
    width: Option<f64>,
    /// Amplitude of uniform noise added to each seed.
    #[serde(default)]
    noise: f64,
    #[serde(default = "def_seed")]
    seed: u64,
    /// Write a snapshot every this many steps; 0 writes only final states.
    #[serde(default)]
    snapshot_every: usize,
    #[serde(default = "def_progress")]
    progress: usize,
    #[serde(default = "def_outdir")]
    outdir: PathBuf,
}

impl RunConf {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let txt = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let conf: Self = toml::from_str(&txt)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(conf)
    }

    fn system(&self) -> anyhow::Result<System> {
        let space: Vec<AxisSpec> = self.axes.iter().copied().map(AxisSpec::from).collect();
        let grid = Grid::new(&space)?;
        let ndim = grid.ndim();
        let system
            = match &self.potential {
                PotentialConf::Zero => System::from_grid(grid, &Zero)?,
                PotentialConf::Harmonic { omega, center } => {
                    let center = center.clone().unwrap_or_else(|| vec![0.0; ndim]);
                    let pot = Harmonic::new(omega.clone(), center)?;
                    System::from_grid(grid, &pot)?
                },
                PotentialConf::Quartic { a } => {
                    System::from_grid(grid, &Quartic { a: *a })?
                },
                PotentialConf::SoftCoulomb { z, a } => {
                    System::from_grid(grid, &SoftCoulomb { z: *z, a: *a })?
                },
                PotentialConf::SquareWell { lo, hi, depth } => {
                    let pot = SquareWell::new(lo.clone(), hi.clone(), *depth)?;
                    System::from_grid(grid, &pot)?
                },
                PotentialConf::File { path } => {
                    let v = snapshot::read_field(path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    System::from_arrays(grid, v)?
                },
            };
        Ok(system)
    }
}

// Gaussian centered in the grid, optionally with noise
fn seed_state<R>(grid: &Grid, conf: &RunConf, rng: &mut R) -> nd::ArrayD<f64>
where R: rand::Rng
{
    let center: Vec<f64>
        = grid.axes().iter()
        .map(|x| (x[0] + x[x.len() - 1]) / 2.0)
        .collect();
    let width
        = conf.width.unwrap_or_else(|| {
            grid.axes().iter()
                .map(|x| (x[x.len() - 1] - x[0]) / 4.0)
                .fold(f64::INFINITY, f64::min)
        });
    let mut q = utils::gaussian(grid, &center, width);
    utils::add_noise(&mut q, conf.noise, rng);
    q
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut conf = RunConf::load(&args.config)?;
    if let Some(outdir) = args.outdir { conf.outdir = outdir; }
    if let Some(nstates) = args.nstates { conf.nstates = nstates; }

    let system = conf.system().context("building system")?;
    let time = AxisSpec::from(conf.time);
    let boundary = Boundary::from(conf.boundary);
    let mut rng = rnd::StdRng::seed_from_u64(conf.seed);
    println!(
        "grid {:?}, {} boundaries, {} states",
        system.grid().shape(), if boundary.is_periodic() { "periodic" } else { "dirichlet" },
        conf.nstates,
    );

    let mut found: Vec<Solution> = Vec::with_capacity(conf.nstates);
    for k in 0..conf.nstates {
        let config
            = Config::default()
            .boundary(boundary)
            .epsilon(conf.epsilon)
            .maxiters(conf.maxiters)
            .priors(found.iter().map(|sol| &sol.wf));
        let q0 = seed_state(system.grid(), &conf, &mut rng);
        let snaps
            = Snapshots::new(conf.outdir.join("snapshots"), conf.snapshot_every)?
            .with_prefix(&format!("q{}", k));
        let mut solver = Solver::new(&system, time, config, q0)
            .with_context(|| format!("setting up state {}", k))?;
        println!("state {} (at most {} steps)", k, solver.limit());
        let stop = solver.run_with(|s| {
            snaps.observe(s)?;
            let n = s.iters();
            if !args.quiet && conf.progress > 0 && n % conf.progress == 0 {
                let e = s.energies();
                let de = if n > 1 { monitor::rel_change(e[n - 2], e[n - 1]) } else { f64::NAN };
                println!("  {:8}: E = {:.10}, |ΔE/E| = {:.3e}", n, e[n - 1], de);
            }
            Ok(())
        })
        .with_context(|| format!("relaxing state {}", k))?;
        let sol = solver.into_solution();
        println!("  E = {:.10} after {} steps ({:?})", sol.e, sol.iters(), stop);
        found.push(sol);
    }

    fs::create_dir_all(&conf.outdir)?;
    let mut npz = NpzWriter::new(File::create(conf.outdir.join("relax.npz"))?);
    for (k, x) in system.grid().axes().iter().enumerate() {
        npz.add_array(format!("x{}", k), x)?;
    }
    npz.add_array("v", system.get_V())?;
    let energies: nd::Array1<f64> = found.iter().map(|sol| sol.e).collect();
    npz.add_array("e", &energies)?;
    for (k, sol) in found.iter().enumerate() {
        let trace: nd::Array1<f64> = sol.energies.iter().copied().collect();
        let norms: nd::Array1<f64> = sol.norms.iter().copied().collect();
        npz.add_array(format!("wf{}", k), &sol.wf)?;
        npz.add_array(format!("energies{}", k), &trace)?;
        npz.add_array(format!("norms{}", k), &norms)?;
    }
    npz.finish()?;
    println!("wrote {}", conf.outdir.join("relax.npz").display());
    Ok(())
}
