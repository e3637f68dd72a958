//! Saving and loading of wavefunctions as `.npy` files, and periodic
//! snapshotting of a running [`Solver`].
//!
//! ```no_run
//! use imtime::{
//!     grid::AxisSpec,
//!     potential::Zero,
//!     snapshot::Snapshots,
//!     solve::{ Config, Solver, System },
//!     utils::gaussian,
//! };
//!
//! let system = System::new(&[AxisSpec::new(0.0, 1.0, 0.01)], &Zero).unwrap();
//! let q0 = gaussian(system.grid(), &[0.5], 0.2);
//! let time = AxisSpec::new(0.0, 1.0, 2e-5);
//! let mut solver = Solver::new(&system, time, Config::default(), q0).unwrap();
//! let snaps = Snapshots::new("output/snapshots", 1000).unwrap();
//! solver.run_with(|s| snaps.observe(s)).unwrap();
//! ```

use std::{
    fs::{ self, File },
    io::{ BufReader, BufWriter },
    path::{ Path, PathBuf },
};
use ndarray as nd;
use ndarray_npy::{ ReadNpyExt, WriteNpyExt };
use crate::{ ArrD, solve::{ RelaxResult, Solver } };

/// Write a field to a `.npy` file.
pub fn write_field<P, S>(path: P, q: &ArrD<S>) -> RelaxResult<()>
where
    P: AsRef<Path>,
    S: nd::Data<Elem = f64>,
{
    let writer = BufWriter::new(File::create(path)?);
    q.write_npy(writer)?;
    Ok(())
}

/// Read a field from a `.npy` file.
///
/// The stored array may have any number of dimensions; use it as an initial
/// state via [`Solver::new`] or [`Solver::reset`], which check its shape
/// against the grid.
pub fn read_field<P>(path: P) -> RelaxResult<nd::ArrayD<f64>>
where P: AsRef<Path>
{
    let reader = BufReader::new(File::open(path)?);
    let q = nd::ArrayD::<f64>::read_npy(reader)?;
    Ok(q)
}

/// Periodic snapshotting of a solver's wavefunction.
///
/// Pass [`Self::observe`] to [`Solver::run_with`] to write the current
/// wavefunction to `{outdir}/{prefix}_{step:06}.npy` every `every`
/// iterations, and once more at the final iteration.
#[derive(Clone, Debug)]
pub struct Snapshots {
    outdir: PathBuf,
    prefix: String,
    every: usize,
}

impl Snapshots {
    /// Create a new `Snapshots`, creating the output directory if it does not
    /// exist.
    ///
    /// `every = 0` disables periodic snapshots; only the final state is
    /// written.
    pub fn new<P>(outdir: P, every: usize) -> RelaxResult<Self>
    where P: AsRef<Path>
    {
        let outdir = outdir.as_ref().to_path_buf();
        fs::create_dir_all(&outdir)?;
        Ok(Self { outdir, prefix: "q".to_string(), every })
    }

    /// Set the file name prefix (default: `"q"`).
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Get the output directory.
    pub fn outdir(&self) -> &Path { &self.outdir }

    /// Return the path of the snapshot for iteration `step`.
    pub fn path(&self, step: usize) -> PathBuf {
        self.outdir.join(format!("{}_{:06}.npy", self.prefix, step))
    }

    /// Write a snapshot if the solver is at a multiple of the cadence, or has
    /// stopped.
    pub fn observe(&self, solver: &Solver) -> RelaxResult<()> {
        let step = solver.iters();
        let due = self.every > 0 && step % self.every == 0;
        if due || solver.stop().is_some() {
            write_field(self.path(step), solver.get_q())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::RelaxError,
        grid::AxisSpec,
        potential::Zero,
        solve::{ Config, System },
        utils::gaussian,
    };

    // fresh scratch directory under the system temp dir
    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("imtime-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn field_roundtrip() {
        let dir = scratch("roundtrip");
        fs::create_dir_all(&dir).unwrap();
        let q: nd::ArrayD<f64>
            = nd::ArrayD::from_shape_fn(nd::IxDyn(&[4, 3, 2]), |idx| {
                (idx[0] * 100 + idx[1] * 10 + idx[2]) as f64 / 7.0
            });
        let path = dir.join("q.npy");
        write_field(&path, &q).unwrap();
        assert_eq!(read_field(&path).unwrap(), q);
        assert!(matches!(
            read_field(dir.join("missing.npy")),
            Err(RelaxError::Io(_))
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn snapshot_cadence() {
        let dir = scratch("cadence");
        let system = System::new(&[AxisSpec::new(0.0, 1.0, 0.05)], &Zero)
            .unwrap();
        let q0 = gaussian(system.grid(), &[0.5], 0.2);
        let config = Config::default().maxiters(Some(25)).epsilon(None);
        let time = AxisSpec::new(0.0, 1.0, 1e-4);
        let mut solver = Solver::new(&system, time, config, q0).unwrap();
        let snaps = Snapshots::new(&dir, 10).unwrap().with_prefix("wf");
        solver.run_with(|s| snaps.observe(s)).unwrap();

        let mut written: Vec<String>
            = fs::read_dir(&dir).unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        written.sort();
        assert_eq!(written, ["wf_000010.npy", "wf_000020.npy", "wf_000025.npy"]);

        let last = read_field(snaps.path(25)).unwrap();
        assert_eq!(&last, solver.get_q());
        fs::remove_dir_all(&dir).unwrap();
    }
}
