use std::{ f64::consts::PI, fs::{ self, File }, path::PathBuf };
use ndarray as nd;
use ndarray_npy::NpzWriter;
use rand::{ prelude as rnd, SeedableRng };
use imtime::{
    grid::AxisSpec,
    monitor,
    potential,
    solve::{ self, Config, Solver, System },
    utils,
};

const DX: f64 = 0.01;
const TOL: f64 = 1e-6;
const TIME: f64 = 4.0; // total imaginary time
const PRINT_EVERY: usize = 5000;

fn relax<'a>(
    system: &'a System,
    time: AxisSpec,
    config: Config<'a>,
    q0: nd::ArrayD<f64>,
) -> anyhow::Result<solve::Solution>
{
    let mut solver = Solver::new(system, time, config, q0)?;
    solver.run_with(|s| {
        let n = s.iters();
        if n % PRINT_EVERY == 0 {
            let e = s.energies();
            println!(
                "  {:7}: E = {:.10}, |ΔE/E| = {:.3e}",
                n, e[n - 1], monitor::rel_change(e[n - 2], e[n - 1]),
            );
        }
        Ok(())
    })?;
    Ok(solver.into_solution())
}

fn main() -> anyhow::Result<()> {
    let space = [AxisSpec::new(0.0, 1.0, DX), AxisSpec::new(0.0, 1.0, DX)];
    let system = System::new(&space, &potential::Zero)?;
    let dt = 0.2 * DX.powi(2);
    let time = AxisSpec::new(0.0, TIME, dt);

    // ground state: (1, 1)
    println!("ground state");
    let q0 = utils::gaussian(system.grid(), &[0.5, 0.5], 0.2);
    let ground = relax(&system, time, Config::default().epsilon(Some(TOL)), q0)?;

    // first excited state: one of the degenerate (1, 2), (2, 1) pair
    println!("first excited state");
    let mut rng = rnd::StdRng::seed_from_u64(10546);
    let x = system.grid().get_x(0);
    let mut q1 = utils::gaussian(system.grid(), &[0.5, 0.5], 0.2);
    q1.indexed_iter_mut().for_each(|(idx, qk)| { *qk *= x[idx[0]] - 0.5; });
    utils::add_noise(&mut q1, 1e-3, &mut rng);
    let config = Config::default().epsilon(Some(TOL)).prior(&ground.wf);
    let excited = relax(&system, time, config, q1)?;

    let overlap = utils::wf_dot(&ground.wf, &excited.wf, system.dv());
    let e_ground = PI.powi(2);
    let e_excited = 2.5 * PI.powi(2);
    println!(
        "ground:  E = {:.8} (expected {:.8}; rel. err. {:.3e}) after {} steps; converged: {}",
        ground.e, e_ground, (ground.e - e_ground).abs() / e_ground,
        ground.iters(), ground.converged(),
    );
    println!(
        "excited: E = {:.8} (expected {:.8}; rel. err. {:.3e}) after {} steps; converged: {}",
        excited.e, e_excited, (excited.e - e_excited).abs() / e_excited,
        excited.iters(), excited.converged(),
    );
    println!("⟨ground|excited⟩ = {:.3e}", overlap);

    let energies: nd::Array1<f64> = nd::array![ground.e, excited.e];
    let wfs: nd::ArrayD<f64>
        = nd::stack(nd::Axis(0), &[ground.wf.view(), excited.wf.view()])?;
    let e_ground_trace: nd::Array1<f64> = ground.energies.iter().copied().collect();
    let e_excited_trace: nd::Array1<f64> = excited.energies.iter().copied().collect();

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;
    let mut npz = NpzWriter::new(File::create(outdir.join("square_well.npz"))?);
    npz.add_array("x", system.grid().get_x(0))?;
    npz.add_array("y", system.grid().get_x(1))?;
    npz.add_array("e", &energies)?;
    npz.add_array("wf", &wfs)?;
    npz.add_array("e_ground", &e_ground_trace)?;
    npz.add_array("e_excited", &e_excited_trace)?;
    npz.finish()?;
    Ok(())
}
