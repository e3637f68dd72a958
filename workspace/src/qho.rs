use std::{ fs::{ self, File }, path::PathBuf };
use ndarray as nd;
use ndarray_npy::NpzWriter;
use imtime::{
    grid::AxisSpec,
    potential::Harmonic,
    solve::{ Config, Solution, System },
    utils,
};

const OMEGA: f64 = 1.0; // trap frequency
const DX: f64 = 0.02;
const NSTATES: usize = 6;
const TOL: f64 = 1e-9;

fn main() -> anyhow::Result<()> {
    let pot = Harmonic::isotropic(1, OMEGA);
    let system = System::new(&[AxisSpec::new(-10.0, 10.0, DX)], &pot)?;
    let x: &nd::Array1<f64> = system.grid().get_x(0);
    let dt = 0.2 * DX.powi(2);
    let time = AxisSpec::new(0.0, 100.0, dt);
    let config = Config::default().epsilon(Some(TOL));

    // x^n e^(-x²/2) overlaps the n-th Hermite function
    let sols: Vec<Solution>
        = system.relax_states(time, config, NSTATES, |n| {
            let q: nd::ArrayD<f64>
                = x.mapv(|xk| {
                    xk.powi(n as i32) * (-OMEGA * xk.powi(2) / 2.0).exp()
                })
                .into_dyn();
            utils::wf_normalized(&q, system.dv())
        })?;
    let e = |n: usize| OMEGA * (0.5 + n as f64);
    for (n, sol) in sols.iter().enumerate() {
        println!(
            "n = {}: E = {:.8} (expected {:.8}; rel. err. {:.3e}) after {} steps",
            n, sol.e, e(n), (sol.e - e(n)).abs() / e(n), sol.iters(),
        );
    }

    // ground state of an anisotropic 2D trap
    let pot2 = Harmonic::new(vec![OMEGA, 2.0 * OMEGA], vec![0.0, 0.0])?;
    let space2 = [AxisSpec::new(-6.0, 6.0, 0.05), AxisSpec::new(-6.0, 6.0, 0.05)];
    let system2 = System::new(&space2, &pot2)?;
    let dt2 = 0.2 * 0.05_f64.powi(2);
    let time2 = AxisSpec::new(0.0, 50.0, dt2);
    let q0 = utils::gaussian(system2.grid(), &[0.5, -0.5], 1.0);
    let gs2 = system2.relax(time2, Config::default().epsilon(Some(TOL)), q0)?;
    println!(
        "2D ground: E = {:.8} (expected {:.8}) after {} steps",
        gs2.e, pot2.ground_energy(), gs2.iters(),
    );

    let energies: nd::Array1<f64> = sols.iter().map(|sol| sol.e).collect();
    let wfs: nd::ArrayD<f64>
        = nd::stack(
            nd::Axis(0),
            &sols.iter().map(|sol| sol.wf.view()).collect::<Vec<_>>(),
        )?;

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;
    let mut npz = NpzWriter::new(File::create(outdir.join("qho.npz"))?);
    npz.add_array("x", x)?;
    npz.add_array("v", system.get_V())?;
    npz.add_array("e", &energies)?;
    npz.add_array("wf", &wfs)?;
    npz.add_array("x2", system2.grid().get_x(0))?;
    npz.add_array("y2", system2.grid().get_x(1))?;
    npz.add_array("v2", system2.get_V())?;
    npz.add_array("e2", &nd::array![gs2.e])?;
    npz.add_array("wf2", &gs2.wf)?;
    npz.finish()?;
    Ok(())
}
