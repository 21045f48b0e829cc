//! 守恒性测试
//!
//! 周期边界、无源项时 Σρ、Σρv、ΣE 在任意步数后保持到舍入误差。
//! 求和使用补偿求和，避免朴素累加误差掩盖真实的守恒破坏。

use ch_config::{DynSolver, ParameterMap, SolverConfig};
use ch_physics::{EulerSolver, FieldBlock};
use ch_runtime::KahanSum;

fn config(text: &str) -> SolverConfig {
    let pm = ParameterMap::from_str_and_args(text, &[]).unwrap();
    SolverConfig::from_parameter_map(&pm).unwrap()
}

fn totals(solver: &EulerSolver<f64>) -> [f64; 5] {
    let grid = solver.grid();
    let field: &FieldBlock<f64> = solver.field();
    let mut sums = [
        KahanSum::new(),
        KahanSum::new(),
        KahanSum::new(),
        KahanSum::new(),
        KahanSum::new(),
    ];
    for k in 0..grid.n[2] {
        for j in 0..grid.n[1] {
            for i in 0..grid.n[0] {
                let idx = grid.interior_index(i, j, k);
                sums[0].add(field.density[idx]);
                sums[1].add(field.momentum_x[idx]);
                sums[2].add(field.momentum_y[idx]);
                sums[3].add(field.momentum_z[idx]);
                sums[4].add(field.energy[idx]);
            }
        }
    }
    [
        sums[0].value(),
        sums[1].value(),
        sums[2].value(),
        sums[3].value(),
        sums[4].value(),
    ]
}

fn run_steps(solver: &mut EulerSolver<f64>, n: usize) {
    for _ in 0..n {
        let dt = solver.stable_dt().unwrap();
        solver.advance(dt).unwrap();
    }
}

#[test]
fn periodic_sound_wave_conserves_all() {
    let text = "\
[grid]
nx = 32
[time]
t_end = 1.0
[scheme]
reconstruction = plmc
integrator = vl
[problem]
name = sound_wave
vx_l = 1.0
amplitude = 0.1
";
    let mut solver = EulerSolver::<f64>::from_config(&config(text)).unwrap();
    let before = totals(&solver);
    run_steps(&mut solver, 50);
    let after = totals(&solver);

    for (q, (b, a)) in before.iter().zip(after.iter()).enumerate() {
        let scale = b.abs().max(1.0);
        assert!(
            (a - b).abs() / scale < 1e-11,
            "守恒量 {q} 漂移: {b:.15e} → {a:.15e}"
        );
    }
}

#[test]
fn periodic_3d_discontinuity_conserves_all() {
    // 三维块上的间断：对流 + 三方向扫掠都参与
    let text = "\
[grid]
nx = 8
ny = 8
nz = 8
[time]
t_end = 1.0
[scheme]
reconstruction = plmp
[problem]
name = shock_tube
vx_l = 0.3
vy_l = -0.2
vz_l = 0.1
vx_r = 0.3
vy_r = -0.2
vz_r = 0.1
";
    let mut solver = EulerSolver::<f64>::from_config(&config(text)).unwrap();
    let before = totals(&solver);
    run_steps(&mut solver, 20);
    let after = totals(&solver);

    for (q, (b, a)) in before.iter().zip(after.iter()).enumerate() {
        let scale = b.abs().max(1.0);
        assert!(
            (a - b).abs() / scale < 1e-11,
            "守恒量 {q} 漂移: {b:.15e} → {a:.15e}"
        );
    }
    assert!(solver.time() > 0.0);
}

#[test]
fn ppm_conserves_too() {
    let text = "\
[grid]
nx = 32
[time]
t_end = 1.0
[scheme]
reconstruction = ppmc
[problem]
name = sound_wave
vx_l = 1.0
amplitude = 0.05
";
    let mut solver = EulerSolver::<f64>::from_config(&config(text)).unwrap();
    let before = totals(&solver);
    run_steps(&mut solver, 30);
    let after = totals(&solver);
    assert!((after[0] - before[0]).abs() / before[0].abs() < 1e-11);
    assert!((after[4] - before[4]).abs() / before[4].abs() < 1e-11);
}

#[test]
fn passive_scalar_total_conserved() {
    let text = "\
[grid]
nx = 32
[time]
t_end = 1.0
[physics]
n_scalars = 1
[problem]
name = shock_tube
vx_l = 0.5
vx_r = 0.5
";
    let mut solver = EulerSolver::<f64>::from_config(&config(text)).unwrap();
    let sum_scalar = |s: &EulerSolver<f64>| -> f64 {
        let grid = s.grid();
        KahanSum::sum_iter(
            (0..grid.n[0]).map(|i| s.field().scalars[0][grid.interior_index(i, 0, 0)]),
        )
    };
    let before = sum_scalar(&solver);
    run_steps(&mut solver, 30);
    let after = sum_scalar(&solver);
    assert!(before > 0.0);
    assert!((after - before).abs() / before < 1e-11);
}
