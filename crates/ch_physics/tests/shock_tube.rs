//! 激波管端到端测试
//!
//! Sod 管与精确黎曼解的 L1 比较，以及 Einfeldt 强稀疏波的正定性。

use ch_config::{DynSolver, ParameterMap, SolverConfig};
use ch_physics::riemann::{AxisState, ExactSolver};
use ch_physics::{EulerSolver, GammaLaw};

fn config(text: &str) -> SolverConfig {
    let pm = ParameterMap::from_str_and_args(text, &[]).unwrap();
    SolverConfig::from_parameter_map(&pm).unwrap()
}

fn run_to(solver: &mut EulerSolver<f64>, t_end: f64) {
    while solver.time() < t_end {
        let dt = solver.stable_dt().unwrap().min(t_end - solver.time());
        solver.advance(dt).unwrap();
        assert!(solver.step_count() < 100_000, "步数异常");
    }
}

#[test]
fn sod_density_profile_matches_exact_solution() {
    let text = "\
[grid]
nx = 100
[time]
t_end = 0.2
cfl = 0.4
[scheme]
riemann = hllc
reconstruction = plmc
integrator = vl
[problem]
name = sod
[boundary]
x_lo = outflow
x_hi = outflow
";
    let mut solver = EulerSolver::<f64>::from_config(&config(text)).unwrap();
    run_to(&mut solver, 0.2);

    // 参考解：精确求解器的星区域 + 自相似采样
    let eos = GammaLaw::new(1.4f64, 0.6);
    let exact = ExactSolver::new(eos, 1e-20);
    let left = AxisState {
        d: 1.0,
        vn: 0.0,
        p: 1.0,
        ..Default::default()
    };
    let right = AxisState {
        d: 0.125,
        vn: 0.0,
        p: 0.1,
        ..Default::default()
    };
    let (pm, um) = exact.star_region(&left, &right);

    let grid = solver.grid().clone();
    let dx = grid.dh[0];
    let mut l1 = 0.0;
    for i in 0..100 {
        let x = grid.cell_center(i + grid.ghost, grid.ghost, grid.ghost).x;
        let xi = (x - 0.5) / 0.2;
        let (d_ref, _, _) = exact.sample(pm, um, &left, &right, xi);
        let d = solver.field().density[grid.interior_index(i, 0, 0)];
        l1 += (d - d_ref).abs() * dx;
    }
    assert!(l1 <= 2e-2, "Sod L1(ρ) = {l1:.3e} 超出容限");
}

#[test]
fn sod_wave_structure_present() {
    let text = "\
[grid]
nx = 100
[time]
t_end = 0.2
[problem]
name = sod
[boundary]
x_lo = outflow
x_hi = outflow
";
    let mut solver = EulerSolver::<f64>::from_config(&config(text)).unwrap();
    run_to(&mut solver, 0.2);

    let grid = solver.grid().clone();
    let d = |i: usize| solver.field().density[grid.interior_index(i, 0, 0)];
    // 左端仍是初值，右端仍是初值
    assert!((d(0) - 1.0).abs() < 1e-3);
    assert!((d(99) - 0.125).abs() < 1e-3);
    // 接触间断 (~x=0.69) 两侧的星区域台地 ~0.426 / ~0.266
    let left_star: Vec<f64> = (55..67).map(d).collect();
    let right_star: Vec<f64> = (70..84).map(d).collect();
    assert!(left_star.iter().any(|&v| (v - 0.426).abs() < 0.05));
    assert!(right_star.iter().any(|&v| (v - 0.266).abs() < 0.05));
}

#[test]
fn einfeldt_rarefaction_stays_positive() {
    let text = "\
[grid]
nx = 64
[time]
t_end = 0.1
[physics]
gamma = 1.6666666666666667
[scheme]
riemann = hllc
reconstruction = plmc
[problem]
name = einfeldt
rho_l = 1.0
vx_l = -2.0
p_l = 0.45
rho_r = 1.0
vx_r = 2.0
p_r = 0.45
[boundary]
x_lo = outflow
x_hi = outflow
";
    let mut solver = EulerSolver::<f64>::from_config(&config(text)).unwrap();
    run_to(&mut solver, 0.1);

    let grid = solver.grid().clone();
    let eos = *solver.eos();
    for i in 0..64 {
        let u = solver.field().conserved_at(grid.interior_index(i, 0, 0));
        assert!(u.d > 0.0, "单元 {i} 密度非正: {}", u.d);
        assert!(
            eos.pressure(&u) >= 0.0,
            "单元 {i} 压强为负: {}",
            eos.pressure(&u)
        );
    }
    // 中点被强稀疏波掏空
    let mid = solver.field().density[grid.interior_index(32, 0, 0)];
    assert!(mid < 0.15, "中点密度 {mid} 未被稀疏波掏空");
}

#[test]
fn einfeldt_with_all_hydro_solvers() {
    for riemann in ["exact", "roe", "hllc"] {
        let text = format!(
            "\
[grid]
nx = 32
[time]
t_end = 0.05
[physics]
gamma = 1.6666666666666667
[scheme]
riemann = {riemann}
reconstruction = plmp
[problem]
name = einfeldt
rho_l = 1.0
vx_l = -2.0
p_l = 0.45
rho_r = 1.0
vx_r = 2.0
p_r = 0.45
[boundary]
x_lo = outflow
x_hi = outflow
"
        );
        let mut solver = EulerSolver::<f64>::from_config(&config(&text)).unwrap();
        run_to(&mut solver, 0.05);
        let grid = solver.grid().clone();
        for i in 0..32 {
            let u = solver.field().conserved_at(grid.interior_index(i, 0, 0));
            assert!(u.d > 0.0, "{riemann}: 单元 {i} 密度非正");
        }
    }
}

#[test]
fn sod_along_each_axis_is_symmetric() {
    // 同一问题沿三个轴放置，终态剖面应逐单元一致
    let base = |axis: usize, n: &str| {
        format!(
            "\
[grid]
{n}
[time]
t_end = 0.1
[problem]
name = sod
axis = {axis}
[boundary]
x_lo = outflow
x_hi = outflow
y_lo = outflow
y_hi = outflow
z_lo = outflow
z_hi = outflow
"
        )
    };
    let mut sx = EulerSolver::<f64>::from_config(&config(&base(0, "nx = 32"))).unwrap();
    let mut sy = EulerSolver::<f64>::from_config(&config(&base(1, "nx = 1\nny = 32"))).unwrap();
    let mut sz =
        EulerSolver::<f64>::from_config(&config(&base(2, "nx = 1\nny = 1\nnz = 32"))).unwrap();
    run_to(&mut sx, 0.1);
    run_to(&mut sy, 0.1);
    run_to(&mut sz, 0.1);

    let gx = sx.grid().clone();
    let gy = sy.grid().clone();
    let gz = sz.grid().clone();
    for i in 0..32 {
        let dx = sx.field().density[gx.interior_index(i, 0, 0)];
        let dy = sy.field().density[gy.interior_index(0, i, 0)];
        let dz = sz.field().density[gz.interior_index(0, 0, i)];
        assert!((dx - dy).abs() < 1e-12, "x/y 不对称 @ {i}: {dx} vs {dy}");
        assert!((dx - dz).abs() < 1e-12, "x/z 不对称 @ {i}: {dx} vs {dz}");
    }
    // 动量分量随轴旋转
    let mx = sx.field().momentum_x[gx.interior_index(20, 0, 0)];
    let my = sy.field().momentum_y[gy.interior_index(0, 20, 0)];
    assert!((mx - my).abs() < 1e-12);
}

#[test]
fn dual_energy_sod_stays_consistent() {
    let text = "\
[grid]
nx = 64
[time]
t_end = 0.1
[physics]
dual_energy = true
[problem]
name = sod
[boundary]
x_lo = outflow
x_hi = outflow
";
    let mut solver = EulerSolver::<f64>::from_config(&config(text)).unwrap();
    run_to(&mut solver, 0.1);

    let grid = solver.grid().clone();
    let eos = *solver.eos();
    for i in 0..64 {
        let idx = grid.interior_index(i, 0, 0);
        let u = solver.field().conserved_at(idx);
        let ge = solver.field().internal_energy.as_ref().unwrap()[idx];
        assert!(ge > 0.0);
        // 亚声速区域内两种压强表示一致
        let p_tot = eos.pressure(&u);
        let p_int = (eos.gamma - 1.0) * ge;
        if p_tot > 0.0 {
            assert!(
                (p_tot - p_int).abs() / p_tot < 0.05,
                "单元 {i}: p_tot = {p_tot}, p_int = {p_int}"
            );
        }
    }
}
