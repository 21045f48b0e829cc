// crates/ch_physics/src/engine/sweep.rs

//! 方向扫掠与通量散度
//!
//! 每个阶段对三个方向各做一次扫掠：把一行单元（含幽灵）聚集到求解
//! 器坐标系，重构出界面左右状态，对每个内部界面调用黎曼求解器，把
//! 通量写入按行主序排列的方向通量数组。三个方向的扫掠读取同一份守
//! 恒量快照，互相独立，按行并行。
//!
//! 更新分两遍：先并行算出每个内部单元的增量（通量散度 + 双能量
//! 压缩功），再统一加到目标块上。被动标量与双能量内能的界面通量由
//! 质量通量符号上风取值。

use ch_runtime::{Axis, ChError, ChResult, RuntimeScalar};
use num_traits::ToPrimitive;
use rayon::prelude::*;
use smallvec::smallvec;

use crate::eos::GammaLaw;
use crate::grid::BlockGrid;
use crate::reconstruction::{CellState, FacePairs, Reconstruction, ScalarVec};
use crate::riemann::{AxisFlux, AxisState, RiemannSolver};
use crate::state::FieldBlock;

/// 单个界面的完整通量记录
#[derive(Debug, Clone, Default)]
pub struct FaceFlux<S: RuntimeScalar> {
    /// 流体/磁场通量（求解器坐标系）
    pub flux: AxisFlux<S>,
    /// 双能量内能通量
    pub ge: S,
    /// 被动标量通量
    pub scalars: ScalarVec<S>,
}

/// 把一个单元聚集到求解器坐标系
fn gather_cell<S: RuntimeScalar>(
    field: &FieldBlock<S>,
    idx: usize,
    axis: Axis,
    eos: &GammaLaw<S>,
    pressure_floor: S,
) -> CellState<S> {
    let u = field.conserved_at(idx);
    let v = axis.gather([u.mx / u.d, u.my / u.d, u.mz / u.d]);
    let b = axis.gather(u.b);
    let p = eos.pressure(&u).max(pressure_floor);
    let ge = field
        .internal_energy
        .as_ref()
        .map(|ge| ge[idx] / u.d)
        .unwrap_or(S::ZERO);
    let scalars: ScalarVec<S> = field.scalars.iter().map(|s| s[idx] / u.d).collect();
    CellState {
        s: AxisState {
            d: u.d,
            vn: v[0],
            vt1: v[1],
            vt2: v[2],
            p,
            bn: b[0],
            bt1: b[1],
            bt2: b[2],
        },
        ge,
        scalars,
    }
}

/// 一个方向的扫掠：重构 + 黎曼求解，返回通量数组与最大信号速度
pub fn compute_axis_fluxes<S: RuntimeScalar>(
    axis: Axis,
    field: &FieldBlock<S>,
    grid: &BlockGrid,
    eos: &GammaLaw<S>,
    recon: &dyn Reconstruction<S>,
    riemann: &dyn RiemannSolver<S>,
    pressure_floor: S,
) -> ChResult<(Vec<FaceFlux<S>>, f64)> {
    let row_len = grid.row_len(axis);
    let ipr = grid.interfaces_per_row(axis);
    let g = grid.ghost;

    let mut data: Vec<FaceFlux<S>> = vec![FaceFlux::default(); grid.flux_len(axis)];

    let max_speed = data
        .par_chunks_mut(ipr)
        .enumerate()
        .map(|(row, chunk)| -> ChResult<f64> {
            // 聚集一整行
            let mut cells = Vec::with_capacity(row_len);
            for s in 0..row_len {
                let idx = grid.row_cell_index(axis, row, s);
                cells.push(gather_cell(field, idx, axis, eos, pressure_floor));
            }

            let mut faces = FacePairs::default();
            faces.resize(row_len - 1);
            recon.reconstruct_row(&cells, &mut faces);

            let mut row_max = 0.0f64;
            for fi in 0..ipr {
                // 界面 fi 位于行内单元 (g−1+fi, g+fi) 之间
                let face = g - 1 + fi;
                let mut wl = faces.left[face].s;
                let mut wr = faces.right[face].s;
                // 法向磁场跨界面取单一值
                let bn = S::HALF * (wl.bn + wr.bn);
                wl.bn = bn;
                wr.bn = bn;

                let flux = riemann.solve(&wl, &wr).map_err(|e| {
                    ChError::collaborator(
                        "riemann",
                        format!("{} 方向第 {row} 行界面 {fi}: {e}", axis.name()),
                    )
                })?;

                // 接触波上风：标量与内能随质量通量走
                let upwind = if flux.d >= S::ZERO {
                    &faces.left[face]
                } else {
                    &faces.right[face]
                };
                let ge = flux.d * upwind.ge;
                let scalars: ScalarVec<S> =
                    upwind.scalars.iter().map(|&s| flux.d * s).collect();

                row_max = row_max.max(flux.max_speed.to_f64().unwrap_or(f64::MAX));
                chunk[fi] = FaceFlux { flux, ge, scalars };
            }
            Ok(row_max)
        })
        .try_reduce(|| 0.0f64, |a, b| Ok(a.max(b)))?;

    Ok((data, max_speed))
}

/// 三个方向的扫掠（同一守恒量快照）
pub fn compute_fluxes<S: RuntimeScalar>(
    field: &FieldBlock<S>,
    grid: &BlockGrid,
    eos: &GammaLaw<S>,
    recon: &dyn Reconstruction<S>,
    riemann: &dyn RiemannSolver<S>,
    pressure_floor: S,
) -> ChResult<([Vec<FaceFlux<S>>; 3], f64)> {
    let (fx, sx) = compute_axis_fluxes(Axis::X, field, grid, eos, recon, riemann, pressure_floor)?;
    let (fy, sy) = compute_axis_fluxes(Axis::Y, field, grid, eos, recon, riemann, pressure_floor)?;
    let (fz, sz) = compute_axis_fluxes(Axis::Z, field, grid, eos, recon, riemann, pressure_floor)?;
    Ok(([fx, fy, fz], sx.max(sy).max(sz)))
}

/// 单个内部单元的守恒量增量
#[derive(Debug, Clone, Default)]
pub struct CellDelta<S: RuntimeScalar> {
    /// 密度增量
    pub d: S,
    /// 动量增量（物理坐标系）
    pub m: [S; 3],
    /// 总能量增量
    pub e: S,
    /// 双能量内能增量
    pub ge: S,
    /// 磁场增量（物理坐标系）
    pub b: [S; 3],
    /// 被动标量增量
    pub scalars: ScalarVec<S>,
}

/// 快照中某单元沿某方向的速度分量
#[inline]
fn velocity_component<S: RuntimeScalar>(field: &FieldBlock<S>, idx: usize, axis: Axis) -> S {
    let m = match axis {
        Axis::X => field.momentum_x[idx],
        Axis::Y => field.momentum_y[idx],
        Axis::Z => field.momentum_z[idx],
    };
    m / field.density[idx]
}

/// 并行计算通量散度增量
///
/// `snapshot` 是本阶段通量所来自的守恒量快照；双能量压缩功
/// `−p∇·v Δt` 用它的邻居速度做中心差分。
pub fn flux_divergence_deltas<S: RuntimeScalar>(
    snapshot: &FieldBlock<S>,
    fluxes: &[Vec<FaceFlux<S>>; 3],
    grid: &BlockGrid,
    eos: &GammaLaw<S>,
    dt: S,
) -> Vec<CellDelta<S>> {
    let n = grid.n;
    let g = grid.ghost;
    let dual_energy = snapshot.has_dual_energy();
    let n_scalars = snapshot.n_scalars();

    (0..grid.interior_cells())
        .into_par_iter()
        .map(|cell| {
            let i = cell % n[0];
            let j = (cell / n[0]) % n[1];
            let k = cell / (n[0] * n[1]);
            let idx = grid.index(i + g, j + g, k + g);

            let mut delta = CellDelta::<S> {
                scalars: smallvec![S::ZERO; n_scalars],
                ..Default::default()
            };
            let p_cell = if dual_energy {
                eos.pressure(&snapshot.conserved_at(idx)).max(S::ZERO)
            } else {
                S::ZERO
            };

            for axis in Axis::ALL {
                let (row, pos) = grid.cell_row_position(axis, i, j, k);
                let fi = pos - g;
                let fm = &fluxes[axis.index()][grid.flux_index(axis, row, fi)];
                let fp = &fluxes[axis.index()][grid.flux_index(axis, row, fi + 1)];
                let dtodh = dt / S::from_config(grid.dh[axis.index()]);

                delta.d += dtodh * (fm.flux.d - fp.flux.d);
                let dm = axis.scatter([
                    fm.flux.mn - fp.flux.mn,
                    fm.flux.mt1 - fp.flux.mt1,
                    fm.flux.mt2 - fp.flux.mt2,
                ]);
                for c in 0..3 {
                    delta.m[c] += dtodh * dm[c];
                }
                delta.e += dtodh * (fm.flux.e - fp.flux.e);
                let db = axis.scatter([
                    S::ZERO,
                    fm.flux.bt1 - fp.flux.bt1,
                    fm.flux.bt2 - fp.flux.bt2,
                ]);
                for c in 0..3 {
                    delta.b[c] += dtodh * db[c];
                }
                delta.ge += dtodh * (fm.ge - fp.ge);
                for sk in 0..n_scalars {
                    delta.scalars[sk] += dtodh * (fm.scalars[sk] - fp.scalars[sk]);
                }

                if dual_energy {
                    let (im, ip) = match axis {
                        Axis::X => (
                            grid.index(i + g - 1, j + g, k + g),
                            grid.index(i + g + 1, j + g, k + g),
                        ),
                        Axis::Y => (
                            grid.index(i + g, j + g - 1, k + g),
                            grid.index(i + g, j + g + 1, k + g),
                        ),
                        Axis::Z => (
                            grid.index(i + g, j + g, k + g - 1),
                            grid.index(i + g, j + g, k + g + 1),
                        ),
                    };
                    let vn_m = velocity_component(snapshot, im, axis);
                    let vn_p = velocity_component(snapshot, ip, axis);
                    delta.ge += S::HALF * dtodh * p_cell * (vn_m - vn_p);
                }
            }
            delta
        })
        .collect()
}

/// 把增量加到目标块的内部单元上
pub fn apply_deltas<S: RuntimeScalar>(
    field: &mut FieldBlock<S>,
    deltas: &[CellDelta<S>],
    grid: &BlockGrid,
) {
    let n = grid.n;
    let g = grid.ghost;
    for (cell, delta) in deltas.iter().enumerate() {
        let i = cell % n[0];
        let j = (cell / n[0]) % n[1];
        let k = cell / (n[0] * n[1]);
        let idx = grid.index(i + g, j + g, k + g);

        field.density[idx] += delta.d;
        field.momentum_x[idx] += delta.m[0];
        field.momentum_y[idx] += delta.m[1];
        field.momentum_z[idx] += delta.m[2];
        field.energy[idx] += delta.e;
        if let Some(ge) = &mut field.internal_energy {
            ge[idx] += delta.ge;
        }
        if let Some(b) = &mut field.magnetic {
            for c in 0..3 {
                b[c][idx] += delta.b[c];
            }
        }
        for (sk, s) in field.scalars.iter_mut().enumerate() {
            s[idx] += delta.scalars[sk];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconstruction::Pcm;
    use crate::riemann::HllcSolver;
    use crate::state::{Conserved, FieldLayout, Primitive};

    fn eos() -> GammaLaw<f64> {
        GammaLaw::new(1.4, 0.6)
    }

    fn uniform_block(grid: &BlockGrid, w: &Primitive<f64>) -> FieldBlock<f64> {
        let mut field = FieldBlock::new(grid.total_cells(), FieldLayout::default());
        let u = eos().to_conserved(w);
        for idx in 0..field.n_cells() {
            field.set_conserved(idx, &u);
        }
        field
    }

    #[test]
    fn test_uniform_flow_has_zero_divergence() {
        let grid = BlockGrid::new([4, 4, 4], 2, [0.0; 3], [1.0; 3]);
        let w = Primitive {
            d: 1.0,
            vx: 0.5,
            vy: -0.25,
            vz: 0.125,
            p: 0.8,
            b: [0.0; 3],
        };
        let field = uniform_block(&grid, &w);
        let riemann = HllcSolver::new(eos(), 1e-20);
        let (fluxes, max_speed) =
            compute_fluxes(&field, &grid, &eos(), &Pcm, &riemann, 1e-20).unwrap();
        assert!(max_speed > 0.0);

        let deltas = flux_divergence_deltas(&field, &fluxes, &grid, &eos(), 0.01);
        for delta in &deltas {
            assert!(delta.d.abs() < 1e-14);
            assert!(delta.m[0].abs() < 1e-14);
            assert!(delta.m[1].abs() < 1e-14);
            assert!(delta.e.abs() < 1e-14);
        }
    }

    #[test]
    fn test_axis_symmetry_of_sweeps() {
        // 同一间断沿 x 与沿 y 放置，各自方向的通量应一致（方向无关性）
        let grid = BlockGrid::new([4, 4, 1], 2, [0.0; 3], [1.0; 3]);
        let riemann = HllcSolver::new(eos(), 1e-20);

        // 沿 x 的间断
        let mut fx_field = uniform_block(
            &grid,
            &Primitive {
                d: 1.0,
                vx: 0.0,
                vy: 0.0,
                vz: 0.0,
                p: 1.0,
                b: [0.0; 3],
            },
        );
        // 沿 y 的间断
        let mut fy_field = fx_field.clone();

        let t = grid.total_dims();
        for k in 0..t[2] {
            for j in 0..t[1] {
                for i in 0..t[0] {
                    let idx = grid.index(i, j, k);
                    if i >= t[0] / 2 {
                        fx_field.set_conserved(
                            idx,
                            &eos().to_conserved(&Primitive {
                                d: 0.125,
                                vx: 0.0,
                                vy: 0.0,
                                vz: 0.0,
                                p: 0.1,
                                b: [0.0; 3],
                            }),
                        );
                    }
                    if j >= t[1] / 2 {
                        fy_field.set_conserved(
                            idx,
                            &eos().to_conserved(&Primitive {
                                d: 0.125,
                                vx: 0.0,
                                vy: 0.0,
                                vz: 0.0,
                                p: 0.1,
                                b: [0.0; 3],
                            }),
                        );
                    }
                }
            }
        }

        let (flux_x, _) = compute_axis_fluxes(
            Axis::X, &fx_field, &grid, &eos(), &Pcm, &riemann, 1e-20,
        )
        .unwrap();
        let (flux_y, _) = compute_axis_fluxes(
            Axis::Y, &fy_field, &grid, &eos(), &Pcm, &riemann, 1e-20,
        )
        .unwrap();

        // x 扫掠第 0 行与 y 扫掠第 0 行的质量通量应逐界面一致
        let ipr = grid.interfaces_per_row(Axis::X);
        for fi in 0..ipr {
            let a = &flux_x[grid.flux_index(Axis::X, 0, fi)];
            let b = &flux_y[grid.flux_index(Axis::Y, 0, fi)];
            assert!(
                (a.flux.d - b.flux.d).abs() < 1e-13,
                "interface {fi}: {} vs {}",
                a.flux.d,
                b.flux.d
            );
            assert!((a.flux.mn - b.flux.mn).abs() < 1e-13);
            assert!((a.flux.e - b.flux.e).abs() < 1e-13);
        }
    }

    #[test]
    fn test_contact_upwinding_of_scalars() {
        // 右行流：标量通量取左侧浓度
        let grid = BlockGrid::new([4, 1, 1], 2, [0.0; 3], [1.0; 3]);
        let mut field = FieldBlock::new(
            grid.total_cells(),
            FieldLayout {
                n_scalars: 1,
                ..Default::default()
            },
        );
        let u = eos().to_conserved(&Primitive {
            d: 1.0,
            vx: 1.0,
            vy: 0.0,
            vz: 0.0,
            p: 1.0,
            b: [0.0; 3],
        });
        let t = grid.total_dims();
        for k in 0..t[2] {
            for j in 0..t[1] {
                for i in 0..t[0] {
                    let idx = grid.index(i, j, k);
                    field.set_conserved(idx, &u);
                    // 左半浓度 1，右半浓度 0
                    field.scalars[0][idx] = if i < t[0] / 2 { 1.0 } else { 0.0 };
                }
            }
        }
        let riemann = HllcSolver::new(eos(), 1e-20);
        let (fluxes, _) = compute_axis_fluxes(
            Axis::X, &field, &grid, &eos(), &Pcm, &riemann, 1e-20,
        )
        .unwrap();
        // 浓度跳位于行内单元 3/4 之间，对应界面 fi = 2
        let f = &fluxes[grid.flux_index(Axis::X, 0, 2)];
        assert!(f.flux.d > 0.0);
        assert!((f.scalars[0] - f.flux.d * 1.0).abs() < 1e-13);
    }
}
