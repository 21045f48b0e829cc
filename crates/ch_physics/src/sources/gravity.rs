// crates/ch_physics/src/sources/gravity.rs

//! 引力源项
//!
//! 由协作方解出的势 Φ 计算单元中心加速度 `g = −∇Φ`（三点或五点
//! 中心差分，五点需要 ≥2 层幽灵），对动量做 `ρv += Δt ρ g`，能量
//! 按配置以做功模式（时间居中的 `Δt g·ρv`）或 ΔKE 模式耦合。
//! Van Leer 积分器在预报态 (n+½) 与校正态各应用一次。

use ch_runtime::{Axis, ChResult, RuntimeScalar};
use glam::DVec3;

use crate::grid::BlockGrid;
use crate::state::FieldBlock;
use crate::traits::{PotentialBoundary, PotentialSolver};

/// 引力耦合配置
#[derive(Debug, Clone, Copy, Default)]
pub struct GravitySource {
    /// 五点差分（否则三点）
    pub five_point: bool,
    /// ΔKE 能量耦合（否则做功模式）
    pub couple_delta_ke: bool,
}

impl GravitySource {
    /// 单元中心加速度分量
    #[inline]
    fn acceleration<S: RuntimeScalar>(
        &self,
        phi: &[S],
        grid: &BlockGrid,
        i: usize,
        j: usize,
        k: usize,
        axis: Axis,
    ) -> S {
        let dh = S::from_config(grid.dh[axis.index()]);
        let at = |di: isize| -> S {
            let (mut ii, mut jj, mut kk) = (i as isize, j as isize, k as isize);
            match axis {
                Axis::X => ii += di,
                Axis::Y => jj += di,
                Axis::Z => kk += di,
            }
            phi[grid.index(ii as usize, jj as usize, kk as usize)]
        };
        if self.five_point {
            let twelve = S::from_config(12.0);
            let eight = S::from_config(8.0);
            -(-at(2) + eight * at(1) - eight * at(-1) + at(-2)) / (twelve * dh)
        } else {
            -(at(1) - at(-1)) / (S::TWO * dh)
        }
    }

    /// 对内部单元施加引力动量/能量源项
    pub fn apply<S: RuntimeScalar>(
        &self,
        field: &mut FieldBlock<S>,
        grid: &BlockGrid,
        phi: &[S],
        dt: S,
    ) {
        let g = grid.ghost;
        for k in 0..grid.n[2] {
            for j in 0..grid.n[1] {
                for i in 0..grid.n[0] {
                    let (ti, tj, tk) = (i + g, j + g, k + g);
                    let idx = grid.index(ti, tj, tk);
                    let d = field.density[idx];
                    let gx = self.acceleration(phi, grid, ti, tj, tk, Axis::X);
                    let gy = self.acceleration(phi, grid, ti, tj, tk, Axis::Y);
                    let gz = self.acceleration(phi, grid, ti, tj, tk, Axis::Z);

                    let mx_old = field.momentum_x[idx];
                    let my_old = field.momentum_y[idx];
                    let mz_old = field.momentum_z[idx];
                    let mx_new = mx_old + dt * d * gx;
                    let my_new = my_old + dt * d * gy;
                    let mz_new = mz_old + dt * d * gz;

                    if self.couple_delta_ke {
                        let ke_old =
                            (mx_old * mx_old + my_old * my_old + mz_old * mz_old) / (S::TWO * d);
                        let ke_new =
                            (mx_new * mx_new + my_new * my_new + mz_new * mz_new) / (S::TWO * d);
                        field.energy[idx] += ke_new - ke_old;
                    } else {
                        // 时间居中的引力做功
                        field.energy[idx] += S::HALF
                            * dt
                            * (gx * (mx_old + mx_new)
                                + gy * (my_old + my_new)
                                + gz * (mz_old + mz_new));
                    }

                    field.momentum_x[idx] = mx_new;
                    field.momentum_y[idx] = my_new;
                    field.momentum_z[idx] = mz_new;
                }
            }
        }
    }
}

/// 解析势协作方：由闭包给出 Φ(x)
///
/// 用于测试与外部势（如恒星质点、匀加速场）驱动的运行；真正的自
/// 引力泊松求解在外部实现。
pub struct AnalyticPotential<F: Fn(DVec3) -> f64 + Send> {
    phi_fn: F,
}

impl<F: Fn(DVec3) -> f64 + Send> AnalyticPotential<F> {
    /// 创建
    pub fn new(phi_fn: F) -> Self {
        Self { phi_fn }
    }
}

impl<S: RuntimeScalar, F: Fn(DVec3) -> f64 + Send> PotentialSolver<S> for AnalyticPotential<F> {
    fn solve_potential(
        &mut self,
        _density: &[S],
        potential: &mut [S],
        grid: &BlockGrid,
        _boundary_flags: [PotentialBoundary; 6],
    ) -> ChResult<()> {
        let t = grid.total_dims();
        for k in 0..t[2] {
            for j in 0..t[1] {
                for i in 0..t[0] {
                    potential[grid.index(i, j, k)] =
                        S::from_config((self.phi_fn)(grid.cell_center(i, j, k)));
                }
            }
        }
        Ok(())
    }
}
