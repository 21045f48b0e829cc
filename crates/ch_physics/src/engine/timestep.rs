// crates/ch_physics/src/engine/timestep.rs

//! 时间步长控制
//!
//! 基于 CFL 条件的稳定时间步长：
//!
//! `Δt = C · min_cells min_axis ( Δh / (|v| + c_f) )`
//!
//! c_f 取声速（纯流体）或沿该方向的快磁声速（磁流体）。冷的静止
//! 单元通过压强地板保证 `c_f ≥ sqrt(γ p_floor / ρ)`，避免波速为零
//! 导致的病态步长。并行最大值规约用位转换的原子操作实现。
//!
//! 跨块的全局最小值规约由 [`DomainReduce`](crate::traits::DomainReduce)
//! 协作方在求解器层完成。

use ch_runtime::{Axis, RuntimeScalar};
use num_traits::ToPrimitive;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::eos::GammaLaw;
use crate::grid::BlockGrid;
use crate::state::{FieldBlock, FloorParams};

/// CFL 时间步计算器
#[derive(Debug, Clone)]
pub struct CflController {
    /// CFL 数
    pub cfl: f64,
    /// 步长上限
    pub dt_max: f64,
}

impl CflController {
    /// 创建控制器
    pub fn new(cfl: f64, dt_max: f64) -> Self {
        Self { cfl, dt_max }
    }

    /// 计算本块的稳定时间步长
    pub fn compute_dt<S: RuntimeScalar>(
        &self,
        field: &FieldBlock<S>,
        grid: &BlockGrid,
        eos: &GammaLaw<S>,
        floors: &FloorParams<S>,
    ) -> f64 {
        let n = grid.n;
        let g = grid.ghost;

        // 收集 max over cells,axes 的 (|v| + c_f)/Δh，位转换原子最大值
        let max_rate = AtomicU64::new(0u64);

        (0..grid.interior_cells()).into_par_iter().for_each(|cell| {
            let i = cell % n[0];
            let j = (cell / n[0]) % n[1];
            let k = cell / (n[0] * n[1]);
            let idx = grid.index(i + g, j + g, k + g);

            let u = field.conserved_at(idx);
            let p = eos.pressure(&u).max(floors.pressure);
            let v = [u.mx / u.d, u.my / u.d, u.mz / u.d];

            let mut rate = 0.0f64;
            for axis in Axis::ALL {
                let a = axis.index();
                let cf = eos.fast_magnetosonic(u.d, p, u.b, u.b[a]);
                let cell_rate = (v[a].abs() + cf).to_f64().unwrap_or(f64::MAX) / grid.dh[a];
                rate = rate.max(cell_rate);
            }

            max_rate.fetch_max(rate.to_bits(), Ordering::Relaxed);
        });

        let max_rate = f64::from_bits(max_rate.load(Ordering::Relaxed));
        if max_rate <= 0.0 {
            return self.dt_max;
        }
        (self.cfl / max_rate).min(self.dt_max)
    }
}
