// crates/ch_physics/src/reconstruction/plm.rs

//! 分片线性重构 (PLMP / PLMC)
//!
//! 三单元模板上的斜率限制线性重构。PLMP 对原始变量逐分量限制；
//! PLMC 先把 (δρ, δv_n, δp) 投影到流体特征变量上限制再投影回来，
//! 在波的间断处比原始变量限制更干净。
//!
//! 切向磁场、双能量内能与被动标量始终按原始变量限制。

use ch_runtime::RuntimeScalar;

use super::eigen;
use super::limiter::limited_slope;
use super::traits::{
    apply_positivity_fallback, pack, unpack, CellState, FacePairs, Reconstruction, ScalarVec,
    N_FIELDS,
};
use crate::eos::GammaLaw;

/// 限制方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitMode {
    /// 原始变量
    Primitive,
    /// 特征变量
    Characteristic,
}

/// PLM 重构器
#[derive(Debug, Clone)]
pub struct Plm<S: RuntimeScalar> {
    eos: GammaLaw<S>,
    mode: LimitMode,
}

impl<S: RuntimeScalar> Plm<S> {
    /// 创建原始变量版本 (PLMP)
    pub fn primitive(eos: GammaLaw<S>) -> Self {
        Self {
            eos,
            mode: LimitMode::Primitive,
        }
    }

    /// 创建特征变量版本 (PLMC)
    pub fn characteristic(eos: GammaLaw<S>) -> Self {
        Self {
            eos,
            mode: LimitMode::Characteristic,
        }
    }

    /// 单元 c 的限制斜率（原始变量增量形式）
    pub(crate) fn limited_deltas(
        &self,
        row: &[CellState<S>],
        c: usize,
    ) -> ([S; N_FIELDS], S, ScalarVec<S>) {
        let wm = pack(&row[c - 1].s);
        let w0 = pack(&row[c].s);
        let wp = pack(&row[c + 1].s);

        let mut slopes = [S::ZERO; N_FIELDS];
        for f in 0..N_FIELDS {
            slopes[f] = limited_slope(w0[f] - wm[f], wp[f] - w0[f]);
        }

        if self.mode == LimitMode::Characteristic {
            // (ρ, v_n, p) 三个分量改用特征空间限制
            let d = row[c].s.d;
            let a = self.eos.sound_speed(row[c].s.d, row[c].s.p.max(S::MIN_POSITIVE));
            let proj_l = eigen::project(d, a, w0[0] - wm[0], w0[1] - wm[1], w0[4] - wm[4]);
            let proj_r = eigen::project(d, a, wp[0] - w0[0], wp[1] - w0[1], wp[4] - w0[4]);
            let limited = eigen::CharDeltas {
                minus: limited_slope(proj_l.minus, proj_r.minus),
                entropy: limited_slope(proj_l.entropy, proj_r.entropy),
                plus: limited_slope(proj_l.plus, proj_r.plus),
            };
            let (dd, dvn, dp) = eigen::deproject(d, a, &limited);
            slopes[0] = dd;
            slopes[1] = dvn;
            slopes[4] = dp;
        }

        let ge_slope = limited_slope(
            row[c].ge - row[c - 1].ge,
            row[c + 1].ge - row[c].ge,
        );
        let scalar_slopes: ScalarVec<S> = (0..row[c].scalars.len())
            .map(|k| {
                limited_slope(
                    row[c].scalars[k] - row[c - 1].scalars[k],
                    row[c + 1].scalars[k] - row[c].scalars[k],
                )
            })
            .collect();

        (slopes, ge_slope, scalar_slopes)
    }

    /// 单元 c 的左右边缘状态
    pub(crate) fn cell_edges(
        &self,
        row: &[CellState<S>],
        c: usize,
    ) -> (CellState<S>, CellState<S>) {
        if c == 0 || c == row.len() - 1 {
            // 模板不足：降为 PCM
            return (row[c].clone(), row[c].clone());
        }
        let (slopes, ge_slope, scalar_slopes) = self.limited_deltas(row, c);
        let w0 = pack(&row[c].s);

        let mut lo = [S::ZERO; N_FIELDS];
        let mut hi = [S::ZERO; N_FIELDS];
        for f in 0..N_FIELDS {
            lo[f] = w0[f] - S::HALF * slopes[f];
            hi[f] = w0[f] + S::HALF * slopes[f];
        }

        let bn = row[c].s.bn;
        let left = CellState {
            s: unpack(&lo, bn),
            ge: row[c].ge - S::HALF * ge_slope,
            scalars: (0..scalar_slopes.len())
                .map(|k| row[c].scalars[k] - S::HALF * scalar_slopes[k])
                .collect(),
        };
        let right = CellState {
            s: unpack(&hi, bn),
            ge: row[c].ge + S::HALF * ge_slope,
            scalars: (0..scalar_slopes.len())
                .map(|k| row[c].scalars[k] + S::HALF * scalar_slopes[k])
                .collect(),
        };
        (left, right)
    }
}

impl<S: RuntimeScalar> Reconstruction<S> for Plm<S> {
    fn name(&self) -> &'static str {
        match self.mode {
            LimitMode::Primitive => "PLMP",
            LimitMode::Characteristic => "PLMC",
        }
    }

    fn stencil_half_width(&self) -> usize {
        2
    }

    fn reconstruct_row(&self, row: &[CellState<S>], faces: &mut FacePairs<S>) {
        // 先算每个单元的边缘对，再装配到界面
        let mut prev_right: Option<CellState<S>> = None;
        for c in 0..row.len() {
            let (lo, hi) = self.cell_edges(row, c);
            if c > 0 {
                faces.right[c - 1] = lo;
            }
            if let Some(pr) = prev_right.take() {
                faces.left[c - 1] = pr;
            }
            prev_right = Some(hi);
        }
        apply_positivity_fallback(row, faces);
    }
}
