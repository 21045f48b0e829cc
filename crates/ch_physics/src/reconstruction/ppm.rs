// crates/ch_physics/src/reconstruction/ppm.rs

//! 分片抛物重构 (PPMP / PPMC)
//!
//! Colella & Woodward (1984) 的五单元模板抛物重构：
//!
//! 1. 各单元计算限制斜率（PPMC 在特征空间限制）
//! 2. 四阶界面插值 `w_{c+1/2} = ½(w_c + w_{c+1}) − (δw_{c+1} − δw_c)/6`
//! 3. PPMP 在强激波附近做压平（Colella & Woodward 附录 A）
//! 4. 抛物线单调化（式 1.10）
//!
//! 端部单元逐级降阶：PPM → PLM → PCM。
//!
//! # 参考文献
//!
//! Colella, P. & Woodward, P. R. (1984). JCP 54, 174.

use ch_runtime::RuntimeScalar;

use super::limiter::monotonize_parabola;
use super::plm::Plm;
use super::traits::{
    apply_positivity_fallback, pack, unpack, CellState, FacePairs, Reconstruction, ScalarVec,
    N_FIELDS,
};
use crate::eos::GammaLaw;

/// 限制方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpmMode {
    /// 原始变量 + 压平
    Primitive,
    /// 特征变量限制
    Characteristic,
}

/// PPM 重构器
#[derive(Debug, Clone)]
pub struct Ppm<S: RuntimeScalar> {
    plm: Plm<S>,
    mode: PpmMode,
}

impl<S: RuntimeScalar> Ppm<S> {
    /// 创建原始变量版本 (PPMP)
    pub fn primitive(eos: GammaLaw<S>) -> Self {
        Self {
            plm: Plm::primitive(eos),
            mode: PpmMode::Primitive,
        }
    }

    /// 创建特征变量版本 (PPMC)
    ///
    /// 特征限制使用流体特征系（磁流体运行同样如此）。
    pub fn characteristic(eos: GammaLaw<S>) -> Self {
        Self {
            plm: Plm::characteristic(eos),
            mode: PpmMode::Characteristic,
        }
    }

    /// 压平系数（Colella & Woodward 附录 A 的激波探测）
    ///
    /// 返回 0（不压平）到 1（完全回到一阶）。
    fn flattening(&self, row: &[CellState<S>], c: usize) -> S {
        if self.mode != PpmMode::Primitive || c < 2 || c + 2 >= row.len() {
            return S::ZERO;
        }
        let p_m1 = row[c - 1].s.p;
        let p_p1 = row[c + 1].s.p;
        let dp1 = p_p1 - p_m1;
        let dp2 = row[c + 2].s.p - row[c - 2].s.p;

        // 激波判据：足够强的压强跳加上压缩流
        let third = S::ONE / S::from_config(3.0);
        let p_min = p_m1.min(p_p1).max(S::MIN_POSITIVE);
        let is_shock = dp1.abs() / p_min > third && row[c - 1].s.vn > row[c + 1].s.vn;
        if !is_shock {
            return S::ZERO;
        }

        let steepness = if dp2.abs() < S::MIN_POSITIVE {
            S::ONE
        } else {
            dp1 / dp2
        };
        let ten = S::from_config(10.0);
        let offset = S::from_config(0.75);
        (ten * (steepness - offset)).clamp_value(S::ZERO, S::ONE)
    }

    /// 单元 c 的左右边缘状态
    fn cell_edges(&self, row: &[CellState<S>], c: usize) -> (CellState<S>, CellState<S>) {
        let n = row.len();
        // 模板降阶
        if c == 0 || c == n - 1 {
            return (row[c].clone(), row[c].clone());
        }
        if c == 1 || c == n - 2 {
            return self.plm.cell_edges(row, c);
        }

        let (sl_m, ge_sl_m, sc_sl_m) = self.plm.limited_deltas(row, c - 1);
        let (sl_0, ge_sl_0, sc_sl_0) = self.plm.limited_deltas(row, c);
        let (sl_p, ge_sl_p, sc_sl_p) = self.plm.limited_deltas(row, c + 1);

        let wm = pack(&row[c - 1].s);
        let w0 = pack(&row[c].s);
        let wp = pack(&row[c + 1].s);

        let six = S::from_config(6.0);
        let mut lo = [S::ZERO; N_FIELDS];
        let mut hi = [S::ZERO; N_FIELDS];
        for f in 0..N_FIELDS {
            lo[f] = S::HALF * (wm[f] + w0[f]) - (sl_0[f] - sl_m[f]) / six;
            hi[f] = S::HALF * (w0[f] + wp[f]) - (sl_p[f] - sl_0[f]) / six;
        }
        let mut ge_lo = S::HALF * (row[c - 1].ge + row[c].ge) - (ge_sl_0 - ge_sl_m) / six;
        let mut ge_hi = S::HALF * (row[c].ge + row[c + 1].ge) - (ge_sl_p - ge_sl_0) / six;
        let n_sc = row[c].scalars.len();
        let mut sc_lo: ScalarVec<S> = (0..n_sc)
            .map(|k| {
                S::HALF * (row[c - 1].scalars[k] + row[c].scalars[k])
                    - (sc_sl_0[k] - sc_sl_m[k]) / six
            })
            .collect();
        let mut sc_hi: ScalarVec<S> = (0..n_sc)
            .map(|k| {
                S::HALF * (row[c].scalars[k] + row[c + 1].scalars[k])
                    - (sc_sl_p[k] - sc_sl_0[k]) / six
            })
            .collect();

        // 压平：把边缘值拉回单元均值
        let flat = self.flattening(row, c);
        if flat > S::ZERO {
            let keep = S::ONE - flat;
            for f in 0..N_FIELDS {
                lo[f] = flat * w0[f] + keep * lo[f];
                hi[f] = flat * w0[f] + keep * hi[f];
            }
            ge_lo = flat * row[c].ge + keep * ge_lo;
            ge_hi = flat * row[c].ge + keep * ge_hi;
            for k in 0..n_sc {
                sc_lo[k] = flat * row[c].scalars[k] + keep * sc_lo[k];
                sc_hi[k] = flat * row[c].scalars[k] + keep * sc_hi[k];
            }
        }

        // 抛物线单调化
        for f in 0..N_FIELDS {
            let (l, h) = monotonize_parabola(w0[f], lo[f], hi[f]);
            lo[f] = l;
            hi[f] = h;
        }
        let (l, h) = monotonize_parabola(row[c].ge, ge_lo, ge_hi);
        ge_lo = l;
        ge_hi = h;
        for k in 0..n_sc {
            let (l, h) = monotonize_parabola(row[c].scalars[k], sc_lo[k], sc_hi[k]);
            sc_lo[k] = l;
            sc_hi[k] = h;
        }

        let bn = row[c].s.bn;
        (
            CellState {
                s: unpack(&lo, bn),
                ge: ge_lo,
                scalars: sc_lo,
            },
            CellState {
                s: unpack(&hi, bn),
                ge: ge_hi,
                scalars: sc_hi,
            },
        )
    }
}

impl<S: RuntimeScalar> Reconstruction<S> for Ppm<S> {
    fn name(&self) -> &'static str {
        match self.mode {
            PpmMode::Primitive => "PPMP",
            PpmMode::Characteristic => "PPMC",
        }
    }

    fn stencil_half_width(&self) -> usize {
        3
    }

    fn reconstruct_row(&self, row: &[CellState<S>], faces: &mut FacePairs<S>) {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn eos() -> GammaLaw<f64> {
        GammaLaw::new(1.4, 0.6)
    }

    fn row_from(values: &[(f64, f64, f64)]) -> Vec<CellState<f64>> {
        values
            .iter()
            .map(|&(d, vn, p)| {
                let mut c = CellState::default();
                c.s.d = d;
                c.s.vn = vn;
                c.s.p = p;
                c
            })
            .collect()
    }

    fn reconstruct(ppm: &Ppm<f64>, row: &[CellState<f64>]) -> FacePairs<f64> {
        let mut faces = FacePairs::default();
        faces.resize(row.len() - 1);
        ppm.reconstruct_row(row, &mut faces);
        faces
    }

    #[test]
    fn test_uniform_is_exact() {
        let ppm = Ppm::primitive(eos());
        let row = row_from(&[(1.0, 0.5, 2.0); 8]);
        let faces = reconstruct(&ppm, &row);
        for f in 0..faces.len() {
            assert_eq!(faces.left[f].s.d, 1.0);
            assert_eq!(faces.right[f].s.vn, 0.5);
            assert_eq!(faces.right[f].s.p, 2.0);
        }
    }

    #[test]
    fn test_linear_profile_exact_in_interior() {
        let ppm = Ppm::primitive(eos());
        let values: Vec<_> = (0..8).map(|i| (1.0 + 0.1 * i as f64, 0.0, 1.0)).collect();
        let row = row_from(&values);
        let faces = reconstruct(&ppm, &row);
        // 内部界面（两侧都是完整模板）：落在中点
        for f in 3..5 {
            let expected = 1.0 + 0.1 * (f as f64 + 0.5);
            assert!((faces.left[f].s.d - expected).abs() < 1e-13);
            assert!((faces.right[f].s.d - expected).abs() < 1e-13);
        }
    }

    #[test]
    fn test_monotone_profile_stays_bounded() {
        let ppm = Ppm::characteristic(eos());
        let values: Vec<_> = [1.0, 1.1, 1.5, 2.4, 3.0, 3.2, 3.25, 3.3]
            .iter()
            .map(|&d| (d, 0.0, 1.0))
            .collect();
        let row = row_from(&values);
        let faces = reconstruct(&ppm, &row);
        for f in 0..faces.len() {
            let lo = row[f].s.d.min(row[f + 1].s.d);
            let hi = row[f].s.d.max(row[f + 1].s.d);
            assert!(
                faces.left[f].s.d >= lo - 1e-12 && faces.left[f].s.d <= hi + 1e-12,
                "face {f}: {} not in [{lo}, {hi}]",
                faces.left[f].s.d
            );
            assert!(
                faces.right[f].s.d >= lo - 1e-12 && faces.right[f].s.d <= hi + 1e-12,
                "face {f}: {} not in [{lo}, {hi}]",
                faces.right[f].s.d
            );
        }
    }

    #[test]
    fn test_extremum_flattened_to_cell_average() {
        let ppm = Ppm::primitive(eos());
        let values: Vec<_> = [1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0]
            .iter()
            .map(|&d| (d, 0.0, 1.0))
            .collect();
        let row = row_from(&values);
        let faces = reconstruct(&ppm, &row);
        // 单元 3 是极值：两侧边缘都是均值
        assert_eq!(faces.left[3].s.d, 2.0);
        assert_eq!(faces.right[2].s.d, 2.0);
    }

    #[test]
    fn test_shock_flattening_activates() {
        // 强压强跳 + 压缩流：PPMP 的压平应把边缘值拉向均值
        let ppm = Ppm::primitive(eos());
        let values = [
            (1.0, 2.0, 10.0),
            (1.0, 2.0, 10.0),
            (1.0, 1.0, 10.0),
            (1.0, 0.1, 1.0),
            (1.0, 0.1, 1.0),
            (1.0, 0.05, 1.0),
        ];
        let row = row_from(&values);
        let flat = ppm.flattening(&row, 3);
        assert!(flat > 0.0);
        assert!(flat <= 1.0);
        // 远离激波的光滑数据不压平
        let smooth: Vec<_> = (0..6).map(|i| (1.0, 0.0, 1.0 + 0.01 * i as f64)).collect();
        assert_eq!(ppm.flattening(&row_from(&smooth), 3), 0.0);
    }

    #[test]
    fn test_positivity_near_vacuum() {
        let ppm = Ppm::characteristic(eos());
        let values: Vec<_> = [1.0, 0.5, 1e-8, 0.5, 1.0, 1.0]
            .iter()
            .map(|&d| (d, 0.0, 1e-8))
            .collect();
        let row = row_from(&values);
        let faces = reconstruct(&ppm, &row);
        for f in 0..faces.len() {
            assert!(faces.left[f].s.d > 0.0);
            assert!(faces.right[f].s.d > 0.0);
            assert!(faces.left[f].s.p > 0.0);
            assert!(faces.right[f].s.p > 0.0);
        }
    }
}
