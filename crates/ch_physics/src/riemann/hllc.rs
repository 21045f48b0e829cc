// crates/ch_physics/src/riemann/hllc.rs

//! HLLC 近似黎曼求解器（纯流体）
//!
//! HLLC (Harten-Lax-van Leer-Contact) 用左激波、接触波、右激波三波
//! 近似解的波系，能够分辨接触间断，是纯流体运行的默认求解器。
//!
//! # 核心算法
//!
//! 1. 用 Roe 平均的 Davis/Einfeldt 估计确定外侧波速 S_L、S_R
//! 2. 由跨接触压强一致性求中间波速 S*
//! 3. 按 S_L、S*、S_R 的符号选取通量区域
//!
//! # 参考文献
//!
//! Toro, E. F. (2009). Riemann Solvers and Numerical Methods for Fluid
//! Dynamics, 3rd ed., Sect. 10.4.

use ch_runtime::{ChResult, RuntimeScalar};

use crate::eos::GammaLaw;
use crate::riemann::traits::{
    physical_flux, AxisConserved, AxisFlux, AxisState, RiemannSolver, SolverCapabilities,
};

/// HLLC 求解器
#[derive(Debug, Clone)]
pub struct HllcSolver<S: RuntimeScalar> {
    eos: GammaLaw<S>,
    pressure_floor: S,
}

impl<S: RuntimeScalar> HllcSolver<S> {
    /// 创建求解器
    pub fn new(eos: GammaLaw<S>, pressure_floor: S) -> Self {
        Self {
            eos,
            pressure_floor,
        }
    }

    /// Davis/Einfeldt 波速估计（经 Roe 平均）
    fn wave_speeds(&self, l: &AxisState<S>, r: &AxisState<S>) -> (S, S) {
        let gamma = self.eos.gamma;
        let sq_l = l.d.sqrt();
        let sq_r = r.d.sqrt();
        let inv = S::ONE / (sq_l + sq_r);

        let u_roe = (sq_l * l.vn + sq_r * r.vn) * inv;
        let v_roe = (sq_l * l.vt1 + sq_r * r.vt1) * inv;
        let w_roe = (sq_l * l.vt2 + sq_r * r.vt2) * inv;
        let h_l = (l.total_energy(gamma) + l.p) / l.d;
        let h_r = (r.total_energy(gamma) + r.p) / r.d;
        let h_roe = (sq_l * h_l + sq_r * h_r) * inv;
        let q2 = u_roe * u_roe + v_roe * v_roe + w_roe * w_roe;
        let a_roe = ((gamma - S::ONE) * (h_roe - S::HALF * q2)).safe_sqrt();

        let a_l = self.eos.sound_speed(l.d, l.p);
        let a_r = self.eos.sound_speed(r.d, r.p);

        let s_l = (l.vn - a_l).min(u_roe - a_roe);
        let s_r = (r.vn + a_r).max(u_roe + a_roe);
        (s_l, s_r)
    }

    /// 星区域状态 U*_K 与跨界面通量 F_K + S_K (U*_K − U_K)
    fn star_flux(&self, w: &AxisState<S>, s_k: S, s_star: S) -> AxisFlux<S> {
        let gamma = self.eos.gamma;
        let u = AxisConserved::from_state(w, gamma);
        let f = physical_flux(w, gamma);

        let factor = w.d * (s_k - w.vn) / (s_k - s_star);
        let d_star = factor;
        let mn_star = factor * s_star;
        let mt1_star = factor * w.vt1;
        let mt2_star = factor * w.vt2;
        let e_star = factor
            * (u.e / w.d
                + (s_star - w.vn) * (s_star + w.p / (w.d * (s_k - w.vn))));

        AxisFlux {
            d: f.d + s_k * (d_star - u.d),
            mn: f.mn + s_k * (mn_star - u.mn),
            mt1: f.mt1 + s_k * (mt1_star - u.mt1),
            mt2: f.mt2 + s_k * (mt2_star - u.mt2),
            e: f.e + s_k * (e_star - u.e),
            bt1: S::ZERO,
            bt2: S::ZERO,
            max_speed: S::ZERO,
        }
    }
}

impl<S: RuntimeScalar> RiemannSolver<S> for HllcSolver<S> {
    fn name(&self) -> &'static str {
        "HLLC"
    }

    fn capabilities(&self) -> SolverCapabilities {
        SolverCapabilities {
            supports_mhd: false,
            resolves_contact: true,
            has_entropy_fix: false,
        }
    }

    fn solve(&self, left: &AxisState<S>, right: &AxisState<S>) -> ChResult<AxisFlux<S>> {
        // 压强地板：不中止，继续求解
        let mut l = *left;
        let mut r = *right;
        l.p = l.p.max(self.pressure_floor);
        r.p = r.p.max(self.pressure_floor);

        let (s_l, s_r) = self.wave_speeds(&l, &r);

        // 中间波速：跨接触的压强一致公式
        let denom = l.d * (s_l - l.vn) - r.d * (s_r - r.vn);
        let s_star = if denom.abs() < S::MIN_POSITIVE {
            S::HALF * (l.vn + r.vn)
        } else {
            (r.p - l.p + l.d * l.vn * (s_l - l.vn) - r.d * r.vn * (s_r - r.vn)) / denom
        };

        let mut flux = if s_l >= S::ZERO {
            physical_flux(&l, self.eos.gamma)
        } else if s_star >= S::ZERO {
            self.star_flux(&l, s_l, s_star)
        } else if s_r >= S::ZERO {
            self.star_flux(&r, s_r, s_star)
        } else {
            physical_flux(&r, self.eos.gamma)
        };
        flux.max_speed = s_l.abs().max(s_r.abs());
        Ok(flux)
    }

    fn eos(&self) -> &GammaLaw<S> {
        &self.eos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver(gamma: f64) -> HllcSolver<f64> {
        HllcSolver::new(GammaLaw::new(gamma, 0.6), 1e-20)
    }

    fn hydro_state(d: f64, vn: f64, p: f64) -> AxisState<f64> {
        AxisState {
            d,
            vn,
            p,
            ..Default::default()
        }
    }

    #[test]
    fn test_degenerate_consistency() {
        // 两侧相同 → 解析通量，零耗散
        let solver = solver(1.4);
        let w = AxisState {
            d: 1.3,
            vn: 0.7,
            vt1: -0.2,
            vt2: 0.1,
            p: 2.0,
            ..Default::default()
        };
        let f = solver.solve(&w, &w).unwrap();
        let exact = physical_flux(&w, 1.4);
        assert!((f.d - exact.d).abs() < 1e-13);
        assert!((f.mn - exact.mn).abs() < 1e-13);
        assert!((f.mt1 - exact.mt1).abs() < 1e-13);
        assert!((f.e - exact.e).abs() < 1e-13);
    }

    #[test]
    fn test_still_contact_resolved() {
        // 压强速度一致、密度有跳：接触波应当精确保持（零质量通量）
        let solver = solver(1.4);
        let l = hydro_state(1.0, 0.0, 1.0);
        let r = hydro_state(0.5, 0.0, 1.0);
        let f = solver.solve(&l, &r).unwrap();
        assert!(f.d.abs() < 1e-14);
        assert!((f.mn - 1.0).abs() < 1e-14);
        assert!(f.e.abs() < 1e-14);
    }

    #[test]
    fn test_sod_flux_direction() {
        // Sod 初始状态：质量通量朝右
        let solver = solver(1.4);
        let l = hydro_state(1.0, 0.0, 1.0);
        let r = hydro_state(0.125, 0.0, 0.1);
        let f = solver.solve(&l, &r).unwrap();
        assert!(f.d > 0.0);
        assert!(f.is_valid());
        assert!(f.max_speed > 0.0);
    }

    #[test]
    fn test_supersonic_upwind() {
        // 整体超声速右行：通量等于左侧解析通量
        let solver = solver(1.4);
        let l = hydro_state(1.0, 10.0, 1.0);
        let r = hydro_state(1.0, 10.0, 1.0);
        let mut l2 = l;
        l2.vt1 = 0.5;
        let f = solver.solve(&l2, &r).unwrap();
        let exact = physical_flux(&l2, 1.4);
        assert!((f.d - exact.d).abs() < 1e-12);
        assert!((f.mt1 - exact.mt1).abs() < 1e-12);
    }

    #[test]
    fn test_negative_pressure_floored() {
        let solver = solver(1.4);
        let l = hydro_state(1.0, 0.0, -1.0);
        let r = hydro_state(1.0, 0.0, 0.5);
        let f = solver.solve(&l, &r).unwrap();
        assert!(f.is_valid());
    }
}
