// crates/ch_physics/src/riemann/exact.rs

//! Toro 迭代精确黎曼求解器（纯流体）
//!
//! 对星区域压强做 Newton-Raphson 迭代（至多 20 次，收敛判据
//! `2|p − p_old|/(p + p_old) ≤ 1e-6`），初猜来自 PVRS 并以双激波
//! 估计兜底；不收敛时保留最后一次迭代值继续。之后在自相似变量
//! ξ = x/t 处采样波系。
//!
//! # 参考文献
//!
//! Toro, E. F. (2009). Riemann Solvers and Numerical Methods for Fluid
//! Dynamics, 3rd ed., Sect. 4.2-4.3, 9.5.

use ch_runtime::{ChResult, RuntimeScalar};

use crate::eos::GammaLaw;
use crate::riemann::traits::{AxisFlux, AxisState, RiemannSolver, SolverCapabilities};

const NEWTON_ITERATIONS: usize = 20;

/// 精确求解器
#[derive(Debug, Clone)]
pub struct ExactSolver<S: RuntimeScalar> {
    eos: GammaLaw<S>,
    pressure_floor: S,
    tolerance: S,
}

impl<S: RuntimeScalar> ExactSolver<S> {
    /// 创建求解器
    pub fn new(eos: GammaLaw<S>, pressure_floor: S) -> Self {
        Self {
            eos,
            pressure_floor,
            tolerance: S::from_config(1e-6),
        }
    }

    /// PVRS 初猜，负值时退回双激波估计
    fn guess_pressure(&self, l: &AxisState<S>, r: &AxisState<S>, cl: S, cr: S) -> S {
        let gamma = self.eos.gamma;
        let eighth = S::from_config(0.125);

        let ppv = S::HALF * (l.p + r.p) + eighth * (l.vn - r.vn) * (l.d + r.d) * (cl + cr);
        let ppv = ppv.max(S::ZERO);

        // 以 PVRS 为估计的双激波求解器
        let gp1 = gamma + S::ONE;
        let gm1 = gamma - S::ONE;
        let gl = ((S::TWO / (gp1 * l.d)) / ((gm1 / gp1) * l.p + ppv)).sqrt();
        let gr = ((S::TWO / (gp1 * r.d)) / ((gm1 / gp1) * r.p + ppv)).sqrt();
        let p0 = (gl * l.p + gr * r.p - (r.vn - l.vn)) / (gl + gr);

        if p0 < S::ZERO {
            self.tolerance
        } else {
            p0
        }
    }

    /// 压强函数 f_K 及其导数（K = L/R 之一）
    fn pressure_function(&self, p: S, dk: S, pk: S, ck: S) -> (S, S) {
        let gamma = self.eos.gamma;
        let gm1 = gamma - S::ONE;
        let gp1 = gamma + S::ONE;
        if p <= pk {
            // 稀疏波
            let pratio = p / pk;
            let f = (S::TWO / gm1) * ck * (pratio.powf(gm1 / (S::TWO * gamma)) - S::ONE);
            let fd = (S::ONE / (dk * ck)) * pratio.powf(-(gp1 / (S::TWO * gamma)));
            (f, fd)
        } else {
            // 激波
            let ak = (S::TWO / gp1) / dk;
            let bk = (gm1 / gp1) * pk;
            let qrt = (ak / (bk + p)).sqrt();
            let f = (p - pk) * qrt;
            let fd = (S::ONE - S::HALF * (p - pk) / (bk + p)) * qrt;
            (f, fd)
        }
    }

    /// 星区域压强与速度
    ///
    /// 作为公开接口暴露，供测试与参考解生成使用。
    pub fn star_region(&self, l: &AxisState<S>, r: &AxisState<S>) -> (S, S) {
        let cl = self.eos.sound_speed(l.d, l.p);
        let cr = self.eos.sound_speed(r.d, r.p);

        let mut p_old = self.guess_pressure(l, r, cl, cr);
        let mut p = p_old;
        for _ in 0..NEWTON_ITERATIONS {
            let (fl, fld) = self.pressure_function(p_old, l.d, l.p, cl);
            let (fr, frd) = self.pressure_function(p_old, r.d, r.p, cr);
            p = p_old - (fl + fr + r.vn - l.vn) / (fld + frd);
            let change = S::TWO * ((p - p_old) / (p + p_old)).abs();
            if change <= self.tolerance {
                break;
            }
            if p < S::ZERO {
                p = self.tolerance;
            }
            p_old = p;
        }
        // 不收敛时保留最后一次迭代值

        let (fl, _) = self.pressure_function(p, l.d, l.p, cl);
        let (fr, _) = self.pressure_function(p, r.d, r.p, cr);
        let u = S::HALF * (l.vn + r.vn + fr - fl);
        (p, u)
    }

    /// 在自相似变量 ξ = x/t 处采样波系
    ///
    /// 返回 (ρ, u, p)。跨界面通量取 ξ = 0。
    pub fn sample(
        &self,
        pm: S,
        um: S,
        l: &AxisState<S>,
        r: &AxisState<S>,
        xi: S,
    ) -> (S, S, S) {
        let gamma = self.eos.gamma;
        let gm1 = gamma - S::ONE;
        let gp1 = gamma + S::ONE;
        let cl = self.eos.sound_speed(l.d, l.p);
        let cr = self.eos.sound_speed(r.d, r.p);

        if um >= xi {
            // 采样点位于接触间断左侧
            if pm <= l.p {
                // 左稀疏波
                if l.vn - cl >= xi {
                    (l.d, l.vn, l.p)
                } else {
                    let cml = cl * (pm / l.p).powf(gm1 / (S::TWO * gamma));
                    if um - cml < xi {
                        // 左星区域
                        (l.d * (pm / l.p).powf(S::ONE / gamma), um, pm)
                    } else {
                        // 左扇内部
                        let u = (S::TWO / gp1) * (cl + S::HALF * gm1 * l.vn + xi);
                        let c = (S::TWO / gp1) * (cl + S::HALF * gm1 * (l.vn - xi));
                        let d = l.d * (c / cl).powf(S::TWO / gm1);
                        let p = l.p * (c / cl).powf(S::TWO * gamma / gm1);
                        (d, u, p)
                    }
                }
            } else {
                // 左激波
                let pml = pm / l.p;
                let sl =
                    l.vn - cl * ((gp1 / (S::TWO * gamma)) * pml + gm1 / (S::TWO * gamma)).sqrt();
                if sl >= xi {
                    (l.d, l.vn, l.p)
                } else {
                    let d = l.d * (pml + gm1 / gp1) / (pml * (gm1 / gp1) + S::ONE);
                    (d, um, pm)
                }
            }
        } else {
            // 采样点位于接触间断右侧
            if pm > r.p {
                // 右激波
                let pmr = pm / r.p;
                let sr =
                    r.vn + cr * ((gp1 / (S::TWO * gamma)) * pmr + gm1 / (S::TWO * gamma)).sqrt();
                if sr <= xi {
                    (r.d, r.vn, r.p)
                } else {
                    let d = r.d * (pmr + gm1 / gp1) / (pmr * (gm1 / gp1) + S::ONE);
                    (d, um, pm)
                }
            } else {
                // 右稀疏波
                if r.vn + cr <= xi {
                    (r.d, r.vn, r.p)
                } else {
                    let cmr = cr * (pm / r.p).powf(gm1 / (S::TWO * gamma));
                    if um + cmr >= xi {
                        // 右星区域
                        (r.d * (pm / r.p).powf(S::ONE / gamma), um, pm)
                    } else {
                        // 右扇内部
                        let u = (S::TWO / gp1) * (-cr + S::HALF * gm1 * r.vn + xi);
                        let c = (S::TWO / gp1) * (cr - S::HALF * gm1 * (r.vn - xi));
                        let d = r.d * (c / cr).powf(S::TWO / gm1);
                        let p = r.p * (c / cr).powf(S::TWO * gamma / gm1);
                        (d, u, p)
                    }
                }
            }
        }
    }
}

impl<S: RuntimeScalar> RiemannSolver<S> for ExactSolver<S> {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn capabilities(&self) -> SolverCapabilities {
        SolverCapabilities {
            supports_mhd: false,
            resolves_contact: true,
            has_entropy_fix: false,
        }
    }

    fn solve(&self, left: &AxisState<S>, right: &AxisState<S>) -> ChResult<AxisFlux<S>> {
        let gamma = self.eos.gamma;
        let mut l = *left;
        let mut r = *right;
        l.p = l.p.max(self.pressure_floor);
        r.p = r.p.max(self.pressure_floor);

        let (pm, um) = self.star_region(&l, &r);
        let (ds, us, ps) = self.sample(pm, um, &l, &r, S::ZERO);

        // 切向速度随接触波上风取值
        let (vt1, vt2) = if us >= S::ZERO {
            (l.vt1, l.vt2)
        } else {
            (r.vt1, r.vt2)
        };

        let es = ps / (gamma - S::ONE) + S::HALF * ds * (us * us + vt1 * vt1 + vt2 * vt2);
        let cl = self.eos.sound_speed(l.d, l.p);
        let cr = self.eos.sound_speed(r.d, r.p);
        Ok(AxisFlux {
            d: ds * us,
            mn: ds * us * us + ps,
            mt1: ds * us * vt1,
            mt2: ds * us * vt2,
            e: (es + ps) * us,
            bt1: S::ZERO,
            bt2: S::ZERO,
            max_speed: (l.vn.abs() + cl).max(r.vn.abs() + cr),
        })
    }

    fn eos(&self) -> &GammaLaw<S> {
        &self.eos
    }
}
