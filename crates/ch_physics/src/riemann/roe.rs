// crates/ch_physics/src/riemann/roe.rs

//! Roe 线性化黎曼求解器（纯流体）
//!
//! 在 Roe 平均态上对 Euler 方程做线性化，按五个特征波分解界面跳量。
//! 真非线性场（两支声波）施加 Harten-Hyman 熵修正：跨音速稀疏波被
//! 按左右特征速度比例劈开，避免产生违反熵条件的膨胀激波。
//!
//! # 参考文献
//!
//! Roe, P. L. (1981). JCP 43, 357. Toro (2009) Sect. 11.2-11.4.

use ch_runtime::{ChResult, RuntimeScalar};

use crate::eos::GammaLaw;
use crate::riemann::traits::{
    physical_flux, AxisFlux, AxisState, RiemannSolver, SolverCapabilities,
};

/// Roe 求解器
#[derive(Debug, Clone)]
pub struct RoeSolver<S: RuntimeScalar> {
    eos: GammaLaw<S>,
    pressure_floor: S,
}

/// Roe 平均态
struct RoeAverage<S> {
    u: S,
    v: S,
    w: S,
    h: S,
    a: S,
    d: S,
}

impl<S: RuntimeScalar> RoeSolver<S> {
    /// 创建求解器
    pub fn new(eos: GammaLaw<S>, pressure_floor: S) -> Self {
        Self {
            eos,
            pressure_floor,
        }
    }

    fn average(&self, l: &AxisState<S>, r: &AxisState<S>) -> RoeAverage<S> {
        let gamma = self.eos.gamma;
        let sq_l = l.d.sqrt();
        let sq_r = r.d.sqrt();
        let inv = S::ONE / (sq_l + sq_r);

        let u = (sq_l * l.vn + sq_r * r.vn) * inv;
        let v = (sq_l * l.vt1 + sq_r * r.vt1) * inv;
        let w = (sq_l * l.vt2 + sq_r * r.vt2) * inv;
        let h_l = (l.total_energy(gamma) + l.p) / l.d;
        let h_r = (r.total_energy(gamma) + r.p) / r.d;
        let h = (sq_l * h_l + sq_r * h_r) * inv;
        let q2 = u * u + v * v + w * w;
        let a = ((gamma - S::ONE) * (h - S::HALF * q2)).safe_sqrt();
        RoeAverage {
            u,
            v,
            w,
            h,
            a,
            d: sq_l * sq_r,
        }
    }

    /// Harten-Hyman 熵修正：跨音速时返回劈开后的左行波速
    ///
    /// `lambda_l`/`lambda_r` 是该特征族在左右物理状态上的速度。
    #[inline]
    fn left_going(lambda: S, lambda_l: S, lambda_r: S) -> S {
        if lambda_l < S::ZERO && lambda_r > S::ZERO {
            // 跨音速稀疏波：λ⁻ = λ_L (λ_R − λ̂)/(λ_R − λ_L)
            lambda_l * (lambda_r - lambda) / (lambda_r - lambda_l)
        } else {
            lambda.min(S::ZERO)
        }
    }
}

impl<S: RuntimeScalar> RiemannSolver<S> for RoeSolver<S> {
    fn name(&self) -> &'static str {
        "Roe"
    }

    fn capabilities(&self) -> SolverCapabilities {
        SolverCapabilities {
            supports_mhd: false,
            resolves_contact: true,
            has_entropy_fix: true,
        }
    }

    fn solve(&self, left: &AxisState<S>, right: &AxisState<S>) -> ChResult<AxisFlux<S>> {
        let gamma = self.eos.gamma;
        let mut l = *left;
        let mut r = *right;
        l.p = l.p.max(self.pressure_floor);
        r.p = r.p.max(self.pressure_floor);

        let roe = self.average(&l, &r);
        let a = roe.a;
        let a2 = a * a;

        // 界面跳量
        let dd = r.d - l.d;
        let du = r.vn - l.vn;
        let dv = r.vt1 - l.vt1;
        let dw = r.vt2 - l.vt2;
        let dp = r.p - l.p;

        // 波强（Toro 11.68-11.70 的原始变量形式）
        let alpha_minus = (dp - roe.d * a * du) / (S::TWO * a2);
        let alpha_contact = dd - dp / a2;
        let alpha_plus = (dp + roe.d * a * du) / (S::TWO * a2);

        // 特征速度与熵修正后的左行部分
        let a_l = self.eos.sound_speed(l.d, l.p);
        let a_r = self.eos.sound_speed(r.d, r.p);
        let lam_minus = Self::left_going(roe.u - a, l.vn - a_l, r.vn - a_r);
        let lam_contact = (roe.u).min(S::ZERO);
        let lam_plus = Self::left_going(roe.u + a, l.vn + a_l, r.vn + a_r);

        // F = F_L + Σ λ⁻_k α_k K_k
        let q2 = roe.u * roe.u + roe.v * roe.v + roe.w * roe.w;
        let mut flux = physical_flux(&l, gamma);

        // 左声波 K = [1, u−a, v, w, H−ua]
        let lam_alpha = lam_minus * alpha_minus;
        flux.d += lam_alpha;
        flux.mn += lam_alpha * (roe.u - a);
        flux.mt1 += lam_alpha * roe.v;
        flux.mt2 += lam_alpha * roe.w;
        flux.e += lam_alpha * (roe.h - roe.u * a);

        // 熵波 K = [1, u, v, w, ½q²] 与两支剪切波
        let lam_alpha = lam_contact * alpha_contact;
        flux.d += lam_alpha;
        flux.mn += lam_alpha * roe.u;
        flux.mt1 += lam_alpha * roe.v;
        flux.mt2 += lam_alpha * roe.w;
        flux.e += lam_alpha * S::HALF * q2;

        let shear1 = lam_contact * roe.d * dv;
        let shear2 = lam_contact * roe.d * dw;
        flux.mt1 += shear1;
        flux.mt2 += shear2;
        flux.e += shear1 * roe.v + shear2 * roe.w;

        // 右声波 K = [1, u+a, v, w, H+ua]
        let lam_alpha = lam_plus * alpha_plus;
        flux.d += lam_alpha;
        flux.mn += lam_alpha * (roe.u + a);
        flux.mt1 += lam_alpha * roe.v;
        flux.mt2 += lam_alpha * roe.w;
        flux.e += lam_alpha * (roe.h + roe.u * a);

        flux.max_speed = (roe.u.abs() + a)
            .max(l.vn.abs() + a_l)
            .max(r.vn.abs() + a_r);
        Ok(flux)
    }

    fn eos(&self) -> &GammaLaw<S> {
        &self.eos
    }
}
