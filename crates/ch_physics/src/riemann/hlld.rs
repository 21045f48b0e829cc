// crates/ch_physics/src/riemann/hlld.rs

//! HLLD 近似黎曼求解器（磁流体）
//!
//! 五波近似：两支快波、两支 Alfvén 波（旋转间断）、一个接触波，把
//! 解划分为六个区域。星区域位于快波与 Alfvén 波之间，双星区域位于
//! 两支 Alfvén 波之间。
//!
//! # 内部流程
//!
//! 1. 由左右特征速度估计外侧波速 S_L、S_R
//! 2. 求跨接触一致的中间波速 S_M 与总压 p_T*
//! 3. 构建接触两侧的星状态
//! 4. `B_n ≠ 0` 时构建双星状态；`B_n = 0` 时 Alfvén 分支退化，
//!    双星量塌缩为星值、星状态磁场取上风单元值
//! 5. 选取包含 ξ = 0 的区域对应的通量
//!
//! # 参考文献
//!
//! Miyoshi, T. & Kusano, K. (2005). JCP 208, 315.

use ch_runtime::{ChResult, RuntimeScalar};

use crate::eos::GammaLaw;
use crate::riemann::traits::{
    physical_flux, AxisConserved, AxisFlux, AxisState, RiemannSolver, SolverCapabilities,
};

/// HLLD 求解器
#[derive(Debug, Clone)]
pub struct HlldSolver<S: RuntimeScalar> {
    eos: GammaLaw<S>,
    pressure_floor: S,
}

/// 星区域状态（守恒形式）
#[derive(Debug, Clone, Copy)]
struct StarState<S: RuntimeScalar> {
    d: S,
    vn: S,
    vt1: S,
    vt2: S,
    e: S,
    bt1: S,
    bt2: S,
}

impl<S: RuntimeScalar> StarState<S> {
    fn conserved(&self) -> AxisConserved<S> {
        AxisConserved {
            d: self.d,
            mn: self.d * self.vn,
            mt1: self.d * self.vt1,
            mt2: self.d * self.vt2,
            e: self.e,
            bt1: self.bt1,
            bt2: self.bt2,
        }
    }
}

/// F_K + S_K (U* − U_K) 形式的通量组合
fn jump_flux<S: RuntimeScalar>(
    f: &AxisFlux<S>,
    s: S,
    star: &AxisConserved<S>,
    u: &AxisConserved<S>,
) -> AxisFlux<S> {
    AxisFlux {
        d: f.d + s * (star.d - u.d),
        mn: f.mn + s * (star.mn - u.mn),
        mt1: f.mt1 + s * (star.mt1 - u.mt1),
        mt2: f.mt2 + s * (star.mt2 - u.mt2),
        e: f.e + s * (star.e - u.e),
        bt1: f.bt1 + s * (star.bt1 - u.bt1),
        bt2: f.bt2 + s * (star.bt2 - u.bt2),
        max_speed: S::ZERO,
    }
}

impl<S: RuntimeScalar> HlldSolver<S> {
    /// 创建求解器
    pub fn new(eos: GammaLaw<S>, pressure_floor: S) -> Self {
        Self {
            eos,
            pressure_floor,
        }
    }

    /// 快波外包络估计（Miyoshi & Kusano 式 67）
    fn wave_speeds(&self, l: &AxisState<S>, r: &AxisState<S>) -> (S, S) {
        let cf_l = self
            .eos
            .fast_magnetosonic(l.d, l.p, [l.bn, l.bt1, l.bt2], l.bn);
        let cf_r = self
            .eos
            .fast_magnetosonic(r.d, r.p, [r.bn, r.bt1, r.bt2], r.bn);
        let cf = cf_l.max(cf_r);
        (l.vn.min(r.vn) - cf, l.vn.max(r.vn) + cf)
    }

    /// 单侧星状态（快波与 Alfvén 波之间，Miyoshi & Kusano 式 43-48）
    #[allow(clippy::too_many_arguments)]
    fn star_state(
        &self,
        w: &AxisState<S>,
        u: &AxisConserved<S>,
        s_k: S,
        s_m: S,
        pt_star: S,
        bn: S,
        pt_k: S,
    ) -> StarState<S> {
        let d_star = w.d * (s_k - w.vn) / (s_k - s_m);
        let denom = w.d * (s_k - w.vn) * (s_k - s_m) - bn * bn;

        let (vt1, vt2, bt1, bt2) = if denom.abs() < S::EPSILON * w.d * s_k.abs().max(S::ONE) {
            // 退化：S_M 与该侧 Alfvén 波速重合，切向量无跳
            (w.vt1, w.vt2, w.bt1, w.bt2)
        } else {
            let coef_v = bn * (s_m - w.vn) / denom;
            let coef_b = (w.d * (s_k - w.vn) * (s_k - w.vn) - bn * bn) / denom;
            (
                w.vt1 - w.bt1 * coef_v,
                w.vt2 - w.bt2 * coef_v,
                w.bt1 * coef_b,
                w.bt2 * coef_b,
            )
        };

        let v_dot_b = w.v_dot_b();
        let v_dot_b_star = s_m * bn + vt1 * bt1 + vt2 * bt2;
        let e_star = ((s_k - w.vn) * u.e - pt_k * w.vn
            + pt_star * s_m
            + bn * (v_dot_b - v_dot_b_star))
            / (s_k - s_m);

        StarState {
            d: d_star,
            vn: s_m,
            vt1,
            vt2,
            e: e_star,
            bt1,
            bt2,
        }
    }
}

impl<S: RuntimeScalar> RiemannSolver<S> for HlldSolver<S> {
    fn name(&self) -> &'static str {
        "HLLD"
    }

    fn capabilities(&self) -> SolverCapabilities {
        SolverCapabilities {
            supports_mhd: true,
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
        // 法向磁场跨界面连续
        let bn = S::HALF * (l.bn + r.bn);
        l.bn = bn;
        r.bn = bn;

        let (s_l, s_r) = self.wave_speeds(&l, &r);
        let max_speed = s_l.abs().max(s_r.abs());

        let f_l = physical_flux(&l, gamma);
        let f_r = physical_flux(&r, gamma);
        if s_l >= S::ZERO {
            let mut f = f_l;
            f.max_speed = max_speed;
            return Ok(f);
        }
        if s_r <= S::ZERO {
            let mut f = f_r;
            f.max_speed = max_speed;
            return Ok(f);
        }

        let u_l = AxisConserved::from_state(&l, gamma);
        let u_r = AxisConserved::from_state(&r, gamma);
        let pt_l = l.total_pressure();
        let pt_r = r.total_pressure();

        // 中间波速与跨接触一致的总压（Miyoshi & Kusano 式 38, 41）
        let dl_sl = l.d * (s_l - l.vn);
        let dr_sr = r.d * (s_r - r.vn);
        let s_m = (dr_sr * r.vn - dl_sl * l.vn - pt_r + pt_l) / (dr_sr - dl_sl);
        let pt_star = (dr_sr * pt_l - dl_sl * pt_r + dl_sl * dr_sr * (r.vn - l.vn))
            / (dr_sr - dl_sl);
        let pt_star = pt_star.max(self.pressure_floor);

        let star_l = self.star_state(&l, &u_l, s_l, s_m, pt_star, bn, pt_l);
        let star_r = self.star_state(&r, &u_r, s_r, s_m, pt_star, bn, pt_r);

        // Alfvén 波速 S*_K = S_M ∓ |B_n|/sqrt(ρ*_K)
        let s_star_l = s_m - bn.abs() / star_l.d.safe_sqrt();
        let s_star_r = s_m + bn.abs() / star_r.d.safe_sqrt();

        // B_n = 0：Alfvén 分支退化，双星区域塌缩为星区域
        let degenerate = bn * bn
            < S::EPSILON * (pt_star.abs() + star_l.d * s_m * s_m + star_r.d * s_m * s_m);

        // 波序 S_L ≤ S*_L ≤ S_M ≤ S*_R ≤ S_R；ξ = 0 落在哪个区域
        let mut flux = if s_m >= S::ZERO {
            if degenerate || s_star_l >= S::ZERO {
                jump_flux(&f_l, s_l, &star_l.conserved(), &u_l)
            } else {
                // 双星区域（左侧）：F = F_L + S*_L U** − (S*_L − S_L) U* − S_L U_L
                let dstar = double_star(&star_l, &star_r, bn, true);
                let u_star = star_l.conserved();
                let u_dstar = dstar.conserved();
                AxisFlux {
                    d: f_l.d + s_star_l * u_dstar.d - (s_star_l - s_l) * u_star.d - s_l * u_l.d,
                    mn: f_l.mn + s_star_l * u_dstar.mn
                        - (s_star_l - s_l) * u_star.mn
                        - s_l * u_l.mn,
                    mt1: f_l.mt1 + s_star_l * u_dstar.mt1
                        - (s_star_l - s_l) * u_star.mt1
                        - s_l * u_l.mt1,
                    mt2: f_l.mt2 + s_star_l * u_dstar.mt2
                        - (s_star_l - s_l) * u_star.mt2
                        - s_l * u_l.mt2,
                    e: f_l.e + s_star_l * u_dstar.e - (s_star_l - s_l) * u_star.e - s_l * u_l.e,
                    bt1: f_l.bt1 + s_star_l * u_dstar.bt1
                        - (s_star_l - s_l) * u_star.bt1
                        - s_l * u_l.bt1,
                    bt2: f_l.bt2 + s_star_l * u_dstar.bt2
                        - (s_star_l - s_l) * u_star.bt2
                        - s_l * u_l.bt2,
                    max_speed: S::ZERO,
                }
            }
        } else if degenerate || s_star_r <= S::ZERO {
            jump_flux(&f_r, s_r, &star_r.conserved(), &u_r)
        } else {
            let dstar = double_star(&star_l, &star_r, bn, false);
            let u_star = star_r.conserved();
            let u_dstar = dstar.conserved();
            AxisFlux {
                d: f_r.d + s_star_r * u_dstar.d - (s_star_r - s_r) * u_star.d - s_r * u_r.d,
                mn: f_r.mn + s_star_r * u_dstar.mn - (s_star_r - s_r) * u_star.mn - s_r * u_r.mn,
                mt1: f_r.mt1 + s_star_r * u_dstar.mt1
                    - (s_star_r - s_r) * u_star.mt1
                    - s_r * u_r.mt1,
                mt2: f_r.mt2 + s_star_r * u_dstar.mt2
                    - (s_star_r - s_r) * u_star.mt2
                    - s_r * u_r.mt2,
                e: f_r.e + s_star_r * u_dstar.e - (s_star_r - s_r) * u_star.e - s_r * u_r.e,
                bt1: f_r.bt1 + s_star_r * u_dstar.bt1
                    - (s_star_r - s_r) * u_star.bt1
                    - s_r * u_r.bt1,
                bt2: f_r.bt2 + s_star_r * u_dstar.bt2
                    - (s_star_r - s_r) * u_star.bt2
                    - s_r * u_r.bt2,
                max_speed: S::ZERO,
            }
        };
        flux.max_speed = max_speed;
        Ok(flux)
    }

    fn eos(&self) -> &GammaLaw<S> {
        &self.eos
    }
}

/// 双星区域状态（两支 Alfvén 波之间，Miyoshi & Kusano 式 59-63）
fn double_star<S: RuntimeScalar>(
    star_l: &StarState<S>,
    star_r: &StarState<S>,
    bn: S,
    left_side: bool,
) -> StarState<S> {
    let sq_l = star_l.d.safe_sqrt();
    let sq_r = star_r.d.safe_sqrt();
    let inv = S::ONE / (sq_l + sq_r);
    let sgn = if bn >= S::ZERO { S::ONE } else { -S::ONE };

    let vt1 = (sq_l * star_l.vt1 + sq_r * star_r.vt1 + sgn * (star_r.bt1 - star_l.bt1)) * inv;
    let vt2 = (sq_l * star_l.vt2 + sq_r * star_r.vt2 + sgn * (star_r.bt2 - star_l.bt2)) * inv;
    let bt1 =
        (sq_l * star_r.bt1 + sq_r * star_l.bt1 + sgn * sq_l * sq_r * (star_r.vt1 - star_l.vt1))
            * inv;
    let bt2 =
        (sq_l * star_r.bt2 + sq_r * star_l.bt2 + sgn * sq_l * sq_r * (star_r.vt2 - star_l.vt2))
            * inv;

    let (star, sq, sign) = if left_side {
        (star_l, sq_l, -S::ONE)
    } else {
        (star_r, sq_r, S::ONE)
    };
    let v_dot_b_star = star.vn * bn + star.vt1 * star.bt1 + star.vt2 * star.bt2;
    let v_dot_b_dstar = star.vn * bn + vt1 * bt1 + vt2 * bt2;
    let e = star.e + sign * sq * sgn * (v_dot_b_star - v_dot_b_dstar);

    StarState {
        d: star.d,
        vn: star.vn,
        vt1,
        vt2,
        e,
        bt1,
        bt2,
    }
}
