// crates/ch_physics/src/riemann/traits.rs

//! 黎曼求解器统一接口
//!
//! 所有求解器都在"求解器坐标系"中工作：法向分量恒在 0 号槽位，
//! 两个切向分量依 [`Axis`](ch_runtime::Axis) 的循环置换排列。方向
//! 扫掠负责聚集/散射，求解器本身与物理方向无关。
//!
//! 被动标量与双能量内能不进入求解器：它们随接触波以质量通量符号
//! 上风取值（`F_s = F_ρ · s_upwind`），由扫掠层完成。

use ch_runtime::{ChResult, RuntimeScalar};

use crate::eos::GammaLaw;

/// 求解器坐标系中的界面一侧状态
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisState<S: RuntimeScalar> {
    /// 密度
    pub d: S,
    /// 法向速度
    pub vn: S,
    /// 切向速度 1
    pub vt1: S,
    /// 切向速度 2
    pub vt2: S,
    /// 热压
    pub p: S,
    /// 法向磁场（界面两侧一致）
    pub bn: S,
    /// 切向磁场 1
    pub bt1: S,
    /// 切向磁场 2
    pub bt2: S,
}

impl<S: RuntimeScalar> AxisState<S> {
    /// 总压 p + ½|B|²
    #[inline]
    pub fn total_pressure(&self) -> S {
        self.p
            + S::HALF * (self.bn * self.bn + self.bt1 * self.bt1 + self.bt2 * self.bt2)
    }

    /// 总能量密度
    #[inline]
    pub fn total_energy(&self, gamma: S) -> S {
        let kinetic =
            S::HALF * self.d * (self.vn * self.vn + self.vt1 * self.vt1 + self.vt2 * self.vt2);
        let magnetic =
            S::HALF * (self.bn * self.bn + self.bt1 * self.bt1 + self.bt2 * self.bt2);
        self.p / (gamma - S::ONE) + kinetic + magnetic
    }

    /// v·B
    #[inline]
    pub fn v_dot_b(&self) -> S {
        self.vn * self.bn + self.vt1 * self.bt1 + self.vt2 * self.bt2
    }
}

/// 求解器坐标系中的守恒通量
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisFlux<S: RuntimeScalar> {
    /// 质量通量
    pub d: S,
    /// 法向动量通量
    pub mn: S,
    /// 切向动量通量 1
    pub mt1: S,
    /// 切向动量通量 2
    pub mt2: S,
    /// 能量通量
    pub e: S,
    /// 切向磁场通量 1
    pub bt1: S,
    /// 切向磁场通量 2
    pub bt2: S,
    /// 本界面的最大信号速度
    pub max_speed: S,
}

impl<S: RuntimeScalar> AxisFlux<S> {
    /// 通量是否有限
    pub fn is_valid(&self) -> bool {
        self.d.is_safe()
            && self.mn.is_safe()
            && self.mt1.is_safe()
            && self.mt2.is_safe()
            && self.e.is_safe()
            && self.bt1.is_safe()
            && self.bt2.is_safe()
    }
}

/// 给定单侧状态的解析通量 F(W)
///
/// 两侧状态相同时所有近似求解器都必须退化到这一结果（零耗散）。
pub fn physical_flux<S: RuntimeScalar>(w: &AxisState<S>, gamma: S) -> AxisFlux<S> {
    let pt = w.total_pressure();
    let e = w.total_energy(gamma);
    AxisFlux {
        d: w.d * w.vn,
        mn: w.d * w.vn * w.vn + pt - w.bn * w.bn,
        mt1: w.d * w.vn * w.vt1 - w.bn * w.bt1,
        mt2: w.d * w.vn * w.vt2 - w.bn * w.bt2,
        e: (e + pt) * w.vn - w.bn * w.v_dot_b(),
        bt1: w.bt1 * w.vn - w.bn * w.vt1,
        bt2: w.bt2 * w.vn - w.bn * w.vt2,
        max_speed: S::ZERO,
    }
}

/// 求解器坐标系中的守恒状态（HLL 族中间态用）
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct AxisConserved<S: RuntimeScalar> {
    pub d: S,
    pub mn: S,
    pub mt1: S,
    pub mt2: S,
    pub e: S,
    pub bt1: S,
    pub bt2: S,
}

impl<S: RuntimeScalar> AxisConserved<S> {
    /// 从原始状态组装
    pub fn from_state(w: &AxisState<S>, gamma: S) -> Self {
        Self {
            d: w.d,
            mn: w.d * w.vn,
            mt1: w.d * w.vt1,
            mt2: w.d * w.vt2,
            e: w.total_energy(gamma),
            bt1: w.bt1,
            bt2: w.bt2,
        }
    }
}

/// 求解器能力标志
#[derive(Debug, Clone, Copy, Default)]
pub struct SolverCapabilities {
    /// 是否支持磁场
    pub supports_mhd: bool,
    /// 是否分辨接触间断
    pub resolves_contact: bool,
    /// 是否包含熵修正
    pub has_entropy_fix: bool,
}

/// 黎曼求解器 trait
///
/// 实现者返回跨界面的守恒通量；压强为负时施加地板并继续，绝不中止。
pub trait RiemannSolver<S: RuntimeScalar>: Send + Sync {
    /// 求解器名称
    fn name(&self) -> &'static str;

    /// 求解器能力
    fn capabilities(&self) -> SolverCapabilities;

    /// 求解黎曼问题，返回 ξ = 0 处的通量
    fn solve(&self, left: &AxisState<S>, right: &AxisState<S>) -> ChResult<AxisFlux<S>>;

    /// 状态方程
    fn eos(&self) -> &GammaLaw<S>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_flux_hydro() {
        // 静止均匀流体：只剩压强项
        let w = AxisState {
            d: 1.0,
            vn: 0.0,
            vt1: 0.0,
            vt2: 0.0,
            p: 2.5,
            bn: 0.0,
            bt1: 0.0,
            bt2: 0.0,
        };
        let f = physical_flux(&w, 1.4);
        assert_eq!(f.d, 0.0);
        assert_eq!(f.mn, 2.5);
        assert_eq!(f.e, 0.0);
    }

    #[test]
    fn test_physical_flux_mhd_momentum() {
        // 法向动量通量 = ρ vn² + p + |B|²/2 − Bn²
        let w: AxisState<f64> = AxisState {
            d: 1.0,
            vn: 0.0,
            vt1: 0.0,
            vt2: 0.0,
            p: 1.0,
            bn: 0.75,
            bt1: 1.0,
            bt2: 0.0,
        };
        let f = physical_flux(&w, 2.0);
        let expected = 1.0 + 0.5 * (0.75 * 0.75 + 1.0) - 0.75 * 0.75;
        assert!((f.mn - expected).abs() < 1e-14);
        // 切向磁场被法向磁场牵引
        assert_eq!(f.bt1, 0.0);
    }

    #[test]
    fn test_total_energy_consistency() {
        let w: AxisState<f64> = AxisState {
            d: 2.0,
            vn: 0.3,
            vt1: -0.1,
            vt2: 0.2,
            p: 1.5,
            bn: 0.4,
            bt1: 0.2,
            bt2: -0.3,
        };
        let gamma = 5.0 / 3.0;
        let e = w.total_energy(gamma);
        let kinetic = 0.5 * 2.0 * (0.09 + 0.01 + 0.04);
        let magnetic = 0.5 * (0.16 + 0.04 + 0.09);
        assert!((e - (1.5 / (gamma - 1.0) + kinetic + magnetic)).abs() < 1e-14);
    }
}
