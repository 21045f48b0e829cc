// crates/ch_physics/src/eos.rs

//! γ 律状态方程
//!
//! 压强、声速、快磁声速与温度换算的唯一出处。所有组件通过
//! [`GammaLaw`] 访问这些关系，保证浮点表达式在重构、黎曼求解与
//! 时间步控制之间完全一致。

use ch_runtime::RuntimeScalar;

use crate::state::{Conserved, Primitive};

/// 玻尔兹曼常数 [erg/K]
pub const K_BOLTZMANN: f64 = 1.380658e-16;

/// 质子质量 [g]
pub const M_PROTON: f64 = 1.672622e-24;

/// γ 律状态方程
#[derive(Debug, Clone, Copy)]
pub struct GammaLaw<S: RuntimeScalar> {
    /// 比热比
    pub gamma: S,
    /// 平均分子量
    pub mu: S,
}

impl<S: RuntimeScalar> GammaLaw<S> {
    /// 创建状态方程
    pub fn new(gamma: S, mu: S) -> Self {
        Self { gamma, mu }
    }

    /// 由守恒量计算压强（不施加地板）
    ///
    /// `p = (γ−1)·(E − ½ρ|v|² − ½|B|²)`
    #[inline]
    pub fn pressure(&self, u: &Conserved<S>) -> S {
        (self.gamma - S::ONE) * (u.e - u.kinetic_energy() - u.magnetic_energy())
    }

    /// 声速 `a = sqrt(γ p / ρ)`
    #[inline]
    pub fn sound_speed(&self, d: S, p: S) -> S {
        (self.gamma * p / d).safe_sqrt()
    }

    /// 沿法向的快磁声速
    ///
    /// `c_f² = ½ (a² + v_A² + sqrt((a² + v_A²)² − 4 a² v_{A,n}²))`，
    /// 纯流体时退化为声速。
    #[inline]
    pub fn fast_magnetosonic(&self, d: S, p: S, b: [S; 3], bn: S) -> S {
        let a2 = self.gamma * p / d;
        let b2 = b[0] * b[0] + b[1] * b[1] + b[2] * b[2];
        let va2 = b2 / d;
        let van2 = bn * bn / d;
        let sum = a2 + va2;
        let disc = (sum * sum - (S::TWO + S::TWO) * a2 * van2).safe_sqrt();
        (S::HALF * (sum + disc)).safe_sqrt()
    }

    /// 比内能地板 [erg/g] 对应给定温度地板
    ///
    /// `e_floor = k_B T / (μ m_p (γ−1))`
    #[inline]
    pub fn specific_energy_floor(&self, temperature_floor: S) -> S {
        let kb = S::from_config(K_BOLTZMANN);
        let mp = S::from_config(M_PROTON);
        kb * temperature_floor / (self.mu * mp * (self.gamma - S::ONE))
    }

    /// 由比内能求温度 [K]
    #[inline]
    pub fn temperature(&self, specific_internal_energy: S) -> S {
        let kb = S::from_config(K_BOLTZMANN);
        let mp = S::from_config(M_PROTON);
        specific_internal_energy * (self.gamma - S::ONE) * self.mu * mp / kb
    }

    /// 原始变量 → 守恒变量
    #[inline]
    pub fn to_conserved(&self, w: &Primitive<S>) -> Conserved<S> {
        let kinetic = S::HALF * w.d * (w.vx * w.vx + w.vy * w.vy + w.vz * w.vz);
        let magnetic = S::HALF * (w.b[0] * w.b[0] + w.b[1] * w.b[1] + w.b[2] * w.b[2]);
        Conserved {
            d: w.d,
            mx: w.d * w.vx,
            my: w.d * w.vy,
            mz: w.d * w.vz,
            e: w.p / (self.gamma - S::ONE) + kinetic + magnetic,
            b: w.b,
        }
    }

    /// 守恒变量 → 原始变量（不施加地板）
    #[inline]
    pub fn to_primitive(&self, u: &Conserved<S>) -> Primitive<S> {
        Primitive {
            d: u.d,
            vx: u.mx / u.d,
            vy: u.my / u.d,
            vz: u.mz / u.d,
            p: self.pressure(u),
            b: u.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eos() -> GammaLaw<f64> {
        GammaLaw::new(5.0 / 3.0, 0.6)
    }

    #[test]
    fn test_primitive_conserved_roundtrip() {
        let eos = eos();
        let w = Primitive {
            d: 1.3,
            vx: 0.4,
            vy: -0.2,
            vz: 0.1,
            p: 2.5,
            b: [0.5, -1.0, 0.25],
        };
        let u = eos.to_conserved(&w);
        let w2 = eos.to_primitive(&u);
        assert!((w2.d - w.d).abs() < 1e-14);
        assert!((w2.vx - w.vx).abs() < 1e-14);
        assert!((w2.vy - w.vy).abs() < 1e-14);
        assert!((w2.vz - w.vz).abs() < 1e-14);
        assert!((w2.p - w.p).abs() < 1e-13);
        let u2 = eos.to_conserved(&w2);
        assert!((u2.e - u.e).abs() < 1e-13);
    }

    #[test]
    fn test_sound_speed() {
        let eos = GammaLaw::new(1.4, 0.6);
        let a = eos.sound_speed(1.0, 1.0);
        assert!((a - 1.4f64.sqrt()).abs() < 1e-14);
    }

    #[test]
    fn test_fast_speed_reduces_to_sound_speed() {
        let eos = eos();
        let a = eos.sound_speed(1.0, 0.6);
        let cf = eos.fast_magnetosonic(1.0, 0.6, [0.0, 0.0, 0.0], 0.0);
        assert!((cf - a).abs() < 1e-14);
    }

    #[test]
    fn test_fast_speed_exceeds_both() {
        let eos = eos();
        let d = 1.0;
        let p = 0.6;
        let b = [0.7, 0.3, 0.0];
        let cf = eos.fast_magnetosonic(d, p, b, b[0]);
        let a = eos.sound_speed(d, p);
        let va = ((b[0] * b[0] + b[1] * b[1]) / d).sqrt();
        assert!(cf >= a);
        assert!(cf >= va - 1e-14);
    }

    #[test]
    fn test_temperature_floor_roundtrip() {
        let eos = eos();
        let e_floor = eos.specific_energy_floor(1e4);
        let t = eos.temperature(e_floor);
        assert!((t - 1e4).abs() / 1e4 < 1e-12);
    }
}
