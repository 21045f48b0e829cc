// crates/ch_physics/src/sources/cooling.rs

//! 辐射冷却源项（算子分裂）
//!
//! 每步结束后以显式算子分裂从内能中扣除 Λ(ρ, T)·Δt，冷却到温度
//! 地板为止。冷却函数在 trait 后面，表格化实现由外部提供；内置的
//! 参数化幂律形式 `Λ = Λ₀ ρ² T^α` 用于测试和简单运行。

use ch_runtime::RuntimeScalar;

use crate::eos::GammaLaw;
use crate::grid::BlockGrid;
use crate::state::{FieldBlock, FloorParams};

/// 冷却函数
pub trait CoolingFunction<S: RuntimeScalar>: Send + Sync {
    /// 名称
    fn name(&self) -> &'static str;

    /// 单位体积冷却率 Λ(ρ, T)
    fn rate(&self, density: S, temperature: S) -> S;
}

/// 参数化幂律冷却
#[derive(Debug, Clone, Copy)]
pub struct PowerLawCooling<S: RuntimeScalar> {
    /// 系数 Λ₀
    pub lambda0: S,
    /// 温度幂指数 α
    pub exponent: S,
}

impl<S: RuntimeScalar> CoolingFunction<S> for PowerLawCooling<S> {
    fn name(&self) -> &'static str {
        "power_law"
    }

    fn rate(&self, density: S, temperature: S) -> S {
        if temperature <= S::ZERO {
            return S::ZERO;
        }
        self.lambda0 * density * density * temperature.powf(self.exponent)
    }
}

/// 对内部单元施加算子分裂冷却
pub fn apply_cooling<S: RuntimeScalar>(
    field: &mut FieldBlock<S>,
    grid: &BlockGrid,
    eos: &GammaLaw<S>,
    floors: &FloorParams<S>,
    cooling: &dyn CoolingFunction<S>,
    dt: S,
) {
    let g = grid.ghost;
    for k in 0..grid.n[2] {
        for j in 0..grid.n[1] {
            for i in 0..grid.n[0] {
                let idx = grid.index(i + g, j + g, k + g);
                let u = field.conserved_at(idx);
                let non_thermal = u.kinetic_energy() + u.magnetic_energy();
                let thermal = u.e - non_thermal;
                if thermal <= S::ZERO {
                    continue;
                }

                let temperature = eos.temperature(thermal / u.d);
                let cooled = thermal - dt * cooling.rate(u.d, temperature);

                // 冷却不得低于温度/压强地板
                let thermal_min =
                    (u.d * floors.specific_energy).max(floors.pressure / (eos.gamma - S::ONE));
                let thermal_new = cooled.max(thermal_min);

                field.energy[idx] = non_thermal + thermal_new;
                if let Some(ge) = &mut field.internal_energy {
                    ge[idx] = thermal_new;
                }
            }
        }
    }
}
