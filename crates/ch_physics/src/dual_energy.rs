// crates/ch_physics/src/dual_energy.rs

//! 双能量形式
//!
//! 超声速流中总能量被动能/磁能支配，`E − K − M` 的相减会抵消掉全部
//! 有效数字，导出压强失真甚至为负。双能量形式额外随流输运一个内能
//! 场 ρe（通量由接触波上风给出，另加 `−p∇·v` 压缩功），并在每次
//! 更新后用选择规则决定压强来源：
//!
//! - `E − K − M ≥ η₁·E` 且为正：总能量可信，回写 `e = E − K − M`
//!   保持两种表示一致
//! - 否则：改用内能场，并同步 `E = K + M + e`
//!
//! 标准阈值 η₁ = 10⁻³。

use ch_runtime::RuntimeScalar;

use crate::grid::BlockGrid;
use crate::state::FieldBlock;

/// 双能量参数
#[derive(Debug, Clone, Copy)]
pub struct DualEnergy<S: RuntimeScalar> {
    /// 切换阈值 η₁
    pub eta: S,
}

impl<S: RuntimeScalar> DualEnergy<S> {
    /// 创建（标准阈值 1e-3）
    pub fn new(eta: S) -> Self {
        Self { eta }
    }

    /// 单个单元的选择与同步，返回是否采用了内能回退
    #[inline]
    pub fn select_cell(
        &self,
        energy: &mut S,
        internal: &mut S,
        non_thermal: S,
    ) -> bool {
        let thermal = *energy - non_thermal;
        if thermal > self.eta * *energy && thermal > S::ZERO {
            *internal = thermal;
            false
        } else {
            *energy = non_thermal + *internal;
            true
        }
    }

    /// 对整块内部单元做选择与同步
    pub fn select_and_sync(&self, field: &mut FieldBlock<S>, grid: &BlockGrid) {
        if !field.has_dual_energy() {
            return;
        }
        let g = grid.ghost;
        for k in 0..grid.n[2] {
            for j in 0..grid.n[1] {
                for i in 0..grid.n[0] {
                    let idx = grid.index(i + g, j + g, k + g);
                    let u = field.conserved_at(idx);
                    let non_thermal = u.kinetic_energy() + u.magnetic_energy();
                    let mut e = field.energy[idx];
                    let mut internal = field.internal_energy.as_ref().unwrap()[idx];
                    self.select_cell(&mut e, &mut internal, non_thermal);
                    field.energy[idx] = e;
                    field.internal_energy.as_mut().unwrap()[idx] = internal;
                }
            }
        }
    }
}
