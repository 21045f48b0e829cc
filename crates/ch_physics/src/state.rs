// crates/ch_physics/src/state.rs

//! 守恒状态管理
//!
//! 本模块提供可压缩流体/磁流体求解所需的状态管理：
//! - [`Conserved`] / [`Primitive`]: 单个单元的守恒/原始状态
//! - [`FieldBlock`]: 块上全部守恒场的 SoA 容器
//! - 地板（密度/温度/压强）执行
//!
//! # 布局设计
//!
//! 采用 SoA (Structure of Arrays) 布局以优化缓存性能：
//! ```text
//! density:    [ρ_0,  ρ_1,  ρ_2,  ...]
//! momentum_x: [m_0,  m_1,  m_2,  ...]
//! energy:     [E_0,  E_1,  E_2,  ...]
//! ```
//!
//! 可选场（双能量内能、磁场、被动标量）按运行配置分配，缺省不占
//! 内存。磁场按单元中心存放，三个分量与守恒场同序。

use ch_runtime::{ChError, ChResult, RuntimeScalar};

use crate::eos::GammaLaw;
use crate::grid::BlockGrid;

// ============================================================
// 单元级状态
// ============================================================

/// 单个单元的守恒状态
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Conserved<S: RuntimeScalar> {
    /// 密度
    pub d: S,
    /// x 方向动量
    pub mx: S,
    /// y 方向动量
    pub my: S,
    /// z 方向动量
    pub mz: S,
    /// 总能量密度
    pub e: S,
    /// 磁场（纯流体运行时为零）
    pub b: [S; 3],
}

impl<S: RuntimeScalar> Conserved<S> {
    /// 动能密度 ½ρ|v|²
    #[inline]
    pub fn kinetic_energy(&self) -> S {
        S::HALF * (self.mx * self.mx + self.my * self.my + self.mz * self.mz) / self.d
    }

    /// 磁能密度 ½|B|²
    #[inline]
    pub fn magnetic_energy(&self) -> S {
        S::HALF * (self.b[0] * self.b[0] + self.b[1] * self.b[1] + self.b[2] * self.b[2])
    }

    /// 状态是否有限
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.d.is_safe()
            && self.mx.is_safe()
            && self.my.is_safe()
            && self.mz.is_safe()
            && self.e.is_safe()
            && self.b.iter().all(|v| v.is_safe())
    }
}

/// 单个单元的原始状态
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Primitive<S: RuntimeScalar> {
    /// 密度
    pub d: S,
    /// 速度
    pub vx: S,
    /// 速度
    pub vy: S,
    /// 速度
    pub vz: S,
    /// 热压
    pub p: S,
    /// 磁场
    pub b: [S; 3],
}

impl<S: RuntimeScalar> Primitive<S> {
    /// 状态是否物理（ρ > 0, p > 0, 分量有限）
    #[inline]
    pub fn is_physical(&self) -> bool {
        self.d > S::ZERO
            && self.p > S::ZERO
            && self.vx.is_safe()
            && self.vy.is_safe()
            && self.vz.is_safe()
    }
}

// ============================================================
// 地板参数
// ============================================================

/// 地板参数（进入计算层后为标量类型）
#[derive(Debug, Clone, Copy)]
pub struct FloorParams<S: RuntimeScalar> {
    /// 密度地板
    pub density: S,
    /// 压强地板
    pub pressure: S,
    /// 比内能地板（由温度地板换算）
    pub specific_energy: S,
}

impl<S: RuntimeScalar> FloorParams<S> {
    /// 由配置值与状态方程换算
    pub fn new(eos: &GammaLaw<S>, density: S, pressure: S, temperature: S) -> Self {
        Self {
            density,
            pressure,
            specific_energy: eos.specific_energy_floor(temperature),
        }
    }
}

// ============================================================
// 场容器
// ============================================================

/// 可选场配置
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldLayout {
    /// 是否分配双能量内能场
    pub dual_energy: bool,
    /// 是否分配磁场
    pub mhd: bool,
    /// 被动标量个数
    pub n_scalars: usize,
}

/// 块上全部守恒场（SoA）
#[derive(Debug, Clone)]
pub struct FieldBlock<S: RuntimeScalar> {
    /// 单元总数（含幽灵）
    n_cells: usize,
    /// 密度
    pub density: Vec<S>,
    /// x 动量
    pub momentum_x: Vec<S>,
    /// y 动量
    pub momentum_y: Vec<S>,
    /// z 动量
    pub momentum_z: Vec<S>,
    /// 总能量
    pub energy: Vec<S>,
    /// 双能量内能 ρe（按体积），未启用时为 None
    pub internal_energy: Option<Vec<S>>,
    /// 单元中心磁场，未启用时为 None
    pub magnetic: Option<[Vec<S>; 3]>,
    /// 被动标量 ρs_k
    pub scalars: Vec<Vec<S>>,
}

impl<S: RuntimeScalar> FieldBlock<S> {
    /// 按布局分配并清零
    pub fn new(n_cells: usize, layout: FieldLayout) -> Self {
        Self {
            n_cells,
            density: vec![S::ZERO; n_cells],
            momentum_x: vec![S::ZERO; n_cells],
            momentum_y: vec![S::ZERO; n_cells],
            momentum_z: vec![S::ZERO; n_cells],
            energy: vec![S::ZERO; n_cells],
            internal_energy: layout.dual_energy.then(|| vec![S::ZERO; n_cells]),
            magnetic: layout
                .mhd
                .then(|| [0, 1, 2].map(|_| vec![S::ZERO; n_cells])),
            scalars: (0..layout.n_scalars).map(|_| vec![S::ZERO; n_cells]).collect(),
        }
    }

    /// 单元总数（含幽灵）
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    /// 是否携带双能量场
    #[inline]
    pub fn has_dual_energy(&self) -> bool {
        self.internal_energy.is_some()
    }

    /// 是否携带磁场
    #[inline]
    pub fn has_magnetic(&self) -> bool {
        self.magnetic.is_some()
    }

    /// 被动标量个数
    #[inline]
    pub fn n_scalars(&self) -> usize {
        self.scalars.len()
    }

    /// 读取单元守恒状态
    #[inline]
    pub fn conserved_at(&self, idx: usize) -> Conserved<S> {
        let b = match &self.magnetic {
            Some([bx, by, bz]) => [bx[idx], by[idx], bz[idx]],
            None => [S::ZERO; 3],
        };
        Conserved {
            d: self.density[idx],
            mx: self.momentum_x[idx],
            my: self.momentum_y[idx],
            mz: self.momentum_z[idx],
            e: self.energy[idx],
            b,
        }
    }

    /// 写入单元守恒状态（磁场仅在启用时写入）
    #[inline]
    pub fn set_conserved(&mut self, idx: usize, u: &Conserved<S>) {
        self.density[idx] = u.d;
        self.momentum_x[idx] = u.mx;
        self.momentum_y[idx] = u.my;
        self.momentum_z[idx] = u.mz;
        self.energy[idx] = u.e;
        if let Some([bx, by, bz]) = &mut self.magnetic {
            bx[idx] = u.b[0];
            by[idx] = u.b[1];
            bz[idx] = u.b[2];
        }
    }

    /// 从另一块整体复制（布局必须一致）
    pub fn copy_from(&mut self, other: &Self) {
        self.density.copy_from_slice(&other.density);
        self.momentum_x.copy_from_slice(&other.momentum_x);
        self.momentum_y.copy_from_slice(&other.momentum_y);
        self.momentum_z.copy_from_slice(&other.momentum_z);
        self.energy.copy_from_slice(&other.energy);
        if let (Some(dst), Some(src)) = (&mut self.internal_energy, &other.internal_energy) {
            dst.copy_from_slice(src);
        }
        if let (Some(dst), Some(src)) = (&mut self.magnetic, &other.magnetic) {
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                d.copy_from_slice(s);
            }
        }
        for (dst, src) in self.scalars.iter_mut().zip(other.scalars.iter()) {
            dst.copy_from_slice(src);
        }
    }

    /// 对内部单元施加地板
    ///
    /// 顺序与原始实现一致：先密度地板（保持速度与压强），再热压/
    /// 内能地板。双能量开启时压强回退到内能导出值并同步总能量。
    pub fn enforce_floors(&mut self, grid: &BlockGrid, eos: &GammaLaw<S>, floors: &FloorParams<S>) {
        let g = grid.ghost;
        for k in 0..grid.n[2] {
            for j in 0..grid.n[1] {
                for i in 0..grid.n[0] {
                    let idx = grid.index(i + g, j + g, k + g);
                    self.apply_floors_at(idx, eos, floors);
                }
            }
        }
    }

    /// 对单个单元施加地板
    pub fn apply_floors_at(&mut self, idx: usize, eos: &GammaLaw<S>, floors: &FloorParams<S>) {
        // 密度地板：动量按比例缩放以保持速度，总能量扣除动能差以保持压强
        let d = self.density[idx];
        if d < floors.density {
            let ratio = floors.density / d;
            let u = self.conserved_at(idx);
            let kinetic_old = u.kinetic_energy();
            self.density[idx] = floors.density;
            self.momentum_x[idx] *= ratio;
            self.momentum_y[idx] *= ratio;
            self.momentum_z[idx] *= ratio;
            self.energy[idx] += kinetic_old * (ratio - S::ONE);
            if let Some(ge) = &mut self.internal_energy {
                ge[idx] *= ratio;
            }
            for s in &mut self.scalars {
                s[idx] *= ratio;
            }
        }

        let u = self.conserved_at(idx);
        let non_thermal = u.kinetic_energy() + u.magnetic_energy();

        match &mut self.internal_energy {
            None => {
                // 纯总能量：热压低于地板时回推 E
                let p = eos.pressure(&u);
                if p < floors.pressure {
                    self.energy[idx] = non_thermal + floors.pressure / (eos.gamma - S::ONE);
                }
            }
            Some(ge) => {
                // 双能量：内能地板夹持后同步，压强地板继续兜底
                let e_floor = u.d * floors.specific_energy;
                if ge[idx] < e_floor {
                    ge[idx] = e_floor;
                }
                let p = eos.pressure(&u);
                if p < floors.pressure {
                    let mut internal = ge[idx];
                    let p_int = (eos.gamma - S::ONE) * internal;
                    if p_int < floors.pressure {
                        internal = floors.pressure / (eos.gamma - S::ONE);
                        ge[idx] = internal;
                    }
                    self.energy[idx] = non_thermal + internal;
                }
            }
        }
    }

    /// 有限性检查（含内部单元），报告首个非有限单元
    pub fn validate(&self, grid: &BlockGrid, component: &'static str) -> ChResult<()> {
        let g = grid.ghost;
        for k in 0..grid.n[2] {
            for j in 0..grid.n[1] {
                for i in 0..grid.n[0] {
                    let idx = grid.index(i + g, j + g, k + g);
                    let u = self.conserved_at(idx);
                    if !u.is_valid() {
                        return Err(ChError::numerical(
                            component,
                            (i, j, k),
                            format!(
                                "非有限守恒状态: d = {:?}, m = ({:?}, {:?}, {:?}), E = {:?}",
                                u.d, u.mx, u.my, u.mz, u.e
                            ),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eos() -> GammaLaw<f64> {
        GammaLaw::new(1.4, 0.6)
    }

    fn small_grid() -> BlockGrid {
        BlockGrid::new([4, 1, 1], 2, [0.0; 3], [1.0; 3])
    }

    // 码单位下的温度地板取得很小，换算出的比内能地板 ≈ 3.4e-4
    fn floors() -> FloorParams<f64> {
        FloorParams::new(&eos(), 1e-4, 1e-6, 1e-12)
    }

    #[test]
    fn test_layout_allocation() {
        let block: FieldBlock<f64> = FieldBlock::new(
            10,
            FieldLayout {
                dual_energy: true,
                mhd: true,
                n_scalars: 2,
            },
        );
        assert!(block.has_dual_energy());
        assert!(block.has_magnetic());
        assert_eq!(block.n_scalars(), 2);
        assert_eq!(block.density.len(), 10);
    }

    #[test]
    fn test_conserved_roundtrip_through_block() {
        let mut block: FieldBlock<f64> = FieldBlock::new(
            4,
            FieldLayout {
                dual_energy: false,
                mhd: true,
                n_scalars: 0,
            },
        );
        let u = Conserved {
            d: 2.0,
            mx: 0.5,
            my: -0.5,
            mz: 0.1,
            e: 4.0,
            b: [0.1, 0.2, 0.3],
        };
        block.set_conserved(2, &u);
        assert_eq!(block.conserved_at(2), u);
    }

    #[test]
    fn test_density_floor_preserves_velocity_and_pressure() {
        let grid = small_grid();
        let mut block: FieldBlock<f64> = FieldBlock::new(grid.total_cells(), FieldLayout::default());
        let eos = eos();
        let idx = grid.interior_index(0, 0, 0);

        // 一个密度过低但以 v = (2, 0, 0)、p = 0.4 运动的单元
        let d = 1e-6;
        let w = Primitive {
            d,
            vx: 2.0,
            vy: 0.0,
            vz: 0.0,
            p: 0.4,
            b: [0.0; 3],
        };
        block.set_conserved(idx, &eos.to_conserved(&w));
        block.enforce_floors(&grid, &eos, &floors());

        let after = eos.to_primitive(&block.conserved_at(idx));
        assert_eq!(after.d, 1e-4);
        assert!((after.vx - 2.0).abs() < 1e-12);
        assert!((after.p - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_pressure_floor_without_dual_energy() {
        let grid = small_grid();
        let mut block: FieldBlock<f64> = FieldBlock::new(grid.total_cells(), FieldLayout::default());
        let eos = eos();
        let idx = grid.interior_index(1, 0, 0);

        // 动能超过总能量 → 导出压强为负
        block.set_conserved(
            idx,
            &Conserved {
                d: 1.0,
                mx: 10.0,
                my: 0.0,
                mz: 0.0,
                e: 1.0,
                b: [0.0; 3],
            },
        );
        assert!(eos.pressure(&block.conserved_at(idx)) < 0.0);

        block.enforce_floors(&grid, &eos, &floors());
        let p = eos.pressure(&block.conserved_at(idx));
        // E ≈ 50 的量级下 E − K 的相减留下 ~1e-14 的舍入残差
        assert!((p - 1e-6).abs() < 1e-12);
        // 速度未被触碰
        assert_eq!(block.momentum_x[idx], 10.0);
    }

    #[test]
    fn test_dual_energy_floor_restores_from_internal() {
        let grid = small_grid();
        let mut block: FieldBlock<f64> = FieldBlock::new(
            grid.total_cells(),
            FieldLayout {
                dual_energy: true,
                ..Default::default()
            },
        );
        let eos = eos();
        let fl = floors();
        let idx = grid.interior_index(2, 0, 0);

        block.set_conserved(
            idx,
            &Conserved {
                d: 1.0,
                mx: 10.0,
                my: 0.0,
                mz: 0.0,
                e: 1.0,
                b: [0.0; 3],
            },
        );
        // 内能场记录着一个健康的值
        block.internal_energy.as_mut().unwrap()[idx] = 0.25;

        block.enforce_floors(&grid, &eos, &fl);
        let u = block.conserved_at(idx);
        // E = K + e_int
        assert!((u.e - (u.kinetic_energy() + 0.25)).abs() < 1e-12);
        assert!(eos.pressure(&u) > 0.0);
    }

    #[test]
    fn test_dual_energy_internal_floor_clamped() {
        let grid = small_grid();
        let mut block: FieldBlock<f64> = FieldBlock::new(
            grid.total_cells(),
            FieldLayout {
                dual_energy: true,
                ..Default::default()
            },
        );
        let eos = eos();
        let fl = floors();
        let idx = grid.interior_index(3, 0, 0);

        block.set_conserved(
            idx,
            &Conserved {
                d: 1.0,
                mx: 0.0,
                my: 0.0,
                mz: 0.0,
                e: -1.0,
                b: [0.0; 3],
            },
        );
        block.internal_energy.as_mut().unwrap()[idx] = -1.0;

        block.enforce_floors(&grid, &eos, &fl);
        let ge = block.internal_energy.as_ref().unwrap()[idx];
        assert!(ge >= fl.specific_energy);
        assert!(eos.pressure(&block.conserved_at(idx)) >= 0.0);
    }

    #[test]
    fn test_validate_reports_cell() {
        let grid = small_grid();
        let mut block: FieldBlock<f64> = FieldBlock::new(grid.total_cells(), FieldLayout::default());
        for idx in 0..block.n_cells() {
            block.set_conserved(
                idx,
                &Conserved {
                    d: 1.0,
                    mx: 0.0,
                    my: 0.0,
                    mz: 0.0,
                    e: 1.0,
                    b: [0.0; 3],
                },
            );
        }
        block.energy[grid.interior_index(2, 0, 0)] = f64::NAN;
        let err = block.validate(&grid, "update").unwrap_err();
        assert!(err.to_string().contains("(2, 0, 0)"));
    }
}
