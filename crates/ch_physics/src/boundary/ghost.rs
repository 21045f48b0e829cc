// crates/ch_physics/src/boundary/ghost.rs

//! 幽灵单元填充
//!
//! 串行（单块）版本的 halo 交换协作方：周期边界直接从对侧内部
//! 拷贝，反射边界做镜像并翻转法向速度与法向磁场，自由流出做零梯度
//! 外推，自定义边界委托给用户 trait 对象。
//!
//! 填充顺序 x → y → z；后填的方向扫过前一方向的幽灵区，棱和角随之
//! 获得一致的值。

use ch_runtime::{Axis, ChError, ChResult, RuntimeScalar};

use super::types::{BoundaryKind, CustomBoundary, Face};
use crate::grid::BlockGrid;
use crate::state::FieldBlock;
use crate::traits::HaloExchange;

/// 串行幽灵填充器
pub struct GhostFiller<S: RuntimeScalar> {
    kinds: [BoundaryKind; 6],
    custom: Option<Box<dyn CustomBoundary<S>>>,
}

impl<S: RuntimeScalar> GhostFiller<S> {
    /// 创建填充器
    pub fn new(kinds: [BoundaryKind; 6]) -> Self {
        Self {
            kinds,
            custom: None,
        }
    }

    /// 注入自定义边界实现（对应 `BoundaryKind::Custom` 的面）
    pub fn with_custom(mut self, custom: Box<dyn CustomBoundary<S>>) -> Self {
        self.custom = Some(custom);
        self
    }

    /// 各面边界种类
    pub fn kinds(&self) -> &[BoundaryKind; 6] {
        &self.kinds
    }

    /// 拷贝整列守恒量，必要时翻转法向分量
    #[inline]
    fn copy_cell(field: &mut FieldBlock<S>, dst: usize, src: usize, flip: Option<Axis>) {
        field.density[dst] = field.density[src];
        field.momentum_x[dst] = field.momentum_x[src];
        field.momentum_y[dst] = field.momentum_y[src];
        field.momentum_z[dst] = field.momentum_z[src];
        field.energy[dst] = field.energy[src];
        if let Some(ge) = &mut field.internal_energy {
            ge[dst] = ge[src];
        }
        if let Some(b) = &mut field.magnetic {
            for comp in b.iter_mut() {
                comp[dst] = comp[src];
            }
        }
        for s in &mut field.scalars {
            s[dst] = s[src];
        }
        if let Some(axis) = flip {
            match axis {
                Axis::X => field.momentum_x[dst] = -field.momentum_x[dst],
                Axis::Y => field.momentum_y[dst] = -field.momentum_y[dst],
                Axis::Z => field.momentum_z[dst] = -field.momentum_z[dst],
            }
            if let Some(b) = &mut field.magnetic {
                b[axis.index()][dst] = -b[axis.index()][dst];
            }
        }
    }

    /// 填充一个面
    fn fill_face(
        &mut self,
        face: Face,
        field: &mut FieldBlock<S>,
        grid: &BlockGrid,
    ) -> ChResult<()> {
        let kind = self.kinds[face.index()];
        if kind == BoundaryKind::Custom {
            let custom = self.custom.as_mut().ok_or_else(|| {
                ChError::config("存在自定义边界面但未注入 CustomBoundary 实现")
            })?;
            return custom.fill_face(face, field, grid);
        }

        let axis = face.axis();
        let g = grid.ghost;
        let n = grid.n[axis.index()];
        let t = grid.total_dims();

        // 沿法向的幽灵坐标与对应源坐标
        let span: Vec<(usize, usize)> = if face.is_low() {
            (0..g)
                .map(|q| {
                    let src = match kind {
                        BoundaryKind::Periodic => q + n,
                        BoundaryKind::Outflow => g,
                        BoundaryKind::Reflective => 2 * g - 1 - q,
                        BoundaryKind::Custom => unreachable!(),
                    };
                    (q, src)
                })
                .collect()
        } else {
            (g + n..t[axis.index()])
                .map(|q| {
                    let src = match kind {
                        BoundaryKind::Periodic => q - n,
                        BoundaryKind::Outflow => g + n - 1,
                        BoundaryKind::Reflective => 2 * (g + n) - 1 - q,
                        BoundaryKind::Custom => unreachable!(),
                    };
                    (q, src)
                })
                .collect()
        };

        let flip = (kind == BoundaryKind::Reflective).then_some(axis);

        // 横向扫过整个块（含已填充方向的幽灵区），棱角随之正确
        let (ta, tb) = match axis {
            Axis::X => (t[1], t[2]),
            Axis::Y => (t[0], t[2]),
            Axis::Z => (t[0], t[1]),
        };
        for cb in 0..tb {
            for ca in 0..ta {
                for &(q, src_q) in &span {
                    let (dst, src) = match axis {
                        Axis::X => (grid.index(q, ca, cb), grid.index(src_q, ca, cb)),
                        Axis::Y => (grid.index(ca, q, cb), grid.index(ca, src_q, cb)),
                        Axis::Z => (grid.index(ca, cb, q), grid.index(ca, cb, src_q)),
                    };
                    Self::copy_cell(field, dst, src, flip);
                }
            }
        }
        Ok(())
    }
}

impl<S: RuntimeScalar> HaloExchange<S> for GhostFiller<S> {
    fn fill_ghosts(&mut self, field: &mut FieldBlock<S>, grid: &BlockGrid) -> ChResult<()> {
        for face in Face::ALL {
            self.fill_face(face, field, grid)?;
        }
        Ok(())
    }
}
