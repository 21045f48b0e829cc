// crates/ch_physics/src/boundary/types.rs

//! 边界条件类型定义

use ch_runtime::{Axis, ChResult};
use serde::{Deserialize, Serialize};

use crate::grid::BlockGrid;
use crate::state::FieldBlock;
use ch_runtime::RuntimeScalar;

/// 块的六个面，顺序 (-x, +x, -y, +y, -z, +z)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// -x
    XLo = 0,
    /// +x
    XHi = 1,
    /// -y
    YLo = 2,
    /// +y
    YHi = 3,
    /// -z
    ZLo = 4,
    /// +z
    ZHi = 5,
}

impl Face {
    /// 全部面
    pub const ALL: [Face; 6] = [
        Face::XLo,
        Face::XHi,
        Face::YLo,
        Face::YHi,
        Face::ZLo,
        Face::ZHi,
    ];

    /// 面的法向
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Face::XLo | Face::XHi => Axis::X,
            Face::YLo | Face::YHi => Axis::Y,
            Face::ZLo | Face::ZHi => Axis::Z,
        }
    }

    /// 是否为低坐标侧
    #[inline]
    pub const fn is_low(self) -> bool {
        matches!(self, Face::XLo | Face::YLo | Face::ZLo)
    }

    /// 面下标 (0..6)
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// 单面边界条件种类
///
/// 幽灵单元在每次重构前被填充为邻居内部拷贝（周期）、反射态
/// （法向速度与法向磁场翻转）、零梯度拷贝（自由流出）或用户给定
/// 的解析状态（自定义）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryKind {
    /// 周期
    #[default]
    Periodic,
    /// 反射
    Reflective,
    /// 自由流出（零梯度）
    Outflow,
    /// 用户自定义（仅经 API 注入）
    Custom,
}

impl From<ch_config::FaceBoundary> for BoundaryKind {
    fn from(f: ch_config::FaceBoundary) -> Self {
        match f {
            ch_config::FaceBoundary::Periodic => Self::Periodic,
            ch_config::FaceBoundary::Reflective => Self::Reflective,
            ch_config::FaceBoundary::Outflow => Self::Outflow,
        }
    }
}

/// 用户自定义边界：直接写出指定面的幽灵单元
pub trait CustomBoundary<S: RuntimeScalar>: Send {
    /// 填充一个面的幽灵区域
    fn fill_face(&mut self, face: Face, field: &mut FieldBlock<S>, grid: &BlockGrid)
        -> ChResult<()>;
}
