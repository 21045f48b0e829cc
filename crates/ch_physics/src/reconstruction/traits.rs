// crates/ch_physics/src/reconstruction/traits.rs

//! 重构接口
//!
//! 重构器对"一行"单元工作：沿扫掠轴的一整条单元序列（含幽灵），
//! 状态已置换到求解器坐标系。输出是每个界面的左右状态对：界面 f
//! 位于单元 f 与 f+1 之间，左状态来自单元 f 的右边缘，右状态来自
//! 单元 f+1 的左边缘。
//!
//! 所有变体保证输出满足 ρ > 0 且 p > 0；违反时该界面整体回退为
//! 分片常数。缺少完整模板的端部单元降阶使用可用的最低阶格式
//! （PPM → PLM → PCM）。

use ch_runtime::RuntimeScalar;
use smallvec::SmallVec;

use crate::riemann::AxisState;

/// 被动标量的内联向量
pub type ScalarVec<S> = SmallVec<[S; 4]>;

/// 一行中单个单元的完整状态（求解器坐标系）
#[derive(Debug, Clone, Default)]
pub struct CellState<S: RuntimeScalar> {
    /// 流体/磁场原始变量
    pub s: AxisState<S>,
    /// 比内能（双能量），未启用为 0
    pub ge: S,
    /// 被动标量比浓度
    pub scalars: ScalarVec<S>,
}

/// 一行所有界面的左右状态
#[derive(Debug, Clone, Default)]
pub struct FacePairs<S: RuntimeScalar> {
    /// 界面左侧状态（来自左邻单元）
    pub left: Vec<CellState<S>>,
    /// 界面右侧状态（来自右邻单元）
    pub right: Vec<CellState<S>>,
}

impl<S: RuntimeScalar> FacePairs<S> {
    /// 调整到给定界面数
    pub fn resize(&mut self, n_faces: usize) {
        self.left.resize(n_faces, CellState::default());
        self.right.resize(n_faces, CellState::default());
    }

    /// 界面数
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// 重构器 trait
pub trait Reconstruction<S: RuntimeScalar>: Send + Sync {
    /// 格式名称
    fn name(&self) -> &'static str;

    /// 模板半宽（所需幽灵层数）
    fn stencil_half_width(&self) -> usize;

    /// 对一行单元重构全部界面的左右状态
    ///
    /// `faces` 必须已经 resize 到 `row.len() - 1`。
    fn reconstruct_row(&self, row: &[CellState<S>], faces: &mut FacePairs<S>);
}

/// 逐界面正定性回退
///
/// 任一侧 ρ ≤ 0 或 p ≤ 0 时整个界面回退为相邻单元值。
pub fn apply_positivity_fallback<S: RuntimeScalar>(
    row: &[CellState<S>],
    faces: &mut FacePairs<S>,
) {
    for f in 0..faces.len() {
        let ok = faces.left[f].s.d > S::ZERO
            && faces.left[f].s.p > S::ZERO
            && faces.right[f].s.d > S::ZERO
            && faces.right[f].s.p > S::ZERO;
        if !ok {
            faces.left[f] = row[f].clone();
            faces.right[f] = row[f + 1].clone();
        }
    }
}

/// 原始变量打包顺序：(ρ, v_n, v_t1, v_t2, p, B_t1, B_t2)
pub(crate) const N_FIELDS: usize = 7;

/// 打包为定长数组以便逐分量限制
#[inline]
pub(crate) fn pack<S: RuntimeScalar>(w: &AxisState<S>) -> [S; N_FIELDS] {
    [w.d, w.vn, w.vt1, w.vt2, w.p, w.bt1, w.bt2]
}

/// 由数组恢复（法向磁场从原单元继承）
#[inline]
pub(crate) fn unpack<S: RuntimeScalar>(v: &[S; N_FIELDS], bn: S) -> AxisState<S> {
    AxisState {
        d: v[0],
        vn: v[1],
        vt1: v[2],
        vt2: v[3],
        p: v[4],
        bn,
        bt1: v[5],
        bt2: v[6],
    }
}
