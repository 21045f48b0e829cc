// crates/ch_physics/src/reconstruction/pcm.rs

//! 分片常数重构（一阶）
//!
//! 界面状态直接取相邻单元的中心值。预报步以及其它格式的回退路径
//! 也使用这里的实现。

use ch_runtime::RuntimeScalar;

use super::traits::{CellState, FacePairs, Reconstruction};

/// PCM 重构器
#[derive(Debug, Clone, Copy, Default)]
pub struct Pcm;

impl<S: RuntimeScalar> Reconstruction<S> for Pcm {
    fn name(&self) -> &'static str {
        "PCM"
    }

    fn stencil_half_width(&self) -> usize {
        1
    }

    fn reconstruct_row(&self, row: &[CellState<S>], faces: &mut FacePairs<S>) {
        for f in 0..row.len() - 1 {
            faces.left[f] = row[f].clone();
            faces.right[f] = row[f + 1].clone();
        }
    }
}
