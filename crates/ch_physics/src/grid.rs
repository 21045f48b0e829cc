// crates/ch_physics/src/grid.rs

//! 均匀笛卡尔网格块
//!
//! 每个计算块持有 (nx+2G) × (ny+2G) × (nz+2G) 个单元，G 为每侧幽灵
//! 层数，由重构模板半宽决定。线性索引 x 最快：
//!
//! ```text
//! idx = i + nt_x * (j + nt_y * k)
//! ```
//!
//! 方向扫掠把网格视为一束一维"行"：沿扫掠轴取整行（含幽灵），行号
//! 遍历其余两个方向的内部单元。通量数组按行主序存放，便于按行并行。

use ch_runtime::Axis;
use glam::DVec3;

/// 均匀笛卡尔网格块几何
#[derive(Debug, Clone)]
pub struct BlockGrid {
    /// 各方向内部单元数
    pub n: [usize; 3],
    /// 每侧幽灵层数
    pub ghost: usize,
    /// 单元尺寸
    pub dh: [f64; 3],
    /// 计算域原点（内部区域左下角）
    pub origin: [f64; 3],
}

impl BlockGrid {
    /// 创建网格块
    pub fn new(n: [usize; 3], ghost: usize, origin: [f64; 3], lengths: [f64; 3]) -> Self {
        let dh = [
            lengths[0] / n[0] as f64,
            lengths[1] / n[1] as f64,
            lengths[2] / n[2] as f64,
        ];
        Self {
            n,
            ghost,
            dh,
            origin,
        }
    }

    /// 含幽灵层的总维度
    #[inline]
    pub fn total_dims(&self) -> [usize; 3] {
        [
            self.n[0] + 2 * self.ghost,
            self.n[1] + 2 * self.ghost,
            self.n[2] + 2 * self.ghost,
        ]
    }

    /// 含幽灵层的单元总数
    #[inline]
    pub fn total_cells(&self) -> usize {
        let t = self.total_dims();
        t[0] * t[1] * t[2]
    }

    /// 内部单元总数
    #[inline]
    pub fn interior_cells(&self) -> usize {
        self.n[0] * self.n[1] * self.n[2]
    }

    /// 总索引（i, j, k 含幽灵偏移）
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        let t = self.total_dims();
        i + t[0] * (j + t[1] * k)
    }

    /// 线性索引还原为 (i, j, k)
    #[inline]
    pub fn unravel(&self, idx: usize) -> (usize, usize, usize) {
        let t = self.total_dims();
        let i = idx % t[0];
        let j = (idx / t[0]) % t[1];
        let k = idx / (t[0] * t[1]);
        (i, j, k)
    }

    /// 内部单元坐标 (0..n) 转总索引
    #[inline]
    pub fn interior_index(&self, i: usize, j: usize, k: usize) -> usize {
        self.index(i + self.ghost, j + self.ghost, k + self.ghost)
    }

    /// 单元中心坐标（i, j, k 含幽灵偏移）
    #[inline]
    pub fn cell_center(&self, i: usize, j: usize, k: usize) -> DVec3 {
        let g = self.ghost as f64;
        DVec3::new(
            self.origin[0] + (i as f64 - g + 0.5) * self.dh[0],
            self.origin[1] + (j as f64 - g + 0.5) * self.dh[1],
            self.origin[2] + (k as f64 - g + 0.5) * self.dh[2],
        )
    }

    /// 最小单元尺寸
    #[inline]
    pub fn min_spacing(&self) -> f64 {
        self.dh[0].min(self.dh[1]).min(self.dh[2])
    }

    /// 沿某方向的行长度（含幽灵）
    #[inline]
    pub fn row_len(&self, axis: Axis) -> usize {
        self.total_dims()[axis.index()]
    }

    /// 沿某方向的行数（其余两方向的内部单元组合数）
    #[inline]
    pub fn row_count(&self, axis: Axis) -> usize {
        let [a, b] = self.cross_dims(axis);
        a * b
    }

    /// 扫掠轴之外两个方向的内部维度，按 (次快, 最慢) 排列
    #[inline]
    pub fn cross_dims(&self, axis: Axis) -> [usize; 2] {
        match axis {
            Axis::X => [self.n[1], self.n[2]],
            Axis::Y => [self.n[0], self.n[2]],
            Axis::Z => [self.n[0], self.n[1]],
        }
    }

    /// 行号还原为两个横向内部坐标
    #[inline]
    pub fn row_cross_coords(&self, axis: Axis, row: usize) -> [usize; 2] {
        let [a, _] = self.cross_dims(axis);
        [row % a, row / a]
    }

    /// 给定扫掠轴、行内位置 s（含幽灵）与行号，求单元总索引
    #[inline]
    pub fn row_cell_index(&self, axis: Axis, row: usize, s: usize) -> usize {
        let [ca, cb] = self.row_cross_coords(axis, row);
        let g = self.ghost;
        match axis {
            Axis::X => self.index(s, ca + g, cb + g),
            Axis::Y => self.index(ca + g, s, cb + g),
            Axis::Z => self.index(ca + g, cb + g, s),
        }
    }

    /// 沿扫掠轴的内部界面数（每行）：n_axis + 1
    #[inline]
    pub fn interfaces_per_row(&self, axis: Axis) -> usize {
        self.n[axis.index()] + 1
    }

    /// 通量数组长度（每方向）
    #[inline]
    pub fn flux_len(&self, axis: Axis) -> usize {
        self.interfaces_per_row(axis) * self.row_count(axis)
    }

    /// 通量数组索引：行号 row、行内界面号 f (0..=n_axis)
    ///
    /// 界面 f 位于行内单元 (ghost-1+f) 与 (ghost+f) 之间。
    #[inline]
    pub fn flux_index(&self, axis: Axis, row: usize, f: usize) -> usize {
        f + self.interfaces_per_row(axis) * row
    }

    /// 内部单元 (i, j, k) 在某方向扫掠中的 (行号, 行内位置)
    #[inline]
    pub fn cell_row_position(&self, axis: Axis, i: usize, j: usize, k: usize) -> (usize, usize) {
        let [a, _] = self.cross_dims(axis);
        match axis {
            Axis::X => (j + a * k, i + self.ghost),
            Axis::Y => (i + a * k, j + self.ghost),
            Axis::Z => (i + a * j, k + self.ghost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> BlockGrid {
        BlockGrid::new([8, 4, 2], 2, [0.0, 0.0, 0.0], [1.0, 1.0, 1.0])
    }

    #[test]
    fn test_dims() {
        let g = grid();
        assert_eq!(g.total_dims(), [12, 8, 6]);
        assert_eq!(g.total_cells(), 12 * 8 * 6);
        assert_eq!(g.interior_cells(), 64);
        assert_eq!(g.dh[0], 1.0 / 8.0);
        assert_eq!(g.dh[2], 0.5);
    }

    #[test]
    fn test_index_roundtrip() {
        let g = grid();
        for idx in [0, 17, 100, g.total_cells() - 1] {
            let (i, j, k) = g.unravel(idx);
            assert_eq!(g.index(i, j, k), idx);
        }
    }

    #[test]
    fn test_cell_center() {
        let g = grid();
        // 第一个内部单元中心
        let c = g.cell_center(2, 2, 2);
        assert!((c.x - 0.0625).abs() < 1e-14);
        assert!((c.y - 0.125).abs() < 1e-14);
        assert!((c.z - 0.25).abs() < 1e-14);
    }

    #[test]
    fn test_row_layout_consistency() {
        let g = grid();
        for axis in Axis::ALL {
            assert_eq!(g.row_len(axis), g.total_dims()[axis.index()]);
            // 每个内部单元应落在唯一的 (行, 位置)
            let mut seen = std::collections::HashSet::new();
            for k in 0..g.n[2] {
                for j in 0..g.n[1] {
                    for i in 0..g.n[0] {
                        let (row, s) = g.cell_row_position(axis, i, j, k);
                        assert!(row < g.row_count(axis));
                        assert!(s < g.row_len(axis));
                        assert_eq!(g.row_cell_index(axis, row, s), g.interior_index(i, j, k));
                        assert!(seen.insert((row, s)));
                    }
                }
            }
        }
    }

    #[test]
    fn test_flux_indexing() {
        let g = grid();
        for axis in Axis::ALL {
            assert_eq!(
                g.flux_len(axis),
                g.interfaces_per_row(axis) * g.row_count(axis)
            );
            let last = g.flux_index(axis, g.row_count(axis) - 1, g.interfaces_per_row(axis) - 1);
            assert_eq!(last, g.flux_len(axis) - 1);
        }
    }
}
