// crates/ch_physics/src/traits.rs

//! 外部协作方接口
//!
//! 核心把分布式/IO 关切全部收敛到这几个 trait 后面：幽灵交换在每次
//! 重构前调用，时间步规约在推进前调用，泊松求解在源项耦合前调用，
//! 快照输出按时间控制器的节奏调用。串行运行使用本 crate 的内置
//! 实现；多进程传输与磁盘格式由外部实现注入。

use ch_config::SnapshotData;
use ch_runtime::{ChResult, RuntimeScalar};

use crate::grid::BlockGrid;
use crate::state::FieldBlock;

/// halo 交换：阻塞直到六个面的幽灵单元全部有效
pub trait HaloExchange<S: RuntimeScalar>: Send {
    /// 填充幽灵单元
    fn fill_ghosts(&mut self, field: &mut FieldBlock<S>, grid: &BlockGrid) -> ChResult<()>;
}

/// 泊松求解的边界旗标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PotentialBoundary {
    /// 周期
    #[default]
    Periodic = 0,
    /// 孤立
    Isolated = 1,
}

/// 引力势求解协作方
///
/// 在每次源项耦合前被调用；返回后核心把 Φ 视为只读直到下一步。
/// Φ 数组覆盖整个块（含幽灵层），差分核依赖幽灵层已填充。
pub trait PotentialSolver<S: RuntimeScalar>: Send {
    /// 求解 ∇²Φ = 4πGρ
    fn solve_potential(
        &mut self,
        density: &[S],
        potential: &mut [S],
        grid: &BlockGrid,
        boundary_flags: [PotentialBoundary; 6],
    ) -> ChResult<()>;
}

/// 快照输出协作方
///
/// 按时间控制器决定的节奏被调用。[`SnapshotData`] 携带步数、时间、
/// 守恒场（全 f64、x 最快的行主序）与可选的引力势；重启时输出方
/// 必须按同样的单元顺序连同时间/步数计数器一起回载。
pub trait SnapshotWriter: Send {
    /// 写出一个快照
    fn write_snapshot(&mut self, snapshot: &SnapshotData) -> ChResult<()>;
}

/// 跨块全局规约（分布式运行中的集合操作）
pub trait DomainReduce: Send {
    /// 全局最小值
    fn reduce_min(&self, local: f64) -> ChResult<f64>;
}

/// 单块运行的平凡规约
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalReduce;

impl DomainReduce for LocalReduce {
    fn reduce_min(&self, local: f64) -> ChResult<f64> {
        Ok(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_reduce_is_identity() {
        assert_eq!(LocalReduce.reduce_min(0.25).unwrap(), 0.25);
    }

    struct RecordingWriter {
        steps: Vec<u64>,
    }

    impl SnapshotWriter for RecordingWriter {
        fn write_snapshot(&mut self, snapshot: &SnapshotData) -> ChResult<()> {
            self.steps.push(snapshot.step);
            Ok(())
        }
    }

    #[test]
    fn test_snapshot_writer_as_trait_object() {
        let mut recorder = RecordingWriter { steps: Vec::new() };
        let snap = SnapshotData {
            step: 7,
            time: 0.5,
            dims: [1, 1, 1],
            fields: vec![("density".to_string(), vec![1.0])],
            potential: None,
        };
        recorder.write_snapshot(&snap).unwrap();
        let writer: &mut dyn SnapshotWriter = &mut recorder;
        writer.write_snapshot(&snap).unwrap();
        assert_eq!(recorder.steps, vec![7, 7]);
    }
}
