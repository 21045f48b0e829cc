// crates/ch_config/src/dyn_solver.rs

//! DynSolver - 运行时多态求解器接口
//!
//! 定义不含泛型的求解器接口，用于在应用层进行运行时多态调用。
//! 具体求解器（`EulerSolver<S>`）在计算层实现本 trait，应用层只
//! 持有 `Box<dyn DynSolver>`。

use crate::precision::Precision;

/// 网格信息（运行时通用）
#[derive(Debug, Clone, Default)]
pub struct GridInfo {
    /// 内部单元数（总数）
    pub n_cells: usize,
    /// 各方向内部单元数
    pub dims: [usize; 3],
    /// 每侧幽灵单元层数
    pub ghost: usize,
    /// 计算域 [x0, y0, z0, x1, y1, z1]
    pub bounds: [f64; 6],
}

/// 快照数据（全 f64，供输出协作方使用）
///
/// 计算层在导出时将内部精度转换为 f64，保持逐单元顺序与重启所需的
/// 时间/步数计数器。字段只含内部单元，不含幽灵层。
#[derive(Debug, Clone)]
pub struct SnapshotData {
    /// 步数
    pub step: u64,
    /// 模拟时间
    pub time: f64,
    /// 各方向内部单元数
    pub dims: [usize; 3],
    /// 守恒场 (名称, 数据)，行主序 x 最快
    pub fields: Vec<(String, Vec<f64>)>,
    /// 引力势（若启用重力）
    pub potential: Option<Vec<f64>>,
}

/// 求解器错误
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// 数值发散（恢复失败后的致命路径）
    #[error("数值发散: {message}")]
    Divergence {
        /// 错误详情（组件、单元索引、数值上下文）
        message: String,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 协作方错误
    #[error("协作方错误: {0}")]
    Collaborator(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl From<ch_runtime::ChError> for SolverError {
    fn from(e: ch_runtime::ChError) -> Self {
        use ch_runtime::ChError;
        match e {
            ChError::Numerical { .. } => Self::Divergence {
                message: e.to_string(),
            },
            ChError::Config(msg) => Self::Config(msg),
            ChError::Collaborator { .. } | ChError::Io { .. } => {
                Self::Collaborator(e.to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

/// 运行时求解器接口（无泛型）
pub trait DynSolver: Send {
    /// 执行一个时间步
    fn step(&mut self, dt: f64) -> Result<(), SolverError>;

    /// 由 CFL 条件推荐的稳定时间步长
    fn recommended_dt(&mut self) -> Result<f64, SolverError>;

    /// 当前模拟时间
    fn time(&self) -> f64;

    /// 当前步数
    fn step_count(&self) -> u64;

    /// 精度信息
    fn precision(&self) -> Precision;

    /// 网格信息
    fn grid_info(&self) -> GridInfo;

    /// 导出快照（供输出协作方写出）
    fn export_snapshot(&self) -> SnapshotData;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_info_default() {
        let info = GridInfo::default();
        assert_eq!(info.n_cells, 0);
        assert_eq!(info.bounds, [0.0; 6]);
    }

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::Divergence {
            message: "hllc 单元 (1, 2, 3)".to_string(),
        };
        assert!(err.to_string().contains("(1, 2, 3)"));
    }
}
