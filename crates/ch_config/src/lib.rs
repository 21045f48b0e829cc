// crates/ch_config/src/lib.rs

//! Cholla Config Layer (Layer 4)
//!
//! 配置层，提供参数文件解析、精度选择、求解器配置和运行时多态接口。
//! 本层完全无泛型，所有数值使用 f64，通过 `Precision` 枚举进行运行时
//! 精度分发。
//!
//! # 模块概览
//!
//! - [`parameter_map`]: ParameterMap 参数文件映射（读取被记录）
//! - [`precision`]: Precision 枚举（F32/F64）
//! - [`solver_config`]: SolverConfig 求解器配置（全 f64）
//! - [`dyn_solver`]: DynSolver trait 运行时多态接口
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: ch_cli      ─> uses ParameterMap, SolverConfig, DynSolver
//! Layer 4: ch_config   ─> 本层
//! Layer 3: ch_physics  ─> impl DynSolver for EulerSolver<S>
//! Layer 2: ch_runtime  ─> RuntimeScalar, Axis
//! ```

#![warn(missing_docs)]

pub mod dyn_solver;
pub mod error;
pub mod parameter_map;
pub mod precision;
pub mod solver_config;

pub use dyn_solver::{DynSolver, GridInfo, SnapshotData, SolverError};
pub use error::ConfigError;
pub use parameter_map::ParameterMap;
pub use precision::Precision;
pub use solver_config::{
    BoundaryConfig, CoolingConfig, FaceBoundary, GravityConfig, GridConfig, IntegratorKind,
    PhysicsConfig, ProblemConfig, ReconstructionKind, RiemannKind, SchemeConfig, SolverConfig,
    TimeConfig,
};
