// crates/ch_runtime/src/lib.rs

//! Cholla Runtime Layer (Layer 2)
//!
//! 运行时基础层，提供标量抽象、方向置换与基础错误类型。
//!
//! # 模块概览
//!
//! - [`scalar`]: RuntimeScalar 密封标量 trait（f32/f64）
//! - [`axis`]: 扫掠方向枚举与分量置换表
//! - [`error`]: ChError / ChResult 基础错误
//! - [`kahan`]: 补偿求和
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: ch_cli      ─> 应用层，零泛型
//! Layer 4: ch_config   ─> ParameterMap, SolverConfig, DynSolver
//! Layer 3: ch_physics  ─> 有限体积核心（泛型 <S: RuntimeScalar>）
//! Layer 2: ch_runtime  ─> 本层
//! ```

#![warn(missing_docs)]

pub mod axis;
pub mod error;
pub mod kahan;
pub mod scalar;

pub use axis::Axis;
pub use error::{ChError, ChResult};
pub use kahan::KahanSum;
pub use scalar::RuntimeScalar;
