// crates/ch_physics/src/lib.rs

//! Cholla Physics Layer (Layer 3)
//!
//! 可压缩流体/磁流体的有限体积核心：单元状态与地板、黎曼求解器族、
//! 重构族、Van Leer 时间积分、双能量形式、源项耦合与 CFL 时间步
//! 控制。本层全部组件以 `<S: RuntimeScalar>` 为泛型边界，经
//! [`builder::build_solver`] 的精度分发对上层暴露为
//! `Box<dyn DynSolver>`。
//!
//! # 数据流
//!
//! ```text
//! 原始变量 → 重构界面态 → 黎曼通量 → 守恒更新 → (下一阶段)
//! ```
//!
//! 每个阶段内三个方向扫掠读取同一守恒量快照，逐行并行；阶段之间
//! 由幽灵填充（halo 交换协作方）隔开。

#![warn(missing_docs)]

pub mod boundary;
pub mod builder;
pub mod dual_energy;
pub mod engine;
pub mod eos;
pub mod grid;
pub mod reconstruction;
pub mod riemann;
pub mod setups;
pub mod sources;
pub mod state;
pub mod traits;

pub use builder::build_solver;
pub use engine::EulerSolver;
pub use eos::GammaLaw;
pub use grid::BlockGrid;
pub use state::{Conserved, FieldBlock, FieldLayout, FloorParams, Primitive};
