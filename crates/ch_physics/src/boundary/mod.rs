// crates/ch_physics/src/boundary/mod.rs

//! 边界条件
//!
//! - [`types`]: 面/边界种类枚举与自定义边界 trait
//! - [`ghost`]: 串行幽灵单元填充（halo 交换协作方的本地实现）

pub mod ghost;
pub mod types;

pub use ghost::GhostFiller;
pub use types::{BoundaryKind, CustomBoundary, Face};
