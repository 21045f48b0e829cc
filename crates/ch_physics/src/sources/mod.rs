// crates/ch_physics/src/sources/mod.rs

//! 源项耦合
//!
//! 引力做功与算子分裂冷却。地板执行位于
//! [`FieldBlock::enforce_floors`](crate::state::FieldBlock::enforce_floors)，
//! 在每次更新后由积分器调用。

pub mod cooling;
pub mod gravity;

pub use cooling::{apply_cooling, CoolingFunction, PowerLawCooling};
pub use gravity::{AnalyticPotential, GravitySource};
