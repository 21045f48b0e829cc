// crates/ch_physics/src/engine/mod.rs

//! 时间推进引擎
//!
//! - [`sweep`]: 方向扫掠、通量数组与通量散度更新
//! - [`timestep`]: CFL 时间步控制
//! - [`solver`]: 求解器主体与 DynSolver 实现

pub mod solver;
pub mod sweep;
pub mod timestep;

pub use solver::EulerSolver;
pub use timestep::CflController;
