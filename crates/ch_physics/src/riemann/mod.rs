// crates/ch_physics/src/riemann/mod.rs

//! 黎曼求解器族
//!
//! 四个可互换的实现，统一通过 [`RiemannSolver`] trait 调用，
//! 启动时按配置选择。

pub mod exact;
pub mod hllc;
pub mod hlld;
pub mod roe;
pub mod traits;

pub use exact::ExactSolver;
pub use hllc::HllcSolver;
pub use hlld::HlldSolver;
pub use roe::RoeSolver;
pub use traits::{physical_flux, AxisFlux, AxisState, RiemannSolver, SolverCapabilities};

use ch_config::RiemannKind;
use ch_runtime::RuntimeScalar;

use crate::eos::GammaLaw;

/// 按配置创建黎曼求解器
pub fn create_solver<S: RuntimeScalar>(
    kind: RiemannKind,
    eos: GammaLaw<S>,
    pressure_floor: S,
) -> Box<dyn RiemannSolver<S>> {
    match kind {
        RiemannKind::Exact => Box::new(ExactSolver::new(eos, pressure_floor)),
        RiemannKind::Roe => Box::new(RoeSolver::new(eos, pressure_floor)),
        RiemannKind::Hllc => Box::new(HllcSolver::new(eos, pressure_floor)),
        RiemannKind::Hlld => Box::new(HlldSolver::new(eos, pressure_floor)),
    }
}
