// crates/ch_physics/src/reconstruction/mod.rs

//! 重构族
//!
//! 五个可互换的变体（PCM / PLMP / PLMC / PPMP / PPMC），统一通过
//! [`Reconstruction`] trait 调用，启动时按配置选择。

pub mod eigen;
pub mod limiter;
pub mod pcm;
pub mod plm;
pub mod ppm;
pub mod traits;

pub use pcm::Pcm;
pub use plm::Plm;
pub use ppm::Ppm;
pub use traits::{
    apply_positivity_fallback, CellState, FacePairs, Reconstruction, ScalarVec,
};

use ch_config::ReconstructionKind;
use ch_runtime::RuntimeScalar;

use crate::eos::GammaLaw;

/// 按配置创建重构器
pub fn create_reconstruction<S: RuntimeScalar>(
    kind: ReconstructionKind,
    eos: GammaLaw<S>,
) -> Box<dyn Reconstruction<S>> {
    match kind {
        ReconstructionKind::Pcm => Box::new(Pcm),
        ReconstructionKind::Plmp => Box::new(Plm::primitive(eos)),
        ReconstructionKind::Plmc => Box::new(Plm::characteristic(eos)),
        ReconstructionKind::Ppmp => Box::new(Ppm::primitive(eos)),
        ReconstructionKind::Ppmc => Box::new(Ppm::characteristic(eos)),
    }
}
