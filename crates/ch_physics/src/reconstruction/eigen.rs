// crates/ch_physics/src/reconstruction/eigen.rs

//! 绝热流体特征分解（原始变量形式）
//!
//! 特征变量限制 (PLMC/PPMC) 把 (δρ, δv_n, δp) 投影到三个非平凡特征场
//! 上：左行声波、熵波、右行声波；两个切向速度本身就是特征变量。磁
//! 流体运行沿用同一流体分解——PPMC 的特征限制使用流体特征系，不用
//! 完整的磁流体特征系。

use ch_runtime::RuntimeScalar;

/// 非平凡特征场上的投影
#[derive(Debug, Clone, Copy, Default)]
pub struct CharDeltas<S: RuntimeScalar> {
    /// 左行声波 (u − a)
    pub minus: S,
    /// 熵波 (u)
    pub entropy: S,
    /// 右行声波 (u + a)
    pub plus: S,
}

/// 原始变量差分 → 特征变量差分
///
/// `d`/`a` 取投影所在单元的密度与声速。
#[inline]
pub fn project<S: RuntimeScalar>(d: S, a: S, dd: S, dvn: S, dp: S) -> CharDeltas<S> {
    let a2 = a * a;
    CharDeltas {
        minus: -S::HALF * d * dvn / a + S::HALF * dp / a2,
        entropy: dd - dp / a2,
        plus: S::HALF * d * dvn / a + S::HALF * dp / a2,
    }
}

/// 特征变量差分 → 原始变量差分
#[inline]
pub fn deproject<S: RuntimeScalar>(d: S, a: S, ch: &CharDeltas<S>) -> (S, S, S) {
    let dd = ch.minus + ch.entropy + ch.plus;
    let dvn = (a / d) * (ch.plus - ch.minus);
    let dp = a * a * (ch.minus + ch.plus);
    (dd, dvn, dp)
}
