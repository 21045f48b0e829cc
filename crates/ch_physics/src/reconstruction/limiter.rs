// crates/ch_physics/src/reconstruction/limiter.rs

//! 斜率限制与抛物线单调化
//!
//! 线性重构使用单调中心 (MC) 限制器并叠加 van Leer 调和平均；
//! 两侧差分异号时斜率为零，保证单调性。抛物重构的单调化来自
//! Colella & Woodward (1984) 式 1.10。

use ch_runtime::RuntimeScalar;

/// 单调化斜率
///
/// `del_l` / `del_r` 是向后/向前差分。返回
/// `sign(δ_c) · min(2|δ_l|, 2|δ_r|, |δ_c|, |δ_vl|)`，异号时为零。
#[inline]
pub fn limited_slope<S: RuntimeScalar>(del_l: S, del_r: S) -> S {
    if del_l * del_r <= S::ZERO {
        return S::ZERO;
    }
    let del_c = S::HALF * (del_l + del_r);
    let del_vl = S::TWO * del_l * del_r / (del_l + del_r);
    let mag = (S::TWO * del_l.abs())
        .min(S::TWO * del_r.abs())
        .min(del_c.abs())
        .min(del_vl.abs());
    mag * del_c.signum()
}

/// 抛物线单调化（Colella & Woodward 式 1.10）
///
/// 输入单元均值与左右边缘值，返回调整后的边缘值，保证抛物线在
/// 单元内不产生新极值。
#[inline]
pub fn monotonize_parabola<S: RuntimeScalar>(w: S, mut wl: S, mut wr: S) -> (S, S) {
    let six = S::from_config(6.0);
    if (wr - w) * (w - wl) <= S::ZERO {
        // 单元是局部极值：退化为常数
        wl = w;
        wr = w;
    }
    let d = wr - wl;
    let c = w - S::HALF * (wl + wr);
    if d * c > d * d / six {
        wl = S::from_config(3.0) * w - S::TWO * wr;
    }
    if -(d * d) / six > d * c {
        wr = S::from_config(3.0) * w - S::TWO * wl;
    }
    (wl, wr)
}
