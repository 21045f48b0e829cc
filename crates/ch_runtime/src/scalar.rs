// crates/ch_runtime/src/scalar.rs

//! RuntimeScalar - 密封的标量类型抽象
//!
//! 提供编译期精度选择的唯一接口，支持有限体积核心在 f32 和 f64
//! 之间零成本切换。
//!
//! # 设计原则
//!
//! 1. **密封 Trait**: 只有 f32 和 f64 可以实现（通过 private::Sealed）
//! 2. **零成本抽象**: `#[inline]` + 编译期单态化
//! 3. **从配置转换**: 配置层全部使用 f64，进入计算层时经 `from_f64` 转换
//!
//! # 使用规范
//!
//! 计算层（ch_physics）所有组件以 `<S: RuntimeScalar>` 为泛型边界；
//! 应用层（ch_cli）禁止出现任何泛型参数，通过 `Precision` 枚举分发。

use std::fmt::{Debug, Display};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use bytemuck::Pod;
use num_traits::{Float, FromPrimitive, NumAssign};

/// 密封模块，禁止外部实现
mod private {
    /// 密封 trait
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// 运行时标量类型（密封，仅 f32/f64 可实现）
///
/// # 实现类型
///
/// - `f32`: 低内存模式，适合大规模网格
/// - `f64`: 高精度模式（默认），适合科学验证
pub trait RuntimeScalar:
    private::Sealed
    + Pod
    + Float
    + FromPrimitive
    + NumAssign
    + Copy
    + Clone
    + Debug
    + Display
    + Send
    + Sync
    + Sum
    + Default
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    /// 零值
    const ZERO: Self;
    /// 一
    const ONE: Self;
    /// 二
    const TWO: Self;
    /// 二分之一
    const HALF: Self;
    /// 机器精度
    const EPSILON: Self;
    /// 最小正值
    const MIN_POSITIVE: Self;
    /// 最大值
    const MAX: Self;

    /// 从 f64 配置值转换（配置层 → 计算层的唯一通道）
    #[inline]
    fn from_config(v: f64) -> Self {
        Self::from_f64(v).unwrap_or(Self::ZERO)
    }

    /// 安全除法
    ///
    /// 当除数绝对值小于 MIN_POSITIVE 时返回 fallback
    #[inline]
    fn safe_div(self, rhs: Self, fallback: Self) -> Self {
        if rhs.abs() < Self::MIN_POSITIVE {
            fallback
        } else {
            self / rhs
        }
    }

    /// 检查是否有限（非 NaN、非 Inf）
    #[inline]
    fn is_safe(self) -> bool {
        self.is_finite()
    }

    /// 限制在范围内
    #[inline]
    fn clamp_value(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }

    /// 安全平方根（负数返回 0）
    #[inline]
    fn safe_sqrt(self) -> Self {
        if self < Self::ZERO {
            Self::ZERO
        } else {
            self.sqrt()
        }
    }

    /// 批量验证切片中所有值是否有限
    ///
    /// 返回第一个非有限值的位置及其值
    fn validate_slice(data: &[Self]) -> Result<(), (usize, Self)> {
        for (i, &v) in data.iter().enumerate() {
            if !v.is_safe() {
                return Err((i, v));
            }
        }
        Ok(())
    }
}

// =============================================================================
// f32 实现
// =============================================================================

impl RuntimeScalar for f32 {
    const ZERO: f32 = 0.0;
    const ONE: f32 = 1.0;
    const TWO: f32 = 2.0;
    const HALF: f32 = 0.5;
    const EPSILON: f32 = f32::EPSILON;
    const MIN_POSITIVE: f32 = f32::MIN_POSITIVE;
    const MAX: f32 = f32::MAX;
}

// =============================================================================
// f64 实现
// =============================================================================

impl RuntimeScalar for f64 {
    const ZERO: f64 = 0.0;
    const ONE: f64 = 1.0;
    const TWO: f64 = 2.0;
    const HALF: f64 = 0.5;
    const EPSILON: f64 = f64::EPSILON;
    const MIN_POSITIVE: f64 = f64::MIN_POSITIVE;
    const MAX: f64 = f64::MAX;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_f64() {
        assert_eq!(f64::ZERO, 0.0);
        assert_eq!(f64::ONE, 1.0);
        assert_eq!(f64::TWO, 2.0);
        assert_eq!(f64::HALF, 0.5);
    }

    #[test]
    fn test_safe_div() {
        assert_eq!(1.0f64.safe_div(2.0, 0.0), 0.5);
        assert_eq!(1.0f64.safe_div(0.0, 7.0), 7.0);
    }

    #[test]
    fn test_safe_sqrt() {
        assert_eq!(4.0f64.safe_sqrt(), 2.0);
        assert_eq!((-1.0f64).safe_sqrt(), 0.0);
    }

    #[test]
    fn test_from_config_roundtrip() {
        let v = f32::from_config(0.4);
        assert!((v - 0.4f32).abs() < 1e-7);
        let w = f64::from_config(0.4);
        assert_eq!(w, 0.4);
    }

    #[test]
    fn test_validate_slice() {
        assert!(f64::validate_slice(&[1.0, 2.0, 3.0]).is_ok());
        let err = f64::validate_slice(&[1.0, f64::NAN, 3.0]);
        assert_eq!(err.unwrap_err().0, 1);
    }
}
