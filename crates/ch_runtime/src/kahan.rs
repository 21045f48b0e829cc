// crates/ch_runtime/src/kahan.rs

use crate::scalar::RuntimeScalar;

/// Kahan 求和算法（泛型版）
///
/// 使用 Kahan 补偿算法减少浮点累加误差。守恒量诊断对大网格上的
/// 逐单元求和精度敏感，朴素求和的误差会淹没守恒性检查。
#[derive(Debug, Clone, Copy, Default)]
pub struct KahanSum<S: RuntimeScalar> {
    sum: S,
    compensation: S,
}

impl<S: RuntimeScalar> KahanSum<S> {
    /// 创建新的求和器
    pub fn new() -> Self {
        Self {
            sum: S::ZERO,
            compensation: S::ZERO,
        }
    }

    /// 添加一个值
    #[inline]
    pub fn add(&mut self, value: S) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    /// 获取当前求和值
    #[inline]
    pub fn value(&self) -> S {
        self.sum
    }

    /// 从迭代器求和
    pub fn sum_iter<I: IntoIterator<Item = S>>(iter: I) -> S {
        let mut kahan = Self::new();
        for v in iter {
            kahan.add(v);
        }
        kahan.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kahan_beats_naive() {
        // 大数 + 许多小数：朴素求和丢失精度
        let big = 1.0e8f32;
        let tiny = 0.1f32;
        let n = 10000;

        let mut kahan = KahanSum::new();
        kahan.add(big);
        for _ in 0..n {
            kahan.add(tiny);
        }

        let expected = big as f64 + (n as f64) * (tiny as f64);
        let kahan_err = (kahan.value() as f64 - expected).abs();

        let mut naive = big;
        for _ in 0..n {
            naive += tiny;
        }
        let naive_err = (naive as f64 - expected).abs();

        assert!(kahan_err <= naive_err);
        assert!(kahan_err < 64.0);
    }

    #[test]
    fn test_sum_iter() {
        let total = KahanSum::sum_iter((0..100).map(|i| i as f64));
        assert_eq!(total, 4950.0);
    }
}
