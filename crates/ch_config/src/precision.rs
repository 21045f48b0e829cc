// crates/ch_config/src/precision.rs

//! 运行时精度选择

use serde::{Deserialize, Serialize};

/// 浮点精度（启动时选择一次，之后不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Precision {
    /// 单精度
    F32,
    /// 双精度（默认）
    #[default]
    F64,
}

impl Precision {
    /// 单个标量的字节数
    pub const fn bytes(self) -> usize {
        match self {
            Precision::F32 => 4,
            Precision::F64 => 8,
        }
    }

    /// 从字符串解析（"f32"/"single" 或 "f64"/"double"）
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "f32" | "single" => Some(Precision::F32),
            "f64" | "double" => Some(Precision::F64),
            _ => None,
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precision::F32 => write!(f, "f32"),
            Precision::F64 => write!(f, "f64"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Precision::parse("double"), Some(Precision::F64));
        assert_eq!(Precision::parse("f32"), Some(Precision::F32));
        assert_eq!(Precision::parse("half"), None);
    }

    #[test]
    fn test_bytes() {
        assert_eq!(Precision::F32.bytes(), 4);
        assert_eq!(Precision::F64.bytes(), 8);
    }
}
