// crates/ch_config/src/error.rs

//! 配置层错误类型

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 参数文件解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 值无法按请求的类型解释
    #[error("参数 \"{key}\" 的值 \"{value}\" 无法解释为 {dtype}: {reason}")]
    InvalidValue {
        /// 参数键
        key: String,
        /// 原始字符串值
        value: String,
        /// 请求的类型名
        dtype: &'static str,
        /// 失败原因
        reason: &'static str,
    },

    /// 缺失必需参数
    #[error("缺失参数: \"{0}\" 未指定")]
    Missing(String),

    /// 未使用参数（严格模式）
    #[error("存在 {0} 个未知参数（严格模式下中止）")]
    UnusedParameters(usize),

    /// 配置组装错误（取值范围、组合不合法）
    #[error("构建错误: {0}")]
    Build(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            key: "grid.nx".to_string(),
            value: "abc".to_string(),
            dtype: "i64",
            reason: "invalid value",
        };
        let msg = err.to_string();
        assert!(msg.contains("grid.nx"));
        assert!(msg.contains("abc"));
        assert!(msg.contains("i64"));
    }
}
