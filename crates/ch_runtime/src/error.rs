// crates/ch_runtime/src/error.rs

//! 基础错误类型
//!
//! 定义整个项目的基础错误类型。上层错误（配置、求解器）最终都可以
//! 转换为本模块的 [`ChError`] 向外报告。
//!
//! # 错误分类
//!
//! - **配置错误**: 参数缺失、类型不符、非法取值（主循环开始前中止）
//! - **数值错误**: 非有限单元、求解器不收敛且状态不可恢复（先尝试恢复，
//!   恢复失败才是致命错误）
//! - **资源错误**: 分配失败、尺寸不匹配
//! - **协作方错误**: IO、halo 交换、泊松求解等外部组件失败，原样上报

use std::io;

/// 统一结果类型别名
pub type ChResult<T> = Result<T, ChError>;

/// 基础错误
#[derive(Debug, thiserror::Error)]
pub enum ChError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 数值错误（携带组件名、单元索引与数值上下文）
    #[error("数值错误 [{component}] 单元 ({i}, {j}, {k}): {context}")]
    Numerical {
        /// 出错组件名称
        component: &'static str,
        /// 单元 i 索引
        i: usize,
        /// 单元 j 索引
        j: usize,
        /// 单元 k 索引
        k: usize,
        /// 数值上下文（如尝试的压强、地板值）
        context: String,
    },

    /// IO 错误
    #[error("IO 错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        /// 底层 IO 错误源
        #[source]
        source: Option<io::Error>,
    },

    /// 数组或集合大小不匹配
    #[error("大小不匹配 [{name}]: 期望 {expected}, 实际 {actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 外部协作方错误（halo 交换、泊松求解、快照输出）
    #[error("协作方错误 [{component}]: {message}")]
    Collaborator {
        /// 协作方名称
        component: &'static str,
        /// 错误信息
        message: String,
    },

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ChError {
    /// 便捷构造：配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// 便捷构造：数值错误
    pub fn numerical(
        component: &'static str,
        cell: (usize, usize, usize),
        context: impl Into<String>,
    ) -> Self {
        Self::Numerical {
            component,
            i: cell.0,
            j: cell.1,
            k: cell.2,
            context: context.into(),
        }
    }

    /// 便捷构造：IO 错误
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io {
            message: msg.into(),
            source: None,
        }
    }

    /// 便捷构造：协作方错误
    pub fn collaborator(component: &'static str, msg: impl Into<String>) -> Self {
        Self::Collaborator {
            component,
            message: msg.into(),
        }
    }
}

impl From<io::Error> for ChError {
    fn from(e: io::Error) -> Self {
        Self::Io {
            message: e.to_string(),
            source: Some(e),
        }
    }
}
