// crates/ch_config/src/parameter_map.rs

//! 参数文件映射
//!
//! 提供对行式参数文件的 map 式访问。加载完成后参数集合不可变；
//! 内部额外记录每个参数是否被读取过，用于在关闭时对从未使用的
//! 参数发出警告（或在严格模式下中止）。
//!
//! # 文件格式
//!
//! 与 TOML/JSON/YAML 不同，参数文件没有语法类型（语法不决定格式），
//! 更接近 ini 文件。因此内部一律按字符串存储，访问时按请求的类型
//! 显式转换。
//!
//! ```text
//! # 注释（; 也可以）
//! nx = 128
//! [gravity]
//! enabled = true        # 实际键名为 gravity.enabled
//! ```
//!
//! 命令行中 `key=value` 形式的 token 覆盖文件中的同名条目。

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;
use std::path::Path;

use crate::error::ConfigError;

/// 类型转换失败的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeErr {
    Generic,
    Boolean,
    OutOfRange,
}

impl TypeErr {
    fn reason(self) -> &'static str {
        match self {
            TypeErr::Generic => "invalid value",
            TypeErr::Boolean => "boolean values must be \"true\" or \"false\"",
            TypeErr::OutOfRange => "out of range",
        }
    }
}

/// 可以从参数字符串解析出的类型
pub trait ParamValue: Sized {
    /// 类型名（用于错误信息）
    const DTYPE: &'static str;

    /// 尝试解析；失败时返回转换错误种类
    fn parse_param(s: &str) -> Result<Self, TypeErrKind>;
}

/// 类型转换失败的原因描述（trait 方法签名需要）
pub type TypeErrKind = &'static str;

impl ParamValue for bool {
    const DTYPE: &'static str = "bool";

    fn parse_param(s: &str) -> Result<Self, TypeErrKind> {
        match s {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(TypeErr::Boolean.reason()),
        }
    }
}

impl ParamValue for i64 {
    const DTYPE: &'static str = "i64";

    fn parse_param(s: &str) -> Result<Self, TypeErrKind> {
        match s.parse::<i64>() {
            Ok(v) => Ok(v),
            Err(e) => match e.kind() {
                std::num::IntErrorKind::PosOverflow | std::num::IntErrorKind::NegOverflow => {
                    Err(TypeErr::OutOfRange.reason())
                }
                _ => Err(TypeErr::Generic.reason()),
            },
        }
    }
}

impl ParamValue for f64 {
    const DTYPE: &'static str = "f64";

    fn parse_param(s: &str) -> Result<Self, TypeErrKind> {
        s.parse::<f64>().map_err(|_| TypeErr::Generic.reason())
    }
}

impl ParamValue for String {
    const DTYPE: &'static str = "string";

    // 任何参数都可以视为字符串
    fn parse_param(s: &str) -> Result<Self, TypeErrKind> {
        Ok(s.to_string())
    }
}

struct ParamEntry {
    value: String,
    accessed: Cell<bool>,
}

/// 参数映射（加载后不可变，读取被记录）
pub struct ParameterMap {
    entries: BTreeMap<String, ParamEntry>,
}

/// 检查完整名称（表名或键名）的合法性，并登记沿途的（子）表名。
///
/// 对名称 "a.b.c.d" 依次检查 "a.b.c"、"a.b"、"a"：
/// (i) 段不能为空；(ii) 前缀登记为表；(iii) 前缀不得与参数名冲突。
fn process_full_name(
    full_name: &str,
    tables: &mut BTreeSet<String>,
    entries: &BTreeMap<String, ParamEntry>,
) -> Result<(), String> {
    if full_name.is_empty() {
        return Err("名称为空".to_string());
    }
    for ch in full_name.chars() {
        if ch != '.' && ch != '_' && ch != '-' && !ch.is_ascii_alphanumeric() {
            return Err(format!("包含不允许的字符 '{ch}'"));
        }
    }
    if full_name.starts_with('.') {
        return Err("以 '.' 字符开头".to_string());
    }
    if full_name.ends_with('.') {
        return Err("以 '.' 字符结尾".to_string());
    }
    if full_name.contains("..") {
        return Err("包含连续的 '.' 字符".to_string());
    }

    // 逐级登记父表并检查与参数名的冲突
    let mut rest = full_name;
    while let Some(pos) = rest.rfind('.') {
        let prefix = &rest[..pos];
        rest = prefix;
        if tables.contains(prefix) {
            // 父表都已经见过
            return Ok(());
        }
        tables.insert(prefix.to_string());
        if entries.contains_key(prefix) {
            return Err(format!("（子）表名与已有参数 \"{prefix}\" 冲突"));
        }
    }
    Ok(())
}

/// 尝试把一行拆成 key/value（以第一个 '=' 为界）
///
/// '=' 在行首、行尾或缺失时返回 None。
fn try_extract_key_value(line: &str) -> Option<(&str, &str)> {
    let pos = line.find('=')?;
    if pos == 0 || pos + 1 == line.len() {
        return None;
    }
    Some((line[..pos].trim(), line[pos + 1..].trim()))
}

impl ParameterMap {
    /// 从 reader 与命令行覆盖项构建
    ///
    /// `overrides` 中每个 `key=value` 形式的 token 覆盖文件条目；
    /// 其它 token 被忽略。
    pub fn from_reader<R: BufRead>(reader: R, overrides: &[String]) -> Result<Self, ConfigError> {
        let mut entries: BTreeMap<String, ParamEntry> = BTreeMap::new();

        // 显式出现过的表头；所有见过的（含隐式父）表名
        let mut explicit_tables: BTreeSet<String> = BTreeSet::new();
        let mut all_tables: BTreeSet<String> = BTreeSet::new();

        let mut cur_table = String::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim_start();

            // 跳过空行和注释
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                // 解析形如 "[my_table]" 的表头
                let rest = rest.trim_end();
                let Some(header) = rest.strip_suffix(']') else {
                    return Err(ConfigError::Parse(
                        "参数表头缺少收尾的 ']'".to_string(),
                    ));
                };
                if header.is_empty() {
                    return Err(ConfigError::Parse(
                        "不允许空的参数表头（例如 []）".to_string(),
                    ));
                }
                if explicit_tables.contains(header) {
                    return Err(ConfigError::Parse(format!(
                        "表头 [{header}] 出现了多次"
                    )));
                }
                if entries.contains_key(header) {
                    return Err(ConfigError::Parse(format!(
                        "表头 [{header}] 与同名参数冲突"
                    )));
                }
                process_full_name(header, &mut all_tables, &entries).map_err(|msg| {
                    ConfigError::Parse(format!("解析 [{header}] 表头时出错: {msg}"))
                })?;

                explicit_tables.insert(header.to_string());
                all_tables.insert(header.to_string());
                cur_table = header.to_string();
            } else {
                // 解析 key = value
                let Some((key, value)) = try_extract_key_value(trimmed) else {
                    // 无法解析的行跳过（保持原始行为）
                    continue;
                };
                if key.contains('.') {
                    return Err(ConfigError::Parse(format!(
                        "参数 \"{key}\" 含有 '.'，参数文件内不允许"
                    )));
                }
                let full_name = if cur_table.is_empty() {
                    key.to_string()
                } else {
                    format!("{cur_table}.{key}")
                };
                process_full_name(&full_name, &mut all_tables, &entries).map_err(|msg| {
                    ConfigError::Parse(format!("解析参数 \"{full_name}\" 时出错: {msg}"))
                })?;
                entries.insert(
                    full_name,
                    ParamEntry {
                        value: value.to_string(),
                        accessed: Cell::new(false),
                    },
                );
            }
        }

        // 命令行覆盖
        for token in overrides {
            let Some((key, value)) = try_extract_key_value(token) else {
                continue;
            };
            process_full_name(key, &mut all_tables, &entries).map_err(|msg| {
                ConfigError::Parse(format!("解析命令行参数 \"{key}\" 时出错: {msg}"))
            })?;
            log::info!("命令行覆盖 {key}={value}");
            entries.insert(
                key.to_string(),
                ParamEntry {
                    value: value.to_string(),
                    accessed: Cell::new(false),
                },
            );
        }

        Ok(Self { entries })
    }

    /// 从字符串构建（主要用于测试）
    pub fn from_str_and_args(text: &str, overrides: &[String]) -> Result<Self, ConfigError> {
        Self::from_reader(text.as_bytes(), overrides)
    }

    /// 从文件构建
    pub fn load<P: AsRef<Path>>(path: P, overrides: &[String]) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), overrides)
    }

    /// 参数个数（主要用于测试）
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// 参数是否存在
    pub fn has_param(&self, param: &str) -> bool {
        self.entries.contains_key(param)
    }

    /// 参数是否存在且能按指定类型解释（不记录访问）
    pub fn param_has_type<T: ParamValue>(&self, param: &str) -> bool {
        self.entries
            .get(param)
            .is_some_and(|e| T::parse_param(&e.value).is_ok())
    }

    /// 取参数值；参数缺失或类型不符时返回错误
    pub fn value<T: ParamValue>(&self, param: &str) -> Result<T, ConfigError> {
        match self.try_get::<T>(param)? {
            Some(v) => Ok(v),
            None => Err(ConfigError::Missing(param.to_string())),
        }
    }

    /// 取参数值；参数缺失时返回 default，类型不符时返回错误
    pub fn value_or<T: ParamValue>(&self, param: &str, default: T) -> Result<T, ConfigError> {
        Ok(self.try_get::<T>(param)?.unwrap_or(default))
    }

    /// 内部取值：存在则解析并记录访问
    fn try_get<T: ParamValue>(&self, param: &str) -> Result<Option<T>, ConfigError> {
        let Some(entry) = self.entries.get(param) else {
            return Ok(None);
        };
        match T::parse_param(&entry.value) {
            Ok(v) => {
                entry.accessed.set(true);
                Ok(Some(v))
            }
            Err(reason) => Err(ConfigError::InvalidValue {
                key: param.to_string(),
                value: entry.value.clone(),
                dtype: T::DTYPE,
                reason,
            }),
        }
    }

    /// 报告从未被 `value`/`value_or` 读取过的参数
    ///
    /// 对每个未使用参数输出一条警告日志，返回 (键, 值) 列表；
    /// `ignore` 中的键永远不会被报告。
    pub fn warn_unused_parameters(&self, ignore: &[&str]) -> Vec<(String, String)> {
        let mut unused = Vec::new();
        for (name, entry) in &self.entries {
            if !entry.accessed.get() && !ignore.contains(&name.as_str()) {
                log::warn!("{}/{}: 未知的参数/值对！", name, entry.value);
                unused.push((name.clone(), entry.value.clone()));
            }
        }
        unused
    }
}
