// crates/ch_config/src/solver_config.rs

//! 求解器配置（全 f64，无泛型）
//!
//! 从 [`ParameterMap`](crate::ParameterMap) 组装出类型化的配置树。
//! 本层不出现任何泛型参数；数值一律使用 f64，进入计算层时再转换。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::parameter_map::ParameterMap;
use crate::precision::Precision;

/// 黎曼求解器种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RiemannKind {
    /// Toro 迭代精确解
    Exact,
    /// Roe 线性化（Harten-Hyman 熵修正）
    Roe,
    /// HLLC 三波近似（纯流体，默认）
    #[default]
    Hllc,
    /// HLLD 五波近似（磁流体）
    Hlld,
}

impl RiemannKind {
    /// 从字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(Self::Exact),
            "roe" => Some(Self::Roe),
            "hllc" => Some(Self::Hllc),
            "hlld" => Some(Self::Hlld),
            _ => None,
        }
    }
}

/// 重构格式种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReconstructionKind {
    /// 分片常数（一阶）
    Pcm,
    /// 分片线性，原始变量限制
    Plmp,
    /// 分片线性，特征变量限制（默认）
    #[default]
    Plmc,
    /// 分片抛物，原始变量 + 压平
    Ppmp,
    /// 分片抛物，特征变量限制
    Ppmc,
}

impl ReconstructionKind {
    /// 从字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pcm" => Some(Self::Pcm),
            "plmp" => Some(Self::Plmp),
            "plmc" => Some(Self::Plmc),
            "ppmp" => Some(Self::Ppmp),
            "ppmc" => Some(Self::Ppmc),
            _ => None,
        }
    }

    /// 重构模板半宽（决定幽灵层数）
    pub const fn stencil_half_width(self) -> usize {
        match self {
            Self::Pcm => 1,
            Self::Plmp | Self::Plmc => 2,
            Self::Ppmp | Self::Ppmc => 3,
        }
    }
}

/// 时间积分器种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegratorKind {
    /// Van Leer 预报/校正两步（默认）
    #[default]
    VanLeer,
    /// 一阶前向欧拉
    Simple,
}

impl IntegratorKind {
    /// 从字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vl" | "van_leer" => Some(Self::VanLeer),
            "simple" => Some(Self::Simple),
            _ => None,
        }
    }
}

/// 单面边界条件种类（配置可表达的子集；自定义边界仅经 API 注入）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FaceBoundary {
    /// 周期
    #[default]
    Periodic,
    /// 反射（法向速度与法向磁场翻转）
    Reflective,
    /// 自由流出（零梯度复制）
    Outflow,
}

impl FaceBoundary {
    /// 从字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "periodic" => Some(Self::Periodic),
            "reflective" => Some(Self::Reflective),
            "outflow" => Some(Self::Outflow),
            _ => None,
        }
    }
}

/// 网格配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// 各方向内部单元数
    pub nx: usize,
    /// 各方向内部单元数
    pub ny: usize,
    /// 各方向内部单元数
    pub nz: usize,
    /// 计算域原点
    pub x0: f64,
    /// 计算域原点
    pub y0: f64,
    /// 计算域原点
    pub z0: f64,
    /// 计算域边长
    pub xlen: f64,
    /// 计算域边长
    pub ylen: f64,
    /// 计算域边长
    pub zlen: f64,
}

/// 物理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// 比热比 γ
    pub gamma: f64,
    /// 平均分子量 μ（温度换算）
    pub mu: f64,
    /// 密度地板（码单位）
    pub density_floor: f64,
    /// 温度地板 [K]
    pub temperature_floor: f64,
    /// 压强地板（码单位）
    pub pressure_floor: f64,
    /// 是否启用磁场
    pub mhd: bool,
    /// 被动标量个数
    pub n_scalars: usize,
    /// 是否启用双能量形式
    pub dual_energy: bool,
    /// 双能量切换阈值 η₁
    pub de_eta: f64,
}

/// 数值格式配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemeConfig {
    /// 黎曼求解器
    pub riemann: RiemannKind,
    /// 重构格式
    pub reconstruction: ReconstructionKind,
    /// 时间积分器
    pub integrator: IntegratorKind,
}

/// 时间推进配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// CFL 数
    pub cfl: f64,
    /// 时间步上限
    pub dt_max: f64,
    /// 终止时间
    pub t_end: f64,
    /// 最大步数（0 表示不限）
    pub n_steps_max: u64,
    /// 快照输出次数（0 表示只输出首末）
    pub n_outputs: u64,
}

/// 六个面的边界条件，顺序为 (-x, +x, -y, +y, -z, +z)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// 六个面
    pub faces: [FaceBoundary; 6],
}

/// 重力源项配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GravityConfig {
    /// 是否启用
    pub enabled: bool,
    /// 使用五点差分计算 -∇Φ（否则三点）
    pub five_point: bool,
    /// 能量耦合采用 ΔKE 模式（否则 ρv·g 做功模式）
    pub couple_delta_ke: bool,
}

/// 冷却源项配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoolingConfig {
    /// 是否启用
    pub enabled: bool,
    /// 冷却系数 Λ₀
    pub lambda0: f64,
    /// 温度幂指数 α，Λ = Λ₀ ρ² T^α
    pub exponent: f64,
}

/// 初始条件配置
///
/// 字段是若干内置问题所需参数的并集，缺省值对应 Sod 管。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// 问题名称 (uniform / sod / einfeldt / brio_wu / sound_wave)
    pub name: String,
    /// 间断左侧状态 (ρ, vx, vy, vz, p)
    pub left: [f64; 5],
    /// 间断右侧状态 (ρ, vx, vy, vz, p)
    pub right: [f64; 5],
    /// 左侧磁场
    pub left_b: [f64; 3],
    /// 右侧磁场
    pub right_b: [f64; 3],
    /// 间断位置（沿问题轴的坐标）
    pub interface_position: f64,
    /// 问题轴
    pub axis: u8,
    /// 波动问题振幅
    pub amplitude: f64,
}

/// 完整求解器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// 浮点精度
    pub precision: Precision,
    /// 网格
    pub grid: GridConfig,
    /// 物理
    pub physics: PhysicsConfig,
    /// 数值格式
    pub scheme: SchemeConfig,
    /// 时间推进
    pub time: TimeConfig,
    /// 边界条件
    pub boundaries: BoundaryConfig,
    /// 重力
    pub gravity: GravityConfig,
    /// 冷却
    pub cooling: CoolingConfig,
    /// 初始条件
    pub problem: ProblemConfig,
}

/// 解析带候选集的枚举参数
fn parse_enum<T>(
    pm: &ParameterMap,
    key: &str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
    allowed: &'static str,
) -> Result<T, ConfigError> {
    match pm.value_or::<String>(key, String::new())? {
        s if s.is_empty() => Ok(default),
        s => parse(&s).ok_or_else(|| {
            ConfigError::Build(format!("参数 \"{key}\" 的值 \"{s}\" 不在 {{{allowed}}} 之中"))
        }),
    }
}

impl SolverConfig {
    /// 从参数映射组装配置
    pub fn from_parameter_map(pm: &ParameterMap) -> Result<Self, ConfigError> {
        let precision = parse_enum(
            pm,
            "precision",
            Precision::F64,
            Precision::parse,
            "f32, f64",
        )?;

        let grid = GridConfig {
            nx: pm.value::<i64>("grid.nx")? as usize,
            ny: pm.value_or::<i64>("grid.ny", 1)? as usize,
            nz: pm.value_or::<i64>("grid.nz", 1)? as usize,
            x0: pm.value_or("grid.x0", 0.0)?,
            y0: pm.value_or("grid.y0", 0.0)?,
            z0: pm.value_or("grid.z0", 0.0)?,
            xlen: pm.value_or("grid.xlen", 1.0)?,
            ylen: pm.value_or("grid.ylen", 1.0)?,
            zlen: pm.value_or("grid.zlen", 1.0)?,
        };

        let physics = PhysicsConfig {
            gamma: pm.value_or("physics.gamma", 1.4)?,
            mu: pm.value_or("physics.mu", 0.6)?,
            density_floor: pm.value_or("physics.density_floor", 1e-10)?,
            temperature_floor: pm.value_or("physics.temperature_floor", 0.0)?,
            pressure_floor: pm.value_or("physics.pressure_floor", 1e-20)?,
            mhd: pm.value_or("physics.mhd", false)?,
            n_scalars: pm.value_or::<i64>("physics.n_scalars", 0)? as usize,
            dual_energy: pm.value_or("physics.dual_energy", false)?,
            de_eta: pm.value_or("physics.de_eta", 1e-3)?,
        };

        let scheme = SchemeConfig {
            riemann: parse_enum(
                pm,
                "scheme.riemann",
                RiemannKind::default(),
                RiemannKind::parse,
                "exact, roe, hllc, hlld",
            )?,
            reconstruction: parse_enum(
                pm,
                "scheme.reconstruction",
                ReconstructionKind::default(),
                ReconstructionKind::parse,
                "pcm, plmp, plmc, ppmp, ppmc",
            )?,
            integrator: parse_enum(
                pm,
                "scheme.integrator",
                IntegratorKind::default(),
                IntegratorKind::parse,
                "vl, simple",
            )?,
        };

        let time = TimeConfig {
            cfl: pm.value_or("time.cfl", 0.4)?,
            dt_max: pm.value_or("time.dt_max", f64::MAX)?,
            t_end: pm.value::<f64>("time.t_end")?,
            n_steps_max: pm.value_or::<i64>("time.n_steps_max", 0)? as u64,
            n_outputs: pm.value_or::<i64>("time.n_outputs", 0)? as u64,
        };

        let face_keys = [
            "boundary.x_lo",
            "boundary.x_hi",
            "boundary.y_lo",
            "boundary.y_hi",
            "boundary.z_lo",
            "boundary.z_hi",
        ];
        let mut faces = [FaceBoundary::default(); 6];
        for (face, key) in faces.iter_mut().zip(face_keys) {
            *face = parse_enum(
                pm,
                key,
                FaceBoundary::default(),
                FaceBoundary::parse,
                "periodic, reflective, outflow",
            )?;
        }

        let gravity = GravityConfig {
            enabled: pm.value_or("gravity.enabled", false)?,
            five_point: pm.value_or("gravity.five_point", false)?,
            couple_delta_ke: pm.value_or("gravity.couple_delta_ke", false)?,
        };

        let cooling = CoolingConfig {
            enabled: pm.value_or("cooling.enabled", false)?,
            lambda0: pm.value_or("cooling.lambda0", 0.0)?,
            exponent: pm.value_or("cooling.exponent", 0.5)?,
        };

        let problem = ProblemConfig {
            name: pm.value_or("problem.name", "uniform".to_string())?,
            left: [
                pm.value_or("problem.rho_l", 1.0)?,
                pm.value_or("problem.vx_l", 0.0)?,
                pm.value_or("problem.vy_l", 0.0)?,
                pm.value_or("problem.vz_l", 0.0)?,
                pm.value_or("problem.p_l", 1.0)?,
            ],
            right: [
                pm.value_or("problem.rho_r", 0.125)?,
                pm.value_or("problem.vx_r", 0.0)?,
                pm.value_or("problem.vy_r", 0.0)?,
                pm.value_or("problem.vz_r", 0.0)?,
                pm.value_or("problem.p_r", 0.1)?,
            ],
            left_b: [
                pm.value_or("problem.bx_l", 0.0)?,
                pm.value_or("problem.by_l", 0.0)?,
                pm.value_or("problem.bz_l", 0.0)?,
            ],
            right_b: [
                pm.value_or("problem.bx_r", 0.0)?,
                pm.value_or("problem.by_r", 0.0)?,
                pm.value_or("problem.bz_r", 0.0)?,
            ],
            interface_position: pm.value_or("problem.interface_position", 0.5)?,
            axis: pm.value_or::<i64>("problem.axis", 0)? as u8,
            amplitude: pm.value_or("problem.amplitude", 1e-2)?,
        };

        let config = Self {
            precision,
            grid,
            physics,
            scheme,
            time,
            boundaries: BoundaryConfig { faces },
            gravity,
            cooling,
            problem,
        };
        config.validate()?;
        Ok(config)
    }

    /// 取值范围与组合检查
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.nx == 0 || self.grid.ny == 0 || self.grid.nz == 0 {
            return Err(ConfigError::Build("网格各方向单元数必须为正".to_string()));
        }
        if self.grid.xlen <= 0.0 || self.grid.ylen <= 0.0 || self.grid.zlen <= 0.0 {
            return Err(ConfigError::Build("计算域边长必须为正".to_string()));
        }
        if self.physics.gamma <= 1.0 {
            return Err(ConfigError::Build(format!(
                "gamma 必须大于 1，得到 {}",
                self.physics.gamma
            )));
        }
        if self.physics.density_floor <= 0.0 {
            return Err(ConfigError::Build("density_floor 必须为正".to_string()));
        }
        if !(0.0..=1.0).contains(&self.time.cfl) || self.time.cfl == 0.0 {
            return Err(ConfigError::Build(format!(
                "cfl 必须位于 (0, 1]，得到 {}",
                self.time.cfl
            )));
        }
        if self.time.t_end <= 0.0 {
            return Err(ConfigError::Build("t_end 必须为正".to_string()));
        }
        if self.physics.mhd && self.scheme.riemann != RiemannKind::Hlld {
            return Err(ConfigError::Build(
                "磁流体运行需要 HLLD 黎曼求解器".to_string(),
            ));
        }
        if !self.physics.mhd && self.scheme.riemann == RiemannKind::Hlld {
            return Err(ConfigError::Build(
                "HLLD 黎曼求解器需要启用磁场 (physics.mhd = true)".to_string(),
            ));
        }
        if self.axis_usize() > 2 {
            return Err(ConfigError::Build(format!(
                "problem.axis 必须为 0/1/2，得到 {}",
                self.problem.axis
            )));
        }
        Ok(())
    }

    fn axis_usize(&self) -> usize {
        self.problem.axis as usize
    }
}
