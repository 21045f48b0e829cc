// crates/ch_physics/src/engine/solver.rs

//! 求解器主体
//!
//! [`EulerSolver`] 拥有一个块上的全部持久数组与数值组件，负责一个
//! 时间步的编排：
//!
//! ```text
//! (泊松求解) → 填幽灵 → 三方向扫掠 → 守恒更新 → 双能量选择/同步
//!            → 引力源项 → 地板 → (校正阶段重复) → 冷却 → 有限性检查
//! ```
//!
//! 时间积分器两种：Van Leer 预报/校正（预报步用分片常数通量推进
//! Δt/2，校正步用配置的重构格式从 U^n 推进全 Δt）与一阶前向欧拉。
//! 时间与步数计数器只在步末的单写者区域更新。

use ch_config::{
    DynSolver, GridInfo, IntegratorKind, Precision, SnapshotData, SolverConfig, SolverError,
};
use ch_runtime::{ChResult, RuntimeScalar};
use num_traits::ToPrimitive;

use crate::boundary::{BoundaryKind, GhostFiller};
use crate::dual_energy::DualEnergy;
use crate::engine::sweep;
use crate::engine::timestep::CflController;
use crate::eos::GammaLaw;
use crate::grid::BlockGrid;
use crate::reconstruction::{create_reconstruction, Pcm, Reconstruction};
use crate::riemann::{create_solver, RiemannSolver};
use crate::setups;
use crate::sources::{apply_cooling, CoolingFunction, GravitySource, PowerLawCooling};
use crate::state::{FieldBlock, FieldLayout, FloorParams};
use crate::traits::{DomainReduce, HaloExchange, LocalReduce, PotentialBoundary, PotentialSolver};

/// 单块欧拉/磁流体求解器
pub struct EulerSolver<S: RuntimeScalar> {
    grid: BlockGrid,
    eos: GammaLaw<S>,
    floors: FloorParams<S>,

    field: FieldBlock<S>,
    field_half: FieldBlock<S>,

    recon: Box<dyn Reconstruction<S>>,
    predictor: Pcm,
    riemann: Box<dyn RiemannSolver<S>>,
    integrator: IntegratorKind,

    halo: Box<dyn HaloExchange<S>>,
    reduce: Box<dyn DomainReduce>,
    potential_solver: Option<Box<dyn PotentialSolver<S>>>,
    potential_flags: [PotentialBoundary; 6],
    phi: Vec<S>,
    gravity: Option<GravitySource>,
    cooling: Option<Box<dyn CoolingFunction<S>>>,
    dual_energy: Option<DualEnergy<S>>,

    cfl: CflController,
    precision: Precision,
    time: f64,
    steps: u64,
}

impl<S: RuntimeScalar> EulerSolver<S> {
    /// 按配置组装求解器并铺设初始条件
    pub fn from_config(config: &SolverConfig) -> ChResult<Self> {
        let eos = GammaLaw::new(
            S::from_config(config.physics.gamma),
            S::from_config(config.physics.mu),
        );
        let floors = FloorParams::new(
            &eos,
            S::from_config(config.physics.density_floor),
            S::from_config(config.physics.pressure_floor),
            S::from_config(config.physics.temperature_floor),
        );

        let recon = create_reconstruction::<S>(config.scheme.reconstruction, eos);
        // 幽灵层数由重构模板决定；五点引力差分至少需要两层
        let ghost = recon.stencil_half_width().max(2);
        let grid = BlockGrid::new(
            [config.grid.nx, config.grid.ny, config.grid.nz],
            ghost,
            [config.grid.x0, config.grid.y0, config.grid.z0],
            [config.grid.xlen, config.grid.ylen, config.grid.zlen],
        );

        let layout = FieldLayout {
            dual_energy: config.physics.dual_energy,
            mhd: config.physics.mhd,
            n_scalars: config.physics.n_scalars,
        };
        let mut field = FieldBlock::new(grid.total_cells(), layout);
        setups::initialize(&mut field, &grid, &eos, &config.problem)?;
        field.enforce_floors(&grid, &eos, &floors);

        let kinds: [BoundaryKind; 6] = config.boundaries.faces.map(BoundaryKind::from);
        let potential_flags = kinds.map(|k| match k {
            BoundaryKind::Periodic => PotentialBoundary::Periodic,
            _ => PotentialBoundary::Isolated,
        });

        let riemann = create_solver::<S>(config.scheme.riemann, eos, floors.pressure);
        if config.physics.mhd && !riemann.capabilities().supports_mhd {
            return Err(ch_runtime::ChError::config(format!(
                "黎曼求解器 {} 不支持磁场",
                riemann.name()
            )));
        }

        let gravity = config.gravity.enabled.then_some(GravitySource {
            five_point: config.gravity.five_point,
            couple_delta_ke: config.gravity.couple_delta_ke,
        });
        let cooling: Option<Box<dyn CoolingFunction<S>>> =
            config.cooling.enabled.then(|| {
                Box::new(PowerLawCooling {
                    lambda0: S::from_config(config.cooling.lambda0),
                    exponent: S::from_config(config.cooling.exponent),
                }) as Box<dyn CoolingFunction<S>>
            });

        let field_half = field.clone();
        let phi = vec![S::ZERO; grid.total_cells()];

        Ok(Self {
            grid,
            eos,
            floors,
            field,
            field_half,
            recon,
            predictor: Pcm,
            riemann,
            integrator: config.scheme.integrator,
            halo: Box::new(GhostFiller::new(kinds)),
            reduce: Box::new(LocalReduce),
            potential_solver: None,
            potential_flags,
            phi,
            gravity,
            cooling,
            dual_energy: config
                .physics
                .dual_energy
                .then(|| DualEnergy::new(S::from_config(config.physics.de_eta))),
            cfl: CflController::new(config.time.cfl, config.time.dt_max),
            precision: if std::mem::size_of::<S>() == 4 {
                Precision::F32
            } else {
                Precision::F64
            },
            time: 0.0,
            steps: 0,
        })
    }

    /// 注入 halo 交换协作方（缺省为串行幽灵填充）
    pub fn set_halo_exchange(&mut self, halo: Box<dyn HaloExchange<S>>) {
        self.halo = halo;
    }

    /// 注入全局规约协作方（缺省为单块平凡规约）
    pub fn set_domain_reduce(&mut self, reduce: Box<dyn DomainReduce>) {
        self.reduce = reduce;
    }

    /// 注入引力势求解协作方
    pub fn set_potential_solver(&mut self, solver: Box<dyn PotentialSolver<S>>) {
        self.potential_solver = Some(solver);
    }

    /// 注入冷却函数
    pub fn set_cooling(&mut self, cooling: Box<dyn CoolingFunction<S>>) {
        self.cooling = Some(cooling);
    }

    /// 只读访问守恒场
    pub fn field(&self) -> &FieldBlock<S> {
        &self.field
    }

    /// 可变访问守恒场（测试与自定义初始条件）
    pub fn field_mut(&mut self) -> &mut FieldBlock<S> {
        &mut self.field
    }

    /// 网格
    pub fn grid(&self) -> &BlockGrid {
        &self.grid
    }

    /// 状态方程
    pub fn eos(&self) -> &GammaLaw<S> {
        &self.eos
    }

    /// 阶段收尾：引力源项 → 双能量选择/同步 → 地板
    fn post_stage(
        block: &mut FieldBlock<S>,
        grid: &BlockGrid,
        eos: &GammaLaw<S>,
        floors: &FloorParams<S>,
        dual_energy: &Option<DualEnergy<S>>,
        gravity: &Option<GravitySource>,
        phi: &[S],
        dt: S,
    ) {
        if let Some(gravity) = gravity {
            gravity.apply(block, grid, phi, dt);
        }
        if let Some(de) = dual_energy {
            de.select_and_sync(block, grid);
        }
        block.enforce_floors(grid, eos, floors);
    }

    /// 推进一个时间步
    pub fn advance(&mut self, dt: f64) -> ChResult<()> {
        let dt_s = S::from_config(dt);

        // 引力势：每步求解一次，之后 Φ 只读
        if self.gravity.is_some() {
            if let Some(ps) = &mut self.potential_solver {
                ps.solve_potential(
                    &self.field.density,
                    &mut self.phi,
                    &self.grid,
                    self.potential_flags,
                )?;
            }
        }

        match self.integrator {
            IntegratorKind::Simple => {
                self.halo.fill_ghosts(&mut self.field, &self.grid)?;
                let (fluxes, max_speed) = sweep::compute_fluxes(
                    &self.field,
                    &self.grid,
                    &self.eos,
                    &*self.recon,
                    &*self.riemann,
                    self.floors.pressure,
                )?;
                let deltas =
                    sweep::flux_divergence_deltas(&self.field, &fluxes, &self.grid, &self.eos, dt_s);
                sweep::apply_deltas(&mut self.field, &deltas, &self.grid);
                Self::post_stage(
                    &mut self.field,
                    &self.grid,
                    &self.eos,
                    &self.floors,
                    &self.dual_energy,
                    &self.gravity,
                    &self.phi,
                    dt_s,
                );
                log::debug!("simple 阶段完成, 最大信号速度 {max_speed:.3e}");
            }
            IntegratorKind::VanLeer => {
                let half = S::HALF * dt_s;

                // 预报：PCM 通量推进 Δt/2
                self.halo.fill_ghosts(&mut self.field, &self.grid)?;
                let (fluxes, _) = sweep::compute_fluxes(
                    &self.field,
                    &self.grid,
                    &self.eos,
                    &self.predictor,
                    &*self.riemann,
                    self.floors.pressure,
                )?;
                let deltas = sweep::flux_divergence_deltas(
                    &self.field,
                    &fluxes,
                    &self.grid,
                    &self.eos,
                    half,
                );
                self.field_half.copy_from(&self.field);
                sweep::apply_deltas(&mut self.field_half, &deltas, &self.grid);
                Self::post_stage(
                    &mut self.field_half,
                    &self.grid,
                    &self.eos,
                    &self.floors,
                    &self.dual_energy,
                    &self.gravity,
                    &self.phi,
                    half,
                );

                // 校正：配置的重构格式，从 U^n 推进全 Δt
                self.halo.fill_ghosts(&mut self.field_half, &self.grid)?;
                let (fluxes, max_speed) = sweep::compute_fluxes(
                    &self.field_half,
                    &self.grid,
                    &self.eos,
                    &*self.recon,
                    &*self.riemann,
                    self.floors.pressure,
                )?;
                let deltas = sweep::flux_divergence_deltas(
                    &self.field_half,
                    &fluxes,
                    &self.grid,
                    &self.eos,
                    dt_s,
                );
                sweep::apply_deltas(&mut self.field, &deltas, &self.grid);
                Self::post_stage(
                    &mut self.field,
                    &self.grid,
                    &self.eos,
                    &self.floors,
                    &self.dual_energy,
                    &self.gravity,
                    &self.phi,
                    dt_s,
                );
                log::debug!("van leer 两阶段完成, 最大信号速度 {max_speed:.3e}");
            }
        }

        if let Some(cooling) = &self.cooling {
            apply_cooling(
                &mut self.field,
                &self.grid,
                &self.eos,
                &self.floors,
                &**cooling,
                dt_s,
            );
        }

        self.field.validate(&self.grid, "integrator")?;

        // 单写者区域：步末更新时间与步数
        self.time += dt;
        self.steps += 1;
        Ok(())
    }

    /// CFL 推荐步长（含跨块规约）
    pub fn stable_dt(&self) -> ChResult<f64> {
        let local = self
            .cfl
            .compute_dt(&self.field, &self.grid, &self.eos, &self.floors);
        self.reduce.reduce_min(local)
    }
}

impl<S: RuntimeScalar> DynSolver for EulerSolver<S> {
    fn step(&mut self, dt: f64) -> Result<(), SolverError> {
        self.advance(dt).map_err(SolverError::from)
    }

    fn recommended_dt(&mut self) -> Result<f64, SolverError> {
        self.stable_dt().map_err(SolverError::from)
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn step_count(&self) -> u64 {
        self.steps
    }

    fn precision(&self) -> Precision {
        self.precision
    }

    fn grid_info(&self) -> GridInfo {
        let g = &self.grid;
        GridInfo {
            n_cells: g.interior_cells(),
            dims: g.n,
            ghost: g.ghost,
            bounds: [
                g.origin[0],
                g.origin[1],
                g.origin[2],
                g.origin[0] + g.dh[0] * g.n[0] as f64,
                g.origin[1] + g.dh[1] * g.n[1] as f64,
                g.origin[2] + g.dh[2] * g.n[2] as f64,
            ],
        }
    }

    fn export_snapshot(&self) -> SnapshotData {
        let g = &self.grid;
        let to_f64 = |src: &[S]| -> Vec<f64> {
            let mut out = Vec::with_capacity(g.interior_cells());
            for k in 0..g.n[2] {
                for j in 0..g.n[1] {
                    for i in 0..g.n[0] {
                        out.push(
                            src[g.interior_index(i, j, k)]
                                .to_f64()
                                .unwrap_or(f64::NAN),
                        );
                    }
                }
            }
            out
        };

        let mut fields = vec![
            ("density".to_string(), to_f64(&self.field.density)),
            ("momentum_x".to_string(), to_f64(&self.field.momentum_x)),
            ("momentum_y".to_string(), to_f64(&self.field.momentum_y)),
            ("momentum_z".to_string(), to_f64(&self.field.momentum_z)),
            ("energy".to_string(), to_f64(&self.field.energy)),
        ];
        if let Some(ge) = &self.field.internal_energy {
            fields.push(("internal_energy".to_string(), to_f64(ge)));
        }
        if let Some(b) = &self.field.magnetic {
            for (name, comp) in ["magnetic_x", "magnetic_y", "magnetic_z"].iter().zip(b) {
                fields.push((name.to_string(), to_f64(comp)));
            }
        }
        for (k, s) in self.field.scalars.iter().enumerate() {
            fields.push((format!("scalar_{k}"), to_f64(s)));
        }

        SnapshotData {
            step: self.steps,
            time: self.time,
            dims: g.n,
            fields,
            potential: self.gravity.map(|_| to_f64(&self.phi)),
        }
    }
}
