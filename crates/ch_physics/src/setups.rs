// crates/ch_physics/src/setups.rs

//! 内置初始条件
//!
//! 几个经典测试问题的初始化工厂，由 `[problem] name` 选择：
//!
//! - `uniform`: 全域取左状态
//! - `sod` / `shock_tube` / `einfeldt`: 沿指定轴的两状态间断
//! - `brio_wu`: 磁流体激波管（固定的典型初值，γ 取自配置）
//! - `sound_wave`: 匀速平流的正弦密度扰动
//!
//! 被动标量按"左 1 右 0"着色，便于追踪接触面。复杂初始条件工厂
//! 属于外部关切，经 `field_mut` 直接写入。

use ch_config::ProblemConfig;
use ch_runtime::{Axis, ChError, ChResult, RuntimeScalar};

use crate::eos::GammaLaw;
use crate::grid::BlockGrid;
use crate::state::{FieldBlock, Primitive};

/// Brio & Wu (1988) 的标准初值
const BRIO_WU_LEFT: ([f64; 5], [f64; 3]) = ([1.0, 0.0, 0.0, 0.0, 1.0], [0.75, 1.0, 0.0]);
const BRIO_WU_RIGHT: ([f64; 5], [f64; 3]) = ([0.128, 0.0, 0.0, 0.0, 0.1], [0.75, -1.0, 0.0]);

/// 把一个原始状态写入单元（含双能量与标量着色）
fn write_cell<S: RuntimeScalar>(
    field: &mut FieldBlock<S>,
    eos: &GammaLaw<S>,
    idx: usize,
    w: &Primitive<S>,
    scalar_concentration: S,
) {
    let u = eos.to_conserved(w);
    field.set_conserved(idx, &u);
    if let Some(ge) = &mut field.internal_energy {
        ge[idx] = w.p / (eos.gamma - S::ONE);
    }
    for s in &mut field.scalars {
        s[idx] = w.d * scalar_concentration;
    }
}

fn primitive_from<S: RuntimeScalar>(state: &[f64; 5], b: &[f64; 3]) -> Primitive<S> {
    Primitive {
        d: S::from_config(state[0]),
        vx: S::from_config(state[1]),
        vy: S::from_config(state[2]),
        vz: S::from_config(state[3]),
        p: S::from_config(state[4]),
        b: [
            S::from_config(b[0]),
            S::from_config(b[1]),
            S::from_config(b[2]),
        ],
    }
}

/// 沿指定轴的两状态间断
fn two_state<S: RuntimeScalar>(
    field: &mut FieldBlock<S>,
    grid: &BlockGrid,
    eos: &GammaLaw<S>,
    axis: Axis,
    position: f64,
    left: &Primitive<S>,
    right: &Primitive<S>,
) {
    let t = grid.total_dims();
    for k in 0..t[2] {
        for j in 0..t[1] {
            for i in 0..t[0] {
                let idx = grid.index(i, j, k);
                let c = grid.cell_center(i, j, k);
                let x = [c.x, c.y, c.z][axis.index()];
                if x < position {
                    write_cell(field, eos, idx, left, S::ONE);
                } else {
                    write_cell(field, eos, idx, right, S::ZERO);
                }
            }
        }
    }
}

/// 按问题配置铺设初始条件（覆盖含幽灵的整个块）
pub fn initialize<S: RuntimeScalar>(
    field: &mut FieldBlock<S>,
    grid: &BlockGrid,
    eos: &GammaLaw<S>,
    problem: &ProblemConfig,
) -> ChResult<()> {
    let axis = match problem.axis {
        0 => Axis::X,
        1 => Axis::Y,
        2 => Axis::Z,
        other => {
            return Err(ChError::config(format!(
                "problem.axis 必须为 0/1/2，得到 {other}"
            )))
        }
    };
    let left = primitive_from::<S>(&problem.left, &problem.left_b);
    let right = primitive_from::<S>(&problem.right, &problem.right_b);

    match problem.name.as_str() {
        "uniform" => {
            let t = grid.total_dims();
            for k in 0..t[2] {
                for j in 0..t[1] {
                    for i in 0..t[0] {
                        write_cell(field, eos, grid.index(i, j, k), &left, S::ONE);
                    }
                }
            }
        }
        "sod" | "shock_tube" | "einfeldt" => {
            two_state(
                field,
                grid,
                eos,
                axis,
                problem.interface_position,
                &left,
                &right,
            );
        }
        "brio_wu" => {
            let left = primitive_from::<S>(&BRIO_WU_LEFT.0, &BRIO_WU_LEFT.1);
            let right = primitive_from::<S>(&BRIO_WU_RIGHT.0, &BRIO_WU_RIGHT.1);
            two_state(
                field,
                grid,
                eos,
                axis,
                problem.interface_position,
                &left,
                &right,
            );
        }
        "sound_wave" => {
            // 密度正弦扰动随匀速流平流；一个周期后应回到初始剖面
            let length = grid.dh[axis.index()] * grid.n[axis.index()] as f64;
            let origin = grid.origin[axis.index()];
            let amplitude = S::from_config(problem.amplitude);
            let t = grid.total_dims();
            for k in 0..t[2] {
                for j in 0..t[1] {
                    for i in 0..t[0] {
                        let idx = grid.index(i, j, k);
                        let c = grid.cell_center(i, j, k);
                        let x = [c.x, c.y, c.z][axis.index()];
                        let phase = 2.0 * std::f64::consts::PI * (x - origin) / length;
                        let mut w = left;
                        w.d = left.d * (S::ONE + amplitude * S::from_config(phase.sin()));
                        write_cell(field, eos, idx, &w, S::ONE);
                    }
                }
            }
        }
        other => {
            return Err(ChError::config(format!(
                "未知的问题名称 \"{other}\"（可用: uniform, sod, shock_tube, einfeldt, brio_wu, sound_wave）"
            )))
        }
    }
    Ok(())
}
