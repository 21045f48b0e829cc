// crates/ch_physics/src/builder.rs

//! 求解器构建（运行时精度分发）
//!
//! 应用层只看到 `Box<dyn DynSolver>`；精度在这里按 `Precision`
//! 枚举分发到 `EulerSolver<f32>` / `EulerSolver<f64>` 的单态化实例。

use ch_config::{DynSolver, Precision, SolverConfig, SolverError};

use crate::engine::EulerSolver;

/// 按配置构建求解器
pub fn build_solver(config: &SolverConfig) -> Result<Box<dyn DynSolver>, SolverError> {
    config
        .validate()
        .map_err(|e| SolverError::Config(e.to_string()))?;
    match config.precision {
        Precision::F32 => Ok(Box::new(
            EulerSolver::<f32>::from_config(config).map_err(SolverError::from)?,
        )),
        Precision::F64 => Ok(Box::new(
            EulerSolver::<f64>::from_config(config).map_err(SolverError::from)?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ch_config::ParameterMap;

    fn config(text: &str) -> SolverConfig {
        let pm = ParameterMap::from_str_and_args(text, &[]).unwrap();
        SolverConfig::from_parameter_map(&pm).unwrap()
    }

    #[test]
    fn test_build_both_precisions() {
        for precision in ["f32", "f64"] {
            let text = format!(
                "precision = {precision}\n[grid]\nnx = 8\n[time]\nt_end = 0.1\n"
            );
            let solver = build_solver(&config(&text)).unwrap();
            assert_eq!(solver.precision().to_string(), precision);
        }
    }

    #[test]
    fn test_build_mhd_solver() {
        let text = "\
[grid]
nx = 8
[time]
t_end = 0.1
[physics]
mhd = true
gamma = 2.0
[scheme]
riemann = hlld
[problem]
name = brio_wu
";
        let mut solver = build_solver(&config(text)).unwrap();
        let dt = solver.recommended_dt().unwrap();
        solver.step(dt).unwrap();
        assert_eq!(solver.step_count(), 1);
        // 快照包含磁场分量
        let snap = solver.export_snapshot();
        assert!(snap.fields.iter().any(|(name, _)| name == "magnetic_y"));
    }
}
