// apps/ch_cli/src/output.rs

//! 文本快照输出
//!
//! [`SnapshotWriter`] 协作方的 CSV 实现：把 [`SnapshotData`] 写成
//! 逐单元的 CSV 文件（x 最快的行主序，与重启所需的单元顺序一致）。
//! 每个快照一个文件：`<prefix>_NNNNNN.csv`，首行记录步数、时间与
//! 维度。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use ch_config::SnapshotData;
use ch_physics::traits::SnapshotWriter;
use ch_runtime::{ChError, ChResult};
use tracing::info;

/// CSV 快照写出器
pub struct CsvSnapshotWriter {
    directory: PathBuf,
    prefix: String,
}

impl CsvSnapshotWriter {
    /// 创建写出器（目录不存在时创建）
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> anyhow::Result<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            prefix: prefix.into(),
        })
    }

    /// 写出一个快照文件，返回其路径
    fn write_file(&mut self, snap: &SnapshotData) -> std::io::Result<PathBuf> {
        let path = self
            .directory
            .join(format!("{}_{:06}.csv", self.prefix, snap.step));
        let mut w = BufWriter::new(File::create(&path)?);

        writeln!(
            w,
            "# step = {}, time = {:.12e}, dims = {} {} {}",
            snap.step, snap.time, snap.dims[0], snap.dims[1], snap.dims[2]
        )?;
        let names: Vec<&str> = snap.fields.iter().map(|(n, _)| n.as_str()).collect();
        if snap.potential.is_some() {
            writeln!(w, "{},potential", names.join(","))?;
        } else {
            writeln!(w, "{}", names.join(","))?;
        }

        let n_cells = snap.dims[0] * snap.dims[1] * snap.dims[2];
        for idx in 0..n_cells {
            let mut row: Vec<String> = snap
                .fields
                .iter()
                .map(|(_, data)| format!("{:.12e}", data[idx]))
                .collect();
            if let Some(phi) = &snap.potential {
                row.push(format!("{:.12e}", phi[idx]));
            }
            writeln!(w, "{}", row.join(","))?;
        }
        Ok(path)
    }
}

impl SnapshotWriter for CsvSnapshotWriter {
    fn write_snapshot(&mut self, snapshot: &SnapshotData) -> ChResult<()> {
        let path = self.write_file(snapshot).map_err(|e| {
            ChError::io(format!(
                "写出第 {} 步快照失败: {e}",
                snapshot.step
            ))
        })?;
        info!("快照 → {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SnapshotData {
        SnapshotData {
            step: 3,
            time: 0.125,
            dims: [2, 2, 1],
            fields: vec![
                ("density".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
                ("energy".to_string(), vec![0.1, 0.2, 0.3, 0.4]),
            ],
            potential: None,
        }
    }

    #[test]
    fn test_write_snapshot_roundtrip_shape() {
        let dir = std::env::temp_dir().join("cholla_snapshot_test");
        let mut writer = CsvSnapshotWriter::new(&dir, "test").unwrap();
        let path = writer.write_file(&snapshot()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[0].contains("step = 3"));
        assert_eq!(lines[1], "density,energy");
        assert_eq!(lines.len(), 2 + 4);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_trait_impl_writes_through_seam() {
        let dir = std::env::temp_dir().join("cholla_snapshot_trait_test");
        let mut writer = CsvSnapshotWriter::new(&dir, "test").unwrap();
        {
            let seam: &mut dyn SnapshotWriter = &mut writer;
            seam.write_snapshot(&snapshot()).unwrap();
        }
        assert!(dir.join("test_000003.csv").exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
