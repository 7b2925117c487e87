//! 抽出行のCSV/JSON出力

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use crate::error::ScraperError;
use crate::extract::{FieldRow, NEIGHBORHOOD_COLUMN};

/// CSVヘッダの決め方
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSchema {
    /// 全行のラベルの和集合。`Neighborhood` を先頭に、残りは昇順
    #[default]
    Union,
    /// 指定した列のみを指定順で出力する
    Declared(Vec<String>),
}

/// 全行のラベルの和集合（`Neighborhood` 先頭、残りは昇順）
pub fn union_columns(rows: &[FieldRow]) -> Vec<String> {
    let names: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .filter(|name| *name != NEIGHBORHOOD_COLUMN)
        .collect();

    let mut columns = Vec::with_capacity(names.len() + 1);
    if rows.iter().any(|row| row.contains_key(NEIGHBORHOOD_COLUMN)) {
        columns.push(NEIGHBORHOOD_COLUMN.to_string());
    }
    columns.extend(names.into_iter().map(str::to_string));
    columns
}

#[derive(Debug)]
pub struct OutputTable<'a> {
    columns: Vec<String>,
    rows: &'a [FieldRow],
}

impl<'a> OutputTable<'a> {
    pub fn new(rows: &'a [FieldRow], schema: &ColumnSchema) -> Self {
        let columns = match schema {
            ColumnSchema::Union => union_columns(rows),
            ColumnSchema::Declared(columns) => {
                let dropped = rows
                    .iter()
                    .flat_map(|row| row.keys())
                    .filter(|key| !columns.contains(*key))
                    .count();
                if dropped > 0 {
                    debug!("{} fields outside the declared schema were dropped", dropped);
                }
                columns.clone()
            }
        };
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// ヘッダ + 1地区1行。欠けている列は空欄。列が無ければ何も書かない
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ScraperError> {
        let mut out = csv::Writer::from_writer(writer);
        if self.columns.is_empty() {
            out.flush()?;
            return Ok(());
        }
        out.write_record(&self.columns)?;

        for row in self.rows {
            out.write_record(
                self.columns
                    .iter()
                    .map(|column| row.get(column).map(String::as_str).unwrap_or("")),
            )?;
        }

        out.flush()?;
        Ok(())
    }

    /// 親ディレクトリを作成してファイルに書き出す
    pub fn write_to_path(&self, path: &Path) -> Result<(), ScraperError> {
        create_parent_dir(path)?;
        let file = File::create(path)?;
        self.write_csv(file)?;

        info!(
            "Wrote {} rows x {} columns to {:?}",
            self.rows.len(),
            self.columns.len(),
            path
        );
        Ok(())
    }
}

/// 全行をJSONで `dir/neighborhoods_YYYYmmdd_HHMMSS.json` に保存する
pub fn write_json_dump(dir: &Path, rows: &[FieldRow]) -> Result<PathBuf, ScraperError> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("neighborhoods_{}.json", timestamp));

    std::fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(rows).map_err(|e| ScraperError::Write(e.to_string()))?;
    std::fs::write(&path, json)?;

    info!("Saved {} rows to {:?}", rows.len(), path);
    Ok(path)
}

fn create_parent_dir(path: &Path) -> Result<(), ScraperError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
