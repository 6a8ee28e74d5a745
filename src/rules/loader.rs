//! Load rule tables from TOML files

use crate::core::error::{FusilladeError, Result};
use crate::rules::tables::{ClusterRow, ClusterTable, JamTable};
use std::fs;
use std::path::Path;
use tracing::info;

const CLUSTER_FILE: &str = "cluster.toml";
const JAM_FILE: &str = "jam.toml";

const BUILTIN_CLUSTER: &str = include_str!("../../data/cluster.toml");
const BUILTIN_JAM: &str = include_str!("../../data/jam.toml");

/// The full set of loaded rule tables
#[derive(Debug, Clone)]
pub struct RulesData {
    pub cluster: ClusterTable,
    pub jam: JamTable,
}

impl RulesData {
    /// The tables compiled into the binary
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            cluster: parse_cluster_toml(BUILTIN_CLUSTER, CLUSTER_FILE)?,
            jam: parse_jam_toml(BUILTIN_JAM, JAM_FILE)?,
        })
    }
}

/// Load rule tables from a directory, falling back to the builtin copy
/// for any file that is absent
pub fn load_rules(tables_dir: &Path) -> Result<RulesData> {
    let cluster_path = tables_dir.join(CLUSTER_FILE);
    let cluster = if cluster_path.exists() {
        let content = fs::read_to_string(&cluster_path)?;
        info!(path = %cluster_path.display(), "loading cluster table");
        parse_cluster_toml(&content, CLUSTER_FILE)?
    } else {
        parse_cluster_toml(BUILTIN_CLUSTER, CLUSTER_FILE)?
    };

    let jam_path = tables_dir.join(JAM_FILE);
    let jam = if jam_path.exists() {
        let content = fs::read_to_string(&jam_path)?;
        info!(path = %jam_path.display(), "loading jam table");
        parse_jam_toml(&content, JAM_FILE)?
    } else {
        parse_jam_toml(BUILTIN_JAM, JAM_FILE)?
    };

    Ok(RulesData { cluster, jam })
}

fn table_error(file: &str, reason: impl Into<String>) -> FusilladeError {
    FusilladeError::InvalidTable {
        file: file.to_string(),
        reason: reason.into(),
    }
}

fn parse_cluster_toml(content: &str, file: &str) -> Result<ClusterTable> {
    let toml: toml::Value = content
        .parse()
        .map_err(|e| table_error(file, format!("invalid TOML: {}", e)))?;

    let rows_value = toml
        .get("row")
        .and_then(|v| v.as_array())
        .ok_or_else(|| table_error(file, "missing [[row]] entries"))?;

    let mut rows = Vec::with_capacity(rows_value.len());
    for row in rows_value {
        let rack = row
            .get("rack")
            .and_then(|v| v.as_integer())
            .ok_or_else(|| table_error(file, "row missing rack"))?;
        if !(1..=40).contains(&rack) {
            return Err(table_error(file, format!("rack {} out of range", rack)));
        }

        let hits_value = row
            .get("hits")
            .and_then(|v| v.as_array())
            .ok_or_else(|| table_error(file, format!("rack {} missing hits array", rack)))?;

        let mut hits = Vec::with_capacity(hits_value.len());
        for value in hits_value {
            let n = value
                .as_integer()
                .filter(|n| (0..=40).contains(n))
                .ok_or_else(|| table_error(file, format!("rack {} has a bad hit count", rack)))?;
            hits.push(n as u8);
        }

        rows.push(ClusterRow {
            rack: rack as u8,
            hits,
        });
    }

    let table = ClusterTable::new(rows);
    table.validate().map_err(|reason| table_error(file, reason))?;
    Ok(table)
}

fn parse_jam_toml(content: &str, file: &str) -> Result<JamTable> {
    let toml: toml::Value = content
        .parse()
        .map_err(|e| table_error(file, format!("invalid TOML: {}", e)))?;

    let entries_value = toml
        .get("threshold")
        .and_then(|v| v.as_array())
        .ok_or_else(|| table_error(file, "missing [[threshold]] entries"))?;

    let mut entries = Vec::with_capacity(entries_value.len());
    for entry in entries_value {
        let shots = entry
            .get("shots")
            .and_then(|v| v.as_integer())
            .filter(|n| (1..=20).contains(n))
            .ok_or_else(|| table_error(file, "threshold missing shots"))?;
        let jam_on = entry
            .get("jam_on")
            .and_then(|v| v.as_integer())
            .filter(|n| (0..=12).contains(n))
            .ok_or_else(|| table_error(file, format!("{} shots missing jam_on", shots)))?;
        entries.push((shots as u8, jam_on as u8));
    }

    let table = JamTable::new(entries);
    table.validate().map_err(|reason| table_error(file, reason))?;
    Ok(table)
}
