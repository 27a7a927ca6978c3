//! Turns a tab-separated user table into the `skip_users`/`user_aliases`
//! part of the config file.

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

const RETIRED: &str = "TRUE";

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct AssigneeConfig {
    pub skip_users: Vec<String>,
    pub user_aliases: BTreeMap<String, String>,
}

/// One row: source login (column 0), retired flag (column 2), target login (column 3).
#[derive(Debug, PartialEq)]
struct Assignee {
    source_login: String,
    target_login: String,
    retired: bool,
}

impl Assignee {
    fn should_be_aliased(&self) -> bool {
        !self.target_login.is_empty() && self.target_login != self.source_login
    }
}

fn parse_record(record: &StringRecord) -> Result<Assignee> {
    let line = record.position().map_or(0, |p| p.line());
    if record.len() < 4 {
        bail!("line {line}: expected at least 4 tab-separated columns, got {}", record.len());
    }
    Ok(Assignee {
        source_login: record[0].to_string(),
        target_login: record[3].to_string(),
        retired: &record[2] == RETIRED,
    })
}

pub fn parse_assignee_table(contents: &str) -> Result<AssigneeConfig> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(contents.as_bytes());

    let mut config = AssigneeConfig::default();
    for (idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", idx + 1))?;
        let assignee = parse_record(&record)?;
        if assignee.retired {
            config.skip_users.push(assignee.source_login);
        } else if assignee.should_be_aliased() {
            config
                .user_aliases
                .insert(assignee.source_login, assignee.target_login);
        }
    }
    Ok(config)
}

pub fn dump_assignees(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = parse_assignee_table(&contents)?;
    toml::to_string_pretty(&config).context("Failed to render assignee config")
}
