//! 批量导入
//!
//! 读取 JSON 数组文件（`[{term, definition, ipa, mandarin, tags}, ...]`），
//! 按词条名（大小写不敏感）合入词库：已存在则更新，不存在则新增，
//! 词条名为空的记录跳过。

use anyhow::Result;
use std::path::Path;

use crate::glossary::store::GlossaryStore;
use crate::glossary::term::{TermFields, TermPatch};

/// 导入统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// 新增条数
    pub imported: usize,
    /// 更新条数
    pub updated: usize,
    /// 跳过条数（词条名为空）
    pub skipped: usize,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.imported + self.updated + self.skipped
    }
}

/// 合入一批导入记录（不落盘，由调用方决定何时保存）
pub fn import_records(store: &mut GlossaryStore, records: Vec<TermFields>) -> ImportReport {
    let mut report = ImportReport::default();

    for record in records {
        let name = record.term.trim();
        if name.is_empty() {
            report.skipped += 1;
            continue;
        }
        let name_lower = name.to_lowercase();

        let existing = store
            .all()
            .iter()
            .find(|t| t.term.to_lowercase() == name_lower)
            .map(|t| t.id);

        match existing {
            Some(id) => {
                // 已有词条：非空字段覆盖，标签合并去重
                let merged_tags = {
                    let current = store.get(id).map(|t| t.tags.clone()).unwrap_or_default();
                    let mut tags = current;
                    for tag in &record.tags {
                        let tag = tag.trim();
                        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                            tags.push(tag.to_string());
                        }
                    }
                    tags
                };
                let patch = TermPatch {
                    definition: non_empty(record.definition),
                    ipa: non_empty(record.ipa),
                    mandarin: non_empty(record.mandarin),
                    tags: Some(merged_tags),
                    ..Default::default()
                };
                if store.update_term(id, patch).is_ok() {
                    report.updated += 1;
                }
            }
            None => {
                store.add_term(TermFields {
                    term: name.to_string(),
                    ..record
                });
                report.imported += 1;
            }
        }
    }

    report
}

/// 从文件导入并保存词库
pub fn import_file(store: &mut GlossaryStore, path: &Path) -> Result<ImportReport> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("读取导入文件失败: {:?}: {}", path, e))?;
    let records: Vec<TermFields> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("导入文件不是词条记录数组: {}", e))?;

    let report = import_records(store, records);
    store.save()?;

    tracing::info!(
        "导入完成: 新增 {} 更新 {} 跳过 {}",
        report.imported,
        report.updated,
        report.skipped
    );
    Ok(report)
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
