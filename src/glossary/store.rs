//! 词库存储
//!
//! JSON 文件持久化的本地文档库，承载全部词条的增删改查。
//! 保存采用临时文件 + 备份 + 原子替换，任一步骤崩溃都可恢复。

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::glossary::term::{Term, TermFields, TermPatch};

/// 词库文件结构
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    terms: Vec<Term>,
}

/// 词库
pub struct GlossaryStore {
    path: PathBuf,
    terms: Vec<Term>,
}

impl GlossaryStore {
    /// 默认词库路径：data_dir/fingloss/terms.json
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or_else(|| anyhow::anyhow!("无法获取数据目录"))?;
        let app_dir = data_dir.join("fingloss");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("terms.json"))
    }

    /// 打开词库（文件不存在时返回空词库）
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            tracing::info!("词库文件不存在，创建空词库: {:?}", path);
            return Ok(Self {
                path,
                terms: Vec::new(),
            });
        }

        let content = std::fs::read_to_string(&path)?;

        // 先按当前结构解析；失败时尝试旧版纯数组格式
        let terms = match serde_json::from_str::<StoreFile>(&content) {
            Ok(file) => file.terms,
            Err(e) => {
                tracing::warn!("按当前词库格式解析失败，尝试旧版数组格式: {}", e);
                serde_json::from_str::<Vec<Term>>(&content)
                    .map_err(|_| anyhow::anyhow!("词库文件损坏: {:?}: {}", path, e))?
            }
        };

        tracing::info!("已加载 {} 个词条: {:?}", terms.len(), path);
        Ok(Self { path, terms })
    }

    /// 保存词库
    ///
    /// 原子写入：先写临时文件，原文件备份为 .bak，再重命名替换。
    /// 崩溃恢复：步骤 1 失败原文件完好；步骤 2 失败可从 .bak 恢复。
    pub fn save(&self) -> Result<()> {
        let file = StoreFile {
            terms: self.terms.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        let temp_path = self.path.with_extension("json.tmp");
        let backup_path = self.path.with_extension("json.bak");

        std::fs::write(&temp_path, &content).map_err(|e| {
            tracing::error!("写入词库临时文件失败: {}", e);
            e
        })?;

        if self.path.exists() {
            if backup_path.exists() {
                let _ = std::fs::remove_file(&backup_path);
            }
            std::fs::rename(&self.path, &backup_path)?;
        }

        match std::fs::rename(&temp_path, &self.path) {
            Ok(_) => {
                let _ = std::fs::remove_file(&backup_path);
                tracing::debug!("词库保存成功: {} 个词条", self.terms.len());
                Ok(())
            }
            Err(e) => {
                tracing::error!("替换词库文件失败: {}", e);
                if backup_path.exists() {
                    if let Err(restore_err) = std::fs::rename(&backup_path, &self.path) {
                        tracing::error!("恢复词库备份失败: {}", restore_err);
                    } else {
                        tracing::info!("已从备份恢复词库");
                    }
                }
                Err(e.into())
            }
        }
    }

    /// 词库文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 新增词条（插入到最前，列表按最新优先展示）
    pub fn add_term(&mut self, fields: TermFields) -> &Term {
        let term = Term::new(fields);
        tracing::info!("新增词条: {} ({})", term.term, term.id);
        self.terms.insert(0, term);
        &self.terms[0]
    }

    /// 更新词条
    pub fn update_term(&mut self, id: Uuid, patch: TermPatch) -> Result<&Term> {
        let term = self
            .terms
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| anyhow::anyhow!("词条不存在: {}", id))?;
        term.apply(patch);
        Ok(term)
    }

    /// 删除词条
    pub fn delete_term(&mut self, id: Uuid) -> Result<Term> {
        let idx = self
            .terms
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| anyhow::anyhow!("词条不存在: {}", id))?;
        let removed = self.terms.remove(idx);
        tracing::info!("删除词条: {} ({})", removed.term, removed.id);
        Ok(removed)
    }

    /// 按 id 查询
    pub fn get(&self, id: Uuid) -> Option<&Term> {
        self.terms.iter().find(|t| t.id == id)
    }

    /// 按 id 可变查询
    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Term> {
        self.terms.iter_mut().find(|t| t.id == id)
    }

    /// 全部词条（最新优先）
    pub fn all(&self) -> &[Term] {
        &self.terms
    }

    /// 全部标签（去重、排序）
    pub fn all_tags(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .terms
            .iter()
            .flat_map(|t| t.tags.iter())
            .map(|t| t.as_str())
            .collect();
        set.into_iter().map(|s| s.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
