//! 词条数据模型

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// 当前 Unix 毫秒时间戳
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// 词汇条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Term {
    pub id: Uuid,
    /// 词条名（发音练习的目标文本）
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub definition: String,
    /// IPA 音标（如 /ˈælɡərɪðəm/）
    #[serde(default)]
    pub ipa: String,
    /// 中文释义
    #[serde(default)]
    pub mandarin: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// 创建时间（Unix 毫秒）
    #[serde(default)]
    pub created_at_ms: u64,
    /// 最后更新时间（Unix 毫秒）
    #[serde(default)]
    pub updated_at_ms: u64,
}

/// 新建或导入词条时的字段集合
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermFields {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub ipa: String,
    #[serde(default)]
    pub mandarin: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// 字段级更新补丁
///
/// 仅 `Some` 的字段会被写入，未涉及字段保持不变
#[derive(Debug, Clone, Default)]
pub struct TermPatch {
    pub term: Option<String>,
    pub definition: Option<String>,
    pub ipa: Option<String>,
    pub mandarin: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Term {
    /// 创建新词条（分配 v4 UUID，时间戳取当前时刻）
    pub fn new(fields: TermFields) -> Self {
        let now = now_ms();
        Self {
            id: Uuid::new_v4(),
            term: fields.term,
            definition: fields.definition,
            ipa: fields.ipa,
            mandarin: fields.mandarin,
            tags: fields.tags,
            created_at_ms: now,
            updated_at_ms: now,
        }
    }

    /// 应用补丁并刷新更新时间
    pub fn apply(&mut self, patch: TermPatch) {
        if let Some(term) = patch.term {
            self.term = term;
        }
        if let Some(definition) = patch.definition {
            self.definition = definition;
        }
        if let Some(ipa) = patch.ipa {
            self.ipa = ipa;
        }
        if let Some(mandarin) = patch.mandarin {
            self.mandarin = mandarin;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at_ms = now_ms();
    }

    /// 添加标签（去重，忽略空白标签）
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        self.updated_at_ms = now_ms();
        true
    }

    /// 移除标签
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        if self.tags.len() != before {
            self.updated_at_ms = now_ms();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_term() {
        let term = Term::new(TermFields {
            term: "Algorithm".to_string(),
            definition: "Step-by-step procedure for solving problems".to_string(),
            ipa: "/ˈælɡərɪðəm/".to_string(),
            mandarin: "算法".to_string(),
            tags: vec!["computer-science".to_string()],
        });
        assert_eq!(term.term, "Algorithm");
        assert_eq!(term.created_at_ms, term.updated_at_ms);
        assert!(!term.id.is_nil());
    }

    #[test]
    fn test_apply_patch_partial() {
        let mut term = Term::new(TermFields {
            term: "API".to_string(),
            definition: "old".to_string(),
            ..Default::default()
        });
        term.apply(TermPatch {
            definition: Some("Application Programming Interface".to_string()),
            ..Default::default()
        });
        assert_eq!(term.term, "API");
        assert_eq!(term.definition, "Application Programming Interface");
    }

    #[test]
    fn test_tags_dedup() {
        let mut term = Term::new(TermFields::default());
        assert!(term.add_tag("web"));
        assert!(!term.add_tag("web"));
        assert!(!term.add_tag("  "));
        assert_eq!(term.tags, vec!["web"]);

        assert!(term.remove_tag("web"));
        assert!(!term.remove_tag("web"));
        assert!(term.tags.is_empty());
    }

    #[test]
    fn test_deserialize_missing_fields() {
        // 旧版数据缺字段时按默认值补齐
        let json = format!(r#"{{"id":"{}","term":"API"}}"#, Uuid::new_v4());
        let term: Term = serde_json::from_str(&json).unwrap();
        assert_eq!(term.term, "API");
        assert!(term.definition.is_empty());
        assert!(term.tags.is_empty());
    }
}
