//! 词条搜索与过滤
//!
//! 支持标签过滤 + 文本检索。文本检索对词条名、释义、中文释义和标签
//! 做大小写不敏感的子串匹配；ASCII 查询额外匹配中文释义的拼音，
//! 全部无命中时按编辑距离给出近似词条建议。

use pinyin::ToPinyin;
use strsim::levenshtein;

use crate::glossary::term::Term;

/// 列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct TermFilter {
    /// 检索文本（空串表示不过滤）
    pub search: String,
    /// 选中的标签（None 表示全部）
    pub tag: Option<String>,
}

impl TermFilter {
    pub fn matches(&self, term: &Term) -> bool {
        if let Some(tag) = &self.tag {
            if !term.tags.iter().any(|t| t == tag) {
                return false;
            }
        }

        if self.search.is_empty() {
            return true;
        }

        let query = self.search.to_lowercase();
        if term.term.to_lowercase().contains(&query)
            || term.definition.to_lowercase().contains(&query)
            || term.mandarin.to_lowercase().contains(&query)
            || term.tags.iter().any(|t| t.to_lowercase().contains(&query))
        {
            return true;
        }

        // ASCII 查询匹配中文释义的拼音（如 "suanfa" → 算法）
        if query.is_ascii() && !term.mandarin.is_empty() {
            let py = to_pinyin_str(&term.mandarin);
            if !py.is_empty() && py.contains(&query) {
                return true;
            }
        }

        false
    }
}

/// 应用过滤条件（保持输入顺序）
pub fn filter_terms<'a>(terms: &'a [Term], filter: &TermFilter) -> Vec<&'a Term> {
    terms.iter().filter(|t| filter.matches(t)).collect()
}

/// 近似词条建议
///
/// 对词条名做编辑距离匹配，阈值 max(1, len/4)，按距离升序返回，
/// 最多 `limit` 个。用于检索无结果时的提示。
pub fn suggest<'a>(terms: &'a [Term], query: &str, limit: usize) -> Vec<&'a Term> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let query_len = query.chars().count();
    let threshold = std::cmp::max(1, query_len / 4);

    let mut candidates: Vec<(usize, &Term)> = terms
        .iter()
        .filter_map(|term| {
            let name = term.term.to_lowercase();
            let name_len = name.chars().count();
            // 长度差超过阈值的直接跳过
            if (name_len as i64 - query_len as i64).unsigned_abs() as usize > threshold {
                return None;
            }
            let distance = levenshtein(&query, &name);
            (distance <= threshold).then_some((distance, term))
        })
        .collect();

    candidates.sort_by_key(|(distance, _)| *distance);
    candidates
        .into_iter()
        .take(limit)
        .map(|(_, term)| term)
        .collect()
}

/// 转换为拼音字符串（全拼，无声调）
///
/// 非汉字的 ASCII 字母数字原样小写保留，其余字符忽略
fn to_pinyin_str(text: &str) -> String {
    let mut result = String::new();
    for ch in text.chars() {
        if let Some(py) = ch.to_pinyin() {
            result.push_str(py.plain());
        } else if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glossary::term::TermFields;

    fn sample_terms() -> Vec<Term> {
        vec![
            Term::new(TermFields {
                term: "Algorithm".to_string(),
                definition: "Step-by-step procedure for solving problems".to_string(),
                mandarin: "算法".to_string(),
                tags: vec!["computer-science".to_string(), "math".to_string()],
                ..Default::default()
            }),
            Term::new(TermFields {
                term: "Database".to_string(),
                definition: "Structured collection of data".to_string(),
                mandarin: "数据库".to_string(),
                tags: vec!["data".to_string(), "storage".to_string()],
                ..Default::default()
            }),
            Term::new(TermFields {
                term: "Machine Learning".to_string(),
                definition: "AI technique that enables computers to learn from data".to_string(),
                mandarin: "机器学习".to_string(),
                tags: vec!["ai".to_string()],
                ..Default::default()
            }),
        ]
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let terms = sample_terms();
        assert_eq!(filter_terms(&terms, &TermFilter::default()).len(), 3);
    }

    #[test]
    fn test_search_by_name_case_insensitive() {
        let terms = sample_terms();
        let filter = TermFilter {
            search: "algo".to_string(),
            ..Default::default()
        };
        let hits = filter_terms(&terms, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term, "Algorithm");
    }

    #[test]
    fn test_search_by_definition_and_tag() {
        let terms = sample_terms();
        let by_def = TermFilter {
            search: "collection".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_terms(&terms, &by_def)[0].term, "Database");

        let by_tag = TermFilter {
            search: "storage".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_terms(&terms, &by_tag)[0].term, "Database");
    }

    #[test]
    fn test_search_by_mandarin() {
        let terms = sample_terms();
        let filter = TermFilter {
            search: "算法".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_terms(&terms, &filter)[0].term, "Algorithm");
    }

    #[test]
    fn test_search_by_pinyin() {
        let terms = sample_terms();
        let filter = TermFilter {
            search: "suanfa".to_string(),
            ..Default::default()
        };
        let hits = filter_terms(&terms, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term, "Algorithm");
    }

    #[test]
    fn test_tag_filter_combined_with_search() {
        let terms = sample_terms();
        let filter = TermFilter {
            search: "data".to_string(),
            tag: Some("ai".to_string()),
        };
        // "data" 也出现在 Machine Learning 的释义里，但标签过滤先行
        let hits = filter_terms(&terms, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term, "Machine Learning");
    }

    #[test]
    fn test_suggest_close_name() {
        let terms = sample_terms();
        // "databese" 与 "database" 编辑距离 1，阈值 max(1, 8/4)=2
        let hits = suggest(&terms, "databese", 3);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term, "Database");
    }

    #[test]
    fn test_suggest_no_match() {
        let terms = sample_terms();
        assert!(suggest(&terms, "zzzzzz", 3).is_empty());
        assert!(suggest(&terms, "", 3).is_empty());
    }
}
