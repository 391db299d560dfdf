//! 发音评分器
//!
//! 将语音识别的定稿转写与目标词条比较，输出 0-100 的相似度分数。
//! 纯函数：无内部状态，除只读符号词表外不依赖任何外部数据，可并发调用。
//!
//! 评分优先级：
//! 1. 符号词短路（变体相等/子串命中 → 100，否则取变体相似度最大值）
//! 2. 归一化后完全相等 → 100；单向包含 → 85
//! 3. 编辑距离相似度兜底

use strsim::levenshtein;

use crate::scoring::normalize::normalize_for_comparison;
use crate::scoring::symbol_words;

/// 完全匹配分数
const SCORE_EXACT: u8 = 100;
/// 包含关系固定分（奖励在长句中说出目标词，不按编辑距离计算）
const SCORE_CONTAINED: u8 = 85;

/// 评分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringResult {
    /// 相似度分数，0-100
    pub score: u8,
    /// 命中的符号词变体（仅符号词相等/子串命中时记录）
    pub matched_variant: Option<String>,
}

impl ScoringResult {
    fn plain(score: u8) -> Self {
        Self {
            score,
            matched_variant: None,
        }
    }
}

/// 计算发音相似度分数
///
/// 任一输入为空返回 0：识别无结果属正常瞬态，不是错误。
/// 本函数不会失败，所有退化输入都退化为一个分数。
pub fn score(spoken: &str, target: &str) -> ScoringResult {
    if spoken.is_empty() || target.is_empty() {
        return ScoringResult::plain(0);
    }

    // 1. 符号词短路
    let target_lower = target.to_lowercase();
    if let Some(entry) = symbol_words::lookup(&target_lower) {
        let spoken_lower = spoken.to_lowercase().trim().to_string();

        if let Some(variant) = entry.match_variant(&spoken_lower) {
            tracing::debug!("符号词变体命中: target={} variant={}", target, variant);
            return ScoringResult {
                score: SCORE_EXACT,
                matched_variant: Some(variant.to_string()),
            };
        }

        // 未命中变体：对每个变体做编辑距离相似度，取最大值
        let best = entry
            .variants()
            .iter()
            .map(|variant| similarity(&spoken_lower, variant))
            .max()
            .unwrap_or(0);
        return ScoringResult::plain(best);
    }

    // 2. 归一化比较
    //
    // 仅当目标本身含下划线时才把下划线转为空格，
    // 避免破坏非下划线目标的转写中的下划线语义
    let underscores = target.contains('_');
    let spoken_norm = normalize_for_comparison(spoken, underscores);
    let target_norm = normalize_for_comparison(target, underscores);

    if spoken_norm == target_norm {
        // 双方归一化后皆为空串（纯标点输入）视为空泛相等，同样落在这里
        return ScoringResult::plain(SCORE_EXACT);
    }

    // 包含检查要求双方非空：空串是任何串的子串，不构成有意义的部分匹配
    if !spoken_norm.is_empty()
        && !target_norm.is_empty()
        && (spoken_norm.contains(target_norm.as_str()) || target_norm.contains(spoken_norm.as_str()))
    {
        return ScoringResult::plain(SCORE_CONTAINED);
    }

    // 3. 编辑距离兜底
    ScoringResult::plain(similarity(&spoken_norm, &target_norm))
}

/// 编辑距离相似度
///
/// `round(((max_len - distance) / max_len) * 100)`，max_len 按字符数计。
/// 双方皆空时视为相同，返回 100。
fn similarity(a: &str, b: &str) -> u8 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return SCORE_EXACT;
    }
    let distance = levenshtein(a, b);
    (((max_len - distance) as f64 / max_len as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_is_100() {
        assert_eq!(score("algorithm", "algorithm").score, 100);
        assert_eq!(score("machine learning", "machine learning").score, 100);
    }

    #[test]
    fn test_empty_inputs_are_0() {
        assert_eq!(score("", "algorithm").score, 0);
        assert_eq!(score("algorithm", "").score, 0);
        assert_eq!(score("", "").score, 0);
    }

    #[test]
    fn test_case_insensitive_exact() {
        assert_eq!(score("algorithm", "Algorithm").score, 100);
        assert_eq!(score("  API ", "api").score, 100);
    }

    #[test]
    fn test_symbol_word_variant_exact() {
        let result = score("under score", "underscore");
        assert_eq!(result.score, 100);
        assert_eq!(result.matched_variant.as_deref(), Some("under score"));
    }

    #[test]
    fn test_symbol_word_variant_underscore_form() {
        assert_eq!(score("under_score", "underscore").score, 100);
    }

    #[test]
    fn test_symbol_word_variant_substring() {
        // 变体出现在更长转写中
        let result = score("I said star", "asterisk");
        assert_eq!(result.score, 100);
        assert_eq!(result.matched_variant.as_deref(), Some("star"));
    }

    #[test]
    fn test_symbol_word_case_insensitive_target() {
        assert_eq!(score("and sign", "Ampersand").score, 100);
    }

    #[test]
    fn test_symbol_word_fuzzy_fallback() {
        // "understory" 与 "underscore" 编辑距离 2，长度 10 → 80
        let result = score("understory", "underscore");
        assert_eq!(result.score, 80);
        assert!(result.matched_variant.is_none());
    }

    #[test]
    fn test_containment_is_85() {
        assert_eq!(score("the algorithm is fast", "algorithm").score, 85);
        // 反向包含同样成立
        assert_eq!(score("machine", "machine learning").score, 85);
    }

    #[test]
    fn test_single_substitution() {
        // 长度 9，编辑距离 1 → round(8/9*100) = 89
        assert_eq!(score("algorithx", "algorithm").score, 89);
    }

    #[test]
    fn test_levenshtein_symmetry() {
        let pairs = [
            ("algorithm", "logarithm"),
            ("database", "data base"),
            ("", "abc"),
            ("kitten", "sitting"),
        ];
        for (a, b) in pairs {
            assert_eq!(levenshtein(a, b), levenshtein(b, a));
        }
    }

    #[test]
    fn test_score_monotonic_in_edit_distance() {
        // 定长下编辑距离越大分数越低
        let one_sub = score("algorithx", "algorithm").score;
        let two_subs = score("algorixhx", "algorithm").score;
        assert!(one_sub > two_subs);
        assert!(two_subs > 0);
    }

    #[test]
    fn test_idempotent() {
        let a = score("under score", "underscore");
        let b = score("under score", "underscore");
        assert_eq!(a, b);

        let c = score("the algorithm is fast", "algorithm");
        let d = score("the algorithm is fast", "algorithm");
        assert_eq!(c, d);
    }

    #[test]
    fn test_pure_punctuation_pair() {
        // 双方归一化后皆空：空泛相等，不触发除零
        assert_eq!(score("!!!", "???").score, 100);
    }

    #[test]
    fn test_punctuation_one_side() {
        // 单侧归一化为空：不给包含分，落入编辑距离得 0
        assert_eq!(score("!!!", "algorithm").score, 0);
    }

    #[test]
    fn test_score_range() {
        let samples = [
            ("xyz", "algorithm"),
            ("algorism", "algorithm"),
            ("a", "b"),
            ("star", "asterisk"),
        ];
        for (spoken, target) in samples {
            let s = score(spoken, target).score;
            assert!(s <= 100, "score({spoken:?}, {target:?}) = {s}");
        }
    }
}
