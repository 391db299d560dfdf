//! 评分前的文本归一化
//!
//! 把原始转写和目标词条转换为可比较的规范形式：
//! NFC 归一化 → 小写 → trim → （按需）下划线转空格 →
//! 去除非字母数字/空白字符 → 空白折叠

use unicode_normalization::UnicodeNormalization;

/// 归一化文本用于比较
///
/// `underscores_to_spaces` 仅在目标词条本身含下划线时为 true：
/// 目标不含下划线时保留转写中的下划线语义，交由去符号步骤处理。
pub fn normalize_for_comparison(text: &str, underscores_to_spaces: bool) -> String {
    // NFC 归一化（词库含中文释义，组合字符需统一）
    let nfc: String = text.nfc().collect();
    let mut lowered = nfc.to_lowercase().trim().to_string();

    if underscores_to_spaces {
        lowered = lowered.replace('_', " ");
    }

    // 去除标点/符号，仅保留字母数字与空白；连续空白折叠为单个空格
    let mut result = String::with_capacity(lowered.len());
    let mut prev_whitespace = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !prev_whitespace && !result.is_empty() {
                result.push(' ');
                prev_whitespace = true;
            }
        } else if ch.is_alphanumeric() {
            result.push(ch);
            prev_whitespace = false;
        }
    }

    result.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_trim() {
        assert_eq!(normalize_for_comparison("  Algorithm  ", false), "algorithm");
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(
            normalize_for_comparison("machine    learning", false),
            "machine learning"
        );
    }

    #[test]
    fn test_strip_punctuation() {
        assert_eq!(
            normalize_for_comparison("a.p.i.", false),
            "api"
        );
        assert_eq!(
            normalize_for_comparison("hello, world!", false),
            "hello world"
        );
    }

    #[test]
    fn test_underscore_conditional() {
        // 目标含下划线：下划线转空格
        assert_eq!(
            normalize_for_comparison("snake_case", true),
            "snake case"
        );
        // 目标不含下划线：下划线按符号丢弃
        assert_eq!(
            normalize_for_comparison("snake_case", false),
            "snakecase"
        );
    }

    #[test]
    fn test_pure_punctuation_to_empty() {
        assert_eq!(normalize_for_comparison("!!!", false), "");
        assert_eq!(normalize_for_comparison(" ?! ", false), "");
    }

    #[test]
    fn test_unicode_kept() {
        // 中文字符属于字母数字类，保留
        assert_eq!(normalize_for_comparison("算法！", false), "算法");
    }
}
