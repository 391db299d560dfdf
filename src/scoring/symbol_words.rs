//! 符号词表
//!
//! 语音识别对符号类词条（如 "underscore"、"ampersand"）的转写非常不稳定：
//! 同一个词可能被转写成分开的两个词、带连字符的形式，甚至直接输出符号本身。
//! 此表为每个规范符号词维护一组可接受的口语变体，评分时优先短路匹配。

use std::collections::HashMap;

use aho_corasick::AhoCorasick;

/// 单个符号词条目
pub struct SymbolWord {
    /// 可接受的口语变体（按优先级排列）
    variants: Vec<&'static str>,
    /// 变体子串扫描自动机（模式顺序与 variants 一致）
    automaton: AhoCorasick,
}

impl SymbolWord {
    fn new(variants: Vec<&'static str>) -> Self {
        let automaton = AhoCorasick::new(&variants).expect("符号词变体表构建失败");
        Self {
            variants,
            automaton,
        }
    }

    /// 判断口语文本是否命中任一变体
    ///
    /// 匹配条件：与变体完全相等，或包含变体为子串。
    /// 返回命中的变体。
    pub fn match_variant(&self, spoken: &str) -> Option<&'static str> {
        // 完全相等优先，按表序决定返回的变体
        for variant in &self.variants {
            if spoken == *variant {
                return Some(variant);
            }
        }

        // 子串扫描
        self.automaton
            .find(spoken)
            .map(|m| self.variants[m.pattern().as_usize()])
    }

    /// 所有变体
    pub fn variants(&self) -> &[&'static str] {
        &self.variants
    }
}

lazy_static::lazy_static! {
    /// 符号词 → 可接受口语变体
    ///
    /// 键为小写规范词；变体同为小写
    static ref SYMBOL_WORDS: HashMap<&'static str, SymbolWord> = {
        let mut table = HashMap::new();
        let mut insert = |word: &'static str, variants: Vec<&'static str>| {
            table.insert(word, SymbolWord::new(variants));
        };

        insert(
            "underscore",
            vec!["underscore", "under score", "under-score", "under_score", "_"],
        );
        insert("ampersand", vec!["ampersand", "and symbol", "and sign", "&"]);
        insert("asterisk", vec!["asterisk", "star", "*"]);
        insert("parentheses", vec!["parentheses", "parens", "brackets", "()"]);
        insert("brackets", vec!["brackets", "square brackets", "[]"]);
        insert("curly braces", vec!["curly braces", "braces", "{}"]);
        insert("backslash", vec!["backslash", "back slash", "\\"]);
        insert("forward slash", vec!["forward slash", "slash", "/"]);
        insert("pipe", vec!["pipe", "vertical bar", "|"]);
        insert("tilde", vec!["tilde", "~"]);
        insert("hash", vec!["hash", "#"]);
        insert("at symbol", vec!["at symbol", "at sign", "@"]);
        insert("percent", vec!["percent", "%"]);
        insert("dollar", vec!["dollar", "$"]);
        insert("exclamation", vec!["exclamation", "exclamation mark", "!"]);
        insert("question", vec!["question", "question mark", "?"]);
        insert("comma", vec!["comma", ","]);
        insert("period", vec!["period", "dot", "."]);
        insert("colon", vec!["colon", ":"]);
        insert("semicolon", vec!["semicolon", ";"]);
        insert("quotes", vec!["quotes", "quotation marks", "\""]);
        insert("apostrophe", vec!["apostrophe", "'"]);

        table
    };
}

/// 查询符号词条目
///
/// `target_lower` 需为小写规范词
pub fn lookup(target_lower: &str) -> Option<&'static SymbolWord> {
    SYMBOL_WORDS.get(target_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert!(lookup("underscore").is_some());
        assert!(lookup("ampersand").is_some());
        assert!(lookup("curly braces").is_some());
        assert!(lookup("algorithm").is_none());
        // 仅接受小写规范词
        assert!(lookup("Underscore").is_none());
    }

    #[test]
    fn test_match_variant_exact() {
        let entry = lookup("underscore").unwrap();
        assert_eq!(entry.match_variant("underscore"), Some("underscore"));
        assert_eq!(entry.match_variant("under score"), Some("under score"));
        assert_eq!(entry.match_variant("_"), Some("_"));
    }

    #[test]
    fn test_match_variant_substring() {
        let entry = lookup("underscore").unwrap();
        // 变体出现在更长的转写中也算命中
        assert_eq!(
            entry.match_variant("it's an under score i think"),
            Some("under score")
        );

        let entry = lookup("asterisk").unwrap();
        assert_eq!(entry.match_variant("a star"), Some("star"));
    }

    #[test]
    fn test_match_variant_miss() {
        let entry = lookup("underscore").unwrap();
        assert_eq!(entry.match_variant("elephant"), None);
    }
}
