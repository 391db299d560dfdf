//! 发音评分
//!
//! 比较语音识别转写与目标词条，输出 0-100 相似度分数。
//!
//! ## 处理流程
//! 1. 空输入短路（返回 0）
//! 2. 符号词表查询（变体相等/子串 → 100，否则变体相似度最大值）
//! 3. 归一化（NFC + 小写 + 条件下划线处理 + 去符号 + 空白折叠）
//! 4. 完全相等 → 100，单向包含 → 85，编辑距离相似度兜底

mod normalize;
mod scorer;
mod symbol_words;

pub use scorer::{score, ScoringResult};
