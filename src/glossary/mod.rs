//! 词库
//!
//! 词条模型、JSON 文档库、搜索过滤与批量导入。

pub mod import;
pub mod search;
pub mod store;
pub mod term;

pub use store::GlossaryStore;
pub use term::{Term, TermFields, TermPatch};
