//! 界面状态机
//!
//! 列表 / 详情 / 导入三个视图以显式状态机管理：
//! 纯函数 reducer 接收 (旧状态, 动作) 产生新状态，
//! 替代分散事件处理器对单一大状态对象的局部合并修改。
//! 评分器不属于状态机，由详情视图的事件处理直接调用。

use uuid::Uuid;

/// 当前视图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// 词条列表（含搜索与标签过滤）
    List,
    /// 词条详情（编辑、发音练习）
    Detail(Uuid),
    /// 批量导入
    Import,
}

/// 界面状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub view: View,
    /// 列表检索文本
    pub search: String,
    /// 选中的标签过滤（None 表示全部）
    pub selected_tag: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::List,
            search: String::new(),
            selected_tag: None,
        }
    }
}

/// 状态迁移动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SearchChanged(String),
    TagSelected(Option<String>),
    TermSelected(Uuid),
    TermDeleted(Uuid),
    ImportOpened,
    Back,
}

/// 状态迁移
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        Action::SearchChanged(search) => AppState { search, ..state },
        Action::TagSelected(tag) => AppState {
            selected_tag: tag,
            ..state
        },
        Action::TermSelected(id) => AppState {
            view: View::Detail(id),
            ..state
        },
        Action::TermDeleted(id) => match state.view {
            // 删除当前详情页词条时退回列表
            View::Detail(current) if current == id => AppState {
                view: View::List,
                ..state
            },
            _ => state,
        },
        Action::ImportOpened => AppState {
            view: View::Import,
            ..state
        },
        Action::Back => AppState {
            view: View::List,
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_back() {
        let id = Uuid::new_v4();
        let state = reduce(AppState::default(), Action::TermSelected(id));
        assert_eq!(state.view, View::Detail(id));

        let state = reduce(state, Action::Back);
        assert_eq!(state.view, View::List);
    }

    #[test]
    fn test_search_preserved_across_views() {
        let id = Uuid::new_v4();
        let mut state = reduce(
            AppState::default(),
            Action::SearchChanged("algo".to_string()),
        );
        state = reduce(state, Action::TermSelected(id));
        state = reduce(state, Action::Back);
        // 回到列表后检索条件仍然有效
        assert_eq!(state.search, "algo");
    }

    #[test]
    fn test_delete_current_term_returns_to_list() {
        let id = Uuid::new_v4();
        let state = reduce(AppState::default(), Action::TermSelected(id));
        let state = reduce(state, Action::TermDeleted(id));
        assert_eq!(state.view, View::List);
    }

    #[test]
    fn test_delete_other_term_keeps_view() {
        let current = Uuid::new_v4();
        let other = Uuid::new_v4();
        let state = reduce(AppState::default(), Action::TermSelected(current));
        let state = reduce(state, Action::TermDeleted(other));
        assert_eq!(state.view, View::Detail(current));
    }

    #[test]
    fn test_tag_selection() {
        let state = reduce(
            AppState::default(),
            Action::TagSelected(Some("web".to_string())),
        );
        assert_eq!(state.selected_tag.as_deref(), Some("web"));

        let state = reduce(state, Action::TagSelected(None));
        assert!(state.selected_tag.is_none());
    }

    #[test]
    fn test_import_view() {
        let state = reduce(AppState::default(), Action::ImportOpened);
        assert_eq!(state.view, View::Import);
        let state = reduce(state, Action::Back);
        assert_eq!(state.view, View::List);
    }
}
