//! 仪表盘视图状态机
//!
//! 参数变更与"变更成功后重新拉取"都是显式转移：每次转移返回一个
//! `Reload` 指令，由组件外壳负责执行网络副作用。指令携带发出时的
//! 参数快照与单调递增的代号，过期响应到达时直接丢弃。

use taskflow_shared::{Page, Project};

/// 列表查询参数快照
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectQuery {
    pub search: String,
    pub page: u32,
}

/// 重新拉取指令
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reload {
    pub generation: u64,
    pub query: ProjectQuery,
}

/// 仪表盘状态
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardState {
    pub query: ProjectQuery,
    pub projects: Vec<Project>,
    pub total_pages: u32,
    pub loading: bool,
    pub modal_open: bool,
    generation: u64,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            query: ProjectQuery {
                search: String::new(),
                page: 0,
            },
            projects: Vec::new(),
            total_pages: 0,
            loading: true,
            modal_open: false,
            generation: 0,
        }
    }

    /// 以当前参数发出一条新指令，并使所有在途响应过期
    pub fn reload(&mut self) -> Reload {
        self.generation += 1;
        self.loading = true;
        Reload {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    /// 搜索词变更；页号保持不变（与服务端行为一致的全量重拉）
    pub fn set_search(&mut self, search: String) -> Reload {
        self.query.search = search;
        self.reload()
    }

    /// 页号变更
    pub fn set_page(&mut self, page: u32) -> Reload {
        self.query.page = page;
        self.reload()
    }

    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    /// 项目创建成功：关闭模态框并原样重拉当前页
    ///
    /// 不回到第 0 页、不清空搜索词——新项目可能不出现在当前视图里。
    pub fn on_project_created(&mut self) -> Reload {
        self.modal_open = false;
        self.reload()
    }

    /// 应用拉取结果；过期代号返回 false 且状态不变
    pub fn apply_loaded(&mut self, generation: u64, page: Page<Project>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.projects = page.content;
        self.total_pages = page.total_pages;
        self.loading = false;
        true
    }

    /// 拉取失败；对用户静默（日志在调用方），仅清除加载态
    pub fn apply_failed(&mut self, generation: u64) {
        if generation == self.generation {
            self.loading = false;
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: i64) -> Project {
        Project {
            id,
            title: format!("Project {}", id),
            description: None,
            tasks: None,
        }
    }

    fn loaded_page(ids: &[i64], total_pages: u32) -> Page<Project> {
        Page {
            content: ids.iter().copied().map(project).collect(),
            page: 0,
            total_pages,
        }
    }

    #[test]
    fn search_change_reloads_with_new_search_and_same_page() {
        let mut state = DashboardState::new();
        state.set_page(3);

        let cmd = state.set_search("redesign".to_string());
        assert_eq!(cmd.query.search, "redesign");
        assert_eq!(cmd.query.page, 3);
    }

    #[test]
    fn page_change_reloads_with_current_search() {
        let mut state = DashboardState::new();
        state.set_search("web".to_string());

        let cmd = state.set_page(1);
        assert_eq!(cmd.query.search, "web");
        assert_eq!(cmd.query.page, 1);
    }

    #[test]
    fn creation_closes_modal_and_keeps_query_untouched() {
        let mut state = DashboardState::new();
        state.set_search("site".to_string());
        state.set_page(2);
        state.open_modal();

        let cmd = state.on_project_created();
        assert!(!state.modal_open);
        assert_eq!(cmd.query.search, "site");
        assert_eq!(cmd.query.page, 2);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state = DashboardState::new();
        let first = state.reload();
        let second = state.reload();

        // 旧响应后到：丢弃
        assert!(!state.apply_loaded(first.generation, loaded_page(&[1], 1)));
        assert!(state.projects.is_empty());
        assert!(state.loading);

        // 新响应：应用
        assert!(state.apply_loaded(second.generation, loaded_page(&[2], 1)));
        assert_eq!(state.projects[0].id, 2);
        assert!(!state.loading);
    }

    #[test]
    fn fresh_response_after_stale_one_still_applies() {
        let mut state = DashboardState::new();
        let first = state.reload();
        let second = state.reload();

        assert!(state.apply_loaded(second.generation, loaded_page(&[2], 4)));
        // 此后旧响应到达也不会覆盖新数据
        assert!(!state.apply_loaded(first.generation, loaded_page(&[1], 1)));
        assert_eq!(state.projects[0].id, 2);
        assert_eq!(state.total_pages, 4);
    }

    #[test]
    fn failure_only_clears_loading_for_current_generation() {
        let mut state = DashboardState::new();
        let first = state.reload();
        let second = state.reload();

        state.apply_failed(first.generation);
        assert!(state.loading);

        state.apply_failed(second.generation);
        assert!(!state.loading);
    }
}
