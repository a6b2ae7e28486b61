//! 项目详情视图状态机
//!
//! 详情页的三路并发拉取（项目、任务页、进度汇总）、过滤/分页耦合、
//! 变更后的全量重拉以及删除确认，全部建模为显式转移。
//! 网络与确认框等副作用由组件外壳执行。

use crate::api::ApiError;
use taskflow_shared::{Page, ProgressSummary, Project, Task, TaskStatusFilter};

/// 任务列表查询参数快照
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskQuery {
    pub page: u32,
    pub filter: TaskStatusFilter,
}

/// 三路重新拉取指令
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReloadAll {
    pub generation: u64,
    pub project_id: i64,
    pub query: TaskQuery,
}

/// 变更指令
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    CompleteTask(i64),
    DeleteTask(i64),
    DeleteProject,
}

/// 详情页状态
#[derive(Clone, Debug, PartialEq)]
pub struct DetailState {
    pub project_id: i64,
    pub query: TaskQuery,
    pub project: Option<Project>,
    pub tasks: Vec<Task>,
    pub task_total_pages: u32,
    pub progress: ProgressSummary,
    /// 整页加载态：首次三路拉取全部落定前为 true
    pub loading: bool,
    pub modal_open: bool,
    generation: u64,
}

impl DetailState {
    pub fn new(project_id: i64) -> Self {
        Self {
            project_id,
            query: TaskQuery {
                page: 0,
                filter: TaskStatusFilter::All,
            },
            project: None,
            tasks: Vec::new(),
            task_total_pages: 0,
            progress: ProgressSummary::default(),
            loading: true,
            modal_open: false,
            generation: 0,
        }
    }

    /// 以当前参数发出一条三路拉取指令，并使所有在途响应过期
    pub fn reload(&mut self) -> ReloadAll {
        self.generation += 1;
        ReloadAll {
            generation: self.generation,
            project_id: self.project_id,
            query: self.query,
        }
    }

    /// 任务页号变更
    pub fn set_page(&mut self, page: u32) -> ReloadAll {
        self.query.page = page;
        self.reload()
    }

    /// 过滤器变更：页号无条件回到 0，避免落在越界页上
    pub fn set_filter(&mut self, filter: TaskStatusFilter) -> ReloadAll {
        self.query.filter = filter;
        self.query.page = 0;
        self.reload()
    }

    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    /// 任务创建成功：关闭模态框并全量重拉
    pub fn on_task_created(&mut self) -> ReloadAll {
        self.modal_open = false;
        self.reload()
    }

    /// 应用三路拉取结果；过期代号返回 false 且状态不变
    pub fn apply_loaded(
        &mut self,
        generation: u64,
        project: Project,
        tasks: Page<Task>,
        progress: ProgressSummary,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.project = Some(project);
        self.tasks = tasks.content;
        self.task_total_pages = tasks.total_pages;
        self.progress = progress;
        self.loading = false;
        true
    }

    /// 拉取失败处理；返回是否应当退回项目列表（访问被拒）
    ///
    /// 403 意味着访问权限已被收回，无论响应是否过期都应离开此页。
    pub fn apply_failed(&mut self, generation: u64, err: &ApiError) -> bool {
        if generation == self.generation {
            self.loading = false;
        }
        err.is_forbidden()
    }

    /// 标记完成；已完成任务是幂等的客户端空操作，不发出任何指令
    pub fn on_complete_task(&self, task: &Task) -> Option<Mutation> {
        if task.completed {
            None
        } else {
            Some(Mutation::CompleteTask(task.id))
        }
    }

    /// 删除任务；未经确认不发出任何指令
    pub fn on_delete_task(&self, task_id: i64, confirmed: bool) -> Option<Mutation> {
        confirmed.then_some(Mutation::DeleteTask(task_id))
    }

    /// 删除项目；未经确认不发出任何指令
    pub fn on_delete_project(&self, confirmed: bool) -> Option<Mutation> {
        confirmed.then_some(Mutation::DeleteProject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, completed: bool) -> Task {
        Task {
            id,
            title: format!("Task {}", id),
            description: None,
            due_date: None,
            completed,
        }
    }

    fn loaded(ids: &[i64], total_pages: u32) -> (Project, Page<Task>, ProgressSummary) {
        (
            Project {
                id: 1,
                title: "Site Redesign".to_string(),
                description: None,
                tasks: None,
            },
            Page {
                content: ids.iter().map(|&id| task(id, false)).collect(),
                page: 0,
                total_pages,
            },
            ProgressSummary::default(),
        )
    }

    #[test]
    fn filter_change_always_resets_the_page() {
        let mut state = DetailState::new(1);
        state.set_page(4);

        let cmd = state.set_filter(TaskStatusFilter::Completed);
        assert_eq!(cmd.query.page, 0);
        assert_eq!(cmd.query.filter, TaskStatusFilter::Completed);

        // 重新选择同一取值也会回到第 0 页
        state.set_page(2);
        let cmd = state.set_filter(TaskStatusFilter::Completed);
        assert_eq!(cmd.query.page, 0);
    }

    #[test]
    fn page_change_keeps_the_filter() {
        let mut state = DetailState::new(1);
        state.set_filter(TaskStatusFilter::Active);

        let cmd = state.set_page(2);
        assert_eq!(cmd.query.filter, TaskStatusFilter::Active);
        assert_eq!(cmd.query.page, 2);
    }

    #[test]
    fn stale_load_result_is_discarded() {
        let mut state = DetailState::new(1);
        let first = state.reload();
        let second = state.reload();

        let (p, t, pr) = loaded(&[10], 1);
        assert!(!state.apply_loaded(first.generation, p, t, pr));
        assert!(state.tasks.is_empty());
        assert!(state.loading);

        let (p, t, pr) = loaded(&[20], 2);
        assert!(state.apply_loaded(second.generation, p, t, pr));
        assert_eq!(state.tasks[0].id, 20);
        assert_eq!(state.task_total_pages, 2);
        assert!(!state.loading);
    }

    #[test]
    fn forbidden_failure_requests_navigation_back() {
        let mut state = DetailState::new(1);
        let cmd = state.reload();

        let forbidden = ApiError::Response {
            status: 403,
            body: String::new(),
        };
        assert!(state.apply_failed(cmd.generation, &forbidden));
        assert!(!state.loading);
    }

    #[test]
    fn other_failures_stay_on_the_page() {
        let mut state = DetailState::new(1);
        let cmd = state.reload();

        let server_error = ApiError::Response {
            status: 500,
            body: String::new(),
        };
        assert!(!state.apply_failed(cmd.generation, &server_error));
        assert!(!state.apply_failed(cmd.generation, &ApiError::Network("offline".to_string())));
    }

    #[test]
    fn completing_an_already_completed_task_is_a_noop() {
        let state = DetailState::new(1);

        assert_eq!(
            state.on_complete_task(&task(5, false)),
            Some(Mutation::CompleteTask(5))
        );
        assert_eq!(state.on_complete_task(&task(5, true)), None);
    }

    #[test]
    fn deletions_require_confirmation() {
        let state = DetailState::new(1);

        assert_eq!(state.on_delete_task(9, false), None);
        assert_eq!(state.on_delete_task(9, true), Some(Mutation::DeleteTask(9)));
        assert_eq!(state.on_delete_project(false), None);
        assert_eq!(
            state.on_delete_project(true),
            Some(Mutation::DeleteProject)
        );
    }

    #[test]
    fn task_creation_closes_the_modal_and_keeps_the_query() {
        let mut state = DetailState::new(1);
        state.set_filter(TaskStatusFilter::Active);
        state.set_page(1);
        state.open_modal();

        let cmd = state.on_task_created();
        assert!(!state.modal_open);
        assert_eq!(cmd.query.page, 1);
        assert_eq!(cmd.query.filter, TaskStatusFilter::Active);
        assert_eq!(cmd.project_id, 1);
    }
}
