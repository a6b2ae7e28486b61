use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 项目列表与任务列表统一的固定页大小
pub const PAGE_SIZE: u32 = 6;

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 任务记录
///
/// `description` 与 `due_date` 在后端均可为 null。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
}

/// 项目记录
///
/// 列表接口可能内嵌任务集合（用于仪表盘徽章派生），详情接口不保证。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
}

impl Project {
    /// 仪表盘徽章派生：至少有一个任务且全部已完成
    ///
    /// 列表接口未内嵌任务数据时一律视为进行中。
    pub fn is_completed(&self) -> bool {
        match &self.tasks {
            Some(tasks) => !tasks.is_empty() && tasks.iter().all(|t| t.completed),
            None => false,
        }
    }
}

/// 分页响应
///
/// 对应 Spring Data 的 Page 序列化形状：`content` + `number`（零基页号）
/// + `totalPages`。其余字段客户端不消费，反序列化时忽略。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub content: Vec<T>,
    /// 零基页号（线上字段名为 `number`）
    #[serde(rename = "number", default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            page: 0,
            total_pages: 0,
        }
    }
}

/// 服务端计算的项目完成度汇总
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub progress_percentage: f64,
}

/// 任务状态过滤器
///
/// `All` 不产生查询参数；`active`/`completed` 与后端的 status 取值一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskStatusFilter {
    /// 作为 `status` 查询参数的取值；`All` 返回 None（参数整体省略）
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            TaskStatusFilter::All => None,
            TaskStatusFilter::Active => Some("active"),
            TaskStatusFilter::Completed => Some("completed"),
        }
    }

    /// `<select>` 控件使用的取值
    pub fn value(&self) -> &'static str {
        match self {
            TaskStatusFilter::All => "all",
            TaskStatusFilter::Active => "active",
            TaskStatusFilter::Completed => "completed",
        }
    }

    /// 从 `<select>` 控件取值解析；未知取值回落到 All
    pub fn from_value(value: &str) -> Self {
        match value {
            "active" => TaskStatusFilter::Active,
            "completed" => TaskStatusFilter::Completed,
            _ => TaskStatusFilter::All,
        }
    }
}

// =========================================================
// 请求体 (Request Payloads)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
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

    fn project_with(tasks: Option<Vec<Task>>) -> Project {
        Project {
            id: 1,
            title: "Site Redesign".to_string(),
            description: None,
            tasks,
        }
    }

    #[test]
    fn project_without_embedded_tasks_is_active() {
        assert!(!project_with(None).is_completed());
    }

    #[test]
    fn project_with_empty_task_list_is_active() {
        assert!(!project_with(Some(vec![])).is_completed());
    }

    #[test]
    fn project_is_completed_only_when_every_task_is() {
        let mixed = project_with(Some(vec![task(1, true), task(2, false)]));
        assert!(!mixed.is_completed());

        let done = project_with(Some(vec![task(1, true), task(2, true)]));
        assert!(done.is_completed());
    }

    #[test]
    fn page_deserializes_spring_data_shape() {
        // 后端返回的字段比客户端消费的多，未知字段应被忽略
        let json = r#"{
            "content": [{"id": 7, "title": "Landing page", "description": null,
                         "dueDate": "2026-08-01", "completed": false}],
            "pageable": {"pageNumber": 2},
            "totalElements": 13,
            "totalPages": 3,
            "number": 2,
            "size": 6,
            "first": false,
            "last": true
        }"#;
        let page: Page<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].id, 7);
        assert_eq!(
            page.content[0].due_date,
            Some(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap())
        );
        assert!(page.content[0].description.is_none());
    }

    #[test]
    fn progress_summary_uses_camel_case_wire_names() {
        let json = r#"{"totalTasks": 4, "completedTasks": 1, "progressPercentage": 25.0}"#;
        let progress: ProgressSummary = serde_json::from_str(json).unwrap();
        assert_eq!(progress.total_tasks, 4);
        assert_eq!(progress.completed_tasks, 1);
        assert_eq!(progress.progress_percentage, 25.0);
    }

    #[test]
    fn create_task_request_serializes_due_date_as_plain_date() {
        let req = CreateTaskRequest {
            title: "Ship it".to_string(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 15),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""dueDate":"2026-09-15""#));
    }

    #[test]
    fn filter_query_values_match_backend_contract() {
        assert_eq!(TaskStatusFilter::All.as_query(), None);
        assert_eq!(TaskStatusFilter::Active.as_query(), Some("active"));
        assert_eq!(TaskStatusFilter::Completed.as_query(), Some("completed"));
        assert_eq!(
            TaskStatusFilter::from_value("completed"),
            TaskStatusFilter::Completed
        );
        assert_eq!(TaskStatusFilter::from_value("bogus"), TaskStatusFilter::All);
    }
}
