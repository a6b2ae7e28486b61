//! API 网关客户端
//!
//! 唯一的 HTTP 出口。每个出站请求在发送前重读持久化令牌并附加
//! Bearer 凭据；无重试、无缓存、无超时。
//! 失败按三路分类：服务端已响应（状态码 + 响应体）、网络无响应、
//! 请求构建/解码等本地故障。

use crate::session::STORAGE_TOKEN_KEY;
use crate::web::{HttpClient, HttpError, HttpRequestBuilder, LocalStorage};
use serde::Serialize;
use serde::de::DeserializeOwned;
use taskflow_shared::{
    CreateProjectRequest, CreateTaskRequest, LoginRequest, PAGE_SIZE, Page, ProgressSummary,
    Project, RegisterRequest, Task, TaskStatusFilter,
};

/// 默认走同源反向代理；构建时可用 TASKFLOW_API_BASE 覆盖
const DEFAULT_BASE_URL: &str = "/api";

/// API 错误三路分类
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 服务端已响应 4xx/5xx
    Response { status: u16, body: String },
    /// 请求已发出但未收到任何响应
    Network(String),
    /// 到达线路之前/之后的本地故障（构建、解码）
    Setup(String),
}

impl ApiError {
    /// 项目访问被拒（403，详情视图据此退回列表）
    pub fn is_forbidden(&self) -> bool {
        matches!(self, ApiError::Response { status: 403, .. })
    }

    /// 鉴权被明确拒绝（401/403，会话探测据此清除令牌）
    pub fn is_auth_rejected(&self) -> bool {
        matches!(
            self,
            ApiError::Response {
                status: 401 | 403,
                ..
            }
        )
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ApiError::Response { status, body } => write!(f, "服务端错误 {}: {}", status, body),
            ApiError::Network(msg) => write!(f, "网络错误: {}", msg),
            ApiError::Setup(msg) => write!(f, "请求故障: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Network(msg) => ApiError::Network(msg),
            HttpError::BuildFailed(msg) | HttpError::Parse(msg) => ApiError::Setup(msg),
        }
    }
}

// =========================================================
// 查询串构建（纯函数，便于直接测试线上契约）
// =========================================================

/// 项目列表查询串；搜索词为空时整体省略 `search` 参数
fn projects_query(search: &str, page: u32) -> String {
    if search.is_empty() {
        format!("/projects?page={}&size={}", page, PAGE_SIZE)
    } else {
        format!("/projects?search={}&page={}&size={}", search, page, PAGE_SIZE)
    }
}

/// 任务列表查询串；过滤器为 All 时整体省略 `status` 参数
fn tasks_query(project_id: i64, page: u32, filter: TaskStatusFilter) -> String {
    let mut query = format!(
        "/tasks/project/{}?page={}&size={}",
        project_id, page, PAGE_SIZE
    );
    if let Some(status) = filter.as_query() {
        query.push_str("&status=");
        query.push_str(status);
    }
    query
}

// =========================================================
// 客户端
// =========================================================

/// API 网关客户端
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// 以编译期配置构建客户端
    pub fn from_env() -> Self {
        Self::new(option_env!("TASKFLOW_API_BASE").unwrap_or(DEFAULT_BASE_URL))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 发送请求；2xx 返回响应体文本，其余映射到三路分类
    async fn dispatch(builder: HttpRequestBuilder) -> Result<String, ApiError> {
        let token = LocalStorage::get(STORAGE_TOKEN_KEY);
        let response = builder.bearer(token.as_deref()).send().await?;

        let status = response.status();
        let ok = response.ok();
        let body = response.text().await?;

        if ok {
            Ok(body)
        } else {
            Err(ApiError::Response { status, body })
        }
    }

    fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
        serde_json::from_str(text).map_err(|e| ApiError::Setup(format!("响应解码失败: {}", e)))
    }

    fn encode<B: Serialize>(body: &B) -> Result<String, ApiError> {
        serde_json::to_string(body).map_err(|e| ApiError::Setup(format!("请求编码失败: {}", e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = Self::dispatch(HttpClient::get(&self.url(path))).await?;
        Self::decode(&text)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let text =
            Self::dispatch(HttpClient::post(&self.url(path)).json_body(Self::encode(body)?)).await?;
        Self::decode(&text)
    }

    // --- 认证 ---

    /// 登录；响应体是裸令牌文本而非 JSON
    pub async fn login(&self, request: &LoginRequest) -> Result<String, ApiError> {
        Self::dispatch(HttpClient::post(&self.url("/auth/login")).json_body(Self::encode(request)?))
            .await
    }

    /// 注册；响应体（用户记录）客户端不消费
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        Self::dispatch(
            HttpClient::post(&self.url("/auth/register")).json_body(Self::encode(request)?),
        )
        .await
        .map(|_| ())
    }

    /// 会话有效性轻量探测：拉取最小一页受保护资源
    pub async fn probe_auth(&self) -> Result<(), ApiError> {
        Self::dispatch(HttpClient::get(&self.url("/projects?page=0&size=1")))
            .await
            .map(|_| ())
    }

    // --- 项目 ---

    pub async fn list_projects(&self, search: &str, page: u32) -> Result<Page<Project>, ApiError> {
        self.get_json(&projects_query(search, page)).await
    }

    pub async fn create_project(
        &self,
        request: &CreateProjectRequest,
    ) -> Result<Project, ApiError> {
        self.post_json("/projects", request).await
    }

    pub async fn get_project(&self, id: i64) -> Result<Project, ApiError> {
        self.get_json(&format!("/projects/{}", id)).await
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), ApiError> {
        Self::dispatch(HttpClient::delete(&self.url(&format!("/projects/{}", id))))
            .await
            .map(|_| ())
    }

    pub async fn project_progress(&self, id: i64) -> Result<ProgressSummary, ApiError> {
        self.get_json(&format!("/projects/{}/progress", id)).await
    }

    // --- 任务 ---

    pub async fn list_tasks(
        &self,
        project_id: i64,
        page: u32,
        filter: TaskStatusFilter,
    ) -> Result<Page<Task>, ApiError> {
        self.get_json(&tasks_query(project_id, page, filter)).await
    }

    pub async fn create_task(
        &self,
        project_id: i64,
        request: &CreateTaskRequest,
    ) -> Result<Task, ApiError> {
        self.post_json(&format!("/tasks/project/{}", project_id), request)
            .await
    }

    /// 标记任务完成；响应体（更新后的任务）客户端不消费
    pub async fn complete_task(&self, task_id: i64) -> Result<(), ApiError> {
        Self::dispatch(HttpClient::put(&self.url(&format!("/tasks/{}/complete", task_id))))
            .await
            .map(|_| ())
    }

    pub async fn delete_task(&self, task_id: i64) -> Result<(), ApiError> {
        Self::dispatch(HttpClient::delete(&self.url(&format!("/tasks/{}", task_id))))
            .await
            .map(|_| ())
    }
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> ApiClient {
    use leptos::prelude::use_context;
    use_context::<ApiClient>().expect("ApiClient should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_omits_the_parameter() {
        assert_eq!(projects_query("", 0), "/projects?page=0&size=6");
        assert_eq!(
            projects_query("redesign", 2),
            "/projects?search=redesign&page=2&size=6"
        );
    }

    #[test]
    fn all_filter_omits_the_status_parameter() {
        assert_eq!(
            tasks_query(5, 0, TaskStatusFilter::All),
            "/tasks/project/5?page=0&size=6"
        );
        assert_eq!(
            tasks_query(5, 1, TaskStatusFilter::Active),
            "/tasks/project/5?page=1&size=6&status=active"
        );
        assert_eq!(
            tasks_query(5, 0, TaskStatusFilter::Completed),
            "/tasks/project/5?page=0&size=6&status=completed"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = ApiClient::new("http://localhost:8080/api/");
        assert_eq!(api.url("/projects"), "http://localhost:8080/api/projects");
    }

    #[test]
    fn http_errors_map_to_the_three_way_taxonomy() {
        assert_eq!(
            ApiError::from(HttpError::Network("offline".to_string())),
            ApiError::Network("offline".to_string())
        );
        assert_eq!(
            ApiError::from(HttpError::BuildFailed("bad header".to_string())),
            ApiError::Setup("bad header".to_string())
        );
        assert_eq!(
            ApiError::from(HttpError::Parse("not utf8".to_string())),
            ApiError::Setup("not utf8".to_string())
        );
    }

    #[test]
    fn forbidden_classification() {
        let forbidden = ApiError::Response {
            status: 403,
            body: String::new(),
        };
        let unauthorized = ApiError::Response {
            status: 401,
            body: String::new(),
        };
        let not_found = ApiError::Response {
            status: 404,
            body: String::new(),
        };

        assert!(forbidden.is_forbidden());
        assert!(!unauthorized.is_forbidden());
        assert!(forbidden.is_auth_rejected());
        assert!(unauthorized.is_auth_rejected());
        assert!(!not_found.is_auth_rejected());
        assert!(!ApiError::Network("offline".to_string()).is_auth_rejected());
    }
}
