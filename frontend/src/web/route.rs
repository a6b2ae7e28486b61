//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、守卫属性以及守卫决策函数。

use crate::session::AuthPhase;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 根路径：仅作为入口重定向，无自身内容
    Root,
    /// 项目列表 (需要认证)
    Dashboard,
    /// 项目详情 (需要认证)
    ProjectDetails(i64),
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" => Self::Root,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            _ => {
                if let Some(rest) = path.strip_prefix("/projects/") {
                    match rest.parse::<i64>() {
                        Ok(id) => Self::ProjectDetails(id),
                        Err(_) => Self::NotFound,
                    }
                } else {
                    Self::NotFound
                }
            }
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Root => "/".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::ProjectDetails(id) => format!("/projects/{}", id),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    ///
    /// 根路径也算受保护：未认证时入口重定向落到登录页。
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Root | Self::Dashboard | Self::ProjectDetails(_))
    }

    /// 定义已认证用户是否应该离开此路由（登录/注册/根入口）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::Root)
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 认证成功时的重定向目标（从入口路由）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 守卫决策
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 放行，渲染目标路由
    Allow,
    /// 重定向到另一路由
    RedirectTo(AppRoute),
    /// 会话尚未重水化完成，挂起并渲染占位
    Hold,
}

/// 守卫决策函数
///
/// 会话处于 `Loading` 时一律挂起；重水化完成后由路由服务重新评估。
pub fn resolve(route: &AppRoute, phase: AuthPhase) -> GuardDecision {
    match phase {
        AuthPhase::Loading => GuardDecision::Hold,
        AuthPhase::Authenticated if route.should_redirect_when_authenticated() => {
            GuardDecision::RedirectTo(AppRoute::auth_success_redirect())
        }
        AuthPhase::Unauthenticated if route.requires_auth() => {
            GuardDecision::RedirectTo(AppRoute::auth_failure_redirect())
        }
        _ => GuardDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_parse_to_routes() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Root);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/register"), AppRoute::Register);
        assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::Dashboard);
        assert_eq!(
            AppRoute::from_path("/projects/42"),
            AppRoute::ProjectDetails(42)
        );
        assert_eq!(AppRoute::from_path("/projects/abc"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn detail_route_renders_its_id() {
        assert_eq!(AppRoute::ProjectDetails(7).to_path(), "/projects/7");
    }

    #[test]
    fn loading_phase_holds_everything() {
        for route in [AppRoute::Login, AppRoute::Dashboard, AppRoute::Root] {
            assert_eq!(resolve(&route, AuthPhase::Loading), GuardDecision::Hold);
        }
    }

    #[test]
    fn unauthenticated_is_redirected_off_protected_routes() {
        for route in [
            AppRoute::Root,
            AppRoute::Dashboard,
            AppRoute::ProjectDetails(1),
        ] {
            assert_eq!(
                resolve(&route, AuthPhase::Unauthenticated),
                GuardDecision::RedirectTo(AppRoute::Login)
            );
        }
        assert_eq!(
            resolve(&AppRoute::Login, AuthPhase::Unauthenticated),
            GuardDecision::Allow
        );
        assert_eq!(
            resolve(&AppRoute::Register, AuthPhase::Unauthenticated),
            GuardDecision::Allow
        );
    }

    #[test]
    fn authenticated_is_redirected_off_entry_routes() {
        for route in [AppRoute::Login, AppRoute::Register, AppRoute::Root] {
            assert_eq!(
                resolve(&route, AuthPhase::Authenticated),
                GuardDecision::RedirectTo(AppRoute::Dashboard)
            );
        }
        assert_eq!(
            resolve(&AppRoute::Dashboard, AuthPhase::Authenticated),
            GuardDecision::Allow
        );
        assert_eq!(
            resolve(&AppRoute::ProjectDetails(9), AuthPhase::Authenticated),
            GuardDecision::Allow
        );
    }
}
