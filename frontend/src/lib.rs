//! TaskFlow 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫决策（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `session`: 会话状态管理
//! - `api`: API 网关客户端
//! - `components`: UI 组件层，视图控制逻辑下沉为可测试的状态机

// =========================================================
// 跨平台日志宏
// =========================================================
// wasm 输出到浏览器控制台；原生（测试）输出到标准流。

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (::web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (::web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

mod api;
mod session;

// 原生 Web API 封装模块
pub(crate) mod web;

mod components {
    pub mod dashboard;
    pub mod layout;
    pub mod login;
    pub mod pagination;
    pub mod project_details;
    pub mod register;
}

use crate::api::ApiClient;
use crate::components::dashboard::DashboardPage;
use crate::components::layout::Layout;
use crate::components::login::LoginPage;
use crate::components::project_details::ProjectDetailsPage;
use crate::components::register::RegisterPage;
use crate::session::{SessionContext, init_session};
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet};

use leptos::prelude::*;

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件；受保护页面包在 Layout 里。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        // 根路径只做入口重定向，守卫决策落定前渲染空占位
        AppRoute::Root => view! { <div class="min-h-screen bg-base-200"></div> }.into_any(),
        AppRoute::Dashboard => view! {
            <Layout>
                <DashboardPage />
            </Layout>
        }
        .into_any(),
        AppRoute::ProjectDetails(id) => view! {
            <Layout>
                <ProjectDetailsPage id=id />
            </Layout>
        }
        .into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文与 API 客户端，经 Context 显式注入
    let session_ctx = SessionContext::new();
    provide_context(session_ctx);

    let api = ApiClient::from_env();
    provide_context(api.clone());

    // 2. 启动重水化（含令牌有效性探测）
    init_session(session_ctx, &api);

    // 3. 认证阶段信号注入路由服务，实现守卫与会话的解耦
    let phase = session_ctx.phase_signal();

    view! {
        <Router phase=phase>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
