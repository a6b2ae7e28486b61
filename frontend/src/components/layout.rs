//! 认证后页面的外层框架
//!
//! 顶部导航 + 内容区。注销是同步清理，导航到登录页由这里显式发起，
//! 路由服务的守卫 Effect 作为兜底。

use crate::session::{logout, use_session};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let ctx = use_session();
    let router = use_router();

    let display_name = move || {
        ctx.state
            .with(|s| s.email.clone().unwrap_or_else(|| "User".to_string()))
    };

    let on_logout = move |_| {
        logout(ctx);
        router.navigate(AppRoute::Login);
    };

    let goto_dashboard = move |ev: leptos::web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(AppRoute::Dashboard);
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <nav class="navbar bg-base-100 shadow-md sticky top-0 z-40 px-4">
                <div class="flex-1">
                    <a href="/dashboard" class="btn btn-ghost text-xl text-primary" on:click=goto_dashboard>
                        "TaskFlow"
                    </a>
                </div>
                <div class="flex-none gap-4 items-center">
                    <span class="text-base-content/70 hidden md:inline">
                        "欢迎, " {display_name}
                    </span>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                        "退出登录"
                    </button>
                </div>
            </nav>
            <main>{children()}</main>
        </div>
    }
}
