//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 守卫决策本身是纯函数（见 `route::resolve`），这里只负责执行决策、
//! 同步浏览器历史并驱动界面更新。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GuardDecision, resolve};
use crate::session::AuthPhase;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 认证阶段信号由外部注入，路由系统与会话系统保持解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 认证阶段（注入的信号）
    phase: Signal<AuthPhase>,
}

impl RouterService {
    fn new(phase: Signal<AuthPhase>) -> Self {
        // 初始路由从当前 URL 解析；守卫在重水化完成后统一评估
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            phase,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 获取认证阶段信号
    pub fn phase(&self) -> Signal<AuthPhase> {
        self.phase
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, target: AppRoute) {
        let phase = self.phase.get_untracked();

        match resolve(&target, phase) {
            GuardDecision::Allow | GuardDecision::Hold => {
                // Hold 时照常推入；重水化完成后的守卫 Effect 会重新评估
                push_history_state(&target.to_path());
                self.set_route.set(target);
            }
            GuardDecision::RedirectTo(redirect) => {
                log_info!("[Router] {} 被守卫拦截，重定向到 {}", target, redirect);
                push_history_state(&redirect.to_path());
                self.set_route.set(redirect);
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let phase = self.phase;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());

            // popstate 时也执行守卫逻辑
            match resolve(&target, phase.get_untracked()) {
                GuardDecision::RedirectTo(redirect) => {
                    replace_history_state(&redirect.to_path());
                    set_route.set(redirect);
                }
                GuardDecision::Allow | GuardDecision::Hold => {
                    set_route.set(target);
                }
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证阶段变化时重新评估当前路由
    ///
    /// 覆盖三种转移：启动重水化完成、登录成功、注销。
    fn setup_guard_effect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let phase = self.phase;

        Effect::new(move |_| {
            let phase = phase.get();
            let route = current_route.get_untracked();

            if let GuardDecision::RedirectTo(redirect) = resolve(&route, phase) {
                log_info!("[Router] 认证阶段变为 {:?}，{} 重定向到 {}", phase, route, redirect);
                replace_history_state(&redirect.to_path());
                set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(phase: Signal<AuthPhase>) -> RouterService {
    let router = RouterService::new(phase);

    router.init_popstate_listener();
    router.setup_guard_effect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证阶段信号
    phase: Signal<AuthPhase>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(phase);

    children()
}

/// 路由出口组件
///
/// 根据当前路由与守卫决策渲染对应的组件；
/// `Hold` 与重定向过渡期间渲染加载占位。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let route = router.current_route().get();
        match resolve(&route, router.phase().get()) {
            GuardDecision::Allow => matcher(route),
            GuardDecision::Hold | GuardDecision::RedirectTo(_) => view! {
                <div class="flex items-center justify-center min-h-screen bg-base-200">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any(),
        }
    }
}
