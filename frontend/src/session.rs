//! 会话模块
//!
//! 管理认证状态，与路由系统解耦：路由服务只消费注入的认证阶段信号。
//! 状态转移本身是纯函数（`SessionState`），副作用（持久化、网络探测）
//! 由这里的异步操作函数执行，因此转移规则可以在原生环境下直接测试。

use crate::api::ApiClient;
use crate::web::LocalStorage;
use leptos::prelude::*;
use leptos::task::spawn_local;
use taskflow_shared::{LoginRequest, RegisterRequest};

/// 会话令牌的持久化键——客户端唯一的持久化状态
pub const STORAGE_TOKEN_KEY: &str = "taskflow_token";

/// 重水化后使用的占位身份（后端没有 /me 一类的端点，邮箱不可恢复）
const REHYDRATED_PLACEHOLDER: &str = "User";

/// 认证阶段
///
/// 路由守卫的三态输入：重水化未完成时为 `Loading`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Loading,
    Authenticated,
    Unauthenticated,
}

/// 会话状态
///
/// 不变量：`email` 的存在与否是唯一的授权信号；令牌本身在下一次
/// API 调用失败之前不会再被校验。
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// 会话令牌（仅在内存中镜像，持久化副本在 LocalStorage）
    pub token: Option<String>,
    /// 已认证身份的邮箱
    pub email: Option<String>,
    /// 启动重水化是否仍在进行
    pub is_loading: bool,
}

impl SessionState {
    /// 初始状态：重水化进行中
    pub fn new() -> Self {
        Self {
            token: None,
            email: None,
            is_loading: true,
        }
    }

    /// 客户端是否自认为已认证
    pub fn is_authenticated(&self) -> bool {
        self.email.is_some()
    }

    /// 映射为路由守卫消费的认证阶段
    pub fn phase(&self) -> AuthPhase {
        if self.is_loading {
            AuthPhase::Loading
        } else if self.is_authenticated() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        }
    }

    /// 登录成功：记录令牌与身份
    pub fn on_login(&mut self, token: String, email: String) {
        self.token = Some(token);
        self.email = Some(email);
        self.is_loading = false;
    }

    /// 注销：同步清除全部会话状态
    pub fn on_logout(&mut self) {
        self.token = None;
        self.email = None;
        self.is_loading = false;
    }

    /// 启动重水化完成
    ///
    /// 持久化令牌存在时乐观地赋予占位身份；邮箱不可恢复。
    pub fn on_rehydrated(&mut self, token: Option<String>) {
        self.email = token.as_ref().map(|_| REHYDRATED_PLACEHOLDER.to_string());
        self.token = token;
        self.is_loading = false;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// 会话上下文
///
/// 包含读写信号，通过 Context 在组件间显式传递，不使用全局单例。
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub state: ReadSignal<SessionState>,
    pub set_state: WriteSignal<SessionState>,
}

impl SessionContext {
    /// 创建新的会话上下文
    pub fn new() -> Self {
        let (state, set_state) = signal(SessionState::new());
        Self { state, set_state }
    }

    /// 认证阶段信号（用于路由服务注入）
    pub fn phase_signal(&self) -> Signal<AuthPhase> {
        let state = self.state;
        Signal::derive(move || state.get().phase())
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

/// 登录
///
/// 成功时持久化令牌并设置身份；一切失败（凭据、网络、解析）都
/// 转换为 `false` 并只做诊断日志，绝不向调用方抛出。
pub async fn login(ctx: SessionContext, api: &ApiClient, email: String, password: String) -> bool {
    let request = LoginRequest {
        email: email.clone(),
        password,
    };

    match api.login(&request).await {
        Ok(token) => {
            LocalStorage::set(STORAGE_TOKEN_KEY, &token);
            ctx.set_state.update(|state| state.on_login(token, email));
            true
        }
        Err(e) => {
            log_error!("登录失败: {}", e);
            false
        }
    }
}

/// 注册
///
/// 成功与否以布尔值返回；不会让新账号进入已认证状态。
pub async fn register(api: &ApiClient, email: String, password: String) -> bool {
    let request = RegisterRequest { email, password };

    match api.register(&request).await {
        Ok(()) => true,
        Err(e) => {
            log_error!("注册失败: {}", e);
            false
        }
    }
}

/// 注销：同步清除持久化令牌与内存状态，不发任何网络请求
pub fn logout(ctx: SessionContext) {
    LocalStorage::remove(STORAGE_TOKEN_KEY);
    ctx.set_state.update(|state| state.on_logout());
    // 导航由路由服务的守卫 Effect 兜底处理
}

/// 初始化会话状态（启动重水化）
///
/// 存在持久化令牌时先做一次轻量探测校验其有效性：
/// 明确的 401/403 说明令牌已失效，清除并落到未认证；
/// 网络类故障无从判断，乐观保留会话（仅记录日志）。
pub fn init_session(ctx: SessionContext, api: &ApiClient) {
    match LocalStorage::get(STORAGE_TOKEN_KEY) {
        None => {
            ctx.set_state.update(|state| state.on_rehydrated(None));
        }
        Some(token) => {
            let api = api.clone();
            let set_state = ctx.set_state;
            spawn_local(async move {
                match api.probe_auth().await {
                    Ok(()) => {
                        set_state.update(|state| state.on_rehydrated(Some(token)));
                    }
                    Err(e) if e.is_auth_rejected() => {
                        log_info!("存储的令牌已失效，清除会话");
                        LocalStorage::remove(STORAGE_TOKEN_KEY);
                        set_state.update(|state| state.on_rehydrated(None));
                    }
                    Err(e) => {
                        log_error!("会话探测失败: {}", e);
                        set_state.update(|state| state.on_rehydrated(Some(token)));
                    }
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_loading() {
        let state = SessionState::new();
        assert_eq!(state.phase(), AuthPhase::Loading);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn login_records_token_and_identity() {
        let mut state = SessionState::new();
        state.on_login("tok123".to_string(), "a@x.com".to_string());

        assert_eq!(state.token.as_deref(), Some("tok123"));
        assert_eq!(state.email.as_deref(), Some("a@x.com"));
        assert_eq!(state.phase(), AuthPhase::Authenticated);
    }

    #[test]
    fn logout_clears_everything() {
        let mut state = SessionState::new();
        state.on_login("tok123".to_string(), "a@x.com".to_string());
        state.on_logout();

        assert_eq!(state.token, None);
        assert_eq!(state.email, None);
        assert_eq!(state.phase(), AuthPhase::Unauthenticated);
    }

    #[test]
    fn rehydration_with_token_yields_placeholder_identity() {
        let mut state = SessionState::new();
        state.on_rehydrated(Some("tok123".to_string()));

        assert_eq!(state.phase(), AuthPhase::Authenticated);
        // 邮箱不可恢复，身份是占位符
        assert_eq!(state.email.as_deref(), Some("User"));
    }

    #[test]
    fn rehydration_without_token_is_unauthenticated() {
        let mut state = SessionState::new();
        state.on_rehydrated(None);

        assert_eq!(state.phase(), AuthPhase::Unauthenticated);
        assert_eq!(state.token, None);
    }

    #[test]
    fn identity_presence_is_the_authorization_signal() {
        let mut state = SessionState::new();
        // 即使令牌在场，没有身份也不算已认证
        state.token = Some("tok123".to_string());
        state.is_loading = false;
        assert!(!state.is_authenticated());
        assert_eq!(state.phase(), AuthPhase::Unauthenticated);
    }
}
