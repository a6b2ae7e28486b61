//! 浏览器原生对话框封装

/// 弹出 `window.confirm` 确认框
///
/// 无法获取 window 时按"未确认"处理，调用方不会发出后续请求。
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
