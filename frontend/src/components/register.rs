//! 注册页
//!
//! 两次密码不一致属于本地前置校验，在发出任何网络请求之前拦下。
//! 注册成功不会让新账号进入已认证状态，只是回到登录页。

use crate::api::use_api;
use crate::session::register;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);

        if password.get_untracked() != confirm.get_untracked() {
            set_error_msg.set(Some("两次输入的密码不一致".to_string()));
            return;
        }

        set_is_submitting.set(true);

        let api = api.clone();
        spawn_local(async move {
            let success = register(&api, email.get_untracked(), password.get_untracked()).await;

            if success {
                router.navigate(AppRoute::Login);
            } else {
                set_error_msg.set(Some("注册失败，请重试".to_string()));
            }
            set_is_submitting.set(false);
        });
    };

    let goto_login = move |ev: leptos::web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(AppRoute::Login);
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"创建账号"</h1>
                    <p class="text-base-content/70 mt-2">"加入并开始管理你的项目"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"邮箱地址"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="name@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"密码"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="confirm">
                                <span class="label-text">"确认密码"</span>
                            </label>
                            <input
                                id="confirm"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                prop:value=confirm
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || {
                                    if is_submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "注册中..."
                                        }
                                            .into_any()
                                    } else {
                                        "注册".into_any()
                                    }
                                }}
                            </button>
                        </div>
                        <div class="text-center text-sm text-base-content/70 mt-4">
                            "已有账号？"
                            <a href="/login" class="link link-primary ml-1" on:click=goto_login>
                                "直接登录"
                            </a>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
