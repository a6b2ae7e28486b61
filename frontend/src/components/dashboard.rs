//! 项目列表页（仪表盘）
//!
//! 组件外壳只做三件事：渲染状态、把用户事件翻译成状态机转移、
//! 执行转移返回的 `Reload` 指令。

pub mod project_form;
pub mod state;

use crate::api::use_api;
use crate::components::pagination::PageControls;
use crate::components::dashboard::project_form::{ProjectDialog, ProjectForm};
use crate::components::dashboard::state::{DashboardState, Reload};
use crate::web::Timeout;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use taskflow_shared::{CreateProjectRequest, Project};

/// 搜索输入防抖窗口（毫秒）
const SEARCH_DEBOUNCE_MS: u32 = 300;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();

    let state = RwSignal::new(DashboardState::new());
    let form = ProjectForm::new();

    // 指令执行器：按快照拉取，结果按代号决定应用或丢弃
    let run_reload = {
        let api = api.clone();
        move |cmd: Reload| {
            let api = api.clone();
            spawn_local(async move {
                match api.list_projects(&cmd.query.search, cmd.query.page).await {
                    Ok(page) => {
                        state.update(|s| {
                            s.apply_loaded(cmd.generation, page);
                        });
                    }
                    Err(e) => {
                        log_error!("加载项目列表失败: {}", e);
                        state.update(|s| s.apply_failed(cmd.generation));
                    }
                }
            });
        }
    };

    // 初始加载
    Effect::new({
        let run_reload = run_reload.clone();
        move |_| {
            if let Some(cmd) = state.try_update(|s| s.reload()) {
                run_reload(cmd);
            }
        }
    });

    // 搜索输入防抖：覆盖旧句柄即取消未触发的回调
    let search_debounce = StoredValue::new_local(None::<Timeout>);
    let on_search_input = {
        let run_reload = run_reload.clone();
        move |ev: leptos::web_sys::Event| {
            let value = event_target_value(&ev);
            let run_reload = run_reload.clone();
            search_debounce.set_value(Some(Timeout::new(SEARCH_DEBOUNCE_MS, move || {
                if let Some(cmd) = state.try_update(|s| s.set_search(value.clone())) {
                    run_reload(cmd);
                }
            })));
        }
    };

    let on_page = {
        let run_reload = run_reload.clone();
        Callback::new(move |page: u32| {
            if let Some(cmd) = state.try_update(|s| s.set_page(page)) {
                run_reload(cmd);
            }
        })
    };

    let on_create = {
        let api = api.clone();
        let run_reload = run_reload.clone();
        Callback::new(move |request: CreateProjectRequest| {
            let api = api.clone();
            let run_reload = run_reload.clone();
            spawn_local(async move {
                match api.create_project(&request).await {
                    Ok(_) => {
                        form.reset();
                        if let Some(cmd) = state.try_update(|s| s.on_project_created()) {
                            run_reload(cmd);
                        }
                    }
                    Err(e) => log_error!("创建项目失败: {}", e),
                }
            });
        })
    };

    let loading = move || state.with(|s| s.loading);
    let is_empty = move || state.with(|s| s.projects.is_empty());

    view! {
        <div class="max-w-7xl mx-auto p-8">
            <div class="flex justify-between items-center mb-8">
                <div>
                    <h1 class="text-4xl font-bold text-primary">"我的项目"</h1>
                    <p class="text-base-content/60 mt-2">"管理你的全部工作流"</p>
                </div>
                <div class="flex gap-4">
                    <input
                        type="text"
                        placeholder="搜索项目..."
                        class="input input-bordered w-64"
                        prop:value=move || state.with(|s| s.query.search.clone())
                        on:input=on_search_input
                    />
                    <button class="btn btn-primary gap-2" on:click=move |_| state.update(|s| s.open_modal())>
                        "＋ 新建项目"
                    </button>
                </div>
            </div>

            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                <For
                    each=move || state.with(|s| s.projects.clone())
                    key=|p| p.id
                    children=move |project: Project| {
                        let id = project.id;
                        let completed = project.is_completed();
                        let description = project
                            .description
                            .clone()
                            .filter(|d| !d.is_empty())
                            .unwrap_or_else(|| "暂无描述".to_string());
                        let badge_class = if completed {
                            "badge badge-success badge-outline"
                        } else {
                            "badge badge-info badge-outline"
                        };
                        view! {
                            <div
                                class="card bg-base-100 shadow-xl cursor-pointer hover:shadow-2xl transition-shadow"
                                on:click=move |_| router.navigate(AppRoute::ProjectDetails(id))
                            >
                                <div class="card-body">
                                    <div class="flex justify-between items-start">
                                        <h2 class="card-title">{project.title.clone()}</h2>
                                        <span class=badge_class>
                                            {if completed { "已完成" } else { "进行中" }}
                                        </span>
                                    </div>
                                    <p class="text-base-content/70 text-sm">{description}</p>
                                    <div class="card-actions justify-end mt-2">
                                        <span class="text-sm text-primary">"查看详情 →"</span>
                                    </div>
                                </div>
                            </div>
                        }
                    }
                />
            </div>

            // 空状态
            <Show when=move || !loading() && is_empty()>
                <div class="text-center py-16 border-2 border-dashed border-base-300 rounded-2xl">
                    <p class="text-base-content/60 mb-4">"没有找到项目。先创建一个吧！"</p>
                    <button class="btn btn-link" on:click=move |_| state.update(|s| s.open_modal())>
                        "创建项目 →"
                    </button>
                </div>
            </Show>

            <Show when=move || loading() && is_empty()>
                <div class="text-center py-16">
                    <span class="loading loading-spinner loading-md"></span>
                </div>
            </Show>

            <PageControls
                page=Signal::derive(move || state.with(|s| s.query.page))
                total_pages=Signal::derive(move || state.with(|s| s.total_pages))
                on_page=on_page
            />

            <ProjectDialog
                form=form
                open=Signal::derive(move || state.with(|s| s.modal_open))
                on_cancel=Callback::new(move |_| state.update(|s| s.close_modal()))
                on_submit=on_create
            />
        </div>
    }
}
