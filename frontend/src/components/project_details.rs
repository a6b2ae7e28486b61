//! 项目详情页
//!
//! 三路并发拉取（项目、任务页、进度汇总）经 `futures::join!` 合流，
//! 全部落定后一次性应用；任何一路 403 都视为访问被收回，退回列表。
//! 事件处理统一包成 `Callback`，跨越重渲染边界时按值复制。

pub mod state;
pub mod task_form;

use crate::api::use_api;
use crate::components::pagination::PageControls;
use crate::components::project_details::state::{DetailState, Mutation, ReloadAll};
use crate::components::project_details::task_form::{TaskDialog, TaskForm};
use crate::web::dialog;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use taskflow_shared::{CreateTaskRequest, Task, TaskStatusFilter};

#[component]
pub fn ProjectDetailsPage(
    /// 路由携带的项目 id
    id: i64,
) -> impl IntoView {
    let api = use_api();
    let router = use_router();

    let state = RwSignal::new(DetailState::new(id));
    let form = TaskForm::new();

    // 三路拉取指令执行器
    let run_reload = {
        let api = api.clone();
        move |cmd: ReloadAll| {
            let api = api.clone();
            spawn_local(async move {
                let (project, tasks, progress) = futures::join!(
                    api.get_project(cmd.project_id),
                    api.list_tasks(cmd.project_id, cmd.query.page, cmd.query.filter),
                    api.project_progress(cmd.project_id),
                );

                match (project, tasks, progress) {
                    (Ok(project), Ok(tasks), Ok(progress)) => {
                        state.update(|s| {
                            s.apply_loaded(cmd.generation, project, tasks, progress);
                        });
                    }
                    (project, tasks, progress) => {
                        if let Some(err) = project.err().or(tasks.err()).or(progress.err()) {
                            log_error!("加载项目详情失败: {}", err);
                            let go_back = state
                                .try_update(|s| s.apply_failed(cmd.generation, &err))
                                .unwrap_or(false);
                            if go_back {
                                router.navigate(AppRoute::Dashboard);
                            }
                        }
                    }
                }
            });
        }
    };

    // 变更指令执行器：成功后全量重拉；项目删除改为退回列表
    let run_mutation: Callback<Mutation> = Callback::new({
        let api = api.clone();
        let run_reload = run_reload.clone();
        move |mutation: Mutation| {
            let api = api.clone();
            let run_reload = run_reload.clone();
            spawn_local(async move {
                let result = match mutation {
                    Mutation::CompleteTask(task_id) => api.complete_task(task_id).await,
                    Mutation::DeleteTask(task_id) => api.delete_task(task_id).await,
                    Mutation::DeleteProject => api.delete_project(id).await,
                };

                match result {
                    Ok(()) => match mutation {
                        Mutation::DeleteProject => router.navigate(AppRoute::Dashboard),
                        _ => {
                            if let Some(cmd) = state.try_update(|s| s.reload()) {
                                run_reload(cmd);
                            }
                        }
                    },
                    Err(e) => log_error!("任务操作失败: {}", e),
                }
            });
        }
    });

    // 初始加载
    Effect::new({
        let run_reload = run_reload.clone();
        move |_| {
            if let Some(cmd) = state.try_update(|s| s.reload()) {
                run_reload(cmd);
            }
        }
    });

    let on_filter: Callback<String> = Callback::new({
        let run_reload = run_reload.clone();
        move |value: String| {
            let filter = TaskStatusFilter::from_value(&value);
            if let Some(cmd) = state.try_update(|s| s.set_filter(filter)) {
                run_reload(cmd);
            }
        }
    });

    let on_page: Callback<u32> = Callback::new({
        let run_reload = run_reload.clone();
        move |page: u32| {
            if let Some(cmd) = state.try_update(|s| s.set_page(page)) {
                run_reload(cmd);
            }
        }
    });

    let on_delete_project: Callback<()> = Callback::new(move |_| {
        let confirmed = dialog::confirm("删除该项目及其全部任务？");
        if let Some(mutation) = state.with_untracked(|s| s.on_delete_project(confirmed)) {
            run_mutation.run(mutation);
        }
    });

    // 按 id 回查当前任务，确保守卫用的是最新数据
    let on_complete_task: Callback<i64> = Callback::new(move |task_id: i64| {
        let mutation = state.with_untracked(|s| {
            s.tasks
                .iter()
                .find(|t| t.id == task_id)
                .and_then(|t| s.on_complete_task(t))
        });
        if let Some(mutation) = mutation {
            run_mutation.run(mutation);
        }
    });

    let on_delete_task: Callback<i64> = Callback::new(move |task_id: i64| {
        let confirmed = dialog::confirm("确定要删除该任务吗？");
        if let Some(mutation) = state.with_untracked(|s| s.on_delete_task(task_id, confirmed)) {
            run_mutation.run(mutation);
        }
    });

    let on_create_task: Callback<CreateTaskRequest> = Callback::new({
        let api = api.clone();
        let run_reload = run_reload.clone();
        move |request: CreateTaskRequest| {
            let api = api.clone();
            let run_reload = run_reload.clone();
            spawn_local(async move {
                match api.create_task(id, &request).await {
                    Ok(_) => {
                        form.reset();
                        if let Some(cmd) = state.try_update(|s| s.on_task_created()) {
                            run_reload(cmd);
                        }
                    }
                    Err(e) => log_error!("创建任务失败: {}", e),
                }
            });
        }
    });

    let percent = move || state.with(|s| s.progress.progress_percentage.round() as u32);

    view! {
        <Show
            when=move || !state.with(|s| s.loading)
            fallback=|| view! {
                <div class="text-center py-16 text-base-content/60">
                    <span class="loading loading-spinner loading-lg"></span>
                    <p class="mt-4">"正在加载工作区..."</p>
                </div>
            }
        >
            <Show
                when=move || state.with(|s| s.project.is_some())
                fallback=|| view! {
                    <div class="text-center py-16 text-error">"项目不存在"</div>
                }
            >
                <div class="max-w-7xl mx-auto p-8">
                    // 页头
                    <div class="flex flex-col md:flex-row justify-between items-start mb-10 gap-4">
                        <div>
                            <button
                                class="btn btn-ghost btn-sm mb-2"
                                on:click=move |_| router.navigate(AppRoute::Dashboard)
                            >
                                "← 返回项目列表"
                            </button>
                            <h1 class="text-4xl font-bold text-primary mb-2">
                                {move || {
                                    state.with(|s| {
                                        s.project.as_ref().map(|p| p.title.clone()).unwrap_or_default()
                                    })
                                }}
                            </h1>
                            <p class="text-base-content/70 max-w-2xl">
                                {move || {
                                    state.with(|s| {
                                        s.project
                                            .as_ref()
                                            .and_then(|p| p.description.clone())
                                            .unwrap_or_default()
                                    })
                                }}
                            </p>
                        </div>
                        <button class="btn btn-outline btn-error" on:click=move |_| on_delete_project.run(())>
                            "删除项目"
                        </button>
                    </div>

                    // 进度卡片
                    <div class="card bg-base-100 shadow-xl mb-10">
                        <div class="card-body">
                            <div class="flex justify-between mb-2">
                                <div>
                                    <span class="text-base-content/70 block">"完成进度"</span>
                                    <span class="text-3xl font-bold text-primary">
                                        {move || format!("{}%", percent())}
                                    </span>
                                </div>
                                <div class="text-right">
                                    <span class="block font-bold text-xl">
                                        {move || {
                                            state.with(|s| {
                                                format!(
                                                    "{}/{}",
                                                    s.progress.completed_tasks,
                                                    s.progress.total_tasks,
                                                )
                                            })
                                        }}
                                    </span>
                                    <span class="text-base-content/50 text-sm">"任务已完成"</span>
                                </div>
                            </div>
                            <progress
                                class="progress progress-primary w-full"
                                value=move || state.with(|s| s.progress.progress_percentage)
                                max="100"
                            ></progress>
                        </div>
                    </div>

                    // 任务区
                    <div class="flex justify-between items-center mb-6">
                        <h2 class="text-2xl font-bold">"任务"</h2>
                        <div class="flex gap-4">
                            <select
                                class="select select-bordered w-40"
                                prop:value=move || state.with(|s| s.query.filter.value().to_string())
                                on:change=move |ev| on_filter.run(event_target_value(&ev))
                            >
                                <option value="all">"全部任务"</option>
                                <option value="active">"进行中"</option>
                                <option value="completed">"已完成"</option>
                            </select>
                            <button
                                class="btn btn-primary"
                                on:click=move |_| state.update(|s| s.open_modal())
                            >
                                "＋ 添加任务"
                            </button>
                        </div>
                    </div>

                    <div class="grid gap-4">
                        <Show when=move || state.with(|s| s.tasks.is_empty())>
                            <div class="text-center py-12 border-2 border-dashed border-base-300 rounded-2xl">
                                <p class="text-base-content/50">"还没有任务。添加一个开始吧。"</p>
                            </div>
                        </Show>
                        <For
                            each=move || state.with(|s| s.tasks.clone())
                            key=|t| (t.id, t.completed)
                            children=move |task: Task| {
                                let task_id = task.id;
                                let completed = task.completed;
                                let due = task.due_date.map(|d| d.to_string());
                                let description = task
                                    .description
                                    .clone()
                                    .filter(|d| !d.is_empty());
                                let card_class = if completed {
                                    "card bg-base-100 shadow border-l-4 border-l-success opacity-60"
                                } else {
                                    "card bg-base-100 shadow border-l-4 border-l-primary"
                                };
                                let title_class = if completed {
                                    "font-semibold text-lg line-through text-base-content/50"
                                } else {
                                    "font-semibold text-lg"
                                };

                                view! {
                                    <div class=card_class>
                                        <div class="card-body p-5 flex-row items-center justify-between">
                                            <div class="flex-1">
                                                <h3 class=title_class>
                                                    {task.title.clone()}
                                                </h3>
                                                {description
                                                    .map(|d| {
                                                        view! {
                                                            <p class="text-base-content/60 text-sm mt-1">{d}</p>
                                                        }
                                                    })}
                                                {due
                                                    .map(|d| {
                                                        view! {
                                                            <span class="badge badge-ghost badge-sm mt-2">
                                                                "截止: " {d}
                                                            </span>
                                                        }
                                                    })}
                                            </div>
                                            <div class="flex items-center gap-3">
                                                {(!completed)
                                                    .then(|| {
                                                        view! {
                                                            <button
                                                                class="btn btn-circle btn-sm btn-outline btn-success"
                                                                title="标记完成"
                                                                on:click=move |_| on_complete_task.run(task_id)
                                                            >
                                                                "✓"
                                                            </button>
                                                        }
                                                    })}
                                                <button
                                                    class="btn btn-circle btn-sm btn-outline btn-error"
                                                    title="删除任务"
                                                    on:click=move |_| on_delete_task.run(task_id)
                                                >
                                                    "✕"
                                                </button>
                                            </div>
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>

                    <PageControls
                        page=Signal::derive(move || state.with(|s| s.query.page))
                        total_pages=Signal::derive(move || state.with(|s| s.task_total_pages))
                        on_page=on_page
                    />

                    <TaskDialog
                        form=form
                        open=Signal::derive(move || state.with(|s| s.modal_open))
                        on_cancel=Callback::new(move |_| state.update(|s| s.close_modal()))
                        on_submit=on_create_task
                    />
                </div>
            </Show>
        </Show>
    }
}
