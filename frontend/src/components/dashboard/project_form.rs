//! 新建项目表单模块
//!
//! 表单数据的持有、重置与到请求对象的转换集中在 `ProjectForm`，
//! 模态框组件只负责渲染与事件转发。

use leptos::prelude::*;
use taskflow_shared::CreateProjectRequest;

/// 新建项目表单状态
///
/// 使用 `RwSignal` 因为它实现了 `Copy`，适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct ProjectForm {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
}

impl ProjectForm {
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.title.set(String::new());
        self.description.set(String::new());
    }

    /// 转换为 API 请求对象
    pub fn to_request(&self) -> CreateProjectRequest {
        CreateProjectRequest {
            title: self.title.get(),
            description: self.description.get(),
        }
    }
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self::new()
    }
}

/// 新建项目模态框
#[component]
pub fn ProjectDialog(
    form: ProjectForm,
    /// 模态框开关（由仪表盘状态机驱动）
    #[prop(into)]
    open: Signal<bool>,
    /// 取消/关闭回调
    #[prop(into)]
    on_cancel: Callback<()>,
    /// 提交回调
    #[prop(into)]
    on_submit: Callback<CreateProjectRequest>,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let handle_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(form.to_request());
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| on_cancel.run(())>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"新建项目"</h3>

                <form on:submit=handle_submit class="space-y-4 mt-4">
                    <div class="form-control">
                        <label for="project_title" class="label">
                            <span class="label-text">"项目名称"</span>
                        </label>
                        <input
                            id="project_title"
                            type="text"
                            required
                            placeholder="例如：官网改版"
                            on:input=move |ev| form.title.set(event_target_value(&ev))
                            prop:value=form.title
                            class="input input-bordered w-full"
                        />
                    </div>
                    <div class="form-control">
                        <label for="project_desc" class="label">
                            <span class="label-text">"项目描述"</span>
                        </label>
                        <textarea
                            id="project_desc"
                            placeholder="简要说明这个项目..."
                            on:input=move |ev| form.description.set(event_target_value(&ev))
                            prop:value=form.description
                            class="textarea textarea-bordered w-full h-28"
                        ></textarea>
                    </div>
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| on_cancel.run(())>
                            "取消"
                        </button>
                        <button type="submit" class="btn btn-primary">
                            "创建项目"
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
