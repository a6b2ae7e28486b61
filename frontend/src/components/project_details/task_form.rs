//! 新建任务表单模块

use chrono::NaiveDate;
use leptos::prelude::*;
use taskflow_shared::CreateTaskRequest;

/// 新建任务表单状态
#[derive(Clone, Copy)]
pub struct TaskForm {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    /// 日期输入框的原始取值（YYYY-MM-DD，空串表示未填）
    pub due_date: RwSignal<String>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            due_date: RwSignal::new(String::new()),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.title.set(String::new());
        self.description.set(String::new());
        self.due_date.set(String::new());
    }

    /// 转换为 API 请求对象；无法解析的日期按未填处理
    pub fn to_request(&self) -> CreateTaskRequest {
        CreateTaskRequest {
            title: self.title.get(),
            description: self.description.get(),
            due_date: NaiveDate::parse_from_str(&self.due_date.get(), "%Y-%m-%d").ok(),
        }
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

/// 新建任务模态框
#[component]
pub fn TaskDialog(
    form: TaskForm,
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] on_cancel: Callback<()>,
    #[prop(into)] on_submit: Callback<CreateTaskRequest>,
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
                <h3 class="font-bold text-lg">"新建任务"</h3>

                <form on:submit=handle_submit class="space-y-4 mt-4">
                    <div class="form-control">
                        <label for="task_title" class="label">
                            <span class="label-text">"任务标题"</span>
                        </label>
                        <input
                            id="task_title"
                            type="text"
                            required
                            placeholder="任务标题"
                            on:input=move |ev| form.title.set(event_target_value(&ev))
                            prop:value=form.title
                            class="input input-bordered w-full"
                        />
                    </div>
                    <div class="form-control">
                        <label for="task_desc" class="label">
                            <span class="label-text">"任务描述"</span>
                        </label>
                        <textarea
                            id="task_desc"
                            placeholder="细节说明..."
                            on:input=move |ev| form.description.set(event_target_value(&ev))
                            prop:value=form.description
                            class="textarea textarea-bordered w-full h-24"
                        ></textarea>
                    </div>
                    <div class="form-control">
                        <label for="task_due" class="label">
                            <span class="label-text">"截止日期"</span>
                        </label>
                        <input
                            id="task_due"
                            type="date"
                            on:input=move |ev| form.due_date.set(event_target_value(&ev))
                            prop:value=form.due_date
                            class="input input-bordered w-full"
                        />
                    </div>
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| on_cancel.run(())>
                            "取消"
                        </button>
                        <button type="submit" class="btn btn-primary">
                            "添加任务"
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_or_malformed_due_date_becomes_none() {
        let form = TaskForm::new();
        form.title.set("Ship it".to_string());

        assert_eq!(form.to_request().due_date, None);

        form.due_date.set("not-a-date".to_string());
        assert_eq!(form.to_request().due_date, None);

        form.due_date.set("2026-09-15".to_string());
        assert_eq!(
            form.to_request().due_date,
            NaiveDate::from_ymd_opt(2026, 9, 15)
        );
    }
}
