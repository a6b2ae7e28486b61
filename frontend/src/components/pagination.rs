//! 分页控件模块
//!
//! 边界规则是纯函数，项目列表与任务列表共用同一套控件。

use leptos::prelude::*;

/// "上一页"在第 0 页禁用
pub fn prev_disabled(page: u32) -> bool {
    page == 0
}

/// "下一页"在最后一页禁用；`total_pages == 0` 视为单个空页
pub fn next_disabled(page: u32, total_pages: u32) -> bool {
    page + 1 >= total_pages
}

/// 展示用页号（一基）
pub fn display_page(page: u32) -> u32 {
    page + 1
}

/// 展示用总页数；空集合显示为一页
pub fn display_total(total_pages: u32) -> u32 {
    total_pages.max(1)
}

/// 分页控件
#[component]
pub fn PageControls(
    /// 当前零基页号
    #[prop(into)]
    page: Signal<u32>,
    /// 总页数
    #[prop(into)]
    total_pages: Signal<u32>,
    /// 页号变更回调
    #[prop(into)]
    on_page: Callback<u32>,
) -> impl IntoView {
    view! {
        <div class="flex justify-center items-center gap-4 mt-8">
            <button
                class="btn btn-sm"
                disabled=move || prev_disabled(page.get())
                on:click=move |_| on_page.run(page.get().saturating_sub(1))
            >
                "« 上一页"
            </button>
            <span class="text-sm text-base-content/70">
                {move || {
                    format!(
                        "第 {} 页 / 共 {} 页",
                        display_page(page.get()),
                        display_total(total_pages.get()),
                    )
                }}
            </span>
            <button
                class="btn btn-sm"
                disabled=move || next_disabled(page.get(), total_pages.get())
                on:click=move |_| on_page.run(page.get() + 1)
            >
                "下一页 »"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_hold_for_all_small_page_combinations() {
        for total_pages in 0..=10u32 {
            for page in 0..=10u32 {
                assert_eq!(prev_disabled(page), page == 0, "page={}", page);
                assert_eq!(
                    next_disabled(page, total_pages),
                    i64::from(page) >= i64::from(total_pages) - 1,
                    "page={} total={}",
                    page,
                    total_pages
                );
                assert_eq!(display_page(page), page + 1);
            }
        }
    }

    #[test]
    fn empty_collection_displays_as_one_page() {
        assert_eq!(display_total(0), 1);
        assert_eq!(display_total(1), 1);
        assert_eq!(display_total(4), 4);
    }

    #[test]
    fn single_page_disables_both_directions() {
        assert!(prev_disabled(0));
        assert!(next_disabled(0, 1));
        assert!(next_disabled(0, 0));
    }
}
