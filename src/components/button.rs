use leptos::*;
use std::rc::Rc;

#[component]
pub fn CustomButton(
    title: &'static str,
    #[prop(optional)] btn_type: Option<&'static str>,
    #[prop(optional)] styles: Option<&'static str>,
    #[prop(optional)] on_click: Option<Rc<dyn Fn()>>,
) -> impl IntoView {
    let class = match styles {
        Some(extra) => format!("custom-btn {}", extra),
        None => "custom-btn".to_string(),
    };

    view! {
        <button
            type=btn_type.unwrap_or("button")
            class=class
            on:click=move |_| {
                if let Some(cb) = on_click.as_ref() {
                    cb();
                }
            }
        >
            {title}
        </button>
    }
}
