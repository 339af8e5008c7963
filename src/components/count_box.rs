use leptos::*;

#[component]
pub fn CountBox(
    #[prop(into)] title: String,
    #[prop(into)] value: MaybeSignal<String>,
) -> impl IntoView {
    view! {
        <div class="count-box">
            <h4 class="count-box-value">{move || value.get()}</h4>
            <p class="count-box-title">{title}</p>
        </div>
    }
}
