use leptos::*;

#[component]
pub fn FormField(
    label_name: &'static str,
    placeholder: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional)] is_text_area: Option<bool>,
) -> impl IntoView {
    let is_text_area = is_text_area.unwrap_or(false);

    view! {
        <label class="form-field">
            <span class="form-field-label">{label_name}</span>
            {move || {
                if is_text_area {
                    view! {
                        <textarea
                            class="form-field-input"
                            placeholder=placeholder
                            rows=10
                            prop:value=move || value.get()
                            on:input=move |ev| set_value.set(event_target_value(&ev))
                        ></textarea>
                    }
                    .into_view()
                } else {
                    view! {
                        <input
                            class="form-field-input"
                            type=input_type.unwrap_or("text")
                            placeholder=placeholder
                            prop:value=move || value.get()
                            on:input=move |ev| set_value.set(event_target_value(&ev))
                        />
                    }
                    .into_view()
                }
            }}
        </label>
    }
}
