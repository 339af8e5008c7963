use leptos::*;

#[component]
pub fn Loader() -> impl IntoView {
    view! {
        <div class="loader-overlay">
            <div class="spinner"></div>
            <p class="loader-text">
                "Transaction is in progress."
                <br/>
                "Please wait..."
            </p>
        </div>
    }
}
