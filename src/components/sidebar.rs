use leptos::*;

use crate::app::Page;

#[component]
fn NavIcon(
    icon: &'static str,
    label: &'static str,
    active: Signal<bool>,
    #[prop(optional)] disabled: Option<bool>,
    #[prop(optional)] on_click: Option<Callback<()>>,
) -> impl IntoView {
    let disabled = disabled.unwrap_or(false);

    view! {
        <button
            class="sidebar-icon"
            class:active=move || active.get()
            title=label
            disabled=disabled
            on:click=move |_| {
                if let Some(cb) = on_click {
                    cb.call(());
                }
            }
        >
            <i class=icon></i>
        </button>
    }
}

#[component]
pub fn Sidebar(page: RwSignal<Page>) -> impl IntoView {
    view! {
        <div class="sidebar">
            <div class="sidebar-logo" on:click=move |_| page.set(Page::Home)>
                <i class="fas fa-hand-holding-heart"></i>
            </div>
            <div class="sidebar-links">
                <NavIcon
                    icon="fas fa-th-large"
                    label="Dashboard"
                    active=Signal::derive(move || matches!(page.get(), Page::Home | Page::CampaignDetails(_)))
                    on_click=Callback::new(move |_| page.set(Page::Home))
                />
                <NavIcon
                    icon="fas fa-plus-circle"
                    label="Create Campaign"
                    active=Signal::derive(move || matches!(page.get(), Page::CreateCampaign))
                    on_click=Callback::new(move |_| page.set(Page::CreateCampaign))
                />
                <NavIcon
                    icon="fas fa-user"
                    label="Profile"
                    active=Signal::derive(move || matches!(page.get(), Page::Profile))
                    on_click=Callback::new(move |_| page.set(Page::Profile))
                />
                <NavIcon
                    icon="fas fa-wallet"
                    label="Payment"
                    active=Signal::derive(|| false)
                    disabled=true
                />
                <NavIcon
                    icon="fas fa-arrow-circle-up"
                    label="Withdraw"
                    active=Signal::derive(|| false)
                    disabled=true
                />
            </div>
        </div>
    }
}
