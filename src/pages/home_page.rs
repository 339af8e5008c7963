use leptos::*;
use std::rc::Rc;

use crate::app::Page;
use crate::components::FundCard;
use crate::core::campaign::{Campaign, CampaignClient};

#[component]
pub fn HomePage(client: RwSignal<CampaignClient>, page: RwSignal<Page>) -> impl IntoView {
    let (campaigns, set_campaigns) = create_signal(Vec::<Campaign>::new());
    let (is_loading, set_is_loading) = create_signal(true);
    let (error_message, set_error_message) = create_signal(String::new());

    spawn_local(async move {
        let current_client = client.get_untracked();
        match current_client.get_campaigns().await {
            Ok(list) => set_campaigns.set(list),
            Err(e) => {
                log::error!("Failed to load campaigns: {}", e);
                set_error_message.set(format!("Failed to load campaigns: {}", e));
            }
        }
        set_is_loading.set(false);
    });

    view! {
        <div class="campaigns-page">
            <h1 class="page-title">
                {move || format!("All Campaigns ({})", campaigns.get().len())}
            </h1>

            {move || {
                let msg = error_message.get();
                if msg.is_empty() {
                    view! { <div></div> }.into_view()
                } else {
                    view! {
                        <div class="error-message">
                            <i class="fas fa-exclamation-circle"></i>
                            " " {msg}
                        </div>
                    }
                    .into_view()
                }
            }}

            {move || {
                if is_loading.get() {
                    view! {
                        <div class="page-loading">
                            <div class="spinner"></div>
                        </div>
                    }
                    .into_view()
                } else if campaigns.get().is_empty() && error_message.get().is_empty() {
                    view! {
                        <p class="empty-text">
                            "No campaigns yet. Be the first to start one."
                        </p>
                    }
                    .into_view()
                } else {
                    view! {
                        <div class="campaigns-grid">
                            {campaigns
                                .get()
                                .into_iter()
                                .map(|campaign| {
                                    let selected = campaign.clone();
                                    view! {
                                        <FundCard
                                            campaign=campaign
                                            on_click=Rc::new(move || {
                                                page.set(Page::CampaignDetails(selected.clone()))
                                            })
                                        />
                                    }
                                })
                                .collect_view()}
                        </div>
                    }
                    .into_view()
                }
            }}
        </div>
    }
}
