use leptos::*;
use std::rc::Rc;

use crate::app::Page;
use crate::components::FundCard;
use crate::core::campaign::{Campaign, CampaignClient};
use crate::core::utils::truncate_address;

#[component]
pub fn ProfilePage(client: RwSignal<CampaignClient>, page: RwSignal<Page>) -> impl IntoView {
    let (campaigns, set_campaigns) = create_signal(Vec::<Campaign>::new());
    let (is_loading, set_is_loading) = create_signal(false);
    let (error_message, set_error_message) = create_signal(String::new());

    let address = create_memo(move |_| client.get().address().map(|a| a.to_string()));

    // load (and reload after a late connect) the user's campaigns
    create_effect(move |_| {
        if address.get().is_none() {
            return;
        }
        set_is_loading.set(true);
        spawn_local(async move {
            let current_client = client.get_untracked();
            match current_client.get_user_campaigns().await {
                Ok(list) => set_campaigns.set(list),
                Err(e) => {
                    log::error!("Failed to load user campaigns: {}", e);
                    set_error_message.set(format!("Failed to load your campaigns: {}", e));
                }
            }
            set_is_loading.set(false);
        });
    });

    view! {
        <div class="campaigns-page">
            {move || match address.get() {
                None => view! {
                    <div class="profile-disconnected">
                        <h1 class="page-title">"Profile"</h1>
                        <p class="empty-text">
                            "Connect your wallet to see the campaigns you own."
                        </p>
                    </div>
                }
                .into_view(),
                Some(addr) => view! {
                    <div>
                        <h1 class="page-title">
                            {move || format!("Your Campaigns ({})", campaigns.get().len())}
                        </h1>
                        <p class="profile-address">{truncate_address(&addr)}</p>

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
                            } else if campaigns.get().is_empty() {
                                view! {
                                    <p class="empty-text">
                                        "You have not created any campaigns yet."
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
                .into_view(),
            }}
        </div>
    }
}
