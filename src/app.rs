use leptos::*;

use crate::components::{Navbar, Sidebar};
use crate::core::campaign::{Campaign, CampaignClient};
use crate::pages::{CampaignDetailsPage, CreateCampaignPage, HomePage, ProfilePage};

/// Top-level navigation target. Navigation is a signal write; the details
/// page carries the campaign it was opened for.
#[derive(Clone, Debug, PartialEq)]
pub enum Page {
    Home,
    CreateCampaign,
    CampaignDetails(Campaign),
    Profile,
}

// main app component
#[component]
pub fn App() -> impl IntoView {
    // the contract client is built once and handed to pages explicitly
    let client = create_rw_signal(CampaignClient::new());
    let page = create_rw_signal(Page::Home);

    // adopt a wallet session this origin is already authorized for, so a
    // page reload does not force a reconnect prompt
    spawn_local(async move {
        let mut current_client = client.get_untracked();
        if current_client.try_restore().await.is_some() {
            client.set(current_client);
        }
    });

    view! {
        <div class="app-layout">
            <Sidebar page=page/>
            <div class="app-main">
                <Navbar client=client page=page/>
                {move || match page.get() {
                    Page::Home => view! { <HomePage client=client page=page/> }.into_view(),
                    Page::CreateCampaign => {
                        view! { <CreateCampaignPage client=client page=page/> }.into_view()
                    }
                    Page::CampaignDetails(campaign) => {
                        view! { <CampaignDetailsPage client=client campaign=campaign/> }.into_view()
                    }
                    Page::Profile => view! { <ProfilePage client=client page=page/> }.into_view(),
                }}
            </div>
        </div>
    }
}
