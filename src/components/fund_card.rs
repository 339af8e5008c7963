use leptos::*;
use std::rc::Rc;

use crate::core::campaign::Campaign;
use crate::core::utils::{days_left, truncate_address};

#[component]
pub fn FundCard(campaign: Campaign, on_click: Rc<dyn Fn()>) -> impl IntoView {
    let days = days_left(campaign.deadline);
    let owner_short = truncate_address(&campaign.owner);
    let raised = format!("Raised of {}", campaign.target_eth());

    view! {
        <div class="fund-card" on:click=move |_| on_click()>
            <img class="fund-card-image" src=campaign.image.clone() alt="campaign"/>
            <div class="fund-card-body">
                <h3 class="fund-card-title">{campaign.title.clone()}</h3>
                <p class="fund-card-description">{campaign.description.clone()}</p>
                <div class="fund-card-stats">
                    <div class="fund-card-stat">
                        <h4>{campaign.collected_eth()}</h4>
                        <p>{raised}</p>
                    </div>
                    <div class="fund-card-stat">
                        <h4>{days}</h4>
                        <p>"Days Left"</p>
                    </div>
                </div>
                <div class="fund-card-owner">
                    <i class="fas fa-user-circle"></i>
                    <p>"by " <span>{owner_short}</span></p>
                </div>
            </div>
        </div>
    }
}
