use gloo_timers::future::TimeoutFuture;
use leptos::*;

use crate::components::{CountBox, Loader};
use crate::core::campaign::{CampaignClient, Campaign, Donation};
use crate::core::utils::{calculate_bar_percentage, days_left, truncate_address};

#[component]
pub fn CampaignDetailsPage(client: RwSignal<CampaignClient>, campaign: Campaign) -> impl IntoView {
    let (donations, set_donations) = create_signal(Vec::<Donation>::new());
    let (amount, set_amount) = create_signal(String::new());
    let (is_loading, set_is_loading) = create_signal(false);
    let (error_message, set_error_message) = create_signal(String::new());

    let campaign_id = campaign.id;

    let load_donations = move || {
        spawn_local(async move {
            let current_client = client.get_untracked();
            match current_client.get_donations(campaign_id).await {
                Ok(list) => set_donations.set(list),
                Err(e) => log::error!("Failed to load donations: {}", e),
            }
        })
    };
    load_donations();

    let handle_donate = move |_| {
        let amount_value = amount.get_untracked();
        set_error_message.set(String::new());
        set_is_loading.set(true);

        spawn_local(async move {
            let current_client = client.get_untracked();
            let submitted = match current_client.donate(campaign_id, &amount_value).await {
                Ok(tx_hash) => {
                    log::info!("Donation submitted: {}", tx_hash);
                    set_amount.set(String::new());
                    true
                }
                Err(e) => {
                    log::error!("Donation failed: {}", e);
                    set_error_message.set(format!("Donation failed: {}", e));
                    false
                }
            };
            set_is_loading.set(false);

            if submitted {
                // give the transaction a moment to land in a block before
                // refreshing the donator list
                TimeoutFuture::new(8_000).await;
                load_donations();
            }
        });
    };

    let percentage = if campaign.target_wei > 0 {
        calculate_bar_percentage(campaign.target_wei, campaign.amount_collected_wei)
    } else {
        0
    };
    let bar_width = format!("width: {}%;", percentage.min(100));
    let raised_title = format!("Raised of {}", campaign.target_eth());

    view! {
        <div class="campaign-details-page">
            {move || is_loading.get().then(|| view! { <Loader/> })}

            <div class="details-hero">
                <div class="details-image-column">
                    <img class="details-image" src=campaign.image.clone() alt="campaign"/>
                    <div class="progress-bar">
                        <div class="progress-bar-fill" style=bar_width></div>
                    </div>
                </div>
                <div class="details-stats">
                    <CountBox title="Days Left" value=days_left(campaign.deadline)/>
                    <CountBox title=raised_title value=campaign.collected_eth()/>
                    <CountBox
                        title="Total Backers"
                        value=Signal::derive(move || donations.get().len().to_string())
                    />
                </div>
            </div>

            <div class="details-body">
                <div class="details-info">
                    <section>
                        <h2>{campaign.title.clone()}</h2>
                        <div class="details-creator">
                            <i class="fas fa-user-circle"></i>
                            <p>{truncate_address(&campaign.owner)}</p>
                        </div>
                    </section>

                    <section>
                        <h3>"Story"</h3>
                        <p class="details-story">{campaign.description.clone()}</p>
                    </section>

                    <section>
                        <h3>"Donators"</h3>
                        {move || {
                            let list = donations.get();
                            if list.is_empty() {
                                view! {
                                    <p class="empty-text">
                                        "No donators yet. Be the first one!"
                                    </p>
                                }
                                .into_view()
                            } else {
                                view! {
                                    <ol class="donator-list">
                                        {list
                                            .into_iter()
                                            .map(|donation| view! {
                                                <li class="donator-row">
                                                    <span>{truncate_address(&donation.donor)}</span>
                                                    <span>{donation.amount_eth()} " ETH"</span>
                                                </li>
                                            })
                                            .collect_view()}
                                    </ol>
                                }
                                .into_view()
                            }
                        }}
                    </section>
                </div>

                <div class="fund-box">
                    <h3>"Fund the campaign"</h3>
                    <input
                        class="fund-input"
                        type="number"
                        placeholder="ETH 0.1"
                        prop:value=move || amount.get()
                        on:input=move |ev| set_amount.set(event_target_value(&ev))
                    />
                    <div class="fund-box-note">
                        <h4>"Back it because you believe in it."</h4>
                        <p>"Support the project for no reward, just because it speaks to you."</p>
                    </div>

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

                    <button
                        class="custom-btn fund-btn"
                        disabled=move || is_loading.get()
                        on:click=handle_donate
                    >
                        "Fund Campaign"
                    </button>
                </div>
            </div>
        </div>
    }
}
