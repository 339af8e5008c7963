use leptos::*;
use leptos::ev::SubmitEvent;
use web_sys::window;

use crate::app::Page;
use crate::components::{CustomButton, FormField, Loader};
use crate::core::campaign::{CampaignClient, CampaignDraft};
use crate::core::utils::check_image;

fn alert(message: &str) {
    if let Some(window) = window() {
        let _ = window.alert_with_message(message);
    }
}

#[component]
pub fn CreateCampaignPage(client: RwSignal<CampaignClient>, page: RwSignal<Page>) -> impl IntoView {
    let (name, set_name) = create_signal(String::new());
    let (title, set_title) = create_signal(String::new());
    let (description, set_description) = create_signal(String::new());
    let (target, set_target) = create_signal(String::new());
    let (deadline, set_deadline) = create_signal(String::new());
    let (image, set_image) = create_signal(String::new());
    let (is_loading, set_is_loading) = create_signal(false);

    let handle_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let draft = CampaignDraft {
            title: title.get_untracked(),
            description: description.get_untracked(),
            target: target.get_untracked(),
            deadline: deadline.get_untracked(),
            image: image.get_untracked(),
        };

        // local validation gates the submission; nothing touches the
        // network until the draft is sound
        let validated = match draft.validate() {
            Ok(v) => v,
            Err(e) => {
                alert(&e.to_string());
                return;
            }
        };

        spawn_local(async move {
            if !check_image(&validated.image).await {
                alert("Please enter a valid image URL.");
                set_image.set(String::new());
                return;
            }

            set_is_loading.set(true);
            let current_client = client.get_untracked();
            match current_client.create_campaign(&validated).await {
                Ok(tx_hash) => {
                    log::info!("Campaign creation submitted: {}", tx_hash);
                    page.set(Page::Home);
                }
                Err(e) => {
                    log::error!("Campaign creation failed: {}", e);
                    alert(&format!("Failed to create campaign: {}", e));
                }
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="create-campaign-page">
            {move || is_loading.get().then(|| view! { <Loader/> })}

            <div class="page-banner">
                <h1>"Start a Campaign"</h1>
            </div>

            <form class="campaign-form" on:submit=handle_submit>
                <div class="form-row">
                    <FormField
                        label_name="Your Name *"
                        placeholder="Enter your Name"
                        value=name
                        set_value=set_name
                    />
                    <FormField
                        label_name="Campaign Title *"
                        placeholder="Write a Title"
                        value=title
                        set_value=set_title
                    />
                </div>

                <FormField
                    label_name="Story *"
                    placeholder="Write your Story"
                    is_text_area=true
                    value=description
                    set_value=set_description
                />

                <div class="form-highlight">
                    <i class="fas fa-coins"></i>
                    <h4>"You will get 100% of the raised amount"</h4>
                </div>

                <div class="form-row">
                    <FormField
                        label_name="Goal (ETH) *"
                        placeholder="0.50"
                        input_type="number"
                        value=target
                        set_value=set_target
                    />
                    <FormField
                        label_name="End Date *"
                        placeholder=""
                        input_type="date"
                        value=deadline
                        set_value=set_deadline
                    />
                </div>

                <FormField
                    label_name="Campaign Image URL *"
                    placeholder="https://..."
                    input_type="url"
                    value=image
                    set_value=set_image
                />

                <div class="form-submit">
                    <CustomButton
                        title="Submit New Campaign"
                        btn_type="submit"
                        styles="submit-btn"
                    />
                </div>
            </form>
        </div>
    }
}
