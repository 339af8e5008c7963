use leptos::*;
use std::time::Duration;
use web_sys::window;

use crate::app::Page;
use crate::core::campaign::CampaignClient;
use crate::core::units::format_ether;
use crate::core::utils::truncate_address;

#[component]
pub fn Navbar(client: RwSignal<CampaignClient>, page: RwSignal<Page>) -> impl IntoView {
    let (is_connecting, set_is_connecting) = create_signal(false);
    let (error_message, set_error_message) = create_signal(String::new());
    let (balance, set_balance) = create_signal(None::<String>);
    let (show_copied, set_show_copied) = create_signal(false);

    let address = create_memo(move |_| client.get().address().map(|a| a.to_string()));

    // refresh the balance whenever a wallet (re)connects
    create_effect(move |_| {
        if address.get().is_some() {
            spawn_local(async move {
                let c = client.get_untracked();
                match c.get_balance().await {
                    Ok(wei) => set_balance.set(Some(format_ether(wei))),
                    Err(e) => log::error!("Balance fetch failed: {}", e),
                }
            });
        } else {
            set_balance.set(None);
        }
    });

    let handle_connect = move |_| {
        set_is_connecting.set(true);
        set_error_message.set(String::new());

        spawn_local(async move {
            let mut current_client = client.get_untracked();
            match current_client.connect().await {
                Ok(addr) => {
                    log::info!("Successfully connected: {}", addr);
                    client.set(current_client);
                }
                Err(e) => {
                    log::error!("Failed to connect wallet: {}", e);
                    set_error_message.set(format!("Failed to connect: {}", e));
                }
            }
            set_is_connecting.set(false);
        });
    };

    // copy address to clipboard
    let copy_address = move |_| {
        if let Some(addr) = address.get_untracked() {
            if let Some(window) = window() {
                let _ = window.navigator().clipboard().write_text(&addr);
                set_show_copied.set(true);
                set_timeout(
                    move || set_show_copied.set(false),
                    Duration::from_millis(1500),
                );
            }
        }
    };

    view! {
        <div class="navbar">
            <div class="navbar-status">
                {move || {
                    let msg = error_message.get();
                    if msg.is_empty() {
                        view! { <span></span> }.into_view()
                    } else {
                        view! {
                            <span class="error-message">
                                <i class="fas fa-exclamation-circle"></i>
                                " " {msg}
                            </span>
                        }
                        .into_view()
                    }
                }}
            </div>
            <div class="navbar-actions">
                {move || match address.get() {
                    Some(addr) => {
                        let short = truncate_address(&addr);
                        view! {
                            <div class="wallet-info">
                                {move || balance.get().map(|b| view! {
                                    <span class="wallet-balance">{b} " ETH"</span>
                                })}
                                <span class="wallet-address" title=addr.clone()>{short}</span>
                                <div class="copy-container">
                                    <button
                                        class="copy-button"
                                        title="Copy address to clipboard"
                                        on:click=copy_address
                                    >
                                        <i class="fas fa-copy"></i>
                                    </button>
                                    <div class="copy-tooltip" class:show=move || show_copied.get()>
                                        "Copied!"
                                    </div>
                                </div>
                                <button
                                    class="custom-btn navbar-btn create-btn"
                                    on:click=move |_| page.set(Page::CreateCampaign)
                                >
                                    "Create a campaign"
                                </button>
                            </div>
                        }
                        .into_view()
                    }
                    None => view! {
                        <button
                            class="custom-btn navbar-btn connect-btn"
                            disabled=move || is_connecting.get()
                            on:click=handle_connect
                        >
                            {move || if is_connecting.get() { "Connecting..." } else { "Connect" }}
                        </button>
                    }
                    .into_view(),
                }}
            </div>
        </div>
    }
}
