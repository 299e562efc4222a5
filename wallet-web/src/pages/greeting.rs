//! Greeting Page - network status, contract greeting and the last error

use leptos::prelude::*;
use crate::state::session::use_session_context;

#[component]
pub fn GreetingPage() -> impl IntoView {
    let ctx = use_session_context();
    let snapshot = ctx.snapshot;

    let has_provider = move || snapshot.with(|s| s.has_provider);
    let connected = move || snapshot.with(|s| s.account.is_some());
    let wrong_network = move || snapshot.with(|s| s.account.is_some() && !s.on_target_chain);
    let switching = move || snapshot.with(|s| s.switching);
    let ready = move || snapshot.with(|s| s.ready);
    let loading = move || snapshot.with(|s| s.loading);

    let chain_label = move || {
        snapshot.with(|s| match s.chain_id {
            Some(id) => id.to_string(),
            None => "unknown".to_string(),
        })
    };
    let target_label = move || snapshot.with(|s| s.target_chain_id.to_string());
    let network_name = ctx.network_name();

    view! {
        <main class="app-container" style="display: flex; justify-content: center; padding: 48px 24px;">
            <div class="card" style="max-width: 560px; width: 100%;">
                <h1>"Greeter"</h1>

                <Show when=move || !has_provider()>
                    <p class="status-error">
                        "No injected wallet provider found. Install or enable a browser wallet to continue."
                    </p>
                </Show>

                <Show when=move || has_provider() && !connected()>
                    <p>"Connect your wallet to read the greeting."</p>
                </Show>

                <Show when=wrong_network>
                    <div class="status-row">
                        <p>
                            "Connected to chain " {chain_label} ", expected " {target_label} "."
                        </p>
                        <button
                            class="btn"
                            disabled=switching
                            on:click=move |_| ctx.switch_network()
                        >
                            {
                                let network_name = network_name.clone();
                                move || if switching() {
                                    "Switching...".to_string()
                                } else {
                                    format!("Switch to {}", network_name)
                                }
                            }
                        </button>
                    </div>
                </Show>

                <Show when=ready>
                    <section class="greeting">
                        <h2>"Greeting"</h2>
                        <p class="greeting-value">
                            {move || {
                                snapshot.with(|s| match (&s.greeting, s.loading) {
                                    (_, true) => "Loading...".to_string(),
                                    (Some(result), false) => result.value.clone(),
                                    (None, false) => "-".to_string(),
                                })
                            }}
                        </p>
                        <button
                            class="btn"
                            disabled=loading
                            on:click=move |_| ctx.refresh()
                        >
                            "Refresh"
                        </button>
                    </section>
                </Show>

                {move || {
                    snapshot.with(|s| s.error.clone()).map(|error| view! {
                        <p class="status-error" data-source=error.source.name()>
                            {error.message}
                        </p>
                    })
                }}
            </div>
        </main>
    }
}
