//! Navigation Bar Component - wallet button on the right

use leptos::prelude::*;
use crate::state::session::use_session_context;

#[component]
pub fn Navbar() -> impl IntoView {
    let ctx = use_session_context();

    let account = move || ctx.snapshot.with(|s| s.account.clone());
    let connecting = move || ctx.snapshot.with(|s| s.connecting);

    view! {
        <nav>
            <div style="max-width: 1200px; margin: 0 auto; padding: 0 24px; display: flex; justify-content: space-between; align-items: center;">
                <span class="nav-title">"Greeter"</span>
                {move || match account() {
                    None => view! {
                        <button
                            class="btn"
                            disabled=connecting
                            on:click=move |_| ctx.connect()
                        >
                            {move || if connecting() { "Connecting..." } else { "Connect" }}
                        </button>
                    }.into_any(),
                    Some(address) => view! {
                        <span class="wallet-badge" title=address.to_string()>
                            "Wallet Connected · " {address.short()}
                        </span>
                    }.into_any(),
                }}
            </div>
        </nav>
    }
}
