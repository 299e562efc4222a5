//! Greeter dApp browser frontend
//!
//! Connects an injected wallet, keeps it on the target network and shows the
//! greeter contract's `greeting()`.

use leptos::prelude::*;
use lib_core::DappConfig;
use wasm_bindgen::prelude::*;

mod app;
mod components;
mod pages;
mod services;
mod state;

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Initialize logger
    wasm_logger::init(wasm_logger::Config::default());

    let config = match DappConfig::from_build_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            web_sys::console::error_1(&e.to_string().into());
            return;
        }
    };

    log::info!(
        "Greeter dApp starting (chain {} / contract {})",
        config.network.chain_id,
        config.contract_address
    );

    leptos::mount::mount_to_body(move || view! { <App config=config.clone()/> });
}
