//! Greeter dApp - Leptos Frontend
//!
//! Single view: wallet button in the navbar, network status and greeting below.

use leptos::prelude::*;
use lib_core::DappConfig;

use crate::components::Navbar;
use crate::pages::GreetingPage;
use crate::state::session::provide_session_context;

#[component]
pub fn App(config: DappConfig) -> impl IntoView {
    provide_session_context(config);

    view! {
        <div class="app-container">
            <Navbar/>
            <GreetingPage/>
        </div>
    }
}
