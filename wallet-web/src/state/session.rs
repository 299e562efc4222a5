//! Session state management
//!
//! Bridges the core session's change feed into a Leptos signal. Components read
//! [`SessionContext::snapshot`] and trigger actions through the context methods,
//! which run on the local executor.

use crate::services::ethereum::{BrowserProvider, LeptosSpawner};
use leptos::prelude::*;
use lib_core::{DappConfig, DappSession, SessionSnapshot};
use std::rc::Rc;

/// Global session context
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub snapshot: RwSignal<SessionSnapshot>,
    session: StoredValue<DappSession, LocalStorage>,
    network_name: StoredValue<String>,
}

impl SessionContext {
    fn new(config: DappConfig) -> Self {
        let network_name = StoredValue::new(config.network.chain_name.clone());
        let session = DappSession::new(config, Some(BrowserProvider::gateway()), Rc::new(LeptosSpawner));
        let snapshot = RwSignal::new(session.snapshot());

        session.subscribe(move |latest| {
            snapshot.set(latest.clone());
        });

        let starting = session.clone();
        leptos::task::spawn_local(async move {
            starting.start().await;
        });

        Self {
            snapshot,
            session: StoredValue::new_local(session),
            network_name,
        }
    }

    fn session(&self) -> DappSession {
        self.session.get_value()
    }

    /// Display name of the target network.
    pub fn network_name(&self) -> String {
        self.network_name.get_value()
    }

    pub fn connect(&self) {
        let session = self.session();
        leptos::task::spawn_local(async move {
            match session.connect().await {
                Ok(account) => log::info!("Connected {}", account.short()),
                Err(e) => log::warn!("Connect failed: {}", e),
            }
        });
    }

    pub fn switch_network(&self) {
        let session = self.session();
        leptos::task::spawn_local(async move {
            if let Err(e) = session.switch_to_target_chain().await {
                log::warn!("Network switch failed: {}", e);
            }
        });
    }

    pub fn refresh(&self) {
        let session = self.session();
        leptos::task::spawn_local(async move {
            if let Err(e) = session.refresh().await {
                log::warn!("Refresh failed: {}", e);
            }
        });
    }
}

pub fn provide_session_context(config: DappConfig) -> SessionContext {
    let context = SessionContext::new(config);
    provide_context(context);

    let session = context.session;
    on_cleanup(move || {
        session.try_with_value(|session| session.teardown());
    });

    context
}

pub fn use_session_context() -> SessionContext {
    expect_context::<SessionContext>()
}
