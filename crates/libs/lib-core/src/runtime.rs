//! Task scheduling seam.
//!
//! Readiness-triggered reads are fire-and-forget; the coordinator hands them to a
//! [`TaskSpawner`]. In the browser that is Leptos' `spawn_local`, in tests a tokio
//! `LocalSet`. Tasks never run in parallel with the caller.

use futures::future::LocalBoxFuture;

pub trait TaskSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}
