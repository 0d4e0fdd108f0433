use std::time::Duration;

use futures::future::LocalBoxFuture;
use gloo::timers::future::TimeoutFuture;
use shared::guard::Scheduler;

/// `setTimeout` timers and tasks on the page's microtask queue.
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        Box::pin(TimeoutFuture::new(millis))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
