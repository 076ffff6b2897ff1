//! Background execution of the viewer's network requests.

use std::future::Future;

/// Runs `task` on the tokio runtime the viewer lives in.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<T>(task: T)
where
    T: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(task);
}

/// Runs `task` on the browser event loop.
#[cfg(target_arch = "wasm32")]
pub fn spawn<T>(task: T)
where
    T: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(task);
}
