use crate::events::AppEvent;
use async_channel::Sender;
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

/// Spawns the document watcher, and the control server when `serve` is set,
/// on a background tokio runtime.
pub fn start_background_services(tx: Sender<AppEvent>, document: PathBuf, serve: bool) {
    thread::spawn(move || {
        let rt = Runtime::new().expect("Failed to create Tokio runtime");

        rt.block_on(async {
            if serve {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(document, tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
