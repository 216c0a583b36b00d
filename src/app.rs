use std::cell::RefCell;
use std::rc::Rc;

use adw::Application;
use glib::MainContext;

use smartcontact::insight::InsightClient;
use smartcontact::session::Session;
use smartcontact::settings::Settings;
use smartcontact::storage::SnapshotStore;
use smartcontact::sync::SyncClient;
use smartcontact::utils::spawn_async;

/// The session plus the collaborators that do network work for it.
/// Lives on the GTK main thread only.
pub struct AppContext {
    pub session: RefCell<Session>,
    pub sync: SyncClient,
    pub insight: InsightClient,
}

pub fn glib_channel<T: Send + 'static>() -> (glib::Sender<T>, glib::Receiver<T>) {
    MainContext::channel(glib::Priority::default())
}

/// Run `fut` on the tokio runtime and hand its output to the main loop.
pub fn run_async_to_main<T, Fut>(fut: Fut) -> glib::Receiver<T>
where
    T: Send + 'static,
    Fut: std::future::Future<Output = T> + Send + 'static,
{
    let (tx, rx) = glib_channel::<T>();
    spawn_async(async move {
        let res = fut.await;
        let _ = tx.send(res);
    });
    rx
}

pub fn build_ui(app: &Application) {
    let settings = Settings::load();
    let snapshot = SnapshotStore::open_default();
    match &snapshot {
        Some(store) => log::info!("snapshot: {}", store.path().display()),
        None => log::warn!("snapshot: no data directory, offline copy disabled"),
    }
    let ctx = Rc::new(AppContext {
        session: RefCell::new(Session::new(snapshot)),
        sync: SyncClient::from_settings(&settings),
        insight: InsightClient::from_settings(&settings),
    });
    crate::ui::main_window::show_main_window(app, ctx);
}
