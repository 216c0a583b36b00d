mod app;
mod ui;

use adw::prelude::*;
use adw::Application;

fn main() {
    smartcontact::logging::init();
    let app = Application::builder()
        .application_id("com.example.SmartContact")
        .build();
    app.connect_activate(|app| {
        crate::app::build_ui(app);
    });
    app.run();
}
