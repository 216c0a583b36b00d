use std::rc::Rc;

use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;

use smartcontact::api::models::{ContactId, PersistenceMode};
use smartcontact::error::SessionError;

use crate::app::{run_async_to_main, AppContext};
use crate::ui::add_form::AddForm;
use crate::ui::contact_list::ContactList;
use crate::ui::insight_panel::InsightPanel;

const LOADING_PAGE: &str = "loading";
const CONTACTS_PAGE: &str = "contacts";

/// Widgets that change after construction.
pub struct MainView {
    window: adw::ApplicationWindow,
    overlay: adw::ToastOverlay,
    stack: gtk::Stack,
    mode_label: gtk::Label,
    ai_btn: gtk::Button,
    add_btn: gtk::Button,
    form: AddForm,
    insight: InsightPanel,
    list: ContactList,
}

impl MainView {
    fn toast(&self, message: &str) {
        self.overlay.add_toast(adw::Toast::new(message));
    }
}

pub fn show_main_window(app: &Application, ctx: Rc<AppContext>) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("SmartContact")
        .default_width(960)
        .default_height(640)
        .build();

    let overlay = adw::ToastOverlay::new();

    // Loading page, shown until bootstrap resolves
    let loading = gtk::Box::new(gtk::Orientation::Vertical, 12);
    loading.set_valign(gtk::Align::Center);
    let spinner = gtk::Spinner::new();
    spinner.set_size_request(32, 32);
    spinner.start();
    let loading_label = gtk::Label::new(Some("Loading contacts…"));
    loading_label.add_css_class("dim-label");
    loading.append(&spinner);
    loading.append(&loading_label);

    // Contacts page: form and insight on the left, list on the right
    let columns = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    columns.set_margin_top(12);
    columns.set_margin_bottom(12);
    columns.set_margin_start(12);
    columns.set_margin_end(12);

    let left = gtk::Box::new(gtk::Orientation::Vertical, 12);
    left.set_size_request(340, -1);
    let add_btn = gtk::Button::with_label("Add contact");
    add_btn.add_css_class("pill");
    add_btn.add_css_class("suggested-action");
    let form = AddForm::new();
    let insight = InsightPanel::new();
    left.append(&add_btn);
    left.append(&form.widget());
    left.append(&insight.widget());

    let list = ContactList::new();
    columns.append(&left);
    columns.append(&list.widget());

    let stack = gtk::Stack::new();
    stack.add_named(&loading, Some(LOADING_PAGE));
    stack.add_named(&columns, Some(CONTACTS_PAGE));
    stack.set_visible_child_name(LOADING_PAGE);
    overlay.set_child(Some(&stack));

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let titles = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let title = gtk::Label::new(Some("SmartContact"));
    title.add_css_class("title");
    let mode_label = gtk::Label::new(Some("Connecting…"));
    mode_label.add_css_class("subtitle");
    titles.append(&title);
    titles.append(&mode_label);
    header.set_title_widget(Some(&titles));

    let ai_btn = gtk::Button::with_label("AI insight");
    ai_btn.set_sensitive(false);
    header.pack_end(&ai_btn);
    container.append(&header);
    container.append(&overlay);
    window.set_content(Some(&container));

    let view = Rc::new(MainView {
        window: window.clone(),
        overlay,
        stack,
        mode_label,
        ai_btn,
        add_btn,
        form,
        insight,
        list,
    });

    {
        let ctx = ctx.clone();
        let view2 = view.clone();
        view.add_btn.connect_clicked(move |_| {
            ctx.session.borrow_mut().form.visible = true;
            render(&ctx, &view2);
        });
    }
    {
        let ctx = ctx.clone();
        let view2 = view.clone();
        view.form.connect_cancel(move || {
            ctx.session.borrow_mut().form.reset();
            view2.form.clear();
            render(&ctx, &view2);
        });
    }
    {
        let ctx = ctx.clone();
        let view2 = view.clone();
        view.form.connect_submit(move || submit_add(&ctx, &view2));
    }
    {
        let ctx = ctx.clone();
        let view2 = view.clone();
        view.list.connect_search_changed(move |query| {
            ctx.session.borrow_mut().set_query(&query);
            render(&ctx, &view2);
        });
    }
    {
        let ctx = ctx.clone();
        let view2 = view.clone();
        view.ai_btn.connect_clicked(move |_| analyze(&ctx, &view2));
    }
    {
        let ctx = ctx.clone();
        let view2 = view.clone();
        view.insight.connect_dismiss(move || {
            ctx.session.borrow_mut().dismiss_insight();
            render(&ctx, &view2);
        });
    }

    window.present();
    render(&ctx, &view);
    start_bootstrap(&ctx, &view);
}

/// Redraw everything from the session.
fn render(ctx: &Rc<AppContext>, view: &Rc<MainView>) {
    let session = ctx.session.borrow();

    view.stack.set_visible_child_name(if session.is_loading() {
        LOADING_PAGE
    } else {
        CONTACTS_PAGE
    });
    view.mode_label.set_label(match session.mode() {
        Some(PersistenceMode::Remote) => "Synced with server",
        Some(PersistenceMode::Local) => "Offline, saved on this device",
        None => "Connecting…",
    });

    view.ai_btn.set_sensitive(session.can_analyze());
    view.ai_btn.set_label(if session.is_analyzing() {
        "Analyzing…"
    } else {
        "AI insight"
    });

    view.add_btn.set_sensitive(session.accepts_changes());
    view.add_btn.set_visible(!session.form.visible);
    view.form.set_revealed(session.form.visible);
    view.insight.set_insight(session.insight());

    let on_delete: Rc<dyn Fn(ContactId)> = {
        let ctx = ctx.clone();
        let view = view.clone();
        Rc::new(move |id| request_delete(&ctx, &view, &id))
    };
    view.list.set_items(
        &session.visible_contacts(),
        session.accepts_changes(),
        on_delete,
    );
}

fn start_bootstrap(ctx: &Rc<AppContext>, view: &Rc<MainView>) {
    let sync = ctx.sync.clone();
    let rx = run_async_to_main(async move { sync.probe().await });

    let ctx = ctx.clone();
    let view = view.clone();
    rx.attach(None, move |probe| {
        let mode = ctx.session.borrow_mut().finish_bootstrap(probe);
        if mode == PersistenceMode::Local {
            view.toast("Server unreachable. Working offline.");
        }
        render(&ctx, &view);
        glib::ControlFlow::Continue
    });
}

fn submit_add(ctx: &Rc<AppContext>, view: &Rc<MainView>) {
    let (name, address) = view.form.values();
    let begun = {
        let mut session = ctx.session.borrow_mut();
        session.form.name = name;
        session.form.address = address;
        session.begin_add()
    };
    let (mode, draft) = match begun {
        Ok(begun) => begun,
        Err(SessionError::NotReady | SessionError::Busy) => return,
        Err(e) => {
            view.toast(&e.to_string());
            return;
        }
    };

    view.form.set_busy(true);
    render(ctx, view);
    let sync = ctx.sync.clone();
    let rx = run_async_to_main(async move { sync.add(mode, draft).await });

    let ctx = ctx.clone();
    let view = view.clone();
    rx.attach(None, move |contact| {
        view.form.set_busy(false);
        if let Err(e) = ctx.session.borrow_mut().apply_added(contact) {
            log::warn!("add: {}", e);
        }
        view.form.clear();
        render(&ctx, &view);
        glib::ControlFlow::Continue
    });
}

fn request_delete(ctx: &Rc<AppContext>, view: &Rc<MainView>, id: &ContactId) {
    let staged = ctx.session.borrow_mut().request_delete(id).cloned();
    let Some(contact) = staged else {
        return;
    };

    let dialog = gtk::Dialog::builder()
        .title("Confirm deletion")
        .transient_for(&view.window)
        .modal(true)
        .build();
    let message = gtk::Label::new(Some(&format!(
        "Are you sure you want to delete the contact \"{}\"? This action cannot be undone.",
        contact.name
    )));
    message.set_wrap(true);
    message.set_max_width_chars(40);
    message.set_margin_top(12);
    message.set_margin_bottom(12);
    message.set_margin_start(12);
    message.set_margin_end(12);
    dialog.content_area().append(&message);

    let _ = dialog.add_button("Cancel", gtk::ResponseType::Cancel);
    let delete_btn = dialog.add_button("Delete", gtk::ResponseType::Accept);
    delete_btn.add_css_class("destructive-action");
    dialog.set_default_response(gtk::ResponseType::Cancel);

    let ctx = ctx.clone();
    let view = view.clone();
    dialog.connect_response(move |dlg, resp| {
        if resp == gtk::ResponseType::Accept {
            confirm_delete(&ctx, &view);
        } else {
            ctx.session.borrow_mut().cancel_delete();
        }
        dlg.close();
    });
    dialog.present();
}

fn confirm_delete(ctx: &Rc<AppContext>, view: &Rc<MainView>) {
    let (mode, contact) = {
        let mut session = ctx.session.borrow_mut();
        match (session.mode(), session.confirm_delete()) {
            (Some(mode), Some(contact)) => (mode, contact),
            _ => return,
        }
    };
    render(ctx, view);

    let sync = ctx.sync.clone();
    let id = contact.id;
    let rx = run_async_to_main(async move {
        let outcome = sync.delete(mode, &id).await;
        (id, outcome)
    });

    let ctx = ctx.clone();
    let view = view.clone();
    rx.attach(None, move |(id, outcome)| {
        log::debug!("delete: {} settled as {:?}", id, outcome);
        ctx.session.borrow_mut().apply_removed(&id);
        render(&ctx, &view);
        glib::ControlFlow::Continue
    });
}

fn analyze(ctx: &Rc<AppContext>, view: &Rc<MainView>) {
    let begun = ctx.session.borrow_mut().begin_analysis();
    let Some(contacts) = begun else {
        return;
    };
    render(ctx, view);

    let insight = ctx.insight.clone();
    let rx = run_async_to_main(async move { insight.analyze(&contacts).await });

    let ctx = ctx.clone();
    let view = view.clone();
    rx.attach(None, move |result| {
        ctx.session.borrow_mut().finish_analysis(result);
        render(&ctx, &view);
        glib::ControlFlow::Continue
    });
}
