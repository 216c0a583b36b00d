use std::rc::Rc;

use gtk4::prelude::*;
use gtk4 as gtk;

use smartcontact::api::models::{Contact, ContactId};
use smartcontact::search::count_label;

pub struct ContactList {
    root: gtk::Box,
    search: gtk::SearchEntry,
    count: gtk::Label,
    list: gtk::ListBox,
    empty: gtk::Box,
}

impl ContactList {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);
        root.set_hexpand(true);

        let search_row = gtk::Box::new(gtk::Orientation::Horizontal, 8);
        let search = gtk::SearchEntry::new();
        search.set_placeholder_text(Some("Search by name or address…"));
        search.set_hexpand(true);
        let count = gtk::Label::new(Some(&count_label(0)));
        count.add_css_class("dim-label");
        search_row.append(&search);
        search_row.append(&count);
        root.append(&search_row);

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .build();
        let list = gtk::ListBox::new();
        list.set_selection_mode(gtk::SelectionMode::None);
        list.add_css_class("boxed-list");
        list.set_valign(gtk::Align::Start);
        scroller.set_child(Some(&list));
        root.append(&scroller);

        let empty = gtk::Box::new(gtk::Orientation::Vertical, 4);
        empty.set_vexpand(true);
        empty.set_valign(gtk::Align::Center);
        let title = gtk::Label::new(Some("No results found"));
        title.add_css_class("title-4");
        let hint = gtk::Label::new(Some("Try different search terms or add a new contact."));
        hint.add_css_class("dim-label");
        empty.append(&title);
        empty.append(&hint);
        empty.set_visible(false);
        root.append(&empty);

        Self {
            root,
            search,
            count,
            list,
            empty,
        }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    pub fn connect_search_changed<F: Fn(String) + 'static>(&self, f: F) {
        self.search
            .connect_search_changed(move |entry| f(entry.text().to_string()));
    }

    /// Rebuild the rows. Delete buttons are insensitive unless `deletable`.
    pub fn set_items(
        &self,
        items: &[&Contact],
        deletable: bool,
        on_delete: Rc<dyn Fn(ContactId)>,
    ) {
        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }
        for contact in items {
            self.list
                .append(&contact_row(contact, deletable, on_delete.clone()));
        }
        self.count.set_label(&count_label(items.len()));
        self.list.set_visible(!items.is_empty());
        self.empty.set_visible(items.is_empty());
    }
}

fn added_on(created_at: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(created_at)
        .map(|dt| format!("Added {}", dt.format("%d.%m.%Y")))
        .unwrap_or_default()
}

fn contact_row(
    contact: &Contact,
    deletable: bool,
    on_delete: Rc<dyn Fn(ContactId)>,
) -> gtk::ListBoxRow {
    let row = gtk::ListBoxRow::new();
    let hbox = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    hbox.set_margin_top(8);
    hbox.set_margin_bottom(8);
    hbox.set_margin_start(12);
    hbox.set_margin_end(8);

    let text = gtk::Box::new(gtk::Orientation::Vertical, 2);
    text.set_hexpand(true);
    let name = gtk::Label::new(Some(&contact.name));
    name.add_css_class("heading");
    name.set_halign(gtk::Align::Start);
    let address = gtk::Label::new(Some(&contact.address));
    address.set_halign(gtk::Align::Start);
    address.set_wrap(true);
    address.set_xalign(0.0);
    let date = gtk::Label::new(Some(&added_on(contact.created_at)));
    date.add_css_class("caption");
    date.add_css_class("dim-label");
    date.set_halign(gtk::Align::Start);
    text.append(&name);
    text.append(&address);
    text.append(&date);
    hbox.append(&text);

    let delete_btn = gtk::Button::from_icon_name("user-trash-symbolic");
    delete_btn.add_css_class("flat");
    delete_btn.set_valign(gtk::Align::Center);
    delete_btn.set_tooltip_text(Some("Delete contact"));
    delete_btn.set_sensitive(deletable);
    let id = contact.id.clone();
    delete_btn.connect_clicked(move |_| (on_delete)(id.clone()));
    hbox.append(&delete_btn);

    row.set_child(Some(&hbox));
    row
}
