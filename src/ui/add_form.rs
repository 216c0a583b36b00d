use std::rc::Rc;

use gtk4::prelude::*;
use gtk4 as gtk;

/// Collapsible "new contact" form.
pub struct AddForm {
    revealer: gtk::Revealer,
    name_entry: gtk::Entry,
    address_entry: gtk::Entry,
    save_btn: gtk::Button,
    cancel_btn: gtk::Button,
}

impl AddForm {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
        root.set_margin_top(12);
        root.set_margin_bottom(12);
        root.set_margin_start(12);
        root.set_margin_end(12);
        root.add_css_class("card");

        let title = gtk::Label::new(Some("New contact"));
        title.add_css_class("title-4");
        title.set_halign(gtk::Align::Start);
        root.append(&title);

        let name_entry = gtk::Entry::new();
        name_entry.set_placeholder_text(Some("Full name"));
        name_entry.set_hexpand(true);

        let address_entry = gtk::Entry::new();
        address_entry.set_placeholder_text(Some("Street, number, city"));
        address_entry.set_hexpand(true);

        let fields = gtk::Box::new(gtk::Orientation::Vertical, 8);
        fields.set_margin_start(12);
        fields.set_margin_end(12);
        fields.append(&name_entry);
        fields.append(&address_entry);
        root.append(&fields);

        let buttons = gtk::Box::new(gtk::Orientation::Horizontal, 8);
        buttons.set_halign(gtk::Align::End);
        buttons.set_margin_end(12);
        buttons.set_margin_bottom(12);
        let cancel_btn = gtk::Button::with_label("Cancel");
        let save_btn = gtk::Button::with_label("Save contact");
        save_btn.add_css_class("suggested-action");
        buttons.append(&cancel_btn);
        buttons.append(&save_btn);
        root.append(&buttons);

        let revealer = gtk::Revealer::builder()
            .transition_type(gtk::RevealerTransitionType::SlideDown)
            .reveal_child(false)
            .build();
        revealer.set_child(Some(&root));

        Self {
            revealer,
            name_entry,
            address_entry,
            save_btn,
            cancel_btn,
        }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.revealer.clone().upcast()
    }

    pub fn values(&self) -> (String, String) {
        (
            self.name_entry.text().to_string(),
            self.address_entry.text().to_string(),
        )
    }

    pub fn clear(&self) {
        self.name_entry.set_text("");
        self.address_entry.set_text("");
    }

    pub fn set_revealed(&self, revealed: bool) {
        let opening = revealed && !self.revealer.reveals_child();
        self.revealer.set_reveal_child(revealed);
        if opening {
            self.name_entry.grab_focus();
        }
    }

    /// Block a second submit while one is in flight.
    pub fn set_busy(&self, busy: bool) {
        self.save_btn.set_sensitive(!busy);
        self.name_entry.set_sensitive(!busy);
        self.address_entry.set_sensitive(!busy);
    }

    /// Save button, or Enter in either field.
    pub fn connect_submit<F: Fn() + 'static>(&self, f: F) {
        let submit: Rc<dyn Fn()> = Rc::new(f);
        {
            let submit = submit.clone();
            self.save_btn.connect_clicked(move |_| (submit)());
        }
        {
            let submit = submit.clone();
            self.name_entry.connect_activate(move |_| (submit)());
        }
        {
            let submit = submit.clone();
            self.address_entry.connect_activate(move |_| (submit)());
        }
    }

    pub fn connect_cancel<F: Fn() + 'static>(&self, f: F) {
        self.cancel_btn.connect_clicked(move |_| f());
    }
}
