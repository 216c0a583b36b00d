use gtk4::prelude::*;
use gtk4 as gtk;

use smartcontact::api::models::AiInsight;

pub struct InsightPanel {
    revealer: gtk::Revealer,
    summary: gtk::Label,
    suggestions: gtk::Box,
    close_btn: gtk::Button,
}

impl InsightPanel {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 8);
        root.add_css_class("card");

        let header = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        header.set_margin_top(12);
        header.set_margin_start(12);
        header.set_margin_end(8);
        let title = gtk::Label::new(Some("AI insight"));
        title.add_css_class("heading");
        title.set_hexpand(true);
        title.set_halign(gtk::Align::Start);
        let close_btn = gtk::Button::from_icon_name("window-close-symbolic");
        close_btn.add_css_class("flat");
        close_btn.set_tooltip_text(Some("Dismiss"));
        header.append(&title);
        header.append(&close_btn);
        root.append(&header);

        let summary = gtk::Label::new(None);
        summary.set_wrap(true);
        summary.set_xalign(0.0);
        summary.set_margin_start(12);
        summary.set_margin_end(12);
        root.append(&summary);

        let suggestions = gtk::Box::new(gtk::Orientation::Vertical, 4);
        suggestions.set_margin_start(12);
        suggestions.set_margin_end(12);
        suggestions.set_margin_bottom(12);
        root.append(&suggestions);

        let revealer = gtk::Revealer::builder()
            .transition_type(gtk::RevealerTransitionType::SlideDown)
            .reveal_child(false)
            .build();
        revealer.set_child(Some(&root));

        Self {
            revealer,
            summary,
            suggestions,
            close_btn,
        }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.revealer.clone().upcast()
    }

    pub fn set_insight(&self, insight: Option<&AiInsight>) {
        while let Some(child) = self.suggestions.first_child() {
            self.suggestions.remove(&child);
        }
        let Some(insight) = insight else {
            self.revealer.set_reveal_child(false);
            return;
        };
        self.summary.set_markup(&format!(
            "<i>“{}”</i>",
            gtk::glib::markup_escape_text(&insight.summary)
        ));
        if !insight.suggestions.is_empty() {
            let heading = gtk::Label::new(Some("Suggestions"));
            heading.add_css_class("caption-heading");
            heading.set_halign(gtk::Align::Start);
            self.suggestions.append(&heading);
        }
        for suggestion in &insight.suggestions {
            let line = gtk::Label::new(Some(&format!("• {suggestion}")));
            line.set_wrap(true);
            line.set_xalign(0.0);
            self.suggestions.append(&line);
        }
        self.revealer.set_reveal_child(true);
    }

    pub fn connect_dismiss<F: Fn() + 'static>(&self, f: F) {
        self.close_btn.connect_clicked(move |_| f());
    }
}
