pub mod add_form;
pub mod contact_list;
pub mod insight_panel;
pub mod main_window;
