//! Live search over the in-memory contact list.

use crate::api::models::Contact;

/// Contacts whose name or address contains `query`, ignoring case.
/// An empty query matches everything. Order follows `contacts`.
pub fn filter_contacts<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    let needle = query.to_lowercase();
    contacts
        .iter()
        .filter(|c| matches(c, &needle))
        .collect()
}

fn matches(contact: &Contact, needle: &str) -> bool {
    needle.is_empty()
        || contact.name.to_lowercase().contains(needle)
        || contact.address.to_lowercase().contains(needle)
}

/// "1 contact", "3 contacts".
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 contact".to_string()
    } else {
        format!("{count} contacts")
    }
}
