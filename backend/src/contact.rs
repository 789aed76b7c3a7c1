//! WhatsApp click-to-chat links.

pub const DEFAULT_MESSAGE: &str =
    "Hi, I'm interested in your services. Can we discuss a project?";

/// `https://wa.me/<digits>?text=<message>`. Anything but digits is dropped from
/// the number, as wa.me expects the bare international form.
pub fn whatsapp_link(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    if message.is_empty() {
        format!("https://wa.me/{}", digits)
    } else {
        format!("https://wa.me/{}?text={}", digits, urlencoding::encode(message))
    }
}

/// Opening message for a lead, falling back to the generic one.
pub fn lead_message(name: Option<&str>, service: Option<&str>) -> String {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    let service = service.map(str::trim).filter(|s| !s.is_empty());
    match (name, service) {
        (Some(name), Some(service)) => format!(
            "Hi, I'm {}. I'm interested in {}. Can we discuss a project?",
            name, service
        ),
        (Some(name), None) => format!(
            "Hi, I'm {}. I'm interested in your services. Can we discuss a project?",
            name
        ),
        (None, Some(service)) => format!(
            "Hi, I'm interested in {}. Can we discuss a project?",
            service
        ),
        (None, None) => DEFAULT_MESSAGE.to_string(),
    }
}
