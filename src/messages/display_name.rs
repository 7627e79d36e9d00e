/// Turns a property name into the name shown in messages.
///
/// Only the last path segment is used and any index suffix is dropped. Words are split on
/// `_`, `-` and lower-to-upper case transitions, and each word is capitalised:
/// `customer_discount` becomes `Customer Discount`, `creditCardNumber` becomes
/// `Credit Card Number`.
///
/// ```
/// use rule_rail::messages::split_display_name;
///
/// assert_eq!(split_display_name("surname"), "Surname");
/// assert_eq!(split_display_name("address_lines"), "Address Lines");
/// assert_eq!(split_display_name("orders[0].unitCost"), "Unit Cost");
/// ```
pub fn split_display_name(name: &str) -> String {
    let last = name.rsplit('.').next().unwrap_or(name);
    let last = last.split('[').next().unwrap_or(last);

    let mut out = String::with_capacity(last.len() + 4);
    let mut word_start = true;
    let mut prev: Option<char> = None;

    for c in last.chars() {
        if matches!(c, '_' | '-' | ' ') {
            word_start = true;
            prev = Some(c);
            continue;
        }
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            word_start = true;
        }
        if word_start {
            if !out.is_empty() {
                out.push(' ');
            }
            out.extend(c.to_uppercase());
            word_start = false;
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}
