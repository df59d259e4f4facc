//! Selector synthesis for discovered elements
//!
//! Selectors are built from raw attribute values without CSS escaping, so a
//! class such as `w-1/2` yields a selector that will not parse back.

use scraper::ElementRef;

/// Class names of an element in the order they appear in the markup
pub fn class_names<'a>(element: &ElementRef<'a>) -> Vec<&'a str> {
    element
        .value()
        .attr("class")
        .map(|classes| classes.split_whitespace().collect())
        .unwrap_or_default()
}

/// Build a CSS-like selector for a single element.
///
/// `#id` wins over classes; otherwise `tag.class1.class2`, falling back to
/// the bare tag name.
pub fn selector_path(element: &ElementRef) -> String {
    if let Some(id) = element.value().attr("id").filter(|id| !id.is_empty()) {
        return format!("#{}", id);
    }

    let tag = element.value().name();
    let classes = class_names(element);
    if classes.is_empty() {
        tag.to_string()
    } else {
        format!("{}.{}", tag, classes.join("."))
    }
}

/// Container selector as reported: tag, a dot, then the classes joined by spaces
pub fn container_selector(element: &ElementRef) -> String {
    format!("{}.{}", element.value().name(), class_names(element).join(" "))
}

/// Turn a reported container selector back into a queryable one
pub fn container_query(container_selector: &str) -> String {
    container_selector.replace(' ', ".")
}
