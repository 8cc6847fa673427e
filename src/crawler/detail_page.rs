//! Detail page extraction
//!
//! Turns one item page into a [`JutsuRecord`]. The steps run in a fixed
//! order:
//!
//! 1. Resolve the name from the heading, then the title span, then `"N/A"`
//! 2. Locate the content container; without it no record is produced
//! 3. Read the classification from the infobox, then exclude the infobox
//! 4. Drop noise elements (scripts, styles, figures, tables, nested divs)
//! 5. Flatten the remaining text nodes with single spaces
//! 6. Truncate at the "Trivia" marker, then at the "References" marker

use crate::crawler::roles::{Role, RoleLocator};
use crate::model::{JutsuRecord, NOT_CLASSIFIED, UNKNOWN_NAME};
use scraper::{ElementRef, Html, Node};

/// Label substring identifying the classification row (case-sensitive)
pub const CLASSIFICATION_LABEL: &str = "Classification";

/// Section markers the description is cut at, applied in this order
pub const SECTION_MARKERS: [&str; 2] = ["Trivia", "References"];

/// Elements dropped from the content before flattening
const NOISE_TAGS: [&str; 5] = ["script", "style", "figure", "table", "div"];

/// Extracts a record from detail page markup
///
/// Returns `None` when the page has no content container; every other
/// missing piece falls back to a sentinel value.
///
/// # Example
///
/// ```
/// use jutsu_crawler::crawler::{extract_record, MarkupProfile};
///
/// let html = r#"<h1 id="firstHeading">Chidori</h1>
///     <div class="mw-parser-output"><p>Lightning in the hand.</p></div>"#;
/// let record = extract_record(html, &MarkupProfile::fandom().unwrap()).unwrap();
/// assert_eq!(record.name, "Chidori");
/// assert_eq!(record.classification, "Not Classified");
/// assert_eq!(record.description, "Lightning in the hand.");
/// ```
pub fn extract_record<L: RoleLocator + ?Sized>(html: &str, locator: &L) -> Option<JutsuRecord> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let name = resolve_name(root, locator);

    let content = locator.find_by_role(root, Role::ContentContainer)?;

    let infobox = locator.find_by_role(content, Role::Infobox);
    let classification = infobox
        .map(|infobox| read_classification(infobox, locator))
        .unwrap_or_else(|| NOT_CLASSIFIED.to_string());

    let mut fragments = Vec::new();
    collect_text(content, infobox, locator, &mut fragments);
    let description = truncate_description(&fragments.join(" "));

    Some(JutsuRecord {
        name,
        classification,
        description,
    })
}

/// Resolves the page name through the title fallback chain
///
/// Uses all text beneath the heading, so inline markup such as
/// `<small>(anime)</small>` stays part of the name.
fn resolve_name<L: RoleLocator + ?Sized>(root: ElementRef<'_>, locator: &L) -> String {
    [Role::Title, Role::TitleFallback]
        .into_iter()
        .filter_map(|role| locator.find_by_role(root, role))
        .map(|element| element.text().collect::<String>().trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// Reads the classification from the infobox rows
///
/// Every matching row overwrites the previous value, so the last
/// classification row wins.
fn read_classification<L: RoleLocator + ?Sized>(infobox: ElementRef<'_>, locator: &L) -> String {
    let mut classification = NOT_CLASSIFIED.to_string();

    for row in locator.find_all_by_role(infobox, Role::InfoboxRow) {
        let Some(label) = locator.find_by_role(row, Role::InfoboxLabel) else {
            continue;
        };

        if !label.text().collect::<String>().contains(CLASSIFICATION_LABEL) {
            continue;
        }

        if let Some(value) = locator.find_by_role(row, Role::InfoboxValue) {
            classification = stripped_text(value);
        }
    }

    classification
}

/// Concatenates an element's text fragments, each trimmed, without separators
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Collects trimmed, non-empty text nodes beneath `element`, skipping noise
///
/// `element` itself is the scope of the walk and is never skipped.
fn collect_text<'a, L: RoleLocator + ?Sized>(
    element: ElementRef<'a>,
    infobox: Option<ElementRef<'a>>,
    locator: &L,
    out: &mut Vec<&'a str>,
) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let fragment = text.trim();
                if !fragment.is_empty() {
                    out.push(fragment);
                }
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    if !is_noise(child_element, infobox, locator) {
                        collect_text(child_element, infobox, locator, out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Returns true if the element and its subtree are excluded from the description
fn is_noise<L: RoleLocator + ?Sized>(
    element: ElementRef<'_>,
    infobox: Option<ElementRef<'_>>,
    locator: &L,
) -> bool {
    if infobox.map_or(false, |infobox| infobox.id() == element.id()) {
        return true;
    }

    NOISE_TAGS.contains(&element.value().name()) && !locator.is_infobox_container(element)
}

/// Cuts flattened text at the section markers and trims the result
///
/// The "Trivia" cut runs first; the "References" cut only sees what is
/// left of it.
///
/// ```
/// use jutsu_crawler::crawler::truncate_description;
///
/// assert_eq!(truncate_description(" Intro. Trivia Fact. References [1] "), "Intro.");
/// assert_eq!(truncate_description("No markers here"), "No markers here");
/// ```
pub fn truncate_description(text: &str) -> String {
    SECTION_MARKERS
        .iter()
        .fold(text, |remaining, marker| match remaining.find(marker) {
            Some(index) => &remaining[..index],
            None => remaining,
        })
        .trim()
        .to_string()
}
