//! Named markup roles and their selector bindings
//!
//! Extraction code asks for elements by role ("the title", "the infobox
//! rows") rather than by CSS selector, so that a different wiki skin only
//! needs a different [`MarkupProfile`].

use crate::config::SelectorConfig;
use crate::ConfigError;
use scraper::{ElementRef, Selector};
use std::fmt;

/// A structural part of a list or detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Primary page heading
    Title,
    /// Secondary title span used when the heading is missing or empty
    TitleFallback,
    /// Main article body
    ContentContainer,
    /// Side panel holding labeled key/value rows
    Infobox,
    /// One data row of the infobox
    InfoboxRow,
    /// Label of an infobox row
    InfoboxLabel,
    /// Value of an infobox row
    InfoboxValue,
    /// "Next results" pagination anchor on a list page
    NextPageLink,
    /// Item anchors inside the list page's result columns
    ResultLinks,
}

impl Role {
    /// All roles, in declaration order
    pub const ALL: [Role; 9] = [
        Role::Title,
        Role::TitleFallback,
        Role::ContentContainer,
        Role::Infobox,
        Role::InfoboxRow,
        Role::InfoboxLabel,
        Role::InfoboxValue,
        Role::NextPageLink,
        Role::ResultLinks,
    ];

    /// Returns the config key the role's selector is read from
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::TitleFallback => "title-fallback",
            Self::ContentContainer => "content",
            Self::Infobox => "infobox",
            Self::InfoboxRow => "infobox-row",
            Self::InfoboxLabel => "infobox-label",
            Self::InfoboxValue => "infobox-value",
            Self::NextPageLink => "next-page",
            Self::ResultLinks => "result-links",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finds elements playing a given role beneath a scope element
///
/// The scope itself is never returned; only its descendants are searched.
pub trait RoleLocator {
    /// Returns the first element in document order playing `role`
    fn find_by_role<'a>(&self, scope: ElementRef<'a>, role: Role) -> Option<ElementRef<'a>>;

    /// Returns every element playing `role`, in document order
    fn find_all_by_role<'a>(&self, scope: ElementRef<'a>, role: Role) -> Vec<ElementRef<'a>>;

    /// Returns true if the element carries the infobox's distinguishing class
    fn is_infobox_container(&self, element: ElementRef<'_>) -> bool;
}

/// Compiled selectors for every [`Role`]
#[derive(Debug, Clone)]
pub struct MarkupProfile {
    title: Selector,
    title_fallback: Selector,
    content: Selector,
    infobox: Selector,
    infobox_row: Selector,
    infobox_label: Selector,
    infobox_value: Selector,
    next_page: Selector,
    result_links: Selector,
    infobox_class: String,
}

impl MarkupProfile {
    /// Compiles a profile from selector configuration
    ///
    /// # Returns
    ///
    /// * `Ok(MarkupProfile)` - Every selector compiled
    /// * `Err(ConfigError::InvalidSelector)` - The first selector that failed to parse
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            title: compile(Role::Title, &config.title)?,
            title_fallback: compile(Role::TitleFallback, &config.title_fallback)?,
            content: compile(Role::ContentContainer, &config.content)?,
            infobox: compile(Role::Infobox, &config.infobox)?,
            infobox_row: compile(Role::InfoboxRow, &config.infobox_row)?,
            infobox_label: compile(Role::InfoboxLabel, &config.infobox_label)?,
            infobox_value: compile(Role::InfoboxValue, &config.infobox_value)?,
            next_page: compile(Role::NextPageLink, &config.next_page)?,
            result_links: compile(Role::ResultLinks, &config.result_links)?,
            infobox_class: config.infobox_class.trim().to_string(),
        })
    }

    /// Profile for the fandom wiki skin
    pub fn fandom() -> Result<Self, ConfigError> {
        Self::from_config(&SelectorConfig::default())
    }

    fn selector(&self, role: Role) -> &Selector {
        match role {
            Role::Title => &self.title,
            Role::TitleFallback => &self.title_fallback,
            Role::ContentContainer => &self.content,
            Role::Infobox => &self.infobox,
            Role::InfoboxRow => &self.infobox_row,
            Role::InfoboxLabel => &self.infobox_label,
            Role::InfoboxValue => &self.infobox_value,
            Role::NextPageLink => &self.next_page,
            Role::ResultLinks => &self.result_links,
        }
    }
}

impl RoleLocator for MarkupProfile {
    fn find_by_role<'a>(&self, scope: ElementRef<'a>, role: Role) -> Option<ElementRef<'a>> {
        scope.select(self.selector(role)).next()
    }

    fn find_all_by_role<'a>(&self, scope: ElementRef<'a>, role: Role) -> Vec<ElementRef<'a>> {
        scope.select(self.selector(role)).collect()
    }

    fn is_infobox_container(&self, element: ElementRef<'_>) -> bool {
        element
            .value()
            .classes()
            .any(|class| class == self.infobox_class)
    }
}

fn compile(role: Role, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        role: role.to_string(),
        message: format!("'{}': {:?}", selector, e),
    })
}
