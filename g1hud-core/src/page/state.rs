//! Page and display state

use core::str::FromStr;

/// Logical page shown on the glasses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    /// Clock and weekday strip
    #[default]
    Default,
    /// Now playing
    Music,
    /// Upcoming events
    Calendar,
    /// Rear camera placeholder
    RearView,
}

impl Page {
    /// All pages in selection order
    pub const ALL: [Page; 4] = [Page::Default, Page::Music, Page::Calendar, Page::RearView];

    /// Stable name, used for persistence and the console
    pub const fn name(self) -> &'static str {
        match self {
            Page::Default => "default",
            Page::Music => "music",
            Page::Calendar => "calendar",
            Page::RearView => "rearview",
        }
    }

    /// Look up a page by name (ASCII case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|page| page.name().eq_ignore_ascii_case(name))
    }

    /// Resolve a persisted name; unknown names select the default page
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    /// Next page in selection order, wrapping around
    pub fn next(self) -> Self {
        match self {
            Page::Default => Page::Music,
            Page::Music => Page::Calendar,
            Page::Calendar => Page::RearView,
            Page::RearView => Page::Default,
        }
    }
}

impl core::fmt::Display for Page {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Name that matches no page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownPage;

impl FromStr for Page {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or(UnknownPage)
    }
}

/// Selected page plus display-enabled flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PageState {
    pub page: Page,
    pub display_on: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: Page::Default,
            display_on: true,
        }
    }
}

impl PageState {
    pub const fn new(page: Page, display_on: bool) -> Self {
        Self { page, display_on }
    }
}
