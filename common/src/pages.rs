//! Screen pages a driver can show.
//!
//! # Pages
//!
//! - [`Page::Status`]: Key card, layer indicators and press counter
//! - [`Page::Debug`]: Frame counters and sink health
//! - [`Page::Logs`]: Recent [`DebugLog`](crate::profiling::DebugLog) lines

/// Available pages.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    /// The keyboard status screen.
    #[default]
    Status,

    /// Frame statistics.
    Debug,

    /// Log viewer.
    Logs,
}

impl Page {
    /// Next page (cycles: Status → Debug → Logs → Status).
    #[inline]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Status => Self::Debug,
            Self::Debug => Self::Logs,
            Self::Logs => Self::Status,
        }
    }

    /// Short title drawn on the page header.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Status => "STATUS",
            Self::Debug => "DEBUG",
            Self::Logs => "LOGS",
        }
    }
}
