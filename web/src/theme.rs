use serde::{Deserialize, Serialize};

use crate::utils::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const ATTR_NAME: &'static str = "data-theme";

    pub(crate) const fn scheme(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Applies the stored preference on startup; no stored preference means
    /// the browser's own color scheme wins.
    pub(crate) fn init() {
        Self::update_html(LocalOrDefault::local_or_default());
    }

    pub(crate) fn apply(theme: Option<Self>) {
        theme.local_save();
        Self::update_html(theme);
    }

    fn update_html(theme: Option<Self>) {
        use gloo::utils::document;

        let html = document()
            .query_selector("html")
            .expect("query must be correct")
            .expect("must have html element");

        let result = match theme {
            Some(theme) => {
                log::debug!("theme-scheme: {}", theme.scheme());
                html.set_attribute(Self::ATTR_NAME, theme.scheme())
            }
            None => {
                log::debug!("no theme preference");
                html.remove_attribute(Self::ATTR_NAME)
            }
        };
        if let Err(err) = result {
            log::error!("failed to update theme: {:?}", err);
        }
    }
}

impl StorageKey for Theme {
    const KEY: &'static str = "frutinha:theme";
}
