use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible state of a single box.
///
/// `content` stays `None` until the box is opened; the truth lives in the
/// engine's [`Arrangement`] until then.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitBox {
    pub label: BoxKind,
    pub is_open: bool,
    pub content: Option<BoxKind>,
    pub prediction: Option<BoxKind>,
    pub took: Option<Fruit>,
}

impl FruitBox {
    pub(crate) const fn closed(label: BoxKind) -> Self {
        Self {
            label,
            is_open: false,
            content: None,
            prediction: None,
            took: None,
        }
    }

    pub const fn is_closed(&self) -> bool {
        !self.is_open
    }
}
