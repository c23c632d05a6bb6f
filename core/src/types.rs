use serde::{Deserialize, Serialize};

/// Number of boxes in a round. The puzzle is only well posed for three.
pub const BOX_COUNT: usize = 3;

/// A single physical fruit drawn from a box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fruit {
    Apple,
    Orange,
}

/// The three-valued category tag, used both for the sign on a box and for
/// its true contents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxKind {
    Apples,
    Oranges,
    Mixed,
}

impl BoxKind {
    pub const ALL: [BoxKind; BOX_COUNT] = [BoxKind::Apples, BoxKind::Oranges, BoxKind::Mixed];

    /// The only fruit a single-kind box can yield; `None` for `Mixed`.
    pub const fn single_fruit(self) -> Option<Fruit> {
        match self {
            Self::Apples => Some(Fruit::Apple),
            Self::Oranges => Some(Fruit::Orange),
            Self::Mixed => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Playing,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}
