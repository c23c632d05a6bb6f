#![no_std]

use serde::{Deserialize, Serialize};

pub use boxes::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod boxes;
mod engine;
mod error;
mod generator;
mod types;

/// Hidden assignment of true contents to the three boxes, in display order.
///
/// Every label is wrong, so the contents must be one of the exactly two
/// fixed-point-free permutations of the labels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrangement {
    contents: [BoxKind; BOX_COUNT],
}

impl Arrangement {
    /// Labels are nailed to the boxes at setup; only the contents move.
    pub const LABELS: [BoxKind; BOX_COUNT] = [BoxKind::Apples, BoxKind::Mixed, BoxKind::Oranges];

    /// Contents shifted one position left of the labels.
    pub const fn rotated_left() -> Self {
        Self {
            contents: [BoxKind::Mixed, BoxKind::Oranges, BoxKind::Apples],
        }
    }

    /// Contents shifted one position right of the labels.
    pub const fn rotated_right() -> Self {
        Self {
            contents: [BoxKind::Oranges, BoxKind::Apples, BoxKind::Mixed],
        }
    }

    pub fn from_contents(contents: [BoxKind; BOX_COUNT]) -> Result<Self> {
        let arrangement = Self { contents };
        if arrangement == Self::rotated_left() || arrangement == Self::rotated_right() {
            Ok(arrangement)
        } else {
            Err(GameError::InvalidArrangement)
        }
    }

    pub fn validate_index(&self, index: usize) -> Result<usize> {
        if index < BOX_COUNT {
            Ok(index)
        } else {
            Err(GameError::InvalidBox)
        }
    }

    pub fn content_of(&self, index: usize) -> BoxKind {
        self.contents[index]
    }

    pub const fn label_of(index: usize) -> BoxKind {
        Self::LABELS[index]
    }

    /// Display position of the box carrying `label`.
    pub const fn index_of_label(label: BoxKind) -> usize {
        match label {
            BoxKind::Apples => 0,
            BoxKind::Mixed => 1,
            BoxKind::Oranges => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoxKind::*;

    #[test]
    fn both_rotations_are_fixed_point_free() {
        for arrangement in [Arrangement::rotated_left(), Arrangement::rotated_right()] {
            for index in 0..BOX_COUNT {
                assert_ne!(arrangement.content_of(index), Arrangement::label_of(index));
            }
        }
    }

    #[test]
    fn from_contents_accepts_only_the_two_derangements() {
        assert!(Arrangement::from_contents([Mixed, Oranges, Apples]).is_ok());
        assert!(Arrangement::from_contents([Oranges, Apples, Mixed]).is_ok());

        // identity (matches every label)
        assert_eq!(
            Arrangement::from_contents([Apples, Mixed, Oranges]),
            Err(GameError::InvalidArrangement)
        );
        // a swap leaves one fixed point
        assert_eq!(
            Arrangement::from_contents([Mixed, Apples, Oranges]),
            Err(GameError::InvalidArrangement)
        );
        // not even a permutation
        assert_eq!(
            Arrangement::from_contents([Mixed, Mixed, Apples]),
            Err(GameError::InvalidArrangement)
        );
    }

    #[test]
    fn label_index_round_trips() {
        for index in 0..BOX_COUNT {
            assert_eq!(
                Arrangement::index_of_label(Arrangement::label_of(index)),
                index
            );
        }
    }
}
