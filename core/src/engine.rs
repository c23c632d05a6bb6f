use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineState {
    /// No box opened yet.
    Initial,
    /// First box open, predictions being collected for the rest.
    AwaitingPredictions,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::Initial)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Initial
    }
}

/// Copy-out read model; mutating a snapshot cannot touch engine state.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub boxes: [FruitBox; BOX_COUNT],
    pub first_opened: Option<usize>,
    pub outcome: Outcome,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleEngine {
    arrangement: Arrangement,
    boxes: [FruitBox; BOX_COUNT],
    first_opened: Option<usize>,
    unwinnable: bool,
    state: EngineState,
}

impl PuzzleEngine {
    pub fn new(arrangement: Arrangement) -> Self {
        Self {
            arrangement,
            boxes: core::array::from_fn(|index| FruitBox::closed(Arrangement::label_of(index))),
            first_opened: None,
            unwinnable: false,
            state: Default::default(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn first_opened(&self) -> Option<usize> {
        self.first_opened
    }

    pub fn box_at(&self, index: usize) -> FruitBox {
        self.boxes[index]
    }

    pub const fn outcome(&self) -> Outcome {
        match self.state {
            EngineState::Won => Outcome::Won,
            EngineState::Lost => Outcome::Lost,
            EngineState::Initial | EngineState::AwaitingPredictions => Outcome::Playing,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            boxes: self.boxes,
            first_opened: self.first_opened,
            outcome: self.outcome(),
        }
    }

    /// Opens the very first box and draws one fruit from it.
    ///
    /// The draw is deterministic unless the box truly holds both kinds, in
    /// which case one fruit is picked from `rng`.
    pub fn open_first<R: Rng>(&mut self, index: usize, rng: &mut R) -> Result<Fruit> {
        let index = self.arrangement.validate_index(index)?;
        self.check_initial()?;

        let content = self.arrangement.content_of(index);
        let took = match content.single_fruit() {
            Some(fruit) => fruit,
            None => {
                if rng.random_bool(0.5) {
                    Fruit::Apple
                } else {
                    Fruit::Orange
                }
            }
        };

        let fruit_box = &mut self.boxes[index];
        fruit_box.is_open = true;
        fruit_box.content = Some(content);
        fruit_box.took = Some(took);

        // Only the mislabeled "mixed" sign pins its box down from a single
        // draw; starting anywhere else forfeits the round no matter what is
        // predicted afterwards.
        if fruit_box.label != BoxKind::Mixed {
            self.unwinnable = true;
            log::debug!(
                "first pick is the {:?} sign, round can no longer be won",
                fruit_box.label
            );
        }

        self.first_opened = Some(index);
        self.state = EngineState::AwaitingPredictions;
        Ok(took)
    }

    /// Records a guess for a still-closed box. Overwriting an earlier guess
    /// is allowed; consistency is only judged at the reveal.
    pub fn set_prediction(&mut self, index: usize, guess: BoxKind) -> Result<()> {
        let index = self.arrangement.validate_index(index)?;
        self.check_awaiting()?;

        if self.boxes[index].is_open {
            return Err(GameError::InvalidOperation);
        }

        self.boxes[index].prediction = Some(guess);
        Ok(())
    }

    /// Opens every remaining box and settles the round.
    pub fn reveal_remaining(&mut self) -> Result<Outcome> {
        self.check_awaiting()?;

        if self
            .boxes
            .iter()
            .any(|fruit_box| fruit_box.is_closed() && fruit_box.prediction.is_none())
        {
            return Err(GameError::MissingPrediction);
        }

        let arrangement = self.arrangement;
        for (index, fruit_box) in self.boxes.iter_mut().enumerate() {
            if fruit_box.is_closed() {
                fruit_box.is_open = true;
                fruit_box.content = Some(arrangement.content_of(index));
            }
        }

        // The first-opened box was seen directly, not predicted, so it is
        // excluded from the scoring.
        let first_opened = self.first_opened;
        let won = !self.unwinnable
            && self
                .boxes
                .iter()
                .enumerate()
                .filter(|&(index, _)| Some(index) != first_opened)
                .all(|(_, fruit_box)| fruit_box.prediction == fruit_box.content);

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        Ok(self.outcome())
    }

    fn check_initial(&self) -> Result<()> {
        if self.state.is_initial() {
            Ok(())
        } else {
            Err(GameError::InvalidOperation)
        }
    }

    fn check_awaiting(&self) -> Result<()> {
        if matches!(self.state, EngineState::AwaitingPredictions) {
            Ok(())
        } else {
            Err(GameError::InvalidOperation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoxKind::*;
    use rand::prelude::*;

    const MIXED_SIGN: usize = 1;

    fn engine(contents: [BoxKind; BOX_COUNT]) -> PuzzleEngine {
        PuzzleEngine::new(Arrangement::from_contents(contents).unwrap())
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn new_engine_starts_closed_and_playing() {
        let engine = engine([Mixed, Oranges, Apples]);

        assert_eq!(engine.state(), EngineState::Initial);
        assert_eq!(engine.outcome(), Outcome::Playing);
        assert_eq!(engine.first_opened(), None);
        for index in 0..BOX_COUNT {
            let fruit_box = engine.box_at(index);
            assert!(fruit_box.is_closed());
            assert_eq!(fruit_box.content, None);
            assert_eq!(fruit_box.prediction, None);
            assert_eq!(fruit_box.took, None);
        }
    }

    #[test]
    fn single_kind_content_draws_its_only_fruit() {
        // mixed sign hides oranges here
        let mut engine = engine([Mixed, Oranges, Apples]);

        let took = engine.open_first(MIXED_SIGN, &mut rng()).unwrap();

        assert_eq!(took, Fruit::Orange);
        let fruit_box = engine.box_at(MIXED_SIGN);
        assert!(fruit_box.is_open);
        assert_eq!(fruit_box.content, Some(Oranges));
        assert_eq!(fruit_box.took, Some(Fruit::Orange));
        assert_eq!(engine.state(), EngineState::AwaitingPredictions);
    }

    #[test]
    fn mixed_content_draws_from_the_injected_rng() {
        // box 0 truly holds both kinds; opening it is a losing move but the
        // draw itself still happens
        let mut engine = engine([Mixed, Oranges, Apples]);

        let took = engine.open_first(0, &mut rng()).unwrap();

        assert_eq!(engine.box_at(0).took, Some(took));
        assert_eq!(engine.box_at(0).content, Some(Mixed));
    }

    #[test]
    fn second_open_fails_and_leaves_state_unchanged() {
        let mut engine = engine([Mixed, Oranges, Apples]);
        engine.open_first(MIXED_SIGN, &mut rng()).unwrap();
        let before = engine.snapshot();

        for index in 0..BOX_COUNT {
            assert_eq!(
                engine.open_first(index, &mut rng()),
                Err(GameError::InvalidOperation)
            );
        }

        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn open_first_rejects_out_of_range_index() {
        let mut engine = engine([Mixed, Oranges, Apples]);

        assert_eq!(
            engine.open_first(BOX_COUNT, &mut rng()),
            Err(GameError::InvalidBox)
        );
        assert_eq!(engine.state(), EngineState::Initial);
    }

    #[test]
    fn predictions_are_visible_and_overwritable() {
        let mut engine = engine([Mixed, Oranges, Apples]);
        engine.open_first(MIXED_SIGN, &mut rng()).unwrap();

        engine.set_prediction(0, Apples).unwrap();
        assert_eq!(engine.snapshot().boxes[0].prediction, Some(Apples));

        engine.set_prediction(0, Mixed).unwrap();
        assert_eq!(engine.snapshot().boxes[0].prediction, Some(Mixed));
    }

    #[test]
    fn predicting_before_the_first_open_fails() {
        let mut engine = engine([Mixed, Oranges, Apples]);

        assert_eq!(
            engine.set_prediction(0, Apples),
            Err(GameError::InvalidOperation)
        );
    }

    #[test]
    fn predicting_the_first_opened_box_fails() {
        let mut engine = engine([Mixed, Oranges, Apples]);
        engine.open_first(MIXED_SIGN, &mut rng()).unwrap();

        assert_eq!(
            engine.set_prediction(MIXED_SIGN, Apples),
            Err(GameError::InvalidOperation)
        );
    }

    #[test]
    fn reveal_in_initial_state_fails() {
        let mut engine = engine([Mixed, Oranges, Apples]);

        assert_eq!(engine.reveal_remaining(), Err(GameError::InvalidOperation));
    }

    #[test]
    fn reveal_requires_every_closed_box_predicted() {
        let mut engine = engine([Mixed, Oranges, Apples]);
        engine.open_first(MIXED_SIGN, &mut rng()).unwrap();

        assert_eq!(engine.reveal_remaining(), Err(GameError::MissingPrediction));

        engine.set_prediction(0, Mixed).unwrap();
        assert_eq!(engine.reveal_remaining(), Err(GameError::MissingPrediction));
        // the failed reveals must not have opened anything
        assert!(engine.box_at(0).is_closed());
        assert!(engine.box_at(2).is_closed());

        engine.set_prediction(2, Apples).unwrap();
        assert!(engine.reveal_remaining().is_ok());
    }

    #[test]
    fn correct_predictions_win() {
        // labels [Apples, Mixed, Oranges] against contents [Mixed, Oranges, Apples]
        let mut engine = engine([Mixed, Oranges, Apples]);
        engine.open_first(MIXED_SIGN, &mut rng()).unwrap();

        engine.set_prediction(0, Mixed).unwrap();
        engine.set_prediction(2, Apples).unwrap();

        assert_eq!(engine.reveal_remaining(), Ok(Outcome::Won));
        assert_eq!(engine.outcome(), Outcome::Won);
        assert!(engine.is_finished());

        // the fully resolved assignment is still a derangement
        for index in 0..BOX_COUNT {
            let fruit_box = engine.box_at(index);
            assert!(fruit_box.is_open);
            assert_ne!(fruit_box.content, Some(fruit_box.label));
        }
    }

    #[test]
    fn one_wrong_prediction_loses() {
        let mut engine = engine([Mixed, Oranges, Apples]);
        engine.open_first(MIXED_SIGN, &mut rng()).unwrap();

        engine.set_prediction(0, Mixed).unwrap();
        engine.set_prediction(2, Oranges).unwrap();

        assert_eq!(engine.reveal_remaining(), Ok(Outcome::Lost));
        assert_eq!(engine.outcome(), Outcome::Lost);
    }

    #[test]
    fn opening_a_single_kind_sign_first_always_loses() {
        let mut engine = engine([Mixed, Oranges, Apples]);
        engine.open_first(0, &mut rng()).unwrap();

        // even perfectly correct predictions cannot save the round
        engine.set_prediction(1, Oranges).unwrap();
        engine.set_prediction(2, Apples).unwrap();

        assert_eq!(engine.reveal_remaining(), Ok(Outcome::Lost));
    }

    #[test]
    fn operations_after_the_reveal_fail() {
        let mut engine = engine([Mixed, Oranges, Apples]);
        engine.open_first(MIXED_SIGN, &mut rng()).unwrap();
        engine.set_prediction(0, Mixed).unwrap();
        engine.set_prediction(2, Apples).unwrap();
        engine.reveal_remaining().unwrap();

        assert_eq!(
            engine.set_prediction(0, Apples),
            Err(GameError::InvalidOperation)
        );
        assert_eq!(engine.reveal_remaining(), Err(GameError::InvalidOperation));
    }

    #[test]
    fn snapshot_is_a_copy() {
        let engine = engine([Mixed, Oranges, Apples]);
        let mut snapshot = engine.snapshot();

        snapshot.boxes[0].is_open = true;
        snapshot.boxes[0].prediction = Some(Apples);

        assert!(engine.box_at(0).is_closed());
        assert_eq!(engine.box_at(0).prediction, None);
    }

    fn assert_round_trip(engine: &PuzzleEngine) {
        let encoded = serde_json::to_string(engine).unwrap();
        let restored: PuzzleEngine = serde_json::from_str(&encoded).unwrap();

        assert_eq!(&restored, engine);
        assert_eq!(restored.snapshot(), engine.snapshot());
        assert_eq!(restored.outcome(), engine.outcome());
    }

    #[test]
    fn serde_round_trip_in_every_phase() {
        let mut engine = engine([Oranges, Apples, Mixed]);
        assert_round_trip(&engine);

        engine.open_first(MIXED_SIGN, &mut rng()).unwrap();
        engine.set_prediction(0, Oranges).unwrap();
        assert_round_trip(&engine);

        engine.set_prediction(2, Mixed).unwrap();
        engine.reveal_remaining().unwrap();
        assert_round_trip(&engine);
    }

    #[test]
    fn restored_unwinnable_round_still_loses() {
        let mut engine = engine([Mixed, Oranges, Apples]);
        engine.open_first(2, &mut rng()).unwrap();

        let encoded = serde_json::to_string(&engine).unwrap();
        let mut restored: PuzzleEngine = serde_json::from_str(&encoded).unwrap();

        restored.set_prediction(0, Mixed).unwrap();
        restored.set_prediction(1, Oranges).unwrap();
        assert_eq!(restored.reveal_remaining(), Ok(Outcome::Lost));
    }
}
