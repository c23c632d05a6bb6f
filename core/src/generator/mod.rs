use crate::*;
pub use random::*;

mod random;

pub trait ArrangementGenerator {
    fn generate(self) -> Arrangement;
}
