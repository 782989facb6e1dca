//! Trial Outcome Evaluator

use super::SuccessFaces;

/// Count the dice that landed on a success face.
///
/// Pure and total. Values outside `[1, 6]` simply never match.
///
/// ```rust
/// use dice_lab::experiment::{count_successes, SuccessFaces};
///
/// let faces = SuccessFaces::new([6]).unwrap();
/// assert_eq!(count_successes(&[6, 3], &faces), 1);
/// assert_eq!(count_successes(&[6, 6], &faces), 2);
/// ```
#[must_use]
pub fn count_successes(dice_values: &[u8], success_faces: &SuccessFaces) -> u8 {
    let hits = dice_values
        .iter()
        .filter(|&&value| success_faces.contains(value))
        .count();
    u8::try_from(hits).unwrap_or(u8::MAX)
}
