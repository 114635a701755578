//! Per-word spelling state: the missing letters, the shuffled option pool and
//! the player's picks so far.

use rand::Rng;
use rand::seq::SliceRandom;

use super::words::Word;

/// Marker used in a word's `incomplete` form for a letter the player supplies.
pub const PLACEHOLDER: char = '_';

#[derive(Clone, Debug)]
pub struct SpellingRound {
    missing: Vec<char>,
    pool: Vec<char>,
    selected: Vec<char>,
}

impl SpellingRound {
    /// Build a round for `word`: collect the character behind each placeholder
    /// left to right, then present a uniformly shuffled copy as the pool.
    pub fn start(word: &Word, rng: &mut impl Rng) -> Self {
        let missing: Vec<char> = word
            .incomplete
            .chars()
            .zip(word.word.chars())
            .filter(|(slot, _)| *slot == PLACEHOLDER)
            .map(|(_, letter)| letter)
            .collect();
        let mut pool = missing.clone();
        pool.shuffle(rng);
        Self {
            missing,
            pool,
            selected: Vec::new(),
        }
    }

    pub fn missing_letters(&self) -> &[char] {
        &self.missing
    }

    pub fn option_pool(&self) -> &[char] {
        &self.pool
    }

    pub fn selected_letters(&self) -> &[char] {
        &self.selected
    }

    /// Move the letter at `pool_index` into the selected sequence. The index
    /// and letter must agree with the pool; a mismatch is a bookkeeping bug in
    /// the caller, not a recoverable condition.
    pub fn select(&mut self, letter: char, pool_index: usize) {
        assert!(
            self.pool.get(pool_index) == Some(&letter),
            "selected letter does not match option pool"
        );
        self.pool.remove(pool_index);
        self.selected.push(letter);
    }

    pub fn is_complete(&self) -> bool {
        self.selected.len() == self.missing.len()
    }

    /// The incomplete form with placeholders filled left to right by the
    /// letters selected so far; unfilled placeholders stay visible.
    pub fn current_display(&self, word: &Word) -> String {
        let mut picked = self.selected.iter();
        word.incomplete
            .chars()
            .map(|slot| {
                if slot == PLACEHOLDER {
                    picked.next().copied().unwrap_or(PLACEHOLDER)
                } else {
                    slot
                }
            })
            .collect()
    }

    /// Case-insensitive comparison of the fully substituted word against the
    /// target. Only meaningful once `is_complete` holds.
    pub fn is_correct(&self, word: &Word) -> bool {
        self.current_display(word).to_lowercase() == word.word.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn sample_word() -> Word {
        Word::new("banana", "香蕉", "b_n_na")
    }

    fn sorted(letters: &[char]) -> Vec<char> {
        let mut copy = letters.to_vec();
        copy.sort_unstable();
        copy
    }

    #[test]
    fn start_extracts_placeholder_letters_in_order() {
        let mut rng = SmallRng::seed_from_u64(7);
        let round = SpellingRound::start(&sample_word(), &mut rng);
        assert_eq!(round.missing_letters(), &['a', 'a']);
    }

    #[test]
    fn pool_is_a_permutation_of_the_missing_letters() {
        let word = Word::new("mountain", "山", "mo_nt_in");
        for seed in 0..16 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let round = SpellingRound::start(&word, &mut rng);
            assert_eq!(sorted(round.option_pool()), sorted(round.missing_letters()));
        }
    }

    #[test]
    fn display_is_idempotent_between_selections() {
        let mut rng = SmallRng::seed_from_u64(3);
        let word = sample_word();
        let mut round = SpellingRound::start(&word, &mut rng);
        assert_eq!(round.current_display(&word), "b_n_na");
        let letter = round.option_pool()[0];
        round.select(letter, 0);
        let once = round.current_display(&word);
        assert_eq!(once, round.current_display(&word));
        assert_eq!(once, "ban_na");
    }

    #[test]
    fn selecting_in_placeholder_order_reconstructs_the_word() {
        let word = Word::new("umbrella", "雨伞", "_mbr_ll_");
        let mut rng = SmallRng::seed_from_u64(11);
        let mut round = SpellingRound::start(&word, &mut rng);
        for letter in round.missing_letters().to_vec() {
            let index = round
                .option_pool()
                .iter()
                .position(|&option| option == letter)
                .unwrap();
            round.select(letter, index);
        }
        assert!(round.is_complete());
        assert!(round.is_correct(&word));
    }

    #[test]
    fn correctness_is_case_insensitive() {
        let word = Word::new("Kite", "风筝", "K_te");
        let mut rng = SmallRng::seed_from_u64(1);
        let mut round = SpellingRound::start(&word, &mut rng);
        round.select('i', 0);
        assert!(round.is_correct(&word));
    }

    #[test]
    fn no_placeholders_means_an_immediately_complete_round() {
        let word = Word::new("sun", "太阳", "sun");
        let mut rng = SmallRng::seed_from_u64(5);
        let round = SpellingRound::start(&word, &mut rng);
        assert!(round.is_complete());
        assert!(round.is_correct(&word));
    }

    #[test]
    #[should_panic(expected = "does not match option pool")]
    fn mismatched_selection_is_fatal() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut round = SpellingRound::start(&sample_word(), &mut rng);
        round.select('z', 0);
    }
}
