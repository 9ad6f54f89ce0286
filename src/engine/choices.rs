use std::collections::HashSet;

use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::catalog::RoundRecord;
use crate::engine::answer::normalize;

pub const MAX_INCORRECT: usize = 3;

/// Build the presentable options for the round at `current` (modulo the
/// catalog length): one of its answers plus up to three answers taken from
/// other rounds, in random order. Fewer than four options come back when
/// the other rounds cannot supply three distinct wrong answers.
pub fn generate_choices(rounds: &[RoundRecord], current: usize, rng: &mut SmallRng) -> Vec<String> {
    if rounds.is_empty() {
        return Vec::new();
    }
    let current = current % rounds.len();
    let accepted = &rounds[current].answers;

    let mut choices: Vec<String> = Vec::with_capacity(MAX_INCORRECT + 1);
    if let Some(correct) = accepted.choose(rng) {
        choices.push(correct.clone());
    }

    let mut pool = incorrect_pool(rounds, current);
    for _ in 0..MAX_INCORRECT {
        if pool.is_empty() {
            break;
        }
        let idx = rng.gen_range(0..pool.len());
        choices.push(pool.swap_remove(idx));
    }

    choices.shuffle(rng);
    choices
}

/// Distinct answers of every other round that the current round would not accept.
fn incorrect_pool(rounds: &[RoundRecord], current: usize) -> Vec<String> {
    let mut seen: HashSet<String> = rounds[current].answers.iter().map(|a| normalize(a)).collect();
    let mut pool = Vec::new();
    for (i, round) in rounds.iter().enumerate() {
        if i == current {
            continue;
        }
        for answer in &round.answers {
            if seen.insert(normalize(answer)) {
                pool.push(answer.clone());
            }
        }
    }
    pool
}
