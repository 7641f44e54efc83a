//! Pairwise voter-model exchange.
//!
//! In one round every agent copies the opinion of one other agent chosen
//! uniformly at random.  All copies read the opinions from before the round,
//! so the outcome does not depend on the order agents are visited.

use sw_core::SimRng;

/// Draw one partner per agent, never the agent itself.  `None` only when
/// there is nobody else (`n < 2`).
pub fn voter_partners(n: usize, rng: &mut SimRng) -> Vec<Option<usize>> {
    (0..n).map(|i| rng.pick_other(n, i)).collect()
}

/// Apply one round with the given partners.
pub fn voter_exchange(opinions: &[f64], partners: &[Option<usize>]) -> Vec<f64> {
    opinions
        .iter()
        .zip(partners)
        .map(|(&own, partner)| match partner {
            Some(j) => opinions.get(*j).copied().unwrap_or(own),
            None => own,
        })
        .collect()
}

/// `true` if every opinion is identical.  An empty population is unanimous.
pub fn is_unanimous(opinions: &[f64]) -> bool {
    match opinions.split_first() {
        Some((first, rest)) => rest.iter().all(|o| o == first),
        None => true,
    }
}
