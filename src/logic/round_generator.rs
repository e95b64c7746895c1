//! Round generation: fewest-played-first selection, same-level pairing, and court assignment.

use crate::models::{GameMatch, League, LeagueError, Player, PlayerId, Round};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};

/// Players needed to fill one court.
pub const PLAYERS_PER_MATCH: usize = 4;

/// Knobs for a single generation call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GeneratorOptions {
    /// Fixes the resolution order of fairness ties. Without it, players with
    /// equal match counts at the same level are ordered at random.
    pub seed: Option<u64>,
}

impl GeneratorOptions {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Two teammates chosen for this round.
#[derive(Clone, Copy, Debug)]
struct Pair<'a> {
    players: [&'a Player; 2],
    /// Members come from different level buckets.
    borrowed: bool,
}

impl<'a> Pair<'a> {
    fn new(first: &'a Player, second: &'a Player) -> Self {
        Self {
            players: [first, second],
            borrowed: first.level != second.level,
        }
    }

    fn ids(&self) -> [PlayerId; 2] {
        [self.players[0].id, self.players[1].id]
    }

    /// Levels, strongest first.
    fn levels(&self) -> (u32, u32) {
        let (a, b) = (self.players[0].level, self.players[1].level);
        (a.max(b), a.min(b))
    }
}

type Buckets<'a> = BTreeMap<u32, Vec<&'a Player>>;

/// Pure planning step: pick `courts` matches from the active players without
/// touching any player state.
///
/// Fails with `InsufficientPlayers` when fewer than `courts * 4` players are active.
pub fn plan_matches<R: Rng>(
    players: &[Player],
    courts: usize,
    rng: &mut R,
) -> Result<Vec<GameMatch>, LeagueError> {
    if courts == 0 {
        return Err(LeagueError::NoCourts);
    }
    let mut active: Vec<&Player> = players.iter().filter(|p| p.active).collect();
    let required = courts * PLAYERS_PER_MATCH;
    if active.len() < required {
        return Err(LeagueError::InsufficientPlayers {
            required,
            available: active.len(),
        });
    }

    // Shuffle first so the stable sort leaves equal match counts in random order.
    active.shuffle(rng);
    active.sort_by_key(|p| p.match_count);

    let mut buckets: Buckets = BTreeMap::new();
    for p in select_players(&active, required) {
        buckets.entry(p.level).or_default().push(p);
    }
    debug!(
        "Level buckets: {:?}",
        buckets.iter().map(|(level, b)| (*level, b.len())).collect::<Vec<_>>()
    );

    let mut pairs: Vec<Pair> = Vec::with_capacity(courts * 2);
    let mut leftovers: Vec<&Player> = Vec::new();
    for bucket in buckets.values() {
        let (bucket_pairs, leftover) = walk_bucket(bucket);
        pairs.extend(bucket_pairs);
        leftovers.extend(leftover);
    }
    // The selection is even, so odd buckets come in twos. Neighbouring levels partner up.
    leftovers.sort_by(|a, b| b.level.cmp(&a.level));
    pairs.extend(leftovers.chunks_exact(2).map(|two| Pair::new(two[0], two[1])));

    let borrowed = pairs.iter().filter(|p| p.borrowed).count();
    if borrowed > 0 {
        debug!("{} of {} pairs mix levels", borrowed, pairs.len());
    }

    Ok(assign_courts(pairs))
}

/// Choose who plays from `sorted` (ascending match count). Everyone below the
/// cutoff count plays, so no one sits out while a more-played player takes a
/// court. Open places among the players tied at the cutoff go first to odd
/// levels that can be completed, then to the level with the most tied players
/// left.
fn select_players<'a>(sorted: &[&'a Player], required: usize) -> Vec<&'a Player> {
    let cutoff = sorted[required - 1].match_count;
    let below = sorted.iter().take_while(|p| p.match_count < cutoff).count();
    let mut selected: Vec<&Player> = sorted[..below].to_vec();

    let mut tied: Buckets = BTreeMap::new();
    for p in sorted[below..].iter().copied().take_while(|p| p.match_count == cutoff) {
        tied.entry(p.level).or_default().push(p);
    }

    let mut per_level: BTreeMap<u32, usize> = BTreeMap::new();
    for p in &selected {
        *per_level.entry(p.level).or_default() += 1;
    }
    for (level, count) in per_level.iter().rev() {
        if selected.len() == required {
            break;
        }
        if count % 2 == 1 {
            if let Some(bucket) = tied.get_mut(level).filter(|b| !b.is_empty()) {
                selected.push(bucket.remove(0));
            }
        }
    }

    while selected.len() < required {
        let open = required - selected.len();
        // Ties go to the higher level.
        let Some(bucket) = tied.values_mut().filter(|b| !b.is_empty()).max_by_key(|b| b.len()) else {
            break;
        };
        let mut take = open.min(bucket.len());
        if take % 2 == 1 && take > 1 && take < open {
            take -= 1;
        }
        selected.extend(bucket.drain(..take));
    }
    selected
}

/// Walk a bucket two at a time in fairness order. An odd bucket leaves one
/// player over for a partner from another level.
fn walk_bucket<'a>(bucket: &[&'a Player]) -> (Vec<Pair<'a>>, Option<&'a Player>) {
    let mut pending: Vec<&Player> = bucket.to_vec();
    let mut pairs = Vec::with_capacity(pending.len() / 2);
    while pending.len() >= 2 {
        let head = pending.remove(0);
        let partner = pending.remove(pick_partner(head, &pending));
        pairs.push(Pair::new(head, partner));
    }
    (pairs, pending.pop())
}

/// Index of the partner for `head` among `pending` (sorted by match count).
/// Only players tied with the least-played one are considered; among those
/// the one `head` has partnered least often wins.
fn pick_partner(head: &Player, pending: &[&Player]) -> usize {
    let floor = pending[0].match_count;
    pending
        .iter()
        .enumerate()
        .take_while(|(_, p)| p.match_count == floor)
        .min_by_key(|(i, p)| (head.times_partnered_with(p.id), *i))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Same-level pairs first, strongest first, so consecutive pairs meet teams
/// of the same composition; mixed pairs are matched against each other last.
fn assign_courts(mut pairs: Vec<Pair>) -> Vec<GameMatch> {
    pairs.sort_by(|x, y| {
        x.borrowed
            .cmp(&y.borrowed)
            .then_with(|| y.levels().cmp(&x.levels()))
    });
    pairs
        .chunks_exact(2)
        .map(|two| GameMatch::new(two[0].ids(), two[1].ids()))
        .collect()
}

/// Count the round against every participant: one more match each, and one
/// more partnership in both directions for every team.
pub fn apply_round(players: &mut [Player], round: &Round) {
    update_history(players, round, true);
}

/// Inverse of [`apply_round`], used before discarding a round.
pub fn revert_round(players: &mut [Player], round: &Round) {
    update_history(players, round, false);
}

fn update_history(players: &mut [Player], round: &Round, add: bool) {
    let index: HashMap<PlayerId, usize> = players.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
    for m in &round.matches {
        for [first, second] in [m.team_a, m.team_b] {
            for (me, mate) in [(first, second), (second, first)] {
                let Some(&i) = index.get(&me) else {
                    continue;
                };
                let p = &mut players[i];
                if add {
                    p.match_count += 1;
                    p.record_partner(mate);
                } else {
                    p.match_count = p.match_count.saturating_sub(1);
                    p.forget_partner(mate);
                }
            }
        }
    }
}

/// Plan a round for the league's active players, append it, and update player history.
///
/// On error nothing is changed.
pub fn generate_round(league: &mut League, options: GeneratorOptions) -> Result<&Round, LeagueError> {
    let mut rng = options.rng();
    let matches = match plan_matches(&league.players, league.courts as usize, &mut rng) {
        Ok(m) => m,
        Err(e) => {
            warn!("Round generation refused for league {}: {}", league.id, e);
            return Err(e);
        }
    };
    let round = Round::new(league.rounds.len() as u32 + 1, matches);
    apply_round(&mut league.players, &round);
    info!(
        "Generated round {} with {} match(es) for league {}",
        round.number,
        round.matches.len(),
        league.id
    );
    let index = league.rounds.len();
    league.rounds.push(round);
    Ok(&league.rounds[index])
}

/// Discard the most recent round's contribution and generate a new one in its place.
///
/// Refused once any match in that round has a score. If the new generation
/// fails, the discarded round is restored.
pub fn regenerate_last_round(league: &mut League, options: GeneratorOptions) -> Result<&Round, LeagueError> {
    let last = league.rounds.last().ok_or(LeagueError::NoRounds)?;
    if last.has_scores() {
        return Err(LeagueError::RoundAlreadyScored(last.id));
    }
    let Some(previous) = league.rounds.pop() else {
        return Err(LeagueError::NoRounds);
    };
    revert_round(&mut league.players, &previous);
    debug!("Discarded round {} of league {}", previous.number, league.id);

    let mut rng = options.rng();
    let matches = match plan_matches(&league.players, league.courts as usize, &mut rng) {
        Ok(m) => m,
        Err(e) => {
            apply_round(&mut league.players, &previous);
            league.rounds.push(previous);
            warn!("Regeneration refused for league {}: {}", league.id, e);
            return Err(e);
        }
    };
    let round = Round::new(previous.number, matches);
    apply_round(&mut league.players, &round);
    info!("Regenerated round {} for league {}", round.number, league.id);
    let index = league.rounds.len();
    league.rounds.push(round);
    Ok(&league.rounds[index])
}
