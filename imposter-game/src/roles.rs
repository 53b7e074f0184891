//! Players and secret role assignment
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::constants::PLAYER_ID_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Civilian,
    Imposter,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Civilian => write!(f, "civilian"),
            Role::Imposter => write!(f, "imposter"),
        }
    }
}

/// Seat-stable player identifier, e.g. `p-0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    #[must_use]
    pub fn for_seat(seat: usize) -> Self {
        Self(format!("{PLAYER_ID_PREFIX}{seat}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A seated player with their secret role for this round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
}

impl Player {
    #[must_use]
    pub fn is_imposter(&self) -> bool {
        self.role == Role::Imposter
    }
}

/// Seat everyone in the given order and hand `imposter_count` of them the
/// imposter role, chosen uniformly without replacement.
///
/// Callers validate the table first; a count above the table size is capped.
pub fn assign_roles<S, R>(names: &[S], imposter_count: usize, rng: &mut R) -> Vec<Player>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let amount = imposter_count.min(names.len());
    let imposter_seats = index::sample(rng, names.len(), amount).into_vec();

    names
        .iter()
        .enumerate()
        .map(|(seat, name)| Player {
            id: PlayerId::for_seat(seat),
            name: name.as_ref().trim().to_string(),
            role: if imposter_seats.contains(&seat) {
                Role::Imposter
            } else {
                Role::Civilian
            },
        })
        .collect()
}

/// Seat index of whoever opens the round. The table must not be empty.
pub fn pick_first_speaker<R: Rng + ?Sized>(player_count: usize, rng: &mut R) -> usize {
    debug_assert!(player_count > 0, "cannot pick a speaker at an empty table");
    rng.gen_range(0..player_count)
}

#[must_use]
pub fn find_player<'a>(players: &'a [Player], id: &PlayerId) -> Option<&'a Player> {
    players.iter().find(|player| &player.id == id)
}

pub fn imposters(players: &[Player]) -> impl Iterator<Item = &Player> {
    players.iter().filter(|player| player.is_imposter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::collections::HashSet;

    fn table(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Player {}", i + 1)).collect()
    }

    #[test]
    fn assigns_exact_imposter_count_for_every_table_size() {
        let mut rng = SmallRng::seed_from_u64(11);
        for players in 3..=10 {
            for count in 1..players {
                let seated = assign_roles(&table(players), count, &mut rng);
                assert_eq!(seated.len(), players);
                assert_eq!(imposters(&seated).count(), count);
                assert_eq!(
                    seated.iter().filter(|p| p.role == Role::Civilian).count(),
                    players - count
                );
            }
        }
    }

    #[test]
    fn ids_follow_seating_order_and_names_are_trimmed() {
        let mut rng = SmallRng::seed_from_u64(3);
        let seated = assign_roles(&["  Ada ", "Bo", "Cy"], 1, &mut rng);
        let ids: Vec<&str> = seated.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p-0", "p-1", "p-2"]);
        assert_eq!(seated[0].name, "Ada");
    }

    #[test]
    fn repeated_assignments_vary_the_imposter_set() {
        let mut rng = SmallRng::seed_from_u64(99);
        let names = table(6);
        let patterns: HashSet<Vec<usize>> = (0..50)
            .map(|_| {
                assign_roles(&names, 2, &mut rng)
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.is_imposter())
                    .map(|(seat, _)| seat)
                    .collect()
            })
            .collect();
        assert!(patterns.len() > 5, "expected varied subsets, got {patterns:?}");
    }

    #[test]
    fn every_seat_can_become_imposter() {
        let mut rng = SmallRng::seed_from_u64(5);
        let names = table(5);
        let mut hit = [false; 5];
        for _ in 0..200 {
            for (seat, player) in assign_roles(&names, 1, &mut rng).iter().enumerate() {
                if player.is_imposter() {
                    hit[seat] = true;
                }
            }
        }
        assert!(hit.iter().all(|seen| *seen));
    }

    #[test]
    fn oversized_count_is_capped() {
        let mut rng = SmallRng::seed_from_u64(1);
        let seated = assign_roles(&table(3), 9, &mut rng);
        assert_eq!(imposters(&seated).count(), 3);
    }

    #[test]
    fn first_speaker_stays_in_range() {
        let mut rng = SmallRng::seed_from_u64(8);
        for _ in 0..100 {
            assert!(pick_first_speaker(4, &mut rng) < 4);
        }
    }

    #[test]
    #[should_panic]
    fn first_speaker_needs_a_seated_player() {
        let mut rng = SmallRng::seed_from_u64(8);
        pick_first_speaker(0, &mut rng);
    }

    #[test]
    fn find_player_by_id() {
        let mut rng = SmallRng::seed_from_u64(2);
        let seated = assign_roles(&table(3), 1, &mut rng);
        let found = find_player(&seated, &PlayerId::from("p-2")).unwrap();
        assert_eq!(found.name, "Player 3");
        assert!(find_player(&seated, &PlayerId::from("p-9")).is_none());
    }
}
