//! Pass-the-device role reveal
use serde::{Deserialize, Serialize};

use crate::roles::{Player, Role};
use crate::selector::SecretData;

/// What a single player sees when the device is handed to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleCard {
    Civilian { word: String, category: String },
    Imposter { hint: Option<String> },
}

impl RoleCard {
    /// Build the card for `role`. Imposters only get the hint when the table
    /// enabled hints and the secret actually carries one.
    #[must_use]
    pub fn for_role(role: Role, secret: &SecretData, use_hint: bool) -> Self {
        match role {
            Role::Civilian => Self::Civilian {
                word: secret.word.clone(),
                category: secret.category.clone(),
            },
            Role::Imposter => Self::Imposter {
                hint: secret.imposter_hint.clone().filter(|_| use_hint),
            },
        }
    }
}

/// Walks the table in seating order, one private reveal at a time.
#[derive(Debug, Clone)]
pub struct RevealSequence {
    cursor: usize,
    total: usize,
}

impl RevealSequence {
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self { cursor: 0, total }
    }

    /// Seat whose card is currently due, or `None` once everyone has looked.
    #[must_use]
    pub const fn current_seat(&self) -> Option<usize> {
        if self.cursor < self.total {
            Some(self.cursor)
        } else {
            None
        }
    }

    /// Card for the player currently holding the device.
    #[must_use]
    pub fn current_card(
        &self,
        players: &[Player],
        secret: &SecretData,
        use_hint: bool,
    ) -> Option<(usize, RoleCard)> {
        let seat = self.current_seat()?;
        let player = players.get(seat)?;
        Some((seat, RoleCard::for_role(player.role, secret, use_hint)))
    }

    /// Hide the card and hand the device on. Returns true once the last
    /// player has seen theirs.
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.total {
            self.cursor += 1;
        }
        self.is_complete()
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.cursor >= self.total
    }

    /// Human-friendly progress, 1-based, e.g. `(2, 4)` for "player 2 of 4".
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        ((self.cursor + 1).min(self.total), self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::PlayerId;

    fn secret() -> SecretData {
        SecretData {
            word: "Moon".to_string(),
            category: "Space".to_string(),
            imposter_hint: Some("Sun".to_string()),
        }
    }

    fn players() -> Vec<Player> {
        [Role::Civilian, Role::Imposter, Role::Civilian]
            .into_iter()
            .enumerate()
            .map(|(seat, role)| Player {
                id: PlayerId::for_seat(seat),
                name: format!("P{seat}"),
                role,
            })
            .collect()
    }

    #[test]
    fn civilians_see_word_and_category() {
        let card = RoleCard::for_role(Role::Civilian, &secret(), true);
        assert_eq!(
            card,
            RoleCard::Civilian {
                word: "Moon".to_string(),
                category: "Space".to_string()
            }
        );
    }

    #[test]
    fn imposter_hint_respects_setting() {
        assert_eq!(
            RoleCard::for_role(Role::Imposter, &secret(), true),
            RoleCard::Imposter {
                hint: Some("Sun".to_string())
            }
        );
        assert_eq!(
            RoleCard::for_role(Role::Imposter, &secret(), false),
            RoleCard::Imposter { hint: None }
        );
    }

    #[test]
    fn sequence_visits_each_seat_once() {
        let table = players();
        let mut seq = RevealSequence::new(table.len());
        let mut seen = Vec::new();
        while let Some((seat, card)) = seq.current_card(&table, &secret(), true) {
            seen.push((seat, matches!(card, RoleCard::Imposter { .. })));
            seq.advance();
        }
        assert_eq!(seen, vec![(0, false), (1, true), (2, false)]);
        assert!(seq.is_complete());
        assert!(seq.advance(), "advancing past the end stays complete");
        assert_eq!(seq.progress(), (3, 3));
    }
}
