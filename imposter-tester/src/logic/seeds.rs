use anyhow::{Result, bail};

/// Seed used when the command line names none.
pub const DEFAULT_SEED: u64 = 1337;

fn parse_hex(token: &str) -> Option<u64> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))?;
    u64::from_str_radix(&digits.replace('_', ""), 16).ok()
}

/// Resolve a list of CLI seed arguments into concrete seeds.
///
/// Supports decimal integers (negative values use their magnitude),
/// `0x`-prefixed hex, and the keyword `random` for a fresh OS-random seed.
/// Duplicates are dropped while keeping first-seen order.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        let seed = if token.eq_ignore_ascii_case("random") {
            rand::random()
        } else if let Some(value) = parse_hex(token) {
            value
        } else if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else if let Ok(value) = token.parse::<u64>() {
            value
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }

    Ok(seeds)
}
