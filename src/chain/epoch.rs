//! Tempo/epoch arithmetic.
//!
//! Pure functions, deliberately free of any chain access so the
//! apply-weights job and the commit-reveal scheduler can both reason about
//! epoch boundaries without an RPC round trip.

use crate::domain::{BlockNumber, Epoch, NetUid};

/// DRAND quicknet public key (hex-encoded, BLS12-381 G1).
pub const DRAND_QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";
/// Genesis time (unix seconds) of the DRAND quicknet beacon.
pub const DRAND_QUICKNET_GENESIS: u64 = 1688385600;
/// Seconds between successive DRAND quicknet rounds.
pub const DRAND_ROUND_INTERVAL_SECS: u64 = 3;

/// The DRAND quicknet beacon's public parameters, needed to map a wall-clock
/// time to the beacon round that will be revealed at or after it.
pub struct DrandInfo {
    pub public_key: Vec<u8>,
    pub genesis_time: u64,
    pub period: u64,
}

impl DrandInfo {
    pub fn quicknet() -> Self {
        Self {
            public_key: hex::decode(DRAND_QUICKNET_PK_HEX).unwrap_or_default(),
            genesis_time: DRAND_QUICKNET_GENESIS,
            period: DRAND_ROUND_INTERVAL_SECS,
        }
    }

    /// The beacon round active at `timestamp` (unix seconds).
    pub fn round_at_time(&self, timestamp: u64) -> u64 {
        if timestamp < self.genesis_time {
            return 1;
        }
        ((timestamp - self.genesis_time) / self.period) + 1
    }

    /// The unix timestamp at which `round` becomes available.
    pub fn time_for_round(&self, round: u64) -> u64 {
        if round <= 1 {
            return self.genesis_time;
        }
        self.genesis_time + (round - 1) * self.period
    }
}

/// Compute the DRAND round a CRv4 weight commit should target for reveal.
///
/// Mirrors the epoch math `subtensor` itself uses
/// (`epoch = (current_block + netuid + 1) / (tempo + 1)`), then converts the
/// number of blocks remaining until the reveal epoch into wall-clock time via
/// `block_time` to land on a DRAND round.
pub fn calculate_reveal_round(
    tempo: u16,
    current_block: u64,
    netuid: u16,
    subnet_reveal_period_epochs: u64,
    block_time: f64,
) -> u64 {
    let tempo = tempo as u64;
    let netuid = netuid as u64;
    let drand_info = DrandInfo::quicknet();

    let tempo_plus_one = tempo.saturating_add(1);
    let netuid_plus_one = netuid.saturating_add(1);
    let current_epoch = current_block.saturating_add(netuid_plus_one) / tempo_plus_one;

    let reveal_epoch = current_epoch.saturating_add(subnet_reveal_period_epochs);

    let first_reveal_block = reveal_epoch
        .saturating_mul(tempo_plus_one)
        .saturating_sub(netuid_plus_one);

    let blocks_until_reveal = first_reveal_block.saturating_sub(current_block);
    let secs_until_reveal = (blocks_until_reveal as f64 * block_time) as u64;

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let reveal_time = now.saturating_add(secs_until_reveal);

    // Add one round of buffer for safety.
    let reveal_round = drand_info.round_at_time(reveal_time.saturating_add(drand_info.period));

    tracing::debug!(
        tempo,
        current_block,
        netuid,
        subnet_reveal_period_epochs,
        current_epoch,
        reveal_epoch,
        reveal_round,
        "calculated drand reveal round"
    );

    reveal_round
}

/// Compute the DRAND round for a commit targeting a specific, already-known
/// future epoch number, without reference to the current block.
pub fn calculate_reveal_round_for_epoch(
    reveal_epoch: u64,
    tempo: u16,
    netuid: u16,
    block_time: f64,
) -> u64 {
    let tempo = tempo as u64;
    let netuid = netuid as u64;
    let drand_info = DrandInfo::quicknet();

    let tempo_plus_one = tempo.saturating_add(1);
    let netuid_plus_one = netuid.saturating_add(1);

    let first_reveal_block = reveal_epoch
        .saturating_mul(tempo_plus_one)
        .saturating_sub(netuid_plus_one);

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    // Rough estimate: assume current block is now.
    let reveal_time = now + (first_reveal_block as f64 * block_time / 12.0) as u64;

    drand_info.round_at_time(reveal_time.saturating_add(drand_info.period))
}

/// Compute the epoch straddling `block` for a subnet with the given `tempo`.
///
/// ```text
/// interval   = tempo + 1
/// next_epoch = block + tempo - ((block + netuid + 1) mod interval)
/// if next_epoch == block:
///     prev_epoch = next_epoch
///     next_epoch = prev_epoch + interval
/// else:
///     prev_epoch = next_epoch - interval
/// ```
pub fn epoch_containing(block: BlockNumber, netuid: NetUid, tempo: u16) -> Epoch {
    let tempo = tempo as u64;
    let interval = tempo + 1;
    let netuid = netuid as u64;

    let modulus = (block + netuid + 1) % interval;
    let mut next_epoch = block + tempo - modulus;

    let prev_epoch = if next_epoch == block {
        let prev = next_epoch;
        next_epoch = prev + interval;
        prev
    } else {
        next_epoch - interval
    };

    Epoch {
        start: prev_epoch,
        end: next_epoch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drand_round_advances_with_time() {
        let info = DrandInfo::quicknet();
        assert_eq!(info.round_at_time(info.genesis_time), 1);
        assert_eq!(info.round_at_time(info.genesis_time + 3), 2);
        assert_eq!(info.round_at_time(info.genesis_time + 6), 3);
    }

    #[test]
    fn drand_time_for_round_is_the_inverse_of_round_at_time() {
        let info = DrandInfo::quicknet();
        assert_eq!(info.time_for_round(1), info.genesis_time);
        assert_eq!(info.time_for_round(2), info.genesis_time + 3);
        assert_eq!(info.time_for_round(1000), info.genesis_time + 999 * 3);
    }

    #[test]
    fn quicknet_public_key_decodes_to_a_g2_point() {
        let pk_bytes = hex::decode(DRAND_QUICKNET_PK_HEX).expect("valid hex");
        assert_eq!(pk_bytes.len(), 96);
    }

    #[test]
    fn reveal_round_is_in_the_future() {
        let reveal_round = calculate_reveal_round(360, 1000, 1, 1, 12.0);
        assert!(reveal_round > 0);
    }

    #[test]
    fn block_at_exact_boundary_rolls_to_next_interval() {
        let tempo = 10u16;
        let interval = tempo as u64 + 1;
        // Pick a block where (block + netuid + 1) % interval == tempo, i.e. next_epoch == block.
        let netuid = 0u16;
        let block = interval - 1 - (netuid as u64) - 1 + interval; // contrived boundary case
        let epoch = epoch_containing(block, netuid, tempo);
        assert!(epoch.end > epoch.start);
        assert_eq!(epoch.end - epoch.start, interval);
    }

    #[test]
    fn epoch_end_minus_start_is_always_interval() {
        let tempo = 360u16;
        for block in [0u64, 1, 360, 361, 722, 1_000_000] {
            let epoch = epoch_containing(block, 7, tempo);
            assert_eq!(epoch.end - epoch.start, tempo as u64 + 1);
            assert!(epoch.contains(block) || epoch.end == block);
        }
    }

    #[test]
    fn differing_netuid_shifts_the_boundary() {
        let tempo = 100u16;
        let e0 = epoch_containing(500, 0, tempo);
        let e1 = epoch_containing(500, 1, tempo);
        assert_ne!(e0.start, e1.start);
    }
}
