// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use linera_sdk::linera_base_types::{AccountOwner, Amount};
use linera_sdk::views::{linera_views, LogView, RegisterView, RootView, View, ViewStorageContext};

use lottery_ledger::{LotteryError, MINIMUM_STAKE};

/// Select the winning slot for a draw.
///
/// Mixes the block timestamp, the block height and the pool size (an
/// accumulating nonce) with wrapping arithmetic, then reduces modulo the
/// pool size. Pseudo-random only, not cryptographically secure: every input
/// is visible to, and partly controlled by, whoever produces the block, so
/// an informed adversary can predict or bias the selection. Do not swap in
/// a stronger entropy source without revisiting the trust assumptions
/// around draws.
pub fn winner_index(timestamp: u64, block_height: u64, entries: u64) -> u64 {
    if entries == 0 {
        return 0;
    }

    let mut seed = timestamp ^ block_height.rotate_left(17) ^ entries.rotate_left(43);
    seed = seed.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    seed ^= seed >> 31;
    seed % entries
}

/// The application state for the Lottery Ledger.
#[derive(RootView)]
#[view(context = ViewStorageContext)]
pub struct LotteryLedgerState {
    /// The identity that instantiated the ledger. Set once, immutable
    /// thereafter, and the only identity allowed to draw.
    pub administrator: RegisterView<Option<AccountOwner>>,
    /// The participant pool: one entry per accepted join, in join order,
    /// duplicates allowed.
    pub participants: LogView<AccountOwner>,
    /// Sum of the stakes accepted since the last draw.
    pub pool_balance: RegisterView<Amount>,
    /// Number of draws settled since the ledger was created.
    pub rounds_settled: RegisterView<u64>,
    /// Winner of the most recent draw.
    pub last_winner: RegisterView<Option<AccountOwner>>,
}

#[allow(dead_code)]
impl LotteryLedgerState {
    /// Add one pool entry for `owner`, staking `stake`.
    pub async fn join_pool(
        &mut self,
        owner: AccountOwner,
        stake: Amount,
    ) -> Result<(), LotteryError> {
        if stake < MINIMUM_STAKE {
            return Err(LotteryError::StakeTooLow {
                stake,
                minimum: MINIMUM_STAKE,
            });
        }

        self.participants.push(owner);
        let balance = self.pool_balance.get().saturating_add(stake);
        self.pool_balance.set(balance);

        Ok(())
    }

    /// Settle the current round: select the winner from the entropy
    /// available at draw time, then reset the pool and balance for the next
    /// round. Returns the winner and the prize owed to them.
    pub async fn settle_draw(
        &mut self,
        timestamp: u64,
        block_height: u64,
    ) -> Result<(AccountOwner, Amount), LotteryError> {
        let entries = self.participants.count() as u64;
        if entries == 0 {
            return Err(LotteryError::EmptyPool);
        }

        let index = winner_index(timestamp, block_height, entries) as usize;
        let winner = self
            .participants
            .get(index)
            .await?
            .expect("winning index is within the pool");
        let prize = *self.pool_balance.get();

        self.participants.clear();
        self.pool_balance.set(Amount::ZERO);
        let settled = *self.rounds_settled.get() + 1;
        self.rounds_settled.set(settled);
        self.last_winner.set(Some(winner.clone()));

        Ok((winner, prize))
    }

    /// The participant pool in join order, duplicates included.
    pub async fn participant_list(&self) -> Result<Vec<AccountOwner>, LotteryError> {
        let count = self.participants.count();
        let mut pool = Vec::with_capacity(count);

        for index in 0..count {
            let owner = self
                .participants
                .get(index)
                .await?
                .expect("pool entries below the count are present");
            pool.push(owner);
        }

        Ok(pool)
    }

    /// Number of entries in the current round's pool.
    pub fn participant_count(&self) -> usize {
        self.participants.count()
    }
}

#[cfg(test)]
mod tests {
    use super::winner_index;

    #[test]
    fn winner_index_stays_in_bounds() {
        for timestamp in [0, 7, 1_695_000_000_000_000, u64::MAX] {
            for block_height in [0, 1, 999_999] {
                for entries in [1, 2, 3, 17, 1000] {
                    assert!(winner_index(timestamp, block_height, entries) < entries);
                }
            }
        }
    }

    #[test]
    fn winner_index_is_deterministic() {
        let first = winner_index(1_695_000_000_000_000, 42, 9);
        let second = winner_index(1_695_000_000_000_000, 42, 9);
        assert_eq!(first, second);
    }

    #[test]
    fn winner_index_guards_an_empty_pool() {
        assert_eq!(winner_index(123, 456, 0), 0);
    }

    #[test]
    fn single_entry_always_wins() {
        for timestamp in [0, 1, 1_700_000_000_000_000, u64::MAX / 2] {
            assert_eq!(winner_index(timestamp, timestamp / 3, 1), 0);
        }
    }
}
