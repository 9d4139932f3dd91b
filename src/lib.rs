// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

/*! ABI of the Lottery Ledger Application */

use async_graphql::{Request, Response};
use linera_sdk::linera_base_types::{AccountOwner, Amount, ContractAbi, ServiceAbi};
use linera_sdk::views::ViewError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The smallest stake a join call will accept: 0.02 of the base unit.
pub const MINIMUM_STAKE: Amount = Amount::from_attos(20_000_000_000_000_000);

// Lottery Ledger Application ABI
pub struct LotteryLedgerAbi;

impl ContractAbi for LotteryLedgerAbi {
    type Operation = LotteryLedgerOperation;
    type Response = LotteryLedgerResponse;
}

impl ServiceAbi for LotteryLedgerAbi {
    type Query = Request;
    type QueryResponse = Response;
}

#[derive(Debug, Deserialize, Serialize)]
pub enum LotteryLedgerOperation {
    // Write operations
    /// Join the current round, staking at least [`MINIMUM_STAKE`]. The same
    /// identity may join several times and holds one pool slot per join.
    Join { stake: Amount },
    /// Pay the whole pool to a pseudo-randomly selected participant and open
    /// the next round. Only the administrator may draw.
    DrawWinner,

    // Query operations for ledger state
    /// Get the participant pool in join order
    ListParticipants,
    /// Get the identity that instantiated the ledger
    Administrator,
    /// Get the value staked into the current round so far
    PoolBalance,
}

#[derive(Debug, Deserialize, Serialize)]
pub enum LotteryLedgerResponse {
    Ok,
    Participants(Vec<AccountOwner>),
    Administrator(Option<AccountOwner>),
    PoolBalance(Amount),
}

/// Why a ledger call was rejected. Every rejection aborts the transaction,
/// so a rejected call leaves the pool, the balance, and all external
/// balances untouched.
#[derive(Debug, Error)]
pub enum LotteryError {
    /// A join stake below the minimum threshold.
    #[error("stake {stake} is below the required minimum of {minimum}")]
    StakeTooLow { stake: Amount, minimum: Amount },

    /// A draw attempted by an identity other than the administrator.
    #[error("only the administrator may draw a winner")]
    Unauthorized,

    /// A draw attempted while nobody has joined the round.
    #[error("cannot draw a winner from an empty pool")]
    EmptyPool,

    /// A views storage failure.
    #[error("storage failure: {0}")]
    Storage(#[from] ViewError),
}
