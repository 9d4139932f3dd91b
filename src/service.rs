// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(target_arch = "wasm32", no_main)]

mod state;

use std::sync::Arc;

use async_graphql::{EmptySubscription, Object, Request, Response, Schema};
use linera_sdk::{
    linera_base_types::{AccountOwner, Amount, WithServiceAbi},
    views::View,
    Service, ServiceRuntime,
};
use lottery_ledger::{LotteryLedgerAbi, LotteryLedgerOperation, MINIMUM_STAKE};

use self::state::LotteryLedgerState;

pub struct LotteryLedgerService {
    state: Arc<LotteryLedgerState>,
    runtime: Arc<ServiceRuntime<Self>>,
}

linera_sdk::service!(LotteryLedgerService);

impl WithServiceAbi for LotteryLedgerService {
    type Abi = LotteryLedgerAbi;
}

impl Service for LotteryLedgerService {
    type Parameters = ();

    async fn new(runtime: ServiceRuntime<Self>) -> Self {
        let state = LotteryLedgerState::load(runtime.root_view_storage_context())
            .await
            .expect("Failed to load state");
        LotteryLedgerService {
            state: Arc::new(state),
            runtime: Arc::new(runtime),
        }
    }

    async fn handle_query(&self, request: Request) -> Response {
        let schema = Schema::build(
            QueryRoot {
                state: self.state.clone(),
            },
            MutationRoot {
                runtime: self.runtime.clone(),
            },
            EmptySubscription,
        )
        .finish();
        schema.execute(request).await
    }
}

struct QueryRoot {
    state: Arc<LotteryLedgerState>,
}

#[Object]
impl QueryRoot {
    /// The participant pool in join order, duplicates included
    async fn participants(&self) -> Vec<AccountOwner> {
        self.state.participant_list().await.unwrap_or_default()
    }

    /// Number of entries in the current round's pool
    async fn participant_count(&self) -> u64 {
        self.state.participant_count() as u64
    }

    /// Total value staked into the current round
    async fn pool_balance(&self) -> Amount {
        *self.state.pool_balance.get()
    }

    /// The identity that instantiated the ledger
    async fn administrator(&self) -> Option<AccountOwner> {
        self.state.administrator.get().clone()
    }

    /// Number of draws settled since the ledger was created
    async fn rounds_settled(&self) -> u64 {
        *self.state.rounds_settled.get()
    }

    /// Winner of the most recent draw
    async fn last_winner(&self) -> Option<AccountOwner> {
        self.state.last_winner.get().clone()
    }

    /// The smallest stake a join call will accept
    async fn minimum_stake(&self) -> Amount {
        MINIMUM_STAKE
    }
}

struct MutationRoot {
    runtime: Arc<ServiceRuntime<LotteryLedgerService>>,
}

#[Object]
impl MutationRoot {
    /// Join the current round with the given stake
    async fn join(&self, stake: String) -> String {
        self.runtime.schedule_operation(&LotteryLedgerOperation::Join {
            stake: stake.parse::<Amount>().unwrap_or_default(),
        });
        format!("Join operation scheduled with stake {}", stake)
    }

    /// Draw a winner for the current round (administrator only)
    async fn draw_winner(&self) -> String {
        self.runtime
            .schedule_operation(&LotteryLedgerOperation::DrawWinner);
        "DrawWinner operation scheduled".to_string()
    }
}
