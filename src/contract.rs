// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(target_arch = "wasm32", no_main)]

mod state;

use linera_sdk::{
    linera_base_types::{Account, AccountOwner, WithContractAbi},
    views::{RootView, View},
    Contract, ContractRuntime,
};
use lottery_ledger::{
    LotteryError, LotteryLedgerAbi, LotteryLedgerOperation, LotteryLedgerResponse,
};

use self::state::LotteryLedgerState;

pub struct LotteryLedgerContract {
    state: LotteryLedgerState,
    runtime: ContractRuntime<Self>,
}

linera_sdk::contract!(LotteryLedgerContract);

impl WithContractAbi for LotteryLedgerContract {
    type Abi = LotteryLedgerAbi;
}

impl Contract for LotteryLedgerContract {
    type Message = ();
    type Parameters = ();
    type InstantiationArgument = ();
    type EventValue = ();

    async fn load(runtime: ContractRuntime<Self>) -> Self {
        let state = LotteryLedgerState::load(runtime.root_view_storage_context())
            .await
            .expect("Failed to load state");
        LotteryLedgerContract { state, runtime }
    }

    async fn instantiate(&mut self, _argument: Self::InstantiationArgument) {
        // Construction takes no parameters: whoever signs the deployment
        // becomes the administrator for the lifetime of the ledger.
        let deployer = self
            .runtime
            .authenticated_signer()
            .expect("Authentication required to instantiate the lottery ledger");
        self.state.administrator.set(Some(deployer));
    }

    async fn execute_operation(&mut self, operation: Self::Operation) -> Self::Response {
        match operation {
            LotteryLedgerOperation::Join { stake } => {
                let owner = self
                    .runtime
                    .authenticated_signer()
                    .expect("Authentication required");

                if let Err(e) = self.state.join_pool(owner.clone(), stake).await {
                    panic!("Join rejected: {}", e);
                }

                // Pool bookkeeping is settled before any value moves.
                let pool_account = Account {
                    chain_id: self.runtime.chain_id(),
                    owner: AccountOwner::CHAIN,
                };
                self.runtime.transfer(owner, pool_account, stake);

                LotteryLedgerResponse::Ok
            }

            LotteryLedgerOperation::DrawWinner => {
                let caller = self
                    .runtime
                    .authenticated_signer()
                    .expect("Authentication required");
                if self.state.administrator.get().clone() != Some(caller.clone()) {
                    panic!("DrawWinner rejected: {}", LotteryError::Unauthorized);
                }

                let timestamp = self.runtime.system_time().micros();
                let block_height: u64 = self.runtime.block_height().into();

                match self.state.settle_draw(timestamp, block_height).await {
                    Ok((winner, prize)) => {
                        // The round is already reset, so the payout is the
                        // last step of the draw.
                        let winner_account = Account {
                            chain_id: self.runtime.chain_id(),
                            owner: winner.clone(),
                        };
                        self.runtime
                            .transfer(AccountOwner::CHAIN, winner_account, prize);
                        eprintln!("Draw settled: {} wins {}", winner, prize);
                        LotteryLedgerResponse::Ok
                    }
                    Err(e) => panic!("DrawWinner rejected: {}", e),
                }
            }

            LotteryLedgerOperation::ListParticipants => {
                match self.state.participant_list().await {
                    Ok(pool) => LotteryLedgerResponse::Participants(pool),
                    Err(e) => panic!("Failed to list participants: {}", e),
                }
            }

            LotteryLedgerOperation::Administrator => {
                LotteryLedgerResponse::Administrator(self.state.administrator.get().clone())
            }

            LotteryLedgerOperation::PoolBalance => {
                LotteryLedgerResponse::PoolBalance(*self.state.pool_balance.get())
            }
        }
    }

    async fn execute_message(&mut self, _message: Self::Message) {
        panic!("Lottery ledger does not handle any cross-chain messages");
    }

    async fn store(mut self) {
        self.state.save().await.expect("Failed to save state");
    }
}
