//! `MockV3Aggregator`: a settable price feed with round history.

use crate::chain::{Devnet, TxOpts};
use crate::contracts::{ContractKind, ContractState};
use crate::primitives::Address;
use crate::runtime::{CallFrame, ExecutionContext, Receipt, RuntimeError};
use crate::utils::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VERSION: u64 = 0;
pub const DESCRIPTION: &str = "v0.6/tests/MockV3Aggregator.sol";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
    pub round_id: u64,
    pub answer: i128,
    pub started_at: u64,
    pub updated_at: u64,
    pub answered_in_round: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorStorage {
    pub decimals: u8,
    pub latest_answer: i128,
    pub latest_timestamp: u64,
    pub latest_round: u64,
    pub answers: BTreeMap<u64, i128>,
    pub timestamps: BTreeMap<u64, u64>,
    pub started_at: BTreeMap<u64, u64>,
}

impl AggregatorStorage {
    pub fn new(decimals: u8, initial_answer: i128, now: u64) -> Self {
        let mut s = Self {
            decimals,
            latest_answer: 0,
            latest_timestamp: 0,
            latest_round: 0,
            answers: BTreeMap::new(),
            timestamps: BTreeMap::new(),
            started_at: BTreeMap::new(),
        };
        s.update_answer(initial_answer, now);
        s
    }

    /// Publish `answer` as a new round stamped `now`.
    pub fn update_answer(&mut self, answer: i128, now: u64) {
        self.latest_answer = answer;
        self.latest_timestamp = now;
        self.latest_round += 1;
        self.answers.insert(self.latest_round, answer);
        self.timestamps.insert(self.latest_round, now);
        self.started_at.insert(self.latest_round, now);
    }

    /// Overwrite a specific round, making it the latest.
    pub fn update_round_data(&mut self, round_id: u64, answer: i128, timestamp: u64, started_at: u64) {
        self.latest_round = round_id;
        self.latest_answer = answer;
        self.latest_timestamp = timestamp;
        self.answers.insert(round_id, answer);
        self.timestamps.insert(round_id, timestamp);
        self.started_at.insert(round_id, started_at);
    }

    pub fn latest_round_data(&self) -> RoundData {
        RoundData {
            round_id: self.latest_round,
            answer: self.latest_answer,
            started_at: self.started_at.get(&self.latest_round).copied().unwrap_or(0),
            updated_at: self.latest_timestamp,
            answered_in_round: self.latest_round,
        }
    }

    pub fn get_round_data(&self, round_id: u64) -> std::result::Result<RoundData, RuntimeError> {
        let answer = *self
            .answers
            .get(&round_id)
            .ok_or_else(|| RuntimeError::revert("No data present"))?;
        Ok(RoundData {
            round_id,
            answer,
            started_at: self.started_at.get(&round_id).copied().unwrap_or(0),
            updated_at: self.timestamps.get(&round_id).copied().unwrap_or(0),
            answered_in_round: round_id,
        })
    }
}

/// Handle to a deployed mock price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockV3Aggregator {
    address: Address,
}

impl MockV3Aggregator {
    pub fn deploy(chain: &mut Devnet, decimals: u8, initial_answer: i128, opts: TxOpts) -> Result<Self> {
        let (address, _) = chain.deploy(opts.from, ContractKind::MockV3Aggregator, |ctx, _frame| {
            Ok(ContractState::PriceFeed(AggregatorStorage::new(decimals, initial_answer, ctx.timestamp)))
        })?;
        Ok(Self { address })
    }

    pub fn at(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn version(&self) -> u64 {
        VERSION
    }

    pub fn description(&self) -> &'static str {
        DESCRIPTION
    }

    pub fn decimals(&self, chain: &Devnet) -> Result<u8> {
        chain.view(self.address, |s: &AggregatorStorage| s.decimals)
    }

    pub fn latest_answer(&self, chain: &Devnet) -> Result<i128> {
        chain.view(self.address, |s: &AggregatorStorage| s.latest_answer)
    }

    pub fn latest_round(&self, chain: &Devnet) -> Result<u64> {
        chain.view(self.address, |s: &AggregatorStorage| s.latest_round)
    }

    pub fn latest_timestamp(&self, chain: &Devnet) -> Result<u64> {
        chain.view(self.address, |s: &AggregatorStorage| s.latest_timestamp)
    }

    pub fn latest_round_data(&self, chain: &Devnet) -> Result<RoundData> {
        chain.view(self.address, |s: &AggregatorStorage| s.latest_round_data())
    }

    pub fn get_round_data(&self, chain: &Devnet, round_id: u64) -> Result<RoundData> {
        chain.call(self.address, |ctx, frame| ctx.load::<AggregatorStorage>(frame.this)?.get_round_data(round_id))
    }

    pub fn update_answer(&self, chain: &mut Devnet, answer: i128, opts: TxOpts) -> Result<Receipt> {
        let (_, receipt) = chain.transact(opts.from, self.address, |ctx, frame| {
            update(ctx, frame, |s, now| s.update_answer(answer, now))
        })?;
        Ok(receipt)
    }

    pub fn update_round_data(
        &self,
        chain: &mut Devnet,
        round_id: u64,
        answer: i128,
        timestamp: u64,
        started_at: u64,
        opts: TxOpts,
    ) -> Result<Receipt> {
        let (_, receipt) = chain.transact(opts.from, self.address, |ctx, frame| {
            update(ctx, frame, |s, _| s.update_round_data(round_id, answer, timestamp, started_at))
        })?;
        Ok(receipt)
    }
}

fn update<F>(ctx: &mut ExecutionContext, frame: CallFrame, f: F) -> std::result::Result<(), RuntimeError>
where
    F: FnOnce(&mut AggregatorStorage, u64),
{
    let mut s = ctx.load::<AggregatorStorage>(frame.this)?;
    f(&mut s, ctx.timestamp);
    ctx.save(frame.this, s)
}
