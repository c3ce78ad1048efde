//! TokenFarm: stake allowed ERC20 tokens, earn DappToken.
//!
//! Rewards are issued by the owner. Each staker receives, in DappToken base
//! units, the USD value of everything they have staked:
//!
//! ```text
//! reward(user) = sum over allowed tokens t of
//!     stakingBalance[t][user] * price(t) / 10^decimals(feed(t))
//! ```
//!
//! With 18-decimal feeds this pays one DappToken per dollar staked, per
//! issuance.

use crate::chain::{Devnet, TxOpts};
use crate::contracts::erc20;
use crate::contracts::ownable::Ownable;
use crate::contracts::aggregator::AggregatorStorage;
use crate::contracts::{ContractKind, ContractState};
use crate::primitives::{checked_exp10, Address, U256};
use crate::runtime::{require, CallFrame, ExecutionContext, Receipt, RuntimeError};
use crate::utils::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmStorage {
    pub ownable: Ownable,
    pub dapp_token: Address,
    /// users with at least one non-zero stake, in order of first stake
    pub stakers: Vec<Address>,
    pub allowed_tokens: Vec<Address>,
    pub unique_tokens_staked: BTreeMap<Address, u64>,
    /// token -> user -> amount
    pub staking_balance: BTreeMap<Address, BTreeMap<Address, U256>>,
    pub token_price_feed_mapping: BTreeMap<Address, Address>,
}

impl FarmStorage {
    pub fn staking_balance(&self, token: &Address, user: &Address) -> U256 {
        self.staking_balance
            .get(token)
            .and_then(|m| m.get(user))
            .copied()
            .unwrap_or_default()
    }

    pub fn unique_tokens_staked(&self, user: &Address) -> u64 {
        self.unique_tokens_staked.get(user).copied().unwrap_or(0)
    }

    /// Zero address when no feed is configured.
    pub fn price_feed(&self, token: &Address) -> Address {
        self.token_price_feed_mapping.get(token).copied().unwrap_or(Address::ZERO)
    }

    pub fn token_is_allowed(&self, token: &Address) -> bool {
        self.allowed_tokens.contains(token)
    }

    fn set_staking_balance(&mut self, token: Address, user: Address, value: U256) {
        let per_token = self.staking_balance.entry(token).or_default();
        if value.is_zero() {
            per_token.remove(&user);
        } else {
            per_token.insert(user, value);
        }
        if per_token.is_empty() {
            self.staking_balance.remove(&token);
        }
    }

    fn set_unique_tokens_staked(&mut self, user: Address, count: u64) {
        if count == 0 {
            self.unique_tokens_staked.remove(&user);
        } else {
            self.unique_tokens_staked.insert(user, count);
        }
    }
}

fn index<T: Copy>(items: &[T], i: usize) -> std::result::Result<T, RuntimeError> {
    items
        .get(i)
        .copied()
        .ok_or_else(|| RuntimeError::revert(format!("index {} out of bounds (length {})", i, items.len())))
}

pub fn construct(
    ctx: &mut ExecutionContext,
    frame: CallFrame,
    dapp_token: Address,
) -> std::result::Result<ContractState, RuntimeError> {
    Ok(ContractState::TokenFarm(FarmStorage {
        ownable: Ownable::new(ctx, frame),
        dapp_token,
        stakers: Vec::new(),
        allowed_tokens: Vec::new(),
        unique_tokens_staked: BTreeMap::new(),
        staking_balance: BTreeMap::new(),
        token_price_feed_mapping: BTreeMap::new(),
    }))
}

/// Owner-only: map `token` to the price feed used to value it.
pub fn set_price_feed_contract(
    ctx: &mut ExecutionContext,
    frame: CallFrame,
    token: Address,
    price_feed: Address,
) -> std::result::Result<(), RuntimeError> {
    let mut farm = ctx.load::<FarmStorage>(frame.this)?;
    farm.ownable.only_owner(frame.caller)?;
    farm.token_price_feed_mapping.insert(token, price_feed);
    ctx.save(frame.this, farm)
}

/// Owner-only: permit staking of `token`. Adding a token twice is a no-op.
pub fn add_allowed_tokens(
    ctx: &mut ExecutionContext,
    frame: CallFrame,
    token: Address,
) -> std::result::Result<(), RuntimeError> {
    let mut farm = ctx.load::<FarmStorage>(frame.this)?;
    farm.ownable.only_owner(frame.caller)?;
    if !farm.token_is_allowed(&token) {
        farm.allowed_tokens.push(token);
    }
    ctx.save(frame.this, farm)
}

/// Pull `amount` of `token` from the caller (requires prior approval) and credit it.
pub fn stake_tokens(
    ctx: &mut ExecutionContext,
    frame: CallFrame,
    amount: U256,
    token: Address,
) -> std::result::Result<(), RuntimeError> {
    require(!amount.is_zero(), "Amount must be more than 0")?;
    let mut farm = ctx.load::<FarmStorage>(frame.this)?;
    require(farm.token_is_allowed(&token), "Token is currently not allowed")?;

    erc20::transfer_from(ctx, frame.nested(token), frame.caller, frame.this, amount)?;

    let user = frame.caller;
    let previous = farm.staking_balance(&token, &user);
    if previous.is_zero() {
        let count = farm.unique_tokens_staked(&user) + 1;
        farm.set_unique_tokens_staked(user, count);
    }
    let updated = previous.checked_add(amount).ok_or(RuntimeError::Overflow)?;
    farm.set_staking_balance(token, user, updated);
    if !farm.stakers.contains(&user) {
        farm.stakers.push(user);
    }
    debug!(%user, %token, %amount, "staked");
    ctx.save(frame.this, farm)
}

/// Return the caller's whole stake of `token`.
pub fn unstake_tokens(
    ctx: &mut ExecutionContext,
    frame: CallFrame,
    token: Address,
) -> std::result::Result<(), RuntimeError> {
    let mut farm = ctx.load::<FarmStorage>(frame.this)?;
    let user = frame.caller;
    let balance = farm.staking_balance(&token, &user);
    require(!balance.is_zero(), "Staking balance cannot be 0")?;

    erc20::transfer(ctx, frame.nested(token), user, balance)?;

    farm.set_staking_balance(token, user, U256::zero());
    let remaining = farm.unique_tokens_staked(&user).saturating_sub(1);
    farm.set_unique_tokens_staked(user, remaining);
    if remaining == 0 {
        farm.stakers.retain(|s| *s != user);
    }
    debug!(%user, %token, amount = %balance, "unstaked");
    ctx.save(frame.this, farm)
}

/// Owner-only: pay every staker their total staked value in DappToken.
pub fn issue_tokens(ctx: &mut ExecutionContext, frame: CallFrame) -> std::result::Result<(), RuntimeError> {
    let farm = ctx.load::<FarmStorage>(frame.this)?;
    farm.ownable.only_owner(frame.caller)?;
    for recipient in &farm.stakers {
        let value = get_user_total_value(ctx, frame.this, *recipient)?;
        erc20::transfer(ctx, frame.nested(farm.dapp_token), *recipient, value)?;
        debug!(%recipient, %value, "issued reward");
    }
    Ok(())
}

pub fn get_user_total_value(
    ctx: &mut ExecutionContext,
    farm_address: Address,
    user: Address,
) -> std::result::Result<U256, RuntimeError> {
    let farm = ctx.load::<FarmStorage>(farm_address)?;
    require(farm.unique_tokens_staked(&user) > 0, "No tokens staked!")?;
    let mut total = U256::zero();
    for token in &farm.allowed_tokens {
        let value = single_token_value(ctx, &farm, user, *token)?;
        total = total.checked_add(value).ok_or(RuntimeError::Overflow)?;
    }
    Ok(total)
}

pub fn get_user_single_token_value(
    ctx: &mut ExecutionContext,
    farm_address: Address,
    user: Address,
    token: Address,
) -> std::result::Result<U256, RuntimeError> {
    let farm = ctx.load::<FarmStorage>(farm_address)?;
    single_token_value(ctx, &farm, user, token)
}

fn single_token_value(
    ctx: &mut ExecutionContext,
    farm: &FarmStorage,
    user: Address,
    token: Address,
) -> std::result::Result<U256, RuntimeError> {
    let balance = farm.staking_balance(&token, &user);
    // nothing staked in this token: worth 0 without consulting its feed
    if farm.unique_tokens_staked(&user) == 0 || balance.is_zero() {
        return Ok(U256::zero());
    }
    let (price, decimals) = token_value(ctx, farm, token)?;
    let scaled = balance.checked_mul(price).ok_or(RuntimeError::Overflow)?;
    let scale = checked_exp10(u32::from(decimals)).ok_or(RuntimeError::Overflow)?;
    Ok(scaled / scale)
}

/// `(price, decimals)` reported by the feed mapped to `token`.
pub fn get_token_value(
    ctx: &mut ExecutionContext,
    farm_address: Address,
    token: Address,
) -> std::result::Result<(U256, u8), RuntimeError> {
    let farm = ctx.load::<FarmStorage>(farm_address)?;
    token_value(ctx, &farm, token)
}

fn token_value(
    ctx: &mut ExecutionContext,
    farm: &FarmStorage,
    token: Address,
) -> std::result::Result<(U256, u8), RuntimeError> {
    let feed = farm.price_feed(&token);
    require(!feed.is_zero(), "No price feed set for token")?;
    let aggregator = ctx.load::<AggregatorStorage>(feed)?;
    let answer = aggregator.latest_round_data().answer;
    require(answer >= 0, "Price feed reported a negative price")?;
    Ok((U256::from(answer as u128), aggregator.decimals))
}

/// Handle to a deployed TokenFarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenFarm {
    address: Address,
}

impl TokenFarm {
    pub fn deploy(chain: &mut Devnet, dapp_token: Address, opts: TxOpts) -> Result<Self> {
        let (address, _) = chain.deploy(opts.from, ContractKind::TokenFarm, |ctx, frame| {
            construct(ctx, frame, dapp_token)
        })?;
        Ok(Self { address })
    }

    pub fn at(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn send<F>(&self, chain: &mut Devnet, opts: TxOpts, f: F) -> Result<Receipt>
    where
        F: FnOnce(&mut ExecutionContext, CallFrame) -> std::result::Result<(), RuntimeError>,
    {
        let (_, receipt) = chain.transact(opts.from, self.address, f)?;
        Ok(receipt)
    }

    // --- transactions ---

    pub fn set_price_feed_contract(
        &self,
        chain: &mut Devnet,
        token: Address,
        price_feed: Address,
        opts: TxOpts,
    ) -> Result<Receipt> {
        self.send(chain, opts, |ctx, frame| set_price_feed_contract(ctx, frame, token, price_feed))
    }

    pub fn add_allowed_tokens(&self, chain: &mut Devnet, token: Address, opts: TxOpts) -> Result<Receipt> {
        self.send(chain, opts, |ctx, frame| add_allowed_tokens(ctx, frame, token))
    }

    pub fn stake_tokens(&self, chain: &mut Devnet, amount: U256, token: Address, opts: TxOpts) -> Result<Receipt> {
        self.send(chain, opts, |ctx, frame| stake_tokens(ctx, frame, amount, token))
    }

    pub fn unstake_tokens(&self, chain: &mut Devnet, token: Address, opts: TxOpts) -> Result<Receipt> {
        self.send(chain, opts, |ctx, frame| unstake_tokens(ctx, frame, token))
    }

    pub fn issue_tokens(&self, chain: &mut Devnet, opts: TxOpts) -> Result<Receipt> {
        self.send(chain, opts, issue_tokens)
    }

    pub fn transfer_ownership(&self, chain: &mut Devnet, new_owner: Address, opts: TxOpts) -> Result<Receipt> {
        self.send(chain, opts, |ctx, frame| {
            let mut farm = ctx.load::<FarmStorage>(frame.this)?;
            farm.ownable.transfer_ownership(ctx, frame, new_owner)?;
            ctx.save(frame.this, farm)
        })
    }

    pub fn renounce_ownership(&self, chain: &mut Devnet, opts: TxOpts) -> Result<Receipt> {
        self.send(chain, opts, |ctx, frame| {
            let mut farm = ctx.load::<FarmStorage>(frame.this)?;
            farm.ownable.renounce_ownership(ctx, frame)?;
            ctx.save(frame.this, farm)
        })
    }

    // --- views ---

    pub fn owner(&self, chain: &Devnet) -> Result<Address> {
        chain.view(self.address, |f: &FarmStorage| f.ownable.owner())
    }

    pub fn dapp_token(&self, chain: &Devnet) -> Result<Address> {
        chain.view(self.address, |f: &FarmStorage| f.dapp_token)
    }

    pub fn token_price_feed_mapping(&self, chain: &Devnet, token: Address) -> Result<Address> {
        chain.view(self.address, |f: &FarmStorage| f.price_feed(&token))
    }

    pub fn token_is_allowed(&self, chain: &Devnet, token: Address) -> Result<bool> {
        chain.view(self.address, |f: &FarmStorage| f.token_is_allowed(&token))
    }

    /// `allowedTokens(index)`; reverts when out of range.
    pub fn allowed_tokens(&self, chain: &Devnet, i: usize) -> Result<Address> {
        chain.call(self.address, |ctx, frame| index(&ctx.load::<FarmStorage>(frame.this)?.allowed_tokens, i))
    }

    pub fn staking_balance(&self, chain: &Devnet, token: Address, user: Address) -> Result<U256> {
        chain.view(self.address, |f: &FarmStorage| f.staking_balance(&token, &user))
    }

    pub fn unique_tokens_staked(&self, chain: &Devnet, user: Address) -> Result<u64> {
        chain.view(self.address, |f: &FarmStorage| f.unique_tokens_staked(&user))
    }

    /// `stakers(index)`; reverts when out of range.
    pub fn stakers(&self, chain: &Devnet, i: usize) -> Result<Address> {
        chain.call(self.address, |ctx, frame| index(&ctx.load::<FarmStorage>(frame.this)?.stakers, i))
    }

    pub fn all_stakers(&self, chain: &Devnet) -> Result<Vec<Address>> {
        chain.view(self.address, |f: &FarmStorage| f.stakers.clone())
    }

    pub fn get_user_total_value(&self, chain: &Devnet, user: Address) -> Result<U256> {
        chain.call(self.address, |ctx, frame| get_user_total_value(ctx, frame.this, user))
    }

    pub fn get_user_single_token_value(&self, chain: &Devnet, user: Address, token: Address) -> Result<U256> {
        chain.call(self.address, |ctx, frame| get_user_single_token_value(ctx, frame.this, user, token))
    }

    pub fn get_token_value(&self, chain: &Devnet, token: Address) -> Result<(U256, u8)> {
        chain.call(self.address, |ctx, frame| get_token_value(ctx, frame.this, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{Erc20, MockV3Aggregator};
    use crate::primitives::to_wei;
    use crate::utils::ChainError;

    struct Fixture {
        chain: Devnet,
        farm: TokenFarm,
        dapp: Erc20,
        feed: MockV3Aggregator,
        owner: Address,
        user: Address,
    }

    // owner deploys everything; `user` holds 100 DAPP.
    fn fixture() -> Fixture {
        let mut chain = Devnet::development();
        let owner = chain.accounts()[0];
        let user = chain.accounts()[1];
        let dapp = Erc20::deploy_dapp_token(&mut chain, owner.into()).unwrap();
        let farm = TokenFarm::deploy(&mut chain, dapp.address(), owner.into()).unwrap();
        let feed = MockV3Aggregator::deploy(&mut chain, 18, 2_000_000_000_000_000_000_000, owner.into()).unwrap();
        dapp.transfer(&mut chain, farm.address(), to_wei(500_000), owner.into()).unwrap();
        dapp.transfer(&mut chain, user, to_wei(100), owner.into()).unwrap();
        farm.add_allowed_tokens(&mut chain, dapp.address(), owner.into()).unwrap();
        farm.set_price_feed_contract(&mut chain, dapp.address(), feed.address(), owner.into()).unwrap();
        Fixture { chain, farm, dapp, feed, owner, user }
    }

    fn stake(fx: &mut Fixture, amount: U256) {
        fx.dapp.approve(&mut fx.chain, fx.farm.address(), amount, fx.user.into()).unwrap();
        fx.farm.stake_tokens(&mut fx.chain, amount, fx.dapp.address(), fx.user.into()).unwrap();
    }

    #[test]
    fn owner_is_deployer_and_only_owner_configures() {
        let mut fx = fixture();
        assert_eq!(fx.farm.owner(&fx.chain).unwrap(), fx.owner);
        assert_eq!(fx.farm.dapp_token(&fx.chain).unwrap(), fx.dapp.address());
        let err = fx
            .farm
            .add_allowed_tokens(&mut fx.chain, Address::derive(&[b"x"]), fx.user.into())
            .unwrap_err();
        assert!(err.revert_reason().unwrap().contains(crate::contracts::ownable::NOT_OWNER));
        assert_eq!(fx.farm.allowed_tokens(&fx.chain, 0).unwrap(), fx.dapp.address());
        assert!(fx.farm.allowed_tokens(&fx.chain, 1).is_err());
    }

    #[test]
    fn zero_and_disallowed_stakes_revert() {
        let mut fx = fixture();
        let err = fx
            .farm
            .stake_tokens(&mut fx.chain, U256::zero(), fx.dapp.address(), fx.user.into())
            .unwrap_err();
        assert!(err.revert_reason().unwrap().contains("Amount must be more than 0"));

        let other = Erc20::deploy_mock_weth(&mut fx.chain, fx.owner.into()).unwrap();
        let err = fx
            .farm
            .stake_tokens(&mut fx.chain, to_wei(1), other.address(), fx.owner.into())
            .unwrap_err();
        assert!(err.revert_reason().unwrap().contains("not allowed"));
    }

    #[test]
    fn stake_without_approval_reverts_and_changes_nothing() {
        let mut fx = fixture();
        let err = fx
            .farm
            .stake_tokens(&mut fx.chain, to_wei(1), fx.dapp.address(), fx.user.into())
            .unwrap_err();
        assert!(err.revert_reason().unwrap().contains("insufficient allowance"));
        assert!(fx.farm.staking_balance(&fx.chain, fx.dapp.address(), fx.user).unwrap().is_zero());
        assert_eq!(fx.farm.unique_tokens_staked(&fx.chain, fx.user).unwrap(), 0);
        assert!(fx.farm.all_stakers(&fx.chain).unwrap().is_empty());
    }

    #[test]
    fn repeated_stakes_keep_one_staker_entry() {
        let mut fx = fixture();
        stake(&mut fx, to_wei(1));
        stake(&mut fx, to_wei(2));
        assert_eq!(fx.farm.staking_balance(&fx.chain, fx.dapp.address(), fx.user).unwrap(), to_wei(3));
        assert_eq!(fx.farm.unique_tokens_staked(&fx.chain, fx.user).unwrap(), 1);
        assert_eq!(fx.farm.all_stakers(&fx.chain).unwrap(), vec![fx.user]);
    }

    #[test]
    fn unstake_returns_everything() {
        let mut fx = fixture();
        stake(&mut fx, to_wei(10));
        assert_eq!(fx.dapp.balance_of(&fx.chain, fx.user).unwrap(), to_wei(90));

        fx.farm.unstake_tokens(&mut fx.chain, fx.dapp.address(), fx.user.into()).unwrap();
        assert_eq!(fx.dapp.balance_of(&fx.chain, fx.user).unwrap(), to_wei(100));
        assert!(fx.farm.staking_balance(&fx.chain, fx.dapp.address(), fx.user).unwrap().is_zero());
        assert_eq!(fx.farm.unique_tokens_staked(&fx.chain, fx.user).unwrap(), 0);
        assert!(fx.farm.stakers(&fx.chain, 0).is_err());

        let err = fx
            .farm
            .unstake_tokens(&mut fx.chain, fx.dapp.address(), fx.user.into())
            .unwrap_err();
        assert!(err.revert_reason().unwrap().contains("Staking balance cannot be 0"));
    }

    #[test]
    fn value_follows_the_feed() {
        let mut fx = fixture();
        stake(&mut fx, to_wei(2));
        assert_eq!(fx.farm.get_user_total_value(&fx.chain, fx.user).unwrap(), to_wei(4000));

        fx.feed.update_answer(&mut fx.chain, 1_500_000_000_000_000_000_000, fx.owner.into()).unwrap();
        assert_eq!(
            fx.farm.get_user_single_token_value(&fx.chain, fx.user, fx.dapp.address()).unwrap(),
            to_wei(3000)
        );
        let (price, decimals) = fx.farm.get_token_value(&fx.chain, fx.dapp.address()).unwrap();
        assert_eq!((price, decimals), (to_wei(1500), 18));
    }

    #[test]
    fn total_value_requires_a_stake() {
        let fx = fixture();
        let err = fx.farm.get_user_total_value(&fx.chain, fx.user).unwrap_err();
        assert!(err.revert_reason().unwrap().contains("No tokens staked!"));
        assert!(fx
            .farm
            .get_user_single_token_value(&fx.chain, fx.user, fx.dapp.address())
            .unwrap()
            .is_zero());
    }

    #[test]
    fn negative_price_blocks_issuance() {
        let mut fx = fixture();
        stake(&mut fx, to_wei(1));
        fx.feed.update_answer(&mut fx.chain, -1, fx.owner.into()).unwrap();
        let before = fx.dapp.balance_of(&fx.chain, fx.user).unwrap();
        let err = fx.farm.issue_tokens(&mut fx.chain, fx.owner.into()).unwrap_err();
        assert!(err.revert_reason().unwrap().contains("negative price"));
        assert_eq!(fx.dapp.balance_of(&fx.chain, fx.user).unwrap(), before);
    }

    #[test]
    fn issuance_needs_a_funded_farm() {
        let mut chain = Devnet::development();
        let owner = chain.accounts()[0];
        let dapp = Erc20::deploy_dapp_token(&mut chain, owner.into()).unwrap();
        let farm = TokenFarm::deploy(&mut chain, dapp.address(), owner.into()).unwrap();
        let feed = MockV3Aggregator::deploy(&mut chain, 18, 2_000_000_000_000_000_000_000, owner.into()).unwrap();
        farm.add_allowed_tokens(&mut chain, dapp.address(), owner.into()).unwrap();
        farm.set_price_feed_contract(&mut chain, dapp.address(), feed.address(), owner.into()).unwrap();
        dapp.approve(&mut chain, farm.address(), to_wei(1), owner.into()).unwrap();
        farm.stake_tokens(&mut chain, to_wei(1), dapp.address(), owner.into()).unwrap();

        // farm only holds the 1 DAPP staked; 2000 DAPP reward cannot be paid
        let err = farm.issue_tokens(&mut chain, owner.into()).unwrap_err();
        assert!(err.revert_reason().unwrap().contains("exceeds balance"));
    }

    #[test]
    fn oversized_feed_decimals_revert() {
        let mut fx = fixture();
        let wide = MockV3Aggregator::deploy(&mut fx.chain, 80, 1, fx.owner.into()).unwrap();
        fx.farm.set_price_feed_contract(&mut fx.chain, fx.dapp.address(), wide.address(), fx.owner.into()).unwrap();
        stake(&mut fx, to_wei(1));

        let err = fx.farm.get_user_total_value(&fx.chain, fx.user).unwrap_err();
        assert!(matches!(err, ChainError::VirtualMachine { .. }));
        assert_eq!(err.revert_reason(), Some("arithmetic overflow"));

        let nonce = fx.chain.nonce(&fx.owner).unwrap();
        let block = fx.chain.block_number();
        let err = fx.farm.issue_tokens(&mut fx.chain, fx.owner.into()).unwrap_err();
        assert!(matches!(err, ChainError::VirtualMachine { tx_hash: Some(_), .. }));
        assert_eq!(fx.chain.nonce(&fx.owner).unwrap(), nonce + 1);
        assert_eq!(fx.chain.block_number(), block + 1);
    }

    #[test]
    fn token_without_feed_reverts_valuation() {
        let mut fx = fixture();
        let fau = Erc20::deploy_mock_dai(&mut fx.chain, fx.owner.into()).unwrap();
        fx.farm.add_allowed_tokens(&mut fx.chain, fau.address(), fx.owner.into()).unwrap();
        assert!(fx.farm.token_price_feed_mapping(&fx.chain, fau.address()).unwrap().is_zero());
        fau.approve(&mut fx.chain, fx.farm.address(), to_wei(1), fx.owner.into()).unwrap();
        fx.farm.stake_tokens(&mut fx.chain, to_wei(1), fau.address(), fx.owner.into()).unwrap();

        let err = fx.farm.get_token_value(&fx.chain, fau.address()).unwrap_err();
        assert_eq!(err.revert_reason(), Some("No price feed set for token"));
        let err = fx.farm.get_user_total_value(&fx.chain, fx.owner).unwrap_err();
        assert_eq!(err.revert_reason(), Some("No price feed set for token"));

        let before = fx.dapp.balance_of(&fx.chain, fx.owner).unwrap();
        let err = fx.farm.issue_tokens(&mut fx.chain, fx.owner.into()).unwrap_err();
        assert_eq!(err.revert_reason(), Some("No price feed set for token"));
        assert_eq!(fx.dapp.balance_of(&fx.chain, fx.owner).unwrap(), before);
    }

    #[test]
    fn ownership_can_move_and_be_renounced() {
        let mut fx = fixture();
        let err = fx
            .farm
            .transfer_ownership(&mut fx.chain, Address::ZERO, fx.owner.into())
            .unwrap_err();
        assert_eq!(err.revert_reason(), Some("Ownable: new owner is the zero address"));
        assert_eq!(fx.farm.owner(&fx.chain).unwrap(), fx.owner);
        fx.farm.transfer_ownership(&mut fx.chain, fx.user, fx.owner.into()).unwrap();
        assert_eq!(fx.farm.owner(&fx.chain).unwrap(), fx.user);
        assert!(fx.farm.issue_tokens(&mut fx.chain, fx.owner.into()).is_err());
        fx.farm.renounce_ownership(&mut fx.chain, fx.user.into()).unwrap();
        assert!(fx.farm.owner(&fx.chain).unwrap().is_zero());
        assert!(fx
            .farm
            .set_price_feed_contract(&mut fx.chain, fx.dapp.address(), fx.feed.address(), fx.user.into())
            .is_err());
    }
}
