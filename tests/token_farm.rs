mod common;

use common::{amount_staked, local_chain};
use rand::Rng;
use tokenfarm::chain::{Devnet, TxOpts};
use tokenfarm::contracts::{Erc20, MockV3Aggregator, TokenFarm};
use tokenfarm::primitives::{to_wei, U256};
use tokenfarm::runtime::TxStatus;
use tokenfarm::scripts::{deploy_token_farm_and_dapp_token, get_account, get_contract, initial_value, kept_balance};
use tokenfarm::utils::ChainError;

fn deployed() -> Option<(Devnet, TokenFarm, Erc20)> {
    let mut chain = local_chain()?;
    let (farm, dapp) = deploy_token_farm_and_dapp_token(&mut chain).unwrap();
    Some((chain, farm, dapp))
}

fn stake(chain: &mut Devnet, farm: &TokenFarm, token: &Erc20, amount: U256, opts: TxOpts) {
    token.approve(chain, farm.address(), amount, opts).unwrap();
    farm.stake_tokens(chain, amount, token.address(), opts).unwrap();
}

#[test]
fn set_price_feed_contract() {
    let Some((mut chain, farm, dapp)) = deployed() else { return };
    let account = get_account(&chain, 0).unwrap();
    let non_owner = get_account(&chain, 1).unwrap();
    let price_feed = get_contract(&mut chain, "eth_usd_price_feed").unwrap();

    farm.set_price_feed_contract(&mut chain, dapp.address(), price_feed, account.into()).unwrap();
    assert_eq!(farm.token_price_feed_mapping(&chain, dapp.address()).unwrap(), price_feed);

    let other_feed = MockV3Aggregator::deploy(&mut chain, 8, 1, account.into()).unwrap().address();
    assert_ne!(other_feed, price_feed);
    let err = farm
        .set_price_feed_contract(&mut chain, dapp.address(), other_feed, non_owner.into())
        .unwrap_err();
    assert!(matches!(err, ChainError::VirtualMachine { .. }));
    assert_eq!(err.revert_reason(), Some("Ownable: caller is not the owner"));
    assert_eq!(farm.token_price_feed_mapping(&chain, dapp.address()).unwrap(), price_feed);
}

#[test]
fn stake_tokens() {
    let Some((mut chain, farm, dapp)) = deployed() else { return };
    let account = get_account(&chain, 0).unwrap();

    stake(&mut chain, &farm, &dapp, amount_staked(), account.into());

    assert_eq!(farm.staking_balance(&chain, dapp.address(), account).unwrap(), amount_staked());
    assert_eq!(farm.unique_tokens_staked(&chain, account).unwrap(), 1);
    assert_eq!(farm.stakers(&chain, 0).unwrap(), account);
}

#[test]
fn issue_tokens() {
    let Some((mut chain, farm, dapp)) = deployed() else { return };
    let account = get_account(&chain, 0).unwrap();
    stake(&mut chain, &farm, &dapp, amount_staked(), account.into());
    let starting_balance = dapp.balance_of(&chain, account).unwrap();

    farm.issue_tokens(&mut chain, account.into()).unwrap();

    assert_eq!(dapp.balance_of(&chain, account).unwrap(), starting_balance + initial_value());
}

#[test]
fn deploy_funds_farm_and_keeps_balance() {
    let Some((chain, farm, dapp)) = deployed() else { return };
    let account = get_account(&chain, 0).unwrap();
    let supply = dapp.total_supply(&chain).unwrap();
    assert_eq!(dapp.balance_of(&chain, account).unwrap(), kept_balance());
    assert_eq!(dapp.balance_of(&chain, farm.address()).unwrap(), supply - kept_balance());
    assert_eq!(farm.owner(&chain).unwrap(), account);
    assert_eq!(farm.dapp_token(&chain).unwrap(), dapp.address());
}

#[test]
fn staking_two_tokens_counts_both() {
    let Some((mut chain, farm, dapp)) = deployed() else { return };
    let account = get_account(&chain, 0).unwrap();
    let fau = Erc20::at(get_contract(&mut chain, "fau_token").unwrap());

    stake(&mut chain, &farm, &dapp, amount_staked(), account.into());
    stake(&mut chain, &farm, &fau, amount_staked(), account.into());
    stake(&mut chain, &farm, &dapp, amount_staked(), account.into());

    assert_eq!(farm.unique_tokens_staked(&chain, account).unwrap(), 2);
    assert_eq!(farm.staking_balance(&chain, dapp.address(), account).unwrap(), amount_staked() * 2u64);
    assert_eq!(farm.all_stakers(&chain).unwrap(), vec![account]);
    // 3 tokens at 2000 USD each
    assert_eq!(farm.get_user_total_value(&chain, account).unwrap(), initial_value() * 3u64);
}

#[test]
fn reward_is_value_of_stake_at_mock_price() {
    let Some((mut chain, farm, dapp)) = deployed() else { return };
    let account = get_account(&chain, 0).unwrap();
    let mut rng = rand::thread_rng();
    // up to the 100 DAPP the deployer keeps, at micro-token granularity
    let amount = U256::from(rng.gen_range(1..=100_000_000u64)) * U256::exp10(12);

    stake(&mut chain, &farm, &dapp, amount, account.into());
    let before = dapp.balance_of(&chain, account).unwrap();
    farm.issue_tokens(&mut chain, account.into()).unwrap();
    let reward = dapp.balance_of(&chain, account).unwrap() - before;

    assert_eq!(reward, amount * 2000u64);
}

#[test]
fn every_staker_is_paid() {
    let Some((mut chain, farm, dapp)) = deployed() else { return };
    let owner = get_account(&chain, 0).unwrap();
    let alice = get_account(&chain, 1).unwrap();
    dapp.transfer(&mut chain, alice, to_wei(10), owner.into()).unwrap();

    stake(&mut chain, &farm, &dapp, amount_staked(), owner.into());
    stake(&mut chain, &farm, &dapp, to_wei(2), alice.into());
    assert_eq!(farm.stakers(&chain, 1).unwrap(), alice);
    assert!(farm.stakers(&chain, 2).is_err());

    let alice_before = dapp.balance_of(&chain, alice).unwrap();
    farm.issue_tokens(&mut chain, owner.into()).unwrap();
    assert_eq!(dapp.balance_of(&chain, alice).unwrap(), alice_before + initial_value() * 2u64);
}

#[test]
fn unstake_returns_tokens_and_drops_staker() {
    let Some((mut chain, farm, dapp)) = deployed() else { return };
    let account = get_account(&chain, 0).unwrap();
    stake(&mut chain, &farm, &dapp, amount_staked(), account.into());

    farm.unstake_tokens(&mut chain, dapp.address(), account.into()).unwrap();

    assert_eq!(dapp.balance_of(&chain, account).unwrap(), kept_balance());
    assert!(farm.staking_balance(&chain, dapp.address(), account).unwrap().is_zero());
    assert_eq!(farm.unique_tokens_staked(&chain, account).unwrap(), 0);
    assert!(farm.all_stakers(&chain).unwrap().is_empty());

    let err = farm.unstake_tokens(&mut chain, dapp.address(), account.into()).unwrap_err();
    assert_eq!(err.revert_reason(), Some("Staking balance cannot be 0"));
}

#[test]
fn reverted_issue_changes_nothing_but_the_nonce() {
    let Some((mut chain, farm, dapp)) = deployed() else { return };
    let owner = get_account(&chain, 0).unwrap();
    let non_owner = get_account(&chain, 1).unwrap();
    stake(&mut chain, &farm, &dapp, amount_staked(), owner.into());
    let balance = dapp.balance_of(&chain, owner).unwrap();
    let nonce = chain.nonce(&non_owner).unwrap();

    let err = farm.issue_tokens(&mut chain, non_owner.into()).unwrap_err();
    let ChainError::VirtualMachine { tx_hash: Some(hash), .. } = &err else {
        panic!("expected a mined revert, got {err:?}");
    };

    let receipt = chain.receipt(hash).unwrap();
    assert_eq!(receipt.status, TxStatus::Reverted);
    assert!(receipt.logs.is_empty());
    assert_eq!(chain.nonce(&non_owner).unwrap(), nonce + 1);
    assert_eq!(dapp.balance_of(&chain, owner).unwrap(), balance);
    assert_eq!(farm.staking_balance(&chain, dapp.address(), owner).unwrap(), amount_staked());
}
