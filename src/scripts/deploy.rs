use crate::chain::{Devnet, TxOpts};
use crate::contracts::{Erc20, TokenFarm};
use crate::primitives::{to_wei, Address, U256};
use crate::scripts::helpful_scripts::{get_account, get_contract};
use crate::utils::Result;
use tracing::info;

/// DappToken the deployer keeps; the rest of the supply funds the farm.
pub const KEPT_BALANCE_TOKENS: u64 = 100;

pub fn kept_balance() -> U256 {
    to_wei(KEPT_BALANCE_TOKENS)
}

/// Deploy DappToken and TokenFarm from account 0, fund the farm, and allow
/// DappToken, FAU and WETH with their price feeds.
pub fn deploy_token_farm_and_dapp_token(chain: &mut Devnet) -> Result<(TokenFarm, Erc20)> {
    let account = get_account(chain, 0)?;
    let opts = TxOpts::from(account);

    let dapp_token = Erc20::deploy_dapp_token(chain, opts)?;
    let token_farm = TokenFarm::deploy(chain, dapp_token.address(), opts)?;

    let supply = dapp_token.total_supply(chain)?;
    dapp_token.transfer(chain, token_farm.address(), supply - kept_balance(), opts)?;

    let weth_token = get_contract(chain, "weth_token")?;
    let fau_token = get_contract(chain, "fau_token")?;
    let dai_usd = get_contract(chain, "dai_usd_price_feed")?;
    let eth_usd = get_contract(chain, "eth_usd_price_feed")?;
    let allowed = [
        (dapp_token.address(), dai_usd),
        (fau_token, dai_usd),
        (weth_token, eth_usd),
    ];
    add_allowed_tokens(chain, &token_farm, &allowed, account)?;

    info!("TokenFarm {} deployed with DappToken {}", token_farm.address(), dapp_token.address());
    Ok((token_farm, dapp_token))
}

/// Allow each `(token, price_feed)` pair on `token_farm`.
pub fn add_allowed_tokens(
    chain: &mut Devnet,
    token_farm: &TokenFarm,
    tokens: &[(Address, Address)],
    account: Address,
) -> Result<()> {
    for (token, price_feed) in tokens {
        token_farm.add_allowed_tokens(chain, *token, account.into())?;
        token_farm.set_price_feed_contract(chain, *token, *price_feed, account.into())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::erc20::INITIAL_SUPPLY_TOKENS;

    #[test]
    fn deploy_funds_farm_and_keeps_balance() {
        let mut chain = Devnet::development();
        let (farm, dapp) = deploy_token_farm_and_dapp_token(&mut chain).unwrap();
        let account = chain.account(0).unwrap();

        assert_eq!(dapp.balance_of(&chain, account).unwrap(), kept_balance());
        assert_eq!(
            dapp.balance_of(&chain, farm.address()).unwrap(),
            to_wei(INITIAL_SUPPLY_TOKENS) - kept_balance()
        );
        assert_eq!(farm.dapp_token(&chain).unwrap(), dapp.address());
        assert!(farm.token_is_allowed(&chain, dapp.address()).unwrap());

        let eth_usd = get_contract(&mut chain, "eth_usd_price_feed").unwrap();
        let weth = get_contract(&mut chain, "weth_token").unwrap();
        assert_eq!(farm.allowed_tokens(&chain, 2).unwrap(), weth);
        assert_eq!(farm.token_price_feed_mapping(&chain, weth).unwrap(), eth_usd);
    }
}
