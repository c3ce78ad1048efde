//! ERC20 token: `DappToken` and the `MockDAI` / `MockWETH` test tokens.
//!
//! Follows the OpenZeppelin reference behaviour, including its revert
//! strings and the non-decreasing `U256::MAX` allowance.

use crate::chain::{Devnet, TxOpts};
use crate::contracts::{ContractKind, ContractState};
use crate::primitives::{to_wei, Address, U256};
use crate::runtime::{require, CallFrame, Event, ExecutionContext, Receipt, RuntimeError};
use crate::utils::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Supply minted to the deployer of every devnet token, in whole tokens.
pub const INITIAL_SUPPLY_TOKENS: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20Storage {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
    pub balances: BTreeMap<Address, U256>,
    /// owner -> spender -> remaining allowance
    pub allowances: BTreeMap<Address, BTreeMap<Address, U256>>,
}

impl Erc20Storage {
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals: 18,
            total_supply: U256::zero(),
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    pub fn balance_of(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or_default()
    }

    // zero entries are dropped so equal states encode identically
    fn set_balance(&mut self, owner: Address, value: U256) {
        if value.is_zero() {
            self.balances.remove(&owner);
        } else {
            self.balances.insert(owner, value);
        }
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, value: U256) {
        let per_owner = self.allowances.entry(owner).or_default();
        if value.is_zero() {
            per_owner.remove(&spender);
        } else {
            per_owner.insert(spender, value);
        }
        if per_owner.is_empty() {
            self.allowances.remove(&owner);
        }
    }
}

fn move_balance(
    ctx: &mut ExecutionContext,
    token: Address,
    s: &mut Erc20Storage,
    from: Address,
    to: Address,
    amount: U256,
) -> std::result::Result<(), RuntimeError> {
    require(!from.is_zero(), "ERC20: transfer from the zero address")?;
    require(!to.is_zero(), "ERC20: transfer to the zero address")?;
    let from_balance = s.balance_of(&from);
    require(from_balance >= amount, "ERC20: transfer amount exceeds balance")?;
    s.set_balance(from, from_balance - amount);
    let to_balance = s.balance_of(&to).checked_add(amount).ok_or(RuntimeError::Overflow)?;
    s.set_balance(to, to_balance);
    ctx.emit(token, Event::Transfer { from, to, value: amount });
    Ok(())
}

fn set_approval(
    ctx: &mut ExecutionContext,
    token: Address,
    s: &mut Erc20Storage,
    owner: Address,
    spender: Address,
    amount: U256,
) -> std::result::Result<(), RuntimeError> {
    require(!owner.is_zero(), "ERC20: approve from the zero address")?;
    require(!spender.is_zero(), "ERC20: approve to the zero address")?;
    s.set_allowance(owner, spender, amount);
    ctx.emit(token, Event::Approval { owner, spender, value: amount });
    Ok(())
}

/// Credit freshly minted tokens to `to`.
pub fn mint(
    ctx: &mut ExecutionContext,
    token: Address,
    s: &mut Erc20Storage,
    to: Address,
    amount: U256,
) -> std::result::Result<(), RuntimeError> {
    require(!to.is_zero(), "ERC20: mint to the zero address")?;
    s.total_supply = s.total_supply.checked_add(amount).ok_or(RuntimeError::Overflow)?;
    let balance = s.balance_of(&to).checked_add(amount).ok_or(RuntimeError::Overflow)?;
    s.set_balance(to, balance);
    ctx.emit(token, Event::Transfer { from: Address::ZERO, to, value: amount });
    Ok(())
}

/// Constructor shared by every devnet token: mint the whole supply to the deployer.
pub fn construct(
    ctx: &mut ExecutionContext,
    frame: CallFrame,
    name: &str,
    symbol: &str,
) -> std::result::Result<ContractState, RuntimeError> {
    let mut s = Erc20Storage::new(name, symbol);
    mint(ctx, frame.this, &mut s, frame.caller, to_wei(INITIAL_SUPPLY_TOKENS))?;
    Ok(ContractState::Erc20(s))
}

/// `transfer(to, amount)` sent by `frame.caller` to token `frame.this`.
pub fn transfer(
    ctx: &mut ExecutionContext,
    frame: CallFrame,
    to: Address,
    amount: U256,
) -> std::result::Result<(), RuntimeError> {
    let mut s = ctx.load::<Erc20Storage>(frame.this)?;
    move_balance(ctx, frame.this, &mut s, frame.caller, to, amount)?;
    ctx.save(frame.this, s)
}

pub fn approve(
    ctx: &mut ExecutionContext,
    frame: CallFrame,
    spender: Address,
    amount: U256,
) -> std::result::Result<(), RuntimeError> {
    let mut s = ctx.load::<Erc20Storage>(frame.this)?;
    set_approval(ctx, frame.this, &mut s, frame.caller, spender, amount)?;
    ctx.save(frame.this, s)
}

/// `transferFrom(from, to, amount)`; the spender is `frame.caller`.
pub fn transfer_from(
    ctx: &mut ExecutionContext,
    frame: CallFrame,
    from: Address,
    to: Address,
    amount: U256,
) -> std::result::Result<(), RuntimeError> {
    let mut s = ctx.load::<Erc20Storage>(frame.this)?;
    let current = s.allowance(&from, &frame.caller);
    if current != U256::MAX {
        require(current >= amount, "ERC20: insufficient allowance")?;
        set_approval(ctx, frame.this, &mut s, from, frame.caller, current - amount)?;
    }
    move_balance(ctx, frame.this, &mut s, from, to, amount)?;
    ctx.save(frame.this, s)
}

pub fn increase_allowance(
    ctx: &mut ExecutionContext,
    frame: CallFrame,
    spender: Address,
    added: U256,
) -> std::result::Result<(), RuntimeError> {
    let mut s = ctx.load::<Erc20Storage>(frame.this)?;
    let value = s
        .allowance(&frame.caller, &spender)
        .checked_add(added)
        .ok_or(RuntimeError::Overflow)?;
    set_approval(ctx, frame.this, &mut s, frame.caller, spender, value)?;
    ctx.save(frame.this, s)
}

pub fn decrease_allowance(
    ctx: &mut ExecutionContext,
    frame: CallFrame,
    spender: Address,
    subtracted: U256,
) -> std::result::Result<(), RuntimeError> {
    let mut s = ctx.load::<Erc20Storage>(frame.this)?;
    let current = s.allowance(&frame.caller, &spender);
    require(current >= subtracted, "ERC20: decreased allowance below zero")?;
    set_approval(ctx, frame.this, &mut s, frame.caller, spender, current - subtracted)?;
    ctx.save(frame.this, s)
}

/// Handle to a deployed ERC20 token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Erc20 {
    address: Address,
}

impl Erc20 {
    pub fn at(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn deploy(chain: &mut Devnet, kind: ContractKind, name: &str, symbol: &str, opts: TxOpts) -> Result<Self> {
        let (address, _) = chain.deploy(opts.from, kind, |ctx, frame| construct(ctx, frame, name, symbol))?;
        Ok(Self { address })
    }

    /// `DappToken`: "Dapp Token" / "DAPP", the farm's reward token.
    pub fn deploy_dapp_token(chain: &mut Devnet, opts: TxOpts) -> Result<Self> {
        Self::deploy(chain, ContractKind::DappToken, "Dapp Token", "DAPP", opts)
    }

    pub fn deploy_mock_dai(chain: &mut Devnet, opts: TxOpts) -> Result<Self> {
        Self::deploy(chain, ContractKind::MockDai, "Mock DAI", "DAI", opts)
    }

    pub fn deploy_mock_weth(chain: &mut Devnet, opts: TxOpts) -> Result<Self> {
        Self::deploy(chain, ContractKind::MockWeth, "Mock WETH", "WETH", opts)
    }

    pub fn name(&self, chain: &Devnet) -> Result<String> {
        chain.view(self.address, |s: &Erc20Storage| s.name.clone())
    }

    pub fn symbol(&self, chain: &Devnet) -> Result<String> {
        chain.view(self.address, |s: &Erc20Storage| s.symbol.clone())
    }

    pub fn decimals(&self, chain: &Devnet) -> Result<u8> {
        chain.view(self.address, |s: &Erc20Storage| s.decimals)
    }

    pub fn total_supply(&self, chain: &Devnet) -> Result<U256> {
        chain.view(self.address, |s: &Erc20Storage| s.total_supply)
    }

    pub fn balance_of(&self, chain: &Devnet, owner: Address) -> Result<U256> {
        chain.view(self.address, |s: &Erc20Storage| s.balance_of(&owner))
    }

    pub fn allowance(&self, chain: &Devnet, owner: Address, spender: Address) -> Result<U256> {
        chain.view(self.address, |s: &Erc20Storage| s.allowance(&owner, &spender))
    }

    pub fn transfer(&self, chain: &mut Devnet, to: Address, amount: U256, opts: TxOpts) -> Result<Receipt> {
        let (_, receipt) = chain.transact(opts.from, self.address, |ctx, frame| transfer(ctx, frame, to, amount))?;
        Ok(receipt)
    }

    pub fn approve(&self, chain: &mut Devnet, spender: Address, amount: U256, opts: TxOpts) -> Result<Receipt> {
        let (_, receipt) = chain.transact(opts.from, self.address, |ctx, frame| approve(ctx, frame, spender, amount))?;
        Ok(receipt)
    }

    pub fn transfer_from(
        &self,
        chain: &mut Devnet,
        from: Address,
        to: Address,
        amount: U256,
        opts: TxOpts,
    ) -> Result<Receipt> {
        let (_, receipt) =
            chain.transact(opts.from, self.address, |ctx, frame| transfer_from(ctx, frame, from, to, amount))?;
        Ok(receipt)
    }

    pub fn increase_allowance(&self, chain: &mut Devnet, spender: Address, added: U256, opts: TxOpts) -> Result<Receipt> {
        let (_, receipt) =
            chain.transact(opts.from, self.address, |ctx, frame| increase_allowance(ctx, frame, spender, added))?;
        Ok(receipt)
    }

    pub fn decrease_allowance(
        &self,
        chain: &mut Devnet,
        spender: Address,
        subtracted: U256,
        opts: TxOpts,
    ) -> Result<Receipt> {
        let (_, receipt) = chain
            .transact(opts.from, self.address, |ctx, frame| decrease_allowance(ctx, frame, spender, subtracted))?;
        Ok(receipt)
    }
}
