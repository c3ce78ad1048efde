use crate::primitives::Address;
use crate::runtime::{require, CallFrame, Event, ExecutionContext, RuntimeError};
use serde::{Deserialize, Serialize};

pub const NOT_OWNER: &str = "Ownable: caller is not the owner";

/// Single-owner access control embedded in a contract's storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    /// Ownership starts with the deploying account.
    pub fn new(ctx: &mut ExecutionContext, frame: CallFrame) -> Self {
        ctx.emit(frame.this, Event::OwnershipTransferred { previous_owner: Address::ZERO, new_owner: frame.caller });
        Self { owner: frame.caller }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn only_owner(&self, caller: Address) -> Result<(), RuntimeError> {
        require(caller == self.owner, NOT_OWNER)
    }

    pub fn transfer_ownership(
        &mut self,
        ctx: &mut ExecutionContext,
        frame: CallFrame,
        new_owner: Address,
    ) -> Result<(), RuntimeError> {
        self.only_owner(frame.caller)?;
        require(!new_owner.is_zero(), "Ownable: new owner is the zero address")?;
        self.set_owner(ctx, frame.this, new_owner);
        Ok(())
    }

    /// Leaves the contract without an owner; owner-only calls revert forever after.
    pub fn renounce_ownership(&mut self, ctx: &mut ExecutionContext, frame: CallFrame) -> Result<(), RuntimeError> {
        self.only_owner(frame.caller)?;
        self.set_owner(ctx, frame.this, Address::ZERO);
        Ok(())
    }

    fn set_owner(&mut self, ctx: &mut ExecutionContext, this: Address, new_owner: Address) {
        let previous_owner = self.owner;
        self.owner = new_owner;
        ctx.emit(this, Event::OwnershipTransferred { previous_owner, new_owner });
    }
}
