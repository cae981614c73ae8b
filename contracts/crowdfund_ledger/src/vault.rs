//! Token movements in and out of the contract.
//!
//! The Stellar asset contract either completes a transfer or traps, and a trap
//! reverts every write made earlier in the same invocation. Callers therefore
//! commit their state change first and move funds last.

use soroban_sdk::{token, Address, Env};

use crate::storage;
use crate::Error;

/// Pull `amount` from `from` into the contract.
pub fn collect(env: &Env, from: &Address, amount: i128) -> Result<(), Error> {
    let token_address = storage::load_token(env)?;
    token::Client::new(env, &token_address).transfer(
        from,
        &env.current_contract_address(),
        &amount,
    );
    Ok(())
}

/// Pay `amount` held by the contract out to `to`.
pub fn pay(env: &Env, to: &Address, amount: i128) -> Result<(), Error> {
    let token_address = storage::load_token(env)?;
    token::Client::new(env, &token_address).transfer(
        &env.current_contract_address(),
        to,
        &amount,
    );
    Ok(())
}
