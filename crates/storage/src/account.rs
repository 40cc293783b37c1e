use pex_types::{Account, Address, U256};

use crate::{error::StoreError, rabbit::RabbitContext};

const ACCOUNT_PREFIX: &[u8] = b"acct/";

fn account_key(addr: &Address) -> Vec<u8> {
    let mut key = Vec::with_capacity(ACCOUNT_PREFIX.len() + 20);
    key.extend_from_slice(ACCOUNT_PREFIX);
    key.extend_from_slice(addr.as_slice());
    key
}

/// `true` if `addr` has ever been written to this context's base store,
/// distinct from reading a default-zero [`Account`] back for an address that
/// was never funded.
pub fn account_exists(ctx: &mut RabbitContext, addr: &Address) -> bool {
    ctx.get(&account_key(addr)).is_some()
}

pub fn get_account(ctx: &mut RabbitContext, addr: &Address) -> Result<Account, StoreError> {
    match ctx.get(&account_key(addr)) {
        Some(bytes) => Ok(bincode::deserialize(&bytes)?),
        None => Ok(Account::zero()),
    }
}

pub fn set_account(ctx: &mut RabbitContext, addr: &Address, account: &Account) {
    let bytes = bincode::serialize(account).expect("Account is always bincode-encodable");
    ctx.set(&account_key(addr), bytes);
}

/// Deduct `amount` from `addr`'s balance, failing if the balance is
/// insufficient rather than saturating or going negative.
pub fn sub_balance(
    ctx: &mut RabbitContext,
    addr: &Address,
    amount: U256,
) -> Result<(), StoreError> {
    let mut account = get_account(ctx, addr)?;
    if account.balance < amount {
        return Err(StoreError::InsufficientBalance {
            balance: account.balance.to_string(),
            amount: amount.to_string(),
        });
    }
    account.balance -= amount;
    set_account(ctx, addr, &account);
    Ok(())
}

pub fn add_balance(ctx: &mut RabbitContext, addr: &Address, amount: U256) -> Result<(), StoreError> {
    let mut account = get_account(ctx, addr)?;
    account.balance = account
        .balance
        .checked_add(amount)
        .expect("account balance overflowed U256");
    set_account(ctx, addr, &account);
    Ok(())
}
