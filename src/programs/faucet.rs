//! Bitcorn faucet: hands out a fixed amount of one mint to anyone who asks,
//! at most once per cooldown window.

use serde::{Deserialize, Serialize};

use crate::{
    error::ProgramError,
    ledger::{find_program_address, InstructionContext},
    models::{Address, BitcornFaucet, Mint, ProgramId, TokenAccount},
};

use super::token;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "instruction", rename_all = "snake_case")]
pub enum FaucetInstruction {
    InitFaucet {
        mint: Address,
    },
    DripBitcornTokens {
        mint: Address,
        user_token_account: Address,
    },
    ReplenishBitcornTokens {
        mint: Address,
        source_token_account: Address,
        amount: u64,
    },
}

impl FaucetInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            FaucetInstruction::InitFaucet { .. } => "InitFaucet",
            FaucetInstruction::DripBitcornTokens { .. } => "DripBitcornTokens",
            FaucetInstruction::ReplenishBitcornTokens { .. } => "ReplenishBitcornTokens",
        }
    }
}

pub fn process(
    ctx: &mut InstructionContext,
    instruction: &FaucetInstruction,
) -> Result<(), ProgramError> {
    match instruction {
        FaucetInstruction::InitFaucet { mint } => init_faucet(ctx, *mint).map(|_| ()),
        FaucetInstruction::DripBitcornTokens {
            mint,
            user_token_account,
        } => drip_bitcorn_tokens(ctx, *mint, *user_token_account),
        FaucetInstruction::ReplenishBitcornTokens {
            mint,
            source_token_account,
            amount,
        } => replenish_bitcorn_tokens(ctx, *mint, *source_token_account, *amount),
    }
}

/// Faucet address and bump for `mint`
pub fn faucet_address(mint: &Address) -> (Address, u8) {
    find_program_address(&[b"mint", mint.as_ref()], ProgramId::BitcornFaucet)
}

/// Token account holding the reserve of the faucet at `faucet`
pub fn vault_address(faucet: &Address) -> Address {
    find_program_address(&[b"vault", faucet.as_ref()], ProgramId::Token).0
}

/// Create the faucet for `mint` together with its empty vault
pub fn init_faucet(ctx: &mut InstructionContext, mint: Address) -> Result<Address, ProgramError> {
    ctx.load::<Mint>(&mint)?;

    let (faucet, bump) = faucet_address(&mint);
    let vault = vault_address(&faucet);

    let owner = ctx.signer();
    ctx.create(
        faucet,
        BitcornFaucet {
            bump,
            owner,
            mint,
            vault,
            last_withdraw: 0,
        },
    )?;
    token::create_token_account_at(ctx, vault, mint, faucet)?;

    ctx.log(format!("Program log: Faucet {} initialized for mint {}", faucet, mint));
    Ok(faucet)
}

/// Drips tokens to user
pub fn drip_bitcorn_tokens(
    ctx: &mut InstructionContext,
    mint: Address,
    user_token_account: Address,
) -> Result<(), ProgramError> {
    let (faucet_key, _) = faucet_address(&mint);
    let mut faucet = ctx.load::<BitcornFaucet>(&faucet_key)?;

    let destination = ctx.load::<TokenAccount>(&user_token_account)?;
    if faucet.mint != mint || destination.mint != faucet.mint {
        return Err(ProgramError::MintMismatch);
    }

    let now = ctx.now();
    if now - ctx.config().faucet_cooldown_secs <= faucet.last_withdraw {
        return Err(ProgramError::FaucetCooldown);
    }

    let amount = ctx
        .load::<Mint>(&mint)?
        .one_token()
        .and_then(|unit| unit.checked_mul(ctx.config().faucet_drip_amount))
        .ok_or(ProgramError::ArithmeticOverflow)?;

    token::transfer(ctx, faucet_key, faucet.vault, user_token_account, amount)?;

    faucet.last_withdraw = now;
    ctx.store(faucet_key, faucet)?;

    ctx.log(format!(
        "Program log: Dripped {} to {}",
        amount, user_token_account
    ));
    Ok(())
}

/// Refill the faucet vault from one of the signer's token accounts
pub fn replenish_bitcorn_tokens(
    ctx: &mut InstructionContext,
    mint: Address,
    source_token_account: Address,
    amount: u64,
) -> Result<(), ProgramError> {
    if amount == 0 {
        return Err(ProgramError::InvalidArgument(
            "amount must be greater than zero".to_string(),
        ));
    }

    let (faucet_key, _) = faucet_address(&mint);
    let faucet = ctx.load::<BitcornFaucet>(&faucet_key)?;

    let authority = ctx.signer();
    token::transfer(ctx, authority, source_token_account, faucet.vault, amount)?;

    ctx.log(format!("Program log: Faucet {} replenished with {}", faucet_key, amount));
    Ok(())
}
