//! Minimal token program: mints, token accounts, minting and transfers.

use serde::{Deserialize, Serialize};

use crate::{
    error::ProgramError,
    ledger::{find_program_address, InstructionContext},
    models::{token::MAX_DECIMALS, Address, Mint, ProgramId, TokenAccount},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "instruction", rename_all = "snake_case")]
pub enum TokenInstruction {
    CreateMint {
        decimals: u8,
    },
    CreateTokenAccount {
        mint: Address,
        owner: Address,
    },
    MintTo {
        mint: Address,
        destination: Address,
        amount: u64,
    },
    Transfer {
        source: Address,
        destination: Address,
        amount: u64,
    },
}

impl TokenInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            TokenInstruction::CreateMint { .. } => "CreateMint",
            TokenInstruction::CreateTokenAccount { .. } => "CreateTokenAccount",
            TokenInstruction::MintTo { .. } => "MintTo",
            TokenInstruction::Transfer { .. } => "Transfer",
        }
    }
}

pub fn process(ctx: &mut InstructionContext, instruction: &TokenInstruction) -> Result<(), ProgramError> {
    match instruction {
        TokenInstruction::CreateMint { decimals } => create_mint(ctx, *decimals).map(|_| ()),
        TokenInstruction::CreateTokenAccount { mint, owner } => {
            create_token_account(ctx, *mint, *owner).map(|_| ())
        }
        TokenInstruction::MintTo {
            mint,
            destination,
            amount,
        } => mint_to(ctx, *mint, *destination, *amount),
        TokenInstruction::Transfer {
            source,
            destination,
            amount,
        } => {
            let authority = ctx.signer();
            transfer(ctx, authority, *source, *destination, *amount)
        }
    }
}

/// Address of `owner`'s token account for `mint`
pub fn associated_token_address(owner: &Address, mint: &Address) -> Address {
    find_program_address(&[owner.as_ref(), b"token", mint.as_ref()], ProgramId::Token).0
}

/// Create a new mint with the signer as mint authority
pub fn create_mint(ctx: &mut InstructionContext, decimals: u8) -> Result<Address, ProgramError> {
    if decimals > MAX_DECIMALS {
        return Err(ProgramError::InvalidArgument(format!(
            "decimals must be at most {}",
            MAX_DECIMALS
        )));
    }

    let address = Address::new_unique();
    let mint = Mint {
        mint_authority: ctx.signer(),
        decimals,
        supply: 0,
    };
    ctx.create(address, mint)?;
    ctx.log(format!("Program log: Created mint {}", address));
    Ok(address)
}

/// Create `owner`'s associated token account for `mint`
pub fn create_token_account(
    ctx: &mut InstructionContext,
    mint: Address,
    owner: Address,
) -> Result<Address, ProgramError> {
    let address = associated_token_address(&owner, &mint);
    create_token_account_at(ctx, address, mint, owner)?;
    Ok(address)
}

/// Create an empty token account at an already derived address
pub(crate) fn create_token_account_at(
    ctx: &mut InstructionContext,
    address: Address,
    mint: Address,
    owner: Address,
) -> Result<(), ProgramError> {
    ctx.load::<Mint>(&mint)?;
    ctx.create(
        address,
        TokenAccount {
            mint,
            owner,
            amount: 0,
        },
    )?;
    ctx.log(format!("Program log: Created token account {}", address));
    Ok(())
}

pub fn mint_to(
    ctx: &mut InstructionContext,
    mint_address: Address,
    destination: Address,
    amount: u64,
) -> Result<(), ProgramError> {
    let mut mint = ctx.load::<Mint>(&mint_address)?;
    if mint.mint_authority != ctx.signer() {
        return Err(ProgramError::Unauthorized(mint.mint_authority));
    }

    let mut account = ctx.load::<TokenAccount>(&destination)?;
    if account.mint != mint_address {
        return Err(ProgramError::AccountMintMismatch(destination));
    }

    mint.supply = mint
        .supply
        .checked_add(amount)
        .ok_or(ProgramError::ArithmeticOverflow)?;
    account.amount = account
        .amount
        .checked_add(amount)
        .ok_or(ProgramError::ArithmeticOverflow)?;

    ctx.store(mint_address, mint)?;
    ctx.store(destination, account)?;
    ctx.log(format!("Program log: Minted {} to {}", amount, destination));
    Ok(())
}

/// Move `amount` from `source` to `destination`.
///
/// `authority` must own `source`; programs pass their derived address here
/// to move tokens held by that address.
pub fn transfer(
    ctx: &mut InstructionContext,
    authority: Address,
    source: Address,
    destination: Address,
    amount: u64,
) -> Result<(), ProgramError> {
    let mut from = ctx.load::<TokenAccount>(&source)?;
    if from.owner != authority {
        return Err(ProgramError::Unauthorized(from.owner));
    }

    let mut to = ctx.load::<TokenAccount>(&destination)?;
    if from.mint != to.mint {
        return Err(ProgramError::AccountMintMismatch(destination));
    }

    if from.amount < amount {
        return Err(ProgramError::InsufficientFunds {
            needed: amount,
            available: from.amount,
        });
    }

    if source == destination {
        return Ok(());
    }

    from.amount -= amount;
    to.amount = to
        .amount
        .checked_add(amount)
        .ok_or(ProgramError::ArithmeticOverflow)?;

    ctx.store(source, from)?;
    ctx.store(destination, to)?;
    ctx.log(format!(
        "Program log: Transfer {} from {} to {}",
        amount, source, destination
    ));
    Ok(())
}
