use std::collections::HashMap;

use crate::{
    error::ProgramError,
    models::{Account, AccountRecord, Address},
};

use super::ProgramConfig;

/// Pending write for one address; `None` closes the account
pub type AccountWrite = (Address, Option<Account>);

/// Everything an instruction can see and touch while a transaction runs.
///
/// Reads go through the buffered writes first and then to the committed
/// accounts. Nothing reaches the ledger until the whole transaction succeeds.
pub struct InstructionContext<'a> {
    accounts: &'a HashMap<Address, Account>,
    pending: HashMap<Address, Option<Account>>,
    write_order: Vec<Address>,
    created: Vec<Address>,
    logs: Vec<String>,
    signer: Address,
    now: i64,
    config: &'a ProgramConfig,
}

impl<'a> InstructionContext<'a> {
    pub fn new(
        accounts: &'a HashMap<Address, Account>,
        signer: Address,
        now: i64,
        config: &'a ProgramConfig,
    ) -> Self {
        Self {
            accounts,
            pending: HashMap::new(),
            write_order: Vec::new(),
            created: Vec::new(),
            logs: Vec::new(),
            signer,
            now,
            config,
        }
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Unix timestamp of the block this transaction lands in
    pub fn now(&self) -> i64 {
        self.now
    }

    pub fn config(&self) -> &ProgramConfig {
        self.config
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.logs.push(message.into());
    }

    pub fn get(&self, address: &Address) -> Option<&Account> {
        match self.pending.get(address) {
            Some(pending) => pending.as_ref(),
            None => self.accounts.get(address),
        }
    }

    pub fn exists(&self, address: &Address) -> bool {
        self.get(address).is_some()
    }

    /// Load a typed record, checking type and owning program
    pub fn load<T: AccountRecord>(&self, address: &Address) -> Result<T, ProgramError> {
        let account = self
            .get(address)
            .ok_or(ProgramError::AccountNotFound(*address))?;
        if account.owner != T::OWNER {
            return Err(ProgramError::IllegalOwner {
                address: *address,
                program: T::OWNER,
            });
        }
        T::from_data(&account.data)
            .cloned()
            .ok_or(ProgramError::AccountTypeMismatch {
                address: *address,
                expected: T::KIND,
            })
    }

    /// Initialize a new account; fails if anything already lives at `address`
    pub fn create<T: AccountRecord>(
        &mut self,
        address: Address,
        record: T,
    ) -> Result<(), ProgramError> {
        if self.exists(&address) {
            return Err(ProgramError::AccountAlreadyInUse(address));
        }
        self.created.push(address);
        self.write(address, Some(Account::new(T::OWNER, record.into_data())));
        Ok(())
    }

    /// Overwrite an existing account's record
    pub fn store<T: AccountRecord>(
        &mut self,
        address: Address,
        record: T,
    ) -> Result<(), ProgramError> {
        self.load::<T>(&address)?;
        self.write(address, Some(Account::new(T::OWNER, record.into_data())));
        Ok(())
    }

    /// Close an account of type `T`
    pub fn close<T: AccountRecord>(&mut self, address: Address) -> Result<(), ProgramError> {
        self.load::<T>(&address)?;
        self.created.retain(|a| *a != address);
        self.write(address, None);
        Ok(())
    }

    fn write(&mut self, address: Address, account: Option<Account>) {
        if !self.write_order.contains(&address) {
            self.write_order.push(address);
        }
        self.pending.insert(address, account);
    }

    /// Consume the context, returning the writes in first-touch order,
    /// the addresses created and the collected logs
    pub fn finish(mut self) -> (Vec<AccountWrite>, Vec<Address>, Vec<String>) {
        let writes = self
            .write_order
            .iter()
            .filter_map(|address| {
                self.pending
                    .remove(address)
                    .map(|account| (*address, account))
            })
            .collect();
        (writes, self.created, self.logs)
    }

    /// Consume the context keeping only the logs (transaction failed)
    pub fn into_logs(self) -> Vec<String> {
        self.logs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Mint, ProgramId, TokenAccount};

    fn mint(authority: Address) -> Mint {
        Mint {
            mint_authority: authority,
            decimals: 0,
            supply: 0,
        }
    }

    #[test]
    fn test_reads_see_pending_writes() {
        let accounts = HashMap::new();
        let config = ProgramConfig::default();
        let signer = Address::new_unique();
        let mut ctx = InstructionContext::new(&accounts, signer, 0, &config);

        let address = Address::new_unique();
        ctx.create(address, mint(signer)).unwrap();
        assert_eq!(ctx.load::<Mint>(&address).unwrap().mint_authority, signer);

        let (writes, created, _) = ctx.finish();
        assert_eq!(writes.len(), 1);
        assert_eq!(created, vec![address]);
    }

    #[test]
    fn test_create_twice_fails() {
        let accounts = HashMap::new();
        let config = ProgramConfig::default();
        let mut ctx = InstructionContext::new(&accounts, Address::new_unique(), 0, &config);
        let address = Address::new_unique();

        ctx.create(address, mint(Address::new_unique())).unwrap();
        assert_eq!(
            ctx.create(address, mint(Address::new_unique())),
            Err(ProgramError::AccountAlreadyInUse(address))
        );
    }

    #[test]
    fn test_load_wrong_type() {
        let address = Address::new_unique();
        let mut accounts = HashMap::new();
        accounts.insert(
            address,
            Account::new(
                ProgramId::Token,
                crate::models::AccountData::Mint(mint(Address::new_unique())),
            ),
        );
        let config = ProgramConfig::default();
        let ctx = InstructionContext::new(&accounts, Address::new_unique(), 0, &config);

        assert_eq!(
            ctx.load::<TokenAccount>(&address),
            Err(ProgramError::AccountTypeMismatch {
                address,
                expected: "token_account"
            })
        );
    }

    #[test]
    fn test_close_removes_account() {
        let address = Address::new_unique();
        let mut accounts = HashMap::new();
        accounts.insert(
            address,
            Account::new(
                ProgramId::Token,
                crate::models::AccountData::Mint(mint(Address::new_unique())),
            ),
        );
        let config = ProgramConfig::default();
        let mut ctx = InstructionContext::new(&accounts, Address::new_unique(), 0, &config);

        ctx.close::<Mint>(address).unwrap();
        assert!(!ctx.exists(&address));
        let (writes, _, _) = ctx.finish();
        assert_eq!(writes, vec![(address, None)]);
    }
}
