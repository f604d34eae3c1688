//! Program-derived addresses.
//!
//! A derived address is a hash of caller-chosen seeds, a bump byte and the
//! owning program's address. Only the program it is derived from can act as
//! its authority.

use sha2::{Digest, Sha256};

use crate::models::{Address, ProgramId};

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Derive the address for `seeds` with an explicit `bump`
pub fn create_program_address(seeds: &[&[u8]], bump: u8, program: ProgramId) -> Address {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program.address().as_bytes());
    hasher.update(PDA_MARKER);
    Address::new_from_array(hasher.finalize().into())
}

/// Find the canonical derived address and its bump.
///
/// Bumps are tried from 255 downwards; a candidate that collides with a
/// program address is skipped.
pub fn find_program_address(seeds: &[&[u8]], program: ProgramId) -> (Address, u8) {
    (0..=u8::MAX)
        .rev()
        .map(|bump| (create_program_address(seeds, bump, program), bump))
        .find(|(address, _)| !ProgramId::is_program_address(address))
        .unwrap_or_else(|| (create_program_address(seeds, 0, program), 0))
}
