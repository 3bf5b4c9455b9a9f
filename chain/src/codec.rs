//! Calldata codec for the fixed contract surface.
//!
//! Encodes calls to, and decodes returns from, the seven methods the client
//! uses on the token and voting contracts. Selectors are derived at runtime
//! from the canonical signatures via `keccak256(sig)[..4]`, and arguments are
//! packed as 32-byte words per the contract ABI convention. This is a
//! fixed-surface codec, not a general ABI implementation.

use alloy_primitives::{keccak256, U256};

use votelock_types::{LockupSlot, Timestamp, TokenAmount, WalletAddress};

use crate::error::ChainError;

/// ABI word size in bytes.
const WORD: usize = 32;

// ── Canonical method signatures ────────────────────────────────────────

const SIG_BALANCE_OF: &str = "balanceOf(address)";
const SIG_ALLOWANCE: &str = "allowance(address,address)";
const SIG_APPROVE: &str = "approve(address,uint256)";
const SIG_DELEGATES: &str = "delegates(address)";
const SIG_GET_LOCKUP: &str = "getLockup(address,uint256)";
const SIG_EXTEND_FOR_SENDER: &str = "extendForSender(uint256,uint256,uint128)";
const SIG_MERGE: &str = "merge(uint256[])";

/// First four bytes of the keccak-256 hash of a canonical signature.
fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

// ── Word packing ───────────────────────────────────────────────────────

fn push_word_u256(out: &mut Vec<u8>, value: U256) {
    out.extend_from_slice(&value.to_be_bytes::<WORD>());
}

fn push_word_u64(out: &mut Vec<u8>, value: u64) {
    push_word_u256(out, U256::from(value));
}

fn push_word_address(out: &mut Vec<u8>, address: WalletAddress) {
    out.extend_from_slice(&[0u8; 12]);
    out.extend_from_slice(address.raw().as_slice());
}

// ── Encoding ───────────────────────────────────────────────────────────

pub fn encode_balance_of(owner: WalletAddress) -> Vec<u8> {
    let mut data = selector(SIG_BALANCE_OF).to_vec();
    push_word_address(&mut data, owner);
    data
}

pub fn encode_allowance(owner: WalletAddress, spender: WalletAddress) -> Vec<u8> {
    let mut data = selector(SIG_ALLOWANCE).to_vec();
    push_word_address(&mut data, owner);
    push_word_address(&mut data, spender);
    data
}

pub fn encode_approve(spender: WalletAddress, amount: TokenAmount) -> Vec<u8> {
    let mut data = selector(SIG_APPROVE).to_vec();
    push_word_address(&mut data, spender);
    push_word_u256(&mut data, amount.raw());
    data
}

pub fn encode_delegates(account: WalletAddress) -> Vec<u8> {
    let mut data = selector(SIG_DELEGATES).to_vec();
    push_word_address(&mut data, account);
    data
}

pub fn encode_get_lockup(staker: WalletAddress, index: u64) -> Vec<u8> {
    let mut data = selector(SIG_GET_LOCKUP).to_vec();
    push_word_address(&mut data, staker);
    push_word_u64(&mut data, index);
    data
}

pub fn encode_extend_for_sender(
    lockup_id: u64,
    duration_secs: u64,
    amount: TokenAmount,
) -> Vec<u8> {
    let mut data = selector(SIG_EXTEND_FOR_SENDER).to_vec();
    push_word_u64(&mut data, lockup_id);
    push_word_u64(&mut data, duration_secs);
    push_word_u256(&mut data, amount.raw());
    data
}

/// Encode `merge(uint256[])`. The dynamic array is a head word (offset to the
/// tail), then the element count, then one word per index.
pub fn encode_merge(indices: &[u64]) -> Vec<u8> {
    let mut data = selector(SIG_MERGE).to_vec();
    push_word_u64(&mut data, WORD as u64); // offset of the array tail
    push_word_u64(&mut data, indices.len() as u64);
    for &index in indices {
        push_word_u64(&mut data, index);
    }
    data
}

// ── Decoding ───────────────────────────────────────────────────────────

fn word_at(data: &[u8], index: usize) -> Result<U256, ChainError> {
    data.get(index * WORD..(index + 1) * WORD)
        .map(U256::from_be_slice)
        .ok_or_else(|| {
            ChainError::InvalidResponse(format!(
                "return data too short: {} bytes, wanted word {index}",
                data.len()
            ))
        })
}

/// Decode a single-word uint256 return (balanceOf, allowance).
pub fn decode_amount(data: &[u8]) -> Result<TokenAmount, ChainError> {
    word_at(data, 0).map(TokenAmount::new)
}

/// Decode a single-word address return (delegates).
pub fn decode_address(data: &[u8]) -> Result<WalletAddress, ChainError> {
    let word = word_at(data, 0)?;
    let bytes = word.to_be_bytes::<WORD>();
    if bytes[..12] != [0u8; 12] {
        return Err(ChainError::InvalidResponse(
            "address word has nonzero padding".to_string(),
        ));
    }
    Ok(WalletAddress::new(alloy_primitives::Address::from_slice(
        &bytes[12..],
    )))
}

/// Decode the `getLockup` return: a static tuple of
/// `(uint128 amount, uint128 end, uint256 votes)` laid out inline.
pub fn decode_lockup(data: &[u8]) -> Result<LockupSlot, ChainError> {
    let amount = word_at(data, 0)?;
    let end = word_at(data, 1)?;
    let votes = word_at(data, 2)?;
    let end = u64::try_from(end)
        .map_err(|_| ChainError::InvalidResponse(format!("lockup end {end} exceeds u64")))?;
    Ok(LockupSlot {
        amount: TokenAmount::new(amount),
        end: Timestamp::new(end),
        votes: TokenAmount::new(votes),
    })
}
