use std::str::FromStr;

use alloy::primitives::{Address, Signature};
use tracing::warn;

/// Wallet addresses are identity keys, so `0xABC...` and `0xabc...` must
/// resolve to the same row. Every lookup and insert goes through this.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Wallet-only accounts have no real mailbox; the email column is NOT NULL
/// and unique, so derive a deterministic placeholder from the address.
pub fn placeholder_email(normalized_address: &str) -> String {
    format!("{normalized_address}@wallet.local")
}

/// Message a wallet is asked to sign to prove key ownership.
pub fn wallet_auth_message(nonce: &str) -> String {
    format!("Sign this message to authenticate with Harbor: {nonce}")
}

/// Recover the signer of an EIP-191 personal message and compare it to the
/// claimed address, case-insensitively. Any parse or recovery failure is a
/// plain `false`, never an error.
pub fn verify_wallet_signature(address: &str, message: &str, signature: &str) -> bool {
    let claimed = match Address::from_str(address.trim()) {
        Ok(a) => a,
        Err(e) => {
            warn!(error = %e, "invalid wallet address");
            return false;
        }
    };
    let signature = match Signature::from_str(signature.trim()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "invalid wallet signature");
            return false;
        }
    };
    match signature.recover_address_from_msg(message) {
        Ok(recovered) => recovered == claimed,
        Err(e) => {
            warn!(error = %e, "wallet signature recovery failed");
            false
        }
    }
}
