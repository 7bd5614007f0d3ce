#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, String, Vec,
};


const TX_SEQ: soroban_sdk::Symbol = symbol_short!("TXSEQ");

// Card numbers are checked after stripping '-' and ' ' separators.
const MIN_CARD_DIGITS: usize = 13;
const MAX_CARD_DIGITS: usize = 19;
const MAX_NUMBER_LEN: usize = 32;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CardInput {
    pub number: String,
    /// Expiry in MM/YY form.
    pub expiry: String,
    pub cvv: String,
    pub holder: String,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum CardError {
    InvalidNumber = 1,
    InvalidExpiryFormat = 2,
    CardExpired = 3,
    InvalidCvv = 4,
    InvalidHolder = 5,
}

/// Outcome of card validation. Every rule is evaluated independently so the
/// caller can surface all violations at once.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<CardError>,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PaymentMethod {
    Card = 0,
}

/// Proof of payment consumed by the enrollment contract. Receipts are
/// ephemeral: this contract does not persist them after issuance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaymentReceipt {
    pub tx_id: u64,
    pub method: PaymentMethod,
    pub amount: i128,
    pub currency: String,
    pub paid_at: u64,
    pub card_last4: String,
}

#[contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PaymentError {
    InvalidAmount = 1,
    ValidationFailed = 2,
}

#[contract]
pub struct PaymentContract;

impl PaymentContract {
    /// Allocate the next synthetic transaction id.
    fn next_tx_id(env: &Env) -> u64 {
        let next: u64 = env.storage().instance().get(&TX_SEQ).unwrap_or(0u64) + 1;
        env.storage().instance().set(&TX_SEQ, &next);
        next
    }

    /// Copy a soroban string into a fixed buffer, or None if it does not fit.
    fn read_bytes<'a>(s: &String, buf: &'a mut [u8]) -> Option<&'a [u8]> {
        let len = s.len() as usize;
        if len > buf.len() {
            return None;
        }
        s.copy_into_slice(&mut buf[..len]);
        Some(&buf[..len])
    }

    /// Extract the card digits, skipping '-' and ' ' separators. Returns the
    /// digit count, or None when a foreign character appears or the count is
    /// outside the accepted card-number range.
    fn card_digits(number: &String, out: &mut [u8; MAX_CARD_DIGITS]) -> Option<usize> {
        let mut raw = [0u8; MAX_NUMBER_LEN];
        let raw = Self::read_bytes(number, &mut raw)?;
        let mut n = 0;
        for &b in raw {
            match b {
                b'0'..=b'9' => {
                    if n == MAX_CARD_DIGITS {
                        return None;
                    }
                    out[n] = b;
                    n += 1;
                }
                b'-' | b' ' => {}
                _ => return None,
            }
        }
        if n < MIN_CARD_DIGITS {
            return None;
        }
        Some(n)
    }

    /// Parse "MM/YY" into (month, full year).
    fn parse_expiry(expiry: &String) -> Option<(u32, u32)> {
        if expiry.len() != 5 {
            return None;
        }
        let mut buf = [0u8; 5];
        expiry.copy_into_slice(&mut buf);
        if buf[2] != b'/' {
            return None;
        }
        let digit = |b: u8| -> Option<u32> {
            if b.is_ascii_digit() {
                Some((b - b'0') as u32)
            } else {
                None
            }
        };
        let month = digit(buf[0])? * 10 + digit(buf[1])?;
        let year = 2000 + digit(buf[3])? * 10 + digit(buf[4])?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some((month, year))
    }

    fn cvv_ok(cvv: &String) -> bool {
        let len = cvv.len() as usize;
        if !(3..=4).contains(&len) {
            return false;
        }
        let mut buf = [0u8; 4];
        cvv.copy_into_slice(&mut buf[..len]);
        buf[..len].iter().all(|b| b.is_ascii_digit())
    }

    /// Current (year, month) derived from the ledger Unix timestamp using
    /// era-based civil-date arithmetic.
    fn civil_year_month(ts: u64) -> (u32, u32) {
        let z = (ts / 86_400) as i64 + 719_468;
        let era = z / 146_097;
        let doe = z % 146_097;
        let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let m = if mp < 10 { mp + 3 } else { mp - 9 };
        let y = yoe + era * 400 + if m <= 2 { 1 } else { 0 };
        (y as u32, m as u32)
    }

    fn last4(env: &Env, number: &String) -> String {
        let mut digits = [0u8; MAX_CARD_DIGITS];
        // authorize only reaches this after validation, so the unwrap_or
        // branch covers the impossible case without panicking.
        let n = Self::card_digits(number, &mut digits).unwrap_or(4);
        String::from_bytes(env, &digits[n - 4..n])
    }
}

#[contractimpl]
impl PaymentContract {
    /// Validate card input. Never fails; all violated rules are reported
    /// together in the result.
    pub fn validate(env: Env, card: CardInput) -> ValidationResult {
        let mut errors = Vec::new(&env);

        let mut digits = [0u8; MAX_CARD_DIGITS];
        if Self::card_digits(&card.number, &mut digits).is_none() {
            errors.push_back(CardError::InvalidNumber);
        }

        match Self::parse_expiry(&card.expiry) {
            None => errors.push_back(CardError::InvalidExpiryFormat),
            Some((month, year)) => {
                let (cur_year, cur_month) = Self::civil_year_month(env.ledger().timestamp());
                // The expiry month itself is still valid.
                if year < cur_year || (year == cur_year && month < cur_month) {
                    errors.push_back(CardError::CardExpired);
                }
            }
        }

        if !Self::cvv_ok(&card.cvv) {
            errors.push_back(CardError::InvalidCvv);
        }

        if card.holder.len() < 2 {
            errors.push_back(CardError::InvalidHolder);
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Authorize a payment and synthesize a receipt. Mock semantics: once
    /// validation passes there is no decline path.
    pub fn authorize(
        env: Env,
        payer: Address,
        amount: i128,
        currency: String,
        card: CardInput,
    ) -> Result<PaymentReceipt, PaymentError> {
        payer.require_auth();

        if amount <= 0 {
            return Err(PaymentError::InvalidAmount);
        }

        let check = Self::validate(env.clone(), card.clone());
        if !check.is_valid {
            return Err(PaymentError::ValidationFailed);
        }

        let tx_id = Self::next_tx_id(&env);
        let receipt = PaymentReceipt {
            tx_id,
            method: PaymentMethod::Card,
            amount,
            currency: currency.clone(),
            paid_at: env.ledger().timestamp(),
            card_last4: Self::last4(&env, &card.number),
        };

        env.events().publish(
            (symbol_short!("authzd"), payer),
            (tx_id, amount, currency),
        );

        Ok(receipt)
    }
}
