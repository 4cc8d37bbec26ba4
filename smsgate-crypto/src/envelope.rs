//! Self-describing text envelope for encrypted fields.
//!
//! Wire format:
//!
//! ```text
//! $<algorithm>$<params>$<salt-base64>$<ciphertext-base64>
//! ```
//!
//! `params` is a comma-separated `key=value` list. Only `i` (the PBKDF2
//! iteration count) is understood; other keys are ignored so newer writers
//! can add parameters without breaking older readers.

use crate::error::{CryptoError, CryptoResult};
use crate::key::Salt;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;
use std::str::FromStr;

/// The only supported algorithm identifier.
pub const ALGORITHM_ID: &str = "aes-256-cbc/pbkdf2-sha1";

/// Field delimiter.
pub const DELIMITER: char = '$';

const ITERATIONS_PARAM: &str = "i";
const MIN_FIELDS: usize = 5;

/// A parsed envelope. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    iterations: u32,
    salt: Salt,
    ciphertext: Vec<u8>,
}

impl Envelope {
    pub fn new(iterations: u32, salt: Salt, ciphertext: Vec<u8>) -> Self {
        Self {
            iterations,
            salt,
            ciphertext,
        }
    }

    pub fn algorithm(&self) -> &'static str {
        ALGORITHM_ID
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Parses the wire string. Equivalent to `s.parse::<Envelope>()`.
    pub fn parse(s: &str) -> CryptoResult<Self> {
        s.parse()
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{d}{ALGORITHM_ID}{d}{ITERATIONS_PARAM}={}{d}{}{d}{}",
            self.iterations,
            STANDARD.encode(self.salt.as_bytes()),
            STANDARD.encode(&self.ciphertext),
            d = DELIMITER,
        )
    }
}

impl FromStr for Envelope {
    type Err = CryptoError;

    fn from_str(s: &str) -> CryptoResult<Self> {
        let fields: Vec<&str> = s.split(DELIMITER).collect();
        if fields.len() < MIN_FIELDS {
            return Err(CryptoError::InvalidFormat(format!(
                "expected at least {MIN_FIELDS} '{DELIMITER}'-delimited fields, got {}",
                fields.len()
            )));
        }

        if fields[1] != ALGORITHM_ID {
            return Err(CryptoError::UnsupportedAlgorithm(fields[1].to_string()));
        }

        let iterations = parse_iterations(fields[2])?;

        // Salt and ciphertext are always the trailing two fields.
        let salt_b64 = fields[fields.len() - 2];
        let ciphertext_b64 = fields[fields.len() - 1];

        let salt_bytes = STANDARD
            .decode(salt_b64)
            .map_err(|e| CryptoError::InvalidFormat(format!("salt is not valid base64: {e}")))?;
        let salt = Salt::from_slice(&salt_bytes)?;

        let ciphertext = STANDARD.decode(ciphertext_b64).map_err(|e| {
            CryptoError::InvalidFormat(format!("ciphertext is not valid base64: {e}"))
        })?;

        Ok(Self {
            iterations,
            salt,
            ciphertext,
        })
    }
}

fn parse_iterations(params: &str) -> CryptoResult<u32> {
    let mut iterations = None;
    for pair in params.split(',').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            CryptoError::InvalidFormat(format!("malformed parameter '{pair}'"))
        })?;
        if key == ITERATIONS_PARAM {
            iterations = Some(value);
        }
    }

    let raw = iterations.ok_or_else(|| {
        CryptoError::MissingParameter(format!("iteration count '{ITERATIONS_PARAM}'"))
    })?;

    match raw.parse::<u32>() {
        Ok(0) => Err(CryptoError::InvalidParameter(
            "iteration count must be positive".to_string(),
        )),
        Ok(n) => Ok(n),
        Err(e) => Err(CryptoError::InvalidParameter(format!(
            "iteration count '{raw}': {e}"
        ))),
    }
}
