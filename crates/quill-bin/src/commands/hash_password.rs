// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `hash-password` command.

use std::io::BufRead;

use quill_api::PasswordHasher;
use quill_config::schema::DEFAULT_BCRYPT_COST;

use crate::cli::{Cli, HashPasswordArgs};
use crate::error::{BinError, BinResult};

/// Prints the bcrypt hash of the given password.
pub fn hash_password(_cli: &Cli, args: HashPasswordArgs) -> BinResult<()> {
    let password = match (args.stdin, args.password) {
        (true, _) => read_password(std::io::stdin().lock())?,
        (false, Some(password)) => password,
        (false, None) => return Err(BinError::config("a password or --stdin is required")),
    };

    println!("{}", hash_with_cost(&password, args.cost.unwrap_or(DEFAULT_BCRYPT_COST))?);
    Ok(())
}

fn hash_with_cost(password: &str, cost: u32) -> BinResult<String> {
    if password.is_empty() {
        return Err(BinError::config("password cannot be empty"));
    }
    let hasher =
        PasswordHasher::with_cost(cost).map_err(|e| BinError::config(e.to_string()))?;
    hasher
        .hash(password)
        .map_err(|e| BinError::config(e.to_string()))
}

fn read_password(mut reader: impl BufRead) -> BinResult<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies() {
        let hash = hash_with_cost("s3cret", 4).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(PasswordHasher::with_cost(4).unwrap().verify("s3cret", &hash).unwrap());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(hash_with_cost("", 4).is_err());
        assert!(hash_with_cost("s3cret", 2).is_err());
        assert!(hash_with_cost(&"x".repeat(73), 4).is_err());
    }

    #[test]
    fn test_read_password_strips_newline() {
        let input = std::io::Cursor::new("s3cret\r\nignored\n");
        assert_eq!(read_password(input).unwrap(), "s3cret");
    }
}
