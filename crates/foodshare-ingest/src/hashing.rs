// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;

use foodshare_core::sha256_hex;

use crate::IngestError;

pub fn hash_file(path: &Path) -> Result<String, IngestError> {
    let bytes = fs::read(path)
        .map_err(|e| IngestError::io(format!("failed to read {}: {e}", path.display())))?;
    Ok(sha256_hex(&bytes))
}
