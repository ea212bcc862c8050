// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Number of random bytes in an invitation token.
pub const TOKEN_BYTES: usize = 32;

/// Generates a new invitation token.
///
/// 32 bytes from the thread-local CSPRNG, hex-encoded to 64 characters.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}
