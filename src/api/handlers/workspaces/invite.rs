//! Invite-code generation.

use rand::{distributions::Alphanumeric, Rng};

/// Length of generated invite codes.
///
/// Codes are shared secrets scoped to one workspace, not global identifiers;
/// collisions across workspaces are harmless and collisions within one
/// workspace's lifetime are practically improbable at 62^6.
pub const INVITE_CODE_LENGTH: usize = 6;

/// Generate a mixed-case alphanumeric join secret of `length` characters.
#[must_use]
pub fn generate_invite_code(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
