//! Membership administration endpoints.
//!
//! Members bind a user to a workspace with a role. Authorization is
//! self-or-ADMIN for mutations and any-membership for reads, and two
//! invariants hold at all times: a workspace never drops to zero members,
//! and a role change never leaves a workspace without an ADMIN. Both checks
//! run against the pre-mutation state under the workspace's lock, so the
//! mutation is rejected up front rather than performed and then regretted.

pub(crate) mod members;
mod types;

pub use members::{list_members, remove_member, update_member_role};
pub use types::{MemberResponse, UpdateMemberRoleRequest};
