//! Host facilities: process execution and privilege checks

pub mod commands;
pub mod privilege;

pub use commands::{CommandOutput, CommandRunner, SystemRunner};
pub use privilege::{check_privileges, Elevated, PrivilegeCheck, TokenPrivilege};
