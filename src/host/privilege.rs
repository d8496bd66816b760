//! Administrator check

use crate::{Error, Result};

/// Proof that the privilege check passed.
///
/// Only [`check_privileges`] can produce one, and every installation step
/// takes it by reference.
#[derive(Debug)]
pub struct Elevated {
    _private: (),
}

#[cfg(test)]
impl Elevated {
    pub(crate) fn assume() -> Self {
        Self { _private: () }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PrivilegeCheck {
    fn is_elevated(&self) -> Result<bool>;
}

/// Queries the elevation state of the current process token
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenPrivilege;

#[cfg(windows)]
impl PrivilegeCheck for TokenPrivilege {
    fn is_elevated(&self) -> Result<bool> {
        use std::mem;
        use windows::Win32::Foundation::{CloseHandle, HANDLE};
        use windows::Win32::Security::{
            GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY,
        };
        use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

        let mut token = HANDLE::default();
        let mut elevation = TOKEN_ELEVATION::default();
        let mut returned: u32 = 0;

        unsafe {
            OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token)?;

            let queried = GetTokenInformation(
                token,
                TokenElevation,
                Some(&mut elevation as *mut _ as *mut std::ffi::c_void),
                mem::size_of::<TOKEN_ELEVATION>() as u32,
                &mut returned,
            );
            let _ = CloseHandle(token);
            queried?;
        }

        Ok(elevation.TokenIsElevated != 0)
    }
}

#[cfg(not(windows))]
impl PrivilegeCheck for TokenPrivilege {
    fn is_elevated(&self) -> Result<bool> {
        Err(Error::UnsupportedPlatform)
    }
}

/// Fail unless the current principal is an administrator
pub fn check_privileges(check: &dyn PrivilegeCheck) -> Result<Elevated> {
    if !check.is_elevated()? {
        tracing::warn!("Installer is not running elevated");
        return Err(Error::InsufficientPrivileges);
    }
    Ok(Elevated { _private: () })
}
