pub mod init;

#[cfg(windows)]
pub mod reset;
#[cfg(windows)]
pub mod run;
#[cfg(windows)]
pub mod start;
#[cfg(windows)]
pub mod status;
#[cfg(windows)]
pub mod stop;
