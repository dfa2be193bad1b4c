#[cfg(test)]
pub mod publisher_tests;
#[cfg(test)]
pub mod utils;
#[cfg(test)]
pub mod wallet_session_tests;
